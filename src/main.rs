use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = chaoscope::config::Config::parse();
    chaoscope::app::run(cfg)
}
