use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "chaoscope", version, about = "Double-pendulum chaos-map renderer (divergence-time maps over a 2D parameter slice)")]
pub struct Config {
    /// Side length of the square map in pixels.
    #[arg(long, default_value_t = 512)]
    pub resolution: u32,

    #[arg(long, value_enum, default_value_t = Integrator::Rk4)]
    pub integrator: Integrator,

    /// Integration timestep in seconds.
    #[arg(long, default_value_t = 0.002)]
    pub dt: f64,

    /// Gravitational acceleration.
    #[arg(long, default_value_t = 9.81)]
    pub g: f64,

    /// Step cutoff per pixel; trajectories still together after this many
    /// steps are classified non-divergent.
    #[arg(long, default_value_t = 1000)]
    pub max_iter: u32,

    /// Phase-space distance at which a pair counts as diverged.
    #[arg(long, default_value_t = 0.05)]
    pub threshold: f64,

    #[arg(long, value_enum, default_value_t = Palette::Rainbow)]
    pub palette: Palette,

    /// Hue cycle length in iterations (cyclic palette only).
    #[arg(long, default_value_t = 300)]
    pub cycle_period: u32,

    // Basis state: the six non-mapped fields come from here.
    #[arg(long, default_value_t = 1.0)]
    pub theta1: f64,

    #[arg(long, default_value_t = 0.5)]
    pub theta2: f64,

    #[arg(long, default_value_t = 0.0)]
    pub omega1: f64,

    #[arg(long, default_value_t = 0.0)]
    pub omega2: f64,

    #[arg(long, default_value_t = 1.0)]
    pub l1: f64,

    #[arg(long, default_value_t = 1.0)]
    pub l2: f64,

    #[arg(long, default_value_t = 1.0)]
    pub m1: f64,

    #[arg(long, default_value_t = 1.0)]
    pub m2: f64,

    /// Pendulum field driven by the map's x axis.
    #[arg(long, value_enum, default_value_t = Dimension::Theta1)]
    pub dim_x: Dimension,

    /// Pendulum field driven by the map's y axis.
    #[arg(long, value_enum, default_value_t = Dimension::Theta2)]
    pub dim_y: Dimension,

    /// Half-width of the x axis in parameter units.
    #[arg(long, default_value_t = PI)]
    pub scale_x: f64,

    /// Half-width of the y axis in parameter units.
    #[arg(long, default_value_t = PI)]
    pub scale_y: f64,

    #[arg(long, default_value_t = 0.0)]
    pub center_x: f64,

    #[arg(long, default_value_t = 0.0)]
    pub center_y: f64,

    // Fixed perturbation deltas between the two pendulums of a pair. Only
    // the four dynamical fields are ever applied; the l/m deltas are
    // accepted for interface completeness and ignored.
    #[arg(long, default_value_t = 1e-5)]
    pub perturb_theta1: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_theta2: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_omega1: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_omega2: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_l1: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_l2: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_m1: f64,

    #[arg(long, default_value_t = 0.0)]
    pub perturb_m2: f64,

    /// Multiplier applied to every perturbation delta.
    #[arg(long, default_value_t = 1.0)]
    pub perturb_scale: f64,

    /// Worker threads; defaults to hardware concurrency.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Side length of a dispatched tile in pixels.
    #[arg(long, default_value_t = 64)]
    pub tile_size: u32,

    #[arg(long, value_enum, default_value_t = OutputMode::HalfBlock)]
    pub output: OutputMode,

    /// Write the map as a binary PPM (P6) instead of drawing to the terminal.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Integrator {
    Verlet,
    Rk4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Palette {
    #[value(alias = "0")]
    Rainbow,
    #[value(alias = "1", alias = "heat")]
    Heatmap,
    #[value(alias = "2")]
    Viridis,
    #[value(alias = "3", alias = "gray", alias = "grey")]
    Grayscale,
    #[value(alias = "4")]
    Cyclic,
}

/// The eight pendulum fields addressable by the map axes, in the canonical
/// field order used throughout: theta1, theta2, omega1, omega2, l1, l2, m1, m2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    Theta1,
    Theta2,
    Omega1,
    Omega2,
    L1,
    L2,
    M1,
    M2,
}

impl Dimension {
    pub const fn index(self) -> usize {
        match self {
            Self::Theta1 => 0,
            Self::Theta2 => 1,
            Self::Omega1 => 2,
            Self::Omega2 => 3,
            Self::L1 => 4,
            Self::L2 => 5,
            Self::M1 => 6,
            Self::M2 => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    Kitty,
}

impl Config {
    /// Fail-fast check of every numeric bound; nothing is dispatched to the
    /// pool before this passes.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.resolution == 0 {
            bail!("resolution must be positive");
        }
        if self.tile_size == 0 {
            bail!("tile size must be positive");
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            bail!("dt must be positive and finite (got {})", self.dt);
        }
        if !self.g.is_finite() {
            bail!("g must be finite (got {})", self.g);
        }
        if !(self.threshold > 0.0 && self.threshold.is_finite()) {
            bail!("threshold must be positive and finite (got {})", self.threshold);
        }
        if self.cycle_period == 0 {
            bail!("cycle period must be positive");
        }
        for (name, v) in [
            ("l1", self.l1),
            ("l2", self.l2),
            ("m1", self.m1),
            ("m2", self.m2),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                bail!("{name} must be positive and finite (got {v})");
            }
        }
        for (name, v) in [
            ("theta1", self.theta1),
            ("theta2", self.theta2),
            ("omega1", self.omega1),
            ("omega2", self.omega2),
            ("scale-x", self.scale_x),
            ("scale-y", self.scale_y),
            ("center-x", self.center_x),
            ("center-y", self.center_y),
            ("perturb-scale", self.perturb_scale),
        ] {
            if !v.is_finite() {
                bail!("{name} must be finite (got {v})");
            }
        }
        if self.workers == Some(0) {
            bail!("worker count must be positive");
        }
        Ok(())
    }
}
