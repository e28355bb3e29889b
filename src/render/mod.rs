mod ascii;
mod halfblock;
mod kitty;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;
pub use kitty::KittyRenderer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

/// A finished map handed to an output sink. `pixels_rgba` is row-major
/// RGBA8, `width * height * 4` bytes; `term_cols`/`term_rows` are the cell
/// footprint the image should occupy on screen.
pub struct Frame<'a> {
    pub width: usize,
    pub height: usize,
    pub pixels_rgba: &'a [u8],
    pub term_cols: u16,
    pub term_rows: u16,
    pub footer: &'a str,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Rec.709 luma, integer arithmetic.
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 2126 + g as u32 * 7152 + b as u32 * 722) / 10_000) as u8
}

pub(crate) fn write_fg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[38;2;{r};{g};{b}m")?;
    Ok(())
}

pub(crate) fn write_footer(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    out.write_all(b"\x1b[0m")?;
    if !frame.footer.is_empty() {
        writeln!(out, "{}", frame.footer)?;
    }
    out.flush()?;
    Ok(())
}

/// Nearest-neighbor resample of an RGBA8 buffer. Used to fit the full-res
/// map into the terminal cell grid; the PPM and kitty paths keep full
/// resolution.
pub fn resample_nearest(src: &[u8], sw: usize, sh: usize, dw: usize, dh: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dw * dh * 4];
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 || src.len() < sw * sh * 4 {
        return dst;
    }
    for dy in 0..dh {
        let sy = dy * sh / dh;
        for dx in 0..dw {
            let sx = dx * sw / dw;
            let si = (sy * sw + sx) * 4;
            let di = (dy * dw + dx) * 4;
            dst[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    dst
}

/// Write the map as a binary PPM (P6). Alpha is dropped; PPM carries RGB
/// only.
pub fn write_ppm(path: &Path, width: usize, height: usize, rgba: &[u8]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P6\n{width} {height}\n255\n").context("write ppm header")?;
    for px in rgba.chunks_exact(4) {
        out.write_all(&px[..3]).context("write ppm pixels")?;
    }
    out.flush().context("flush ppm")?;
    Ok(())
}
