use std::sync::atomic::{AtomicBool, Ordering};

use crate::classify;
use crate::config::Palette;
use crate::map::Scene;
use crate::palette;
use crate::physics::IntegratorConfig;

/// Shading settings carried alongside the scene in every request.
#[derive(Clone, Copy, Debug)]
pub struct Shading {
    pub palette: Palette,
    pub cycle_period: u32,
}

/// One unit of dispatched work: a rectangular sub-region of the
/// `resolution x resolution` map.
#[derive(Clone, Copy, Debug)]
pub struct TileRequest {
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
    /// Side length of the full map in pixels; offsets divide by this to
    /// recover normalized grid coordinates.
    pub resolution: u32,
    pub scene: Scene,
    pub sim: IntegratorConfig,
    pub shading: Shading,
}

/// Finished tile. `pixels` is RGBA8, row-major, always
/// `width * height * 4` bytes; a cancelled render leaves the untouched
/// suffix zeroed and the whole buffer is then invalid for compositing.
#[derive(Clone, Debug)]
pub struct TileResult {
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Render one tile: map each pixel to a state pair, classify it, shade it.
///
/// The cancel flag is checked once per pixel, which bounds the reaction
/// latency to a single pixel's classification cost (the dominant cost is
/// the O(max_iter) step loop inside `classify_pair`).
pub fn render_tile(req: &TileRequest, cancel: &AtomicBool) -> TileResult {
    let w = req.width as usize;
    let h = req.height as usize;
    let mut pixels = vec![0u8; w * h * 4];
    let inv_res = 1.0 / req.resolution as f64;

    'rows: for py in 0..h {
        let ny = (req.offset_y as usize + py) as f64 * inv_res;
        for px in 0..w {
            if cancel.load(Ordering::Relaxed) {
                break 'rows;
            }
            let nx = (req.offset_x as usize + px) as f64 * inv_res;

            let (primary, shadow) = req.scene.state_pair(nx, ny);
            let outcome = classify::classify_pair(primary, shadow, &req.sim);
            let rgb = palette::shade(
                &outcome,
                req.shading.palette,
                req.shading.cycle_period,
                req.sim.max_iter,
            );

            let i = (py * w + px) * 4;
            pixels[i] = rgb[0];
            pixels[i + 1] = rgb[1];
            pixels[i + 2] = rgb[2];
            pixels[i + 3] = 255;
        }
    }

    TileResult {
        offset_x: req.offset_x,
        offset_y: req.offset_y,
        width: req.width,
        height: req.height,
        pixels,
    }
}
