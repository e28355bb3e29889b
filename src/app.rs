use crate::config::{Config, OutputMode};
use crate::map::{PerturbationSpec, Scene, ViewMap};
use crate::physics::{IntegratorConfig, PendulumState};
use crate::pool::{self, RenderPool};
use crate::render::{
    self, AsciiRenderer, Frame, HalfBlockRenderer, KittyRenderer, Renderer, resample_nearest,
};
use crate::tile::{Shading, TileRequest, TileResult};
use anyhow::Context;
use std::io::{BufWriter, stdout};
use std::sync::mpsc;
use std::time::Instant;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    cfg.validate()?;

    let scene = scene_from(&cfg);
    let sim = IntegratorConfig {
        dt: cfg.dt,
        g: cfg.g,
        integrator: cfg.integrator,
        max_iter: cfg.max_iter,
        threshold: cfg.threshold,
    };
    let shading = Shading {
        palette: cfg.palette,
        cycle_period: cfg.cycle_period,
    };

    let workers = cfg.workers.unwrap_or_else(pool::default_pool_size);
    let resolution = cfg.resolution;
    let side = resolution as usize;

    eprintln!(
        "chaoscope: {resolution}x{resolution} map, {:?}/{:?} over {:?} x {:?}, {} workers",
        cfg.integrator, cfg.palette, cfg.dim_x, cfg.dim_y, workers
    );

    let started = Instant::now();
    // One pool per pass; a new configuration gets a new pool.
    let pool = RenderPool::new(workers);
    let (done_tx, done_rx) = mpsc::channel::<TileResult>();

    let mut submitted = 0usize;
    let mut oy = 0u32;
    while oy < resolution {
        let height = cfg.tile_size.min(resolution - oy);
        let mut ox = 0u32;
        while ox < resolution {
            let width = cfg.tile_size.min(resolution - ox);
            let request = TileRequest {
                offset_x: ox,
                offset_y: oy,
                width,
                height,
                resolution,
                scene,
                sim,
                shading,
            };
            let done = done_tx.clone();
            pool.submit(request, move |result| {
                let _ = done.send(result);
            })?;
            submitted += 1;
            ox += width;
        }
        oy += height;
    }
    drop(done_tx);

    // Tiles land keyed by their offsets; completion order is irrelevant.
    let mut image = vec![0u8; side * side * 4];
    for _ in 0..submitted {
        let result = done_rx.recv().context("collect tile results")?;
        blit(&mut image, side, &result);
    }
    drop(pool);

    let elapsed = started.elapsed().as_secs_f64();
    eprintln!("chaoscope: {submitted} tiles in {elapsed:.2}s");

    let footer = format!(
        "chaoscope | {resolution}x{resolution} px | {:?} | {:?} | {submitted} tiles | {elapsed:.2}s",
        cfg.integrator, cfg.palette
    );

    if let Some(path) = &cfg.out {
        render::write_ppm(path, side, side, &image)?;
        eprintln!("chaoscope: wrote {}", path.display());
        return Ok(());
    }

    present(&cfg, &image, side, &footer)
}

/// Draw the composited map to the terminal through the selected sink,
/// downsampled to the available cell grid (kitty keeps full resolution and
/// lets the terminal scale).
fn present(cfg: &Config, image: &[u8], side: usize, footer: &str) -> anyhow::Result<()> {
    let (term_cols, term_rows) = crossterm::terminal::size().unwrap_or((80, 24));
    // Leave room for the footer and the shell prompt.
    let usable_rows = term_rows.saturating_sub(2).max(1) as usize;
    let usable_cols = term_cols.max(2) as usize;

    let mut out = BufWriter::new(stdout());
    let mut renderer: Box<dyn Renderer> = match cfg.output {
        OutputMode::Ascii => Box::new(AsciiRenderer::new()),
        OutputMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        OutputMode::Kitty => Box::new(KittyRenderer::new()),
    };

    let frame_storage;
    let frame = match cfg.output {
        // Terminal cells are roughly twice as tall as wide; one pixel per
        // cell means width must double to keep the map square on screen.
        OutputMode::Ascii => {
            let h = usable_rows.min(usable_cols / 2).max(1);
            let w = (h * 2).min(usable_cols);
            frame_storage = resample_nearest(image, side, side, w, h);
            Frame {
                width: w,
                height: h,
                pixels_rgba: &frame_storage,
                term_cols: w as u16,
                term_rows: h as u16,
                footer,
            }
        }
        // Half blocks give square pixels: two pixel rows per cell row.
        OutputMode::HalfBlock => {
            let w = usable_cols.min(usable_rows * 2).max(1);
            let h = w;
            frame_storage = resample_nearest(image, side, side, w, h);
            Frame {
                width: w,
                height: h,
                pixels_rgba: &frame_storage,
                term_cols: w as u16,
                term_rows: h.div_ceil(2) as u16,
                footer,
            }
        }
        OutputMode::Kitty => {
            let rows = usable_rows.max(1);
            let cols = (rows * 2).min(usable_cols).max(1);
            Frame {
                width: side,
                height: side,
                pixels_rgba: image,
                term_cols: cols as u16,
                term_rows: rows as u16,
                footer,
            }
        }
    };

    renderer.render(&frame, &mut out)
}

fn scene_from(cfg: &Config) -> Scene {
    Scene {
        basis: PendulumState {
            theta1: cfg.theta1,
            theta2: cfg.theta2,
            omega1: cfg.omega1,
            omega2: cfg.omega2,
            l1: cfg.l1,
            l2: cfg.l2,
            m1: cfg.m1,
            m2: cfg.m2,
        },
        dim_x: cfg.dim_x,
        dim_y: cfg.dim_y,
        view: ViewMap {
            scale_x: cfg.scale_x,
            scale_y: cfg.scale_y,
            center_x: cfg.center_x,
            center_y: cfg.center_y,
        },
        perturb: PerturbationSpec {
            d_theta1: cfg.perturb_theta1,
            d_theta2: cfg.perturb_theta2,
            d_omega1: cfg.perturb_omega1,
            d_omega2: cfg.perturb_omega2,
            d_l1: cfg.perturb_l1,
            d_l2: cfg.perturb_l2,
            d_m1: cfg.perturb_m1,
            d_m2: cfg.perturb_m2,
            scale: cfg.perturb_scale,
        },
    }
}

/// Copy a finished tile into the composited image at its offsets.
fn blit(image: &mut [u8], side: usize, tile: &TileResult) {
    let tw = tile.width as usize;
    let th = tile.height as usize;
    let ox = tile.offset_x as usize;
    let oy = tile.offset_y as usize;
    if tile.pixels.len() < tw * th * 4 || ox + tw > side || oy + th > side {
        return;
    }
    for row in 0..th {
        let src = row * tw * 4;
        let dst = ((oy + row) * side + ox) * 4;
        image[dst..dst + tw * 4].copy_from_slice(&tile.pixels[src..src + tw * 4]);
    }
}
