use crate::classify::Outcome;
use crate::config::Palette;

/// Map a classification outcome to RGB.
///
/// Non-divergent pixels are black under every palette; divergent pixels
/// color by normalized divergence time t = divergence_time / max_iter,
/// except the cyclic palette which wraps the raw iteration count over
/// `cycle_period`.
pub fn shade(outcome: &Outcome, palette: Palette, cycle_period: u32, max_iter: u32) -> [u8; 3] {
    if !outcome.diverged {
        return [0, 0, 0];
    }
    let t = outcome.divergence_time as f64 / max_iter.max(1) as f64;

    match palette {
        Palette::Rainbow => hsl_to_rgb(t * 360.0, 1.0, 0.5),
        Palette::Heatmap => heatmap(t),
        Palette::Viridis => viridis_approx(t),
        Palette::Grayscale => {
            let v = (t * 255.0) as u8;
            [v, v, v]
        }
        Palette::Cyclic => {
            let period = cycle_period.max(1);
            let phase = (outcome.divergence_time % period) as f64 / period as f64;
            hsl_to_rgb(phase * 360.0, 1.0, 0.5)
        }
    }
}

/// Black -> red -> yellow -> white across equal thirds of t.
fn heatmap(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    if t < 1.0 / 3.0 {
        [(t * 3.0 * 255.0) as u8, 0, 0]
    } else if t < 2.0 / 3.0 {
        [255, ((t * 3.0 - 1.0) * 255.0) as u8, 0]
    } else {
        [255, 255, ((t * 3.0 - 2.0) * 255.0) as u8]
    }
}

/// Quadratic fit to the viridis ramp. The coefficients are the fit itself,
/// not samples of the real colormap; keep them exact.
fn viridis_approx(t: f64) -> [u8; 3] {
    let r = 68.0 + 72.0 * t + 109.0 * t * t;
    let g = 1.0 + 128.0 * t + 120.0 * t * t;
    let b = 84.0 + 53.0 * t + 119.0 * t * t;
    [
        r.min(255.0) as u8,
        g.min(255.0) as u8,
        b.min(255.0) as u8,
    ]
}

/// Standard 6-sector HSL decomposition, h in degrees. Channels are floored
/// by the cast, never rounded.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    [
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    ]
}
