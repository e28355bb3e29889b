use chaoscope::classify::Outcome;
use chaoscope::config::Palette;
use chaoscope::palette::{hsl_to_rgb, shade};

const ALL_PALETTES: [Palette; 5] = [
    Palette::Rainbow,
    Palette::Heatmap,
    Palette::Viridis,
    Palette::Grayscale,
    Palette::Cyclic,
];

fn diverged_at(time: u32) -> Outcome {
    Outcome {
        iterations: time,
        diverged: true,
        divergence_time: time,
    }
}

fn never_diverged(max_iter: u32) -> Outcome {
    Outcome {
        iterations: max_iter,
        diverged: false,
        divergence_time: max_iter,
    }
}

#[test]
fn non_divergent_is_black_under_every_palette() {
    for p in ALL_PALETTES {
        let rgb = shade(&never_diverged(1000), p, 300, 1000);
        assert_eq!(rgb, [0, 0, 0], "{p:?} must map non-divergent to black");
    }
}

#[test]
fn grayscale_channels_are_equal() {
    for time in [1, 7, 250, 500, 999, 1000] {
        let [r, g, b] = shade(&diverged_at(time), Palette::Grayscale, 300, 1000);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}

#[test]
fn grayscale_floors_instead_of_rounding() {
    // t = 999/1000 -> 254.745, which must floor to 254.
    let [r, _, _] = shade(&diverged_at(999), Palette::Grayscale, 300, 1000);
    assert_eq!(r, 254);
}

#[test]
fn heatmap_walks_black_red_yellow_white() {
    // Early: red ramping up, green and blue still off.
    let [r, g, b] = shade(&diverged_at(100), Palette::Heatmap, 300, 1000);
    assert!(r > 0 && g == 0 && b == 0, "got ({r}, {g}, {b})");

    // Middle third: red saturated, green ramping.
    let [r, g, b] = shade(&diverged_at(500), Palette::Heatmap, 300, 1000);
    assert_eq!(r, 255);
    assert!(g > 0 && b == 0, "got ({r}, {g}, {b})");

    // Final third: only blue still ramping.
    let [r, g, b] = shade(&diverged_at(900), Palette::Heatmap, 300, 1000);
    assert_eq!(r, 255);
    assert_eq!(g, 255);
    assert!(b > 0, "got ({r}, {g}, {b})");
}

#[test]
fn viridis_clamps_blue_at_full_time() {
    // At t = 1 the fitted blue channel exceeds 255 and must clamp.
    let [r, g, b] = shade(&diverged_at(1000), Palette::Viridis, 300, 1000);
    assert_eq!(b, 255);
    assert_eq!(r, 249);
    assert_eq!(g, 249);
}

#[test]
fn viridis_starts_in_dark_purple() {
    // t near 0 sits at the fit's constant terms.
    let [r, g, b] = shade(&diverged_at(1), Palette::Viridis, 300, 100_000);
    assert_eq!(r, 68);
    assert_eq!(g, 1);
    assert_eq!(b, 84);
}

#[test]
fn rainbow_sweeps_hue_with_time() {
    // Small t: hue near 0 degrees, i.e. red.
    let [r, g, b] = shade(&diverged_at(1), Palette::Rainbow, 300, 100_000);
    assert_eq!(r, 255);
    assert!(g < 10 && b == 0, "got ({r}, {g}, {b})");

    // t = 1/3: hue 120 degrees, i.e. green.
    let [r, g, b] = shade(&diverged_at(333), Palette::Rainbow, 300, 999);
    assert!(g == 255 && r < 10 && b == 0, "got ({r}, {g}, {b})");
}

#[test]
fn cyclic_repeats_every_period() {
    let a = shade(&diverged_at(40), Palette::Cyclic, 300, 100_000);
    let b = shade(&diverged_at(340), Palette::Cyclic, 300, 100_000);
    let c = shade(&diverged_at(640), Palette::Cyclic, 300, 100_000);
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn cyclic_ignores_max_iter_scaling() {
    // Same raw divergence time, different cutoffs: the cyclic palette keys
    // off the iteration count alone.
    let a = shade(&diverged_at(123), Palette::Cyclic, 300, 1_000);
    let b = shade(&diverged_at(123), Palette::Cyclic, 300, 50_000);
    assert_eq!(a, b);
}

// ── HSL decomposition ───────────────────────────────────────────────────────

#[test]
fn hsl_primaries_land_on_pure_channels() {
    assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), [255, 0, 0]);
    assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), [0, 255, 0]);
    assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), [0, 0, 255]);
}

#[test]
fn hsl_extremes_of_lightness() {
    assert_eq!(hsl_to_rgb(77.0, 1.0, 0.0), [0, 0, 0]);
    assert_eq!(hsl_to_rgb(77.0, 1.0, 1.0), [255, 255, 255]);
}

#[test]
fn hsl_hue_wraps_past_full_circle() {
    assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5));
    assert_eq!(hsl_to_rgb(480.0, 1.0, 0.5), hsl_to_rgb(120.0, 1.0, 0.5));
}
