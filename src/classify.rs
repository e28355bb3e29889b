use std::f64::consts::{PI, TAU};

use crate::physics::{self, IntegratorConfig, PendulumState};

/// Result of driving one state pair to divergence or cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Joint steps actually taken.
    pub iterations: u32,
    pub diverged: bool,
    /// First iteration whose distance exceeded the threshold; equals
    /// `max_iter` for non-divergent pairs (shading ignores it then).
    pub divergence_time: u32,
}

/// Normalize an angle difference into (-pi, pi].
pub fn wrap_angle(d: f64) -> f64 {
    let r = d.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// Euclidean distance in (theta1, theta2, omega1, omega2) phase space.
/// Angle deltas are wrapped so that trajectories a full turn apart measure
/// as close; velocity deltas are plain differences.
pub fn phase_distance(a: &PendulumState, b: &PendulumState) -> f64 {
    let dt1 = wrap_angle(a.theta1 - b.theta1);
    let dt2 = wrap_angle(a.theta2 - b.theta2);
    let dw1 = a.omega1 - b.omega1;
    let dw2 = a.omega2 - b.omega2;
    (dt1 * dt1 + dt2 * dt2 + dw1 * dw1 + dw2 * dw2).sqrt()
}

/// Step the two states in lockstep, measuring after each joint step, until
/// the distance first exceeds the threshold or `max_iter` steps have run.
///
/// NaN or infinite states from extreme parameter values are deliberately
/// not special-cased: `distance > threshold` is false for NaN, so such
/// trajectories run to the cutoff and come back non-divergent. Keep the
/// comparison in this exact form.
pub fn classify_pair(
    mut a: PendulumState,
    mut b: PendulumState,
    cfg: &IntegratorConfig,
) -> Outcome {
    for i in 1..=cfg.max_iter {
        a = physics::step(&a, cfg);
        b = physics::step(&b, cfg);
        if phase_distance(&a, &b) > cfg.threshold {
            return Outcome {
                iterations: i,
                diverged: true,
                divergence_time: i,
            };
        }
    }
    Outcome {
        iterations: cfg.max_iter,
        diverged: false,
        divergence_time: cfg.max_iter,
    }
}
