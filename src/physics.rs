use crate::config::Integrator;

/// Full configuration of one double pendulum. The four dynamical fields
/// (angles and angular velocities) evolve under `step`; the geometry fields
/// (lengths and masses) are constants of the trajectory.
///
/// Stack-local by design: one pair of these is created per pixel and
/// discarded after classification, so the pixel path never allocates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumState {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
}

/// Read-only integration settings shared by every worker of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct IntegratorConfig {
    pub dt: f64,
    pub g: f64,
    pub integrator: Integrator,
    pub max_iter: u32,
    pub threshold: f64,
}

/// Angular accelerations of both links.
///
/// This is the only copy of the model in the crate; both integrators and
/// every test go through it so the arithmetic stays bit-identical across
/// call sites. Callers guarantee l1, l2, m1 > 0, which keeps the
/// denominator nonzero.
pub fn accelerations(s: &PendulumState, g: f64) -> (f64, f64) {
    let m = s.m1 + s.m2;
    let delta = s.theta1 - s.theta2;
    let (sin_d, cos_d) = delta.sin_cos();
    let denom = s.m1 + s.m2 * sin_d * sin_d;

    let alpha1 = (-s.m2 * s.l1 * s.omega1 * s.omega1 * sin_d * cos_d
        - s.m2 * s.l2 * s.omega2 * s.omega2 * sin_d
        - m * g * s.theta1.sin()
        + s.m2 * g * s.theta2.sin() * cos_d)
        / (s.l1 * denom);

    let alpha2 = (m * s.l1 * s.omega1 * s.omega1 * sin_d
        + s.m2 * s.l2 * s.omega2 * s.omega2 * sin_d * cos_d
        + m * g * s.theta1.sin() * cos_d
        - m * g * s.theta2.sin())
        / (s.l2 * denom);

    (alpha1, alpha2)
}

/// Velocity Verlet: half-kick, drift, re-evaluate, half-kick. Symplectic,
/// energy-preserving to leading order.
pub fn step_verlet(s: &PendulumState, dt: f64, g: f64) -> PendulumState {
    let (a1, a2) = accelerations(s, g);
    let half = dt * 0.5;

    let w1 = s.omega1 + a1 * half;
    let w2 = s.omega2 + a2 * half;

    let mut next = *s;
    next.theta1 = s.theta1 + w1 * dt;
    next.theta2 = s.theta2 + w2 * dt;
    next.omega1 = w1;
    next.omega2 = w2;

    let (a1, a2) = accelerations(&next, g);
    next.omega1 = w1 + a1 * half;
    next.omega2 = w2 + a2 * half;
    next
}

/// Classic RK4 over the 4D dynamical state, derivative (dtheta, domega) =
/// (omega, alpha), stages blended (1, 2, 2, 1)/6.
pub fn step_rk4(s: &PendulumState, dt: f64, g: f64) -> PendulumState {
    let k1 = derivative(s, g);
    let k2 = derivative(&offset(s, &k1, dt * 0.5), g);
    let k3 = derivative(&offset(s, &k2, dt * 0.5), g);
    let k4 = derivative(&offset(s, &k3, dt), g);

    let mut next = *s;
    let sixth = dt / 6.0;
    next.theta1 += sixth * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]);
    next.theta2 += sixth * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]);
    next.omega1 += sixth * (k1[2] + 2.0 * k2[2] + 2.0 * k3[2] + k4[2]);
    next.omega2 += sixth * (k1[3] + 2.0 * k2[3] + 2.0 * k3[3] + k4[3]);
    next
}

/// One step with the configured integrator.
pub fn step(s: &PendulumState, cfg: &IntegratorConfig) -> PendulumState {
    match cfg.integrator {
        Integrator::Verlet => step_verlet(s, cfg.dt, cfg.g),
        Integrator::Rk4 => step_rk4(s, cfg.dt, cfg.g),
    }
}

fn derivative(s: &PendulumState, g: f64) -> [f64; 4] {
    let (a1, a2) = accelerations(s, g);
    [s.omega1, s.omega2, a1, a2]
}

fn offset(s: &PendulumState, k: &[f64; 4], h: f64) -> PendulumState {
    let mut out = *s;
    out.theta1 += k[0] * h;
    out.theta2 += k[1] * h;
    out.omega1 += k[2] * h;
    out.omega2 += k[3] * h;
    out
}

/// Total mechanical energy, with the pivot as potential reference. Used by
/// the tests to check the symplectic integrator's drift; not on the pixel
/// path.
pub fn total_energy(s: &PendulumState, g: f64) -> f64 {
    let v1x = s.l1 * s.omega1 * s.theta1.cos();
    let v1y = s.l1 * s.omega1 * s.theta1.sin();
    let v2x = v1x + s.l2 * s.omega2 * s.theta2.cos();
    let v2y = v1y + s.l2 * s.omega2 * s.theta2.sin();

    let kinetic = 0.5 * s.m1 * (v1x * v1x + v1y * v1y) + 0.5 * s.m2 * (v2x * v2x + v2y * v2y);

    let y1 = -s.l1 * s.theta1.cos();
    let y2 = y1 - s.l2 * s.theta2.cos();
    let potential = s.m1 * g * y1 + s.m2 * g * y2;

    kinetic + potential
}
