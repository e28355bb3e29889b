use crate::config::Dimension;
use crate::physics::PendulumState;

/// Affine map from normalized grid coordinates in [0, 1] to parameter
/// values: `center + (n - 0.5) * 2 * scale`, so scale is the half-width of
/// the visible slice.
#[derive(Clone, Copy, Debug)]
pub struct ViewMap {
    pub scale_x: f64,
    pub scale_y: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl ViewMap {
    pub fn value_x(&self, nx: f64) -> f64 {
        self.center_x + (nx - 0.5) * 2.0 * self.scale_x
    }

    pub fn value_y(&self, ny: f64) -> f64 {
        self.center_y + (ny - 0.5) * 2.0 * self.scale_y
    }
}

/// Fixed deltas separating the shadow pendulum from the primary, plus the
/// always-applied scale multiplier. All eight fields are carried so the
/// external interface stays complete, but only the four dynamical deltas
/// are ever added: both pendulums of a pair share their geometry.
#[derive(Clone, Copy, Debug)]
pub struct PerturbationSpec {
    pub d_theta1: f64,
    pub d_theta2: f64,
    pub d_omega1: f64,
    pub d_omega2: f64,
    pub d_l1: f64,
    pub d_l2: f64,
    pub d_m1: f64,
    pub d_m2: f64,
    pub scale: f64,
}

impl PerturbationSpec {
    /// A zero perturbation at unit scale; the shadow equals the primary.
    pub fn none() -> Self {
        Self {
            d_theta1: 0.0,
            d_theta2: 0.0,
            d_omega1: 0.0,
            d_omega2: 0.0,
            d_l1: 0.0,
            d_l2: 0.0,
            d_m1: 0.0,
            d_m2: 0.0,
            scale: 1.0,
        }
    }

    fn apply(&self, s: &PendulumState) -> PendulumState {
        let mut out = *s;
        out.theta1 += self.d_theta1 * self.scale;
        out.theta2 += self.d_theta2 * self.scale;
        out.omega1 += self.d_omega1 * self.scale;
        out.omega2 += self.d_omega2 * self.scale;
        out
    }
}

/// Everything the mapper needs to turn a grid coordinate into a state
/// pair: the basis state supplying the six non-mapped fields, the two
/// pixel-driven dimensions, the affine view, and the pair perturbation.
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub basis: PendulumState,
    pub dim_x: Dimension,
    pub dim_y: Dimension,
    pub view: ViewMap,
    pub perturb: PerturbationSpec,
}

impl Scene {
    /// Build the (primary, shadow) pair for one grid point.
    ///
    /// The y assignment runs after the x assignment, so when both axes name
    /// the same field the y value wins.
    pub fn state_pair(&self, nx: f64, ny: f64) -> (PendulumState, PendulumState) {
        let mut primary = self.basis;
        set_field(&mut primary, self.dim_x, self.view.value_x(nx));
        set_field(&mut primary, self.dim_y, self.view.value_y(ny));
        let shadow = self.perturb.apply(&primary);
        (primary, shadow)
    }
}

/// Assign one pendulum field by dimension, canonical field order.
pub fn set_field(s: &mut PendulumState, dim: Dimension, value: f64) {
    match dim {
        Dimension::Theta1 => s.theta1 = value,
        Dimension::Theta2 => s.theta2 = value,
        Dimension::Omega1 => s.omega1 = value,
        Dimension::Omega2 => s.omega2 = value,
        Dimension::L1 => s.l1 = value,
        Dimension::L2 => s.l2 = value,
        Dimension::M1 => s.m1 = value,
        Dimension::M2 => s.m2 = value,
    }
}
