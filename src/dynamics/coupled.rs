use crate::analysis::derived::{Mechanics, NormalModes};
use crate::error::{ensure_finite, ensure_positive, ConfigError};

use super::state::StateVector;
use super::Dynamics;

// ---------------------------------------------------------------------------
// Two masses coupled by springs: wall -k- m1 -kc- m2 -k- wall
// ---------------------------------------------------------------------------

/// Two masses on a line, each tied to a wall by a spring of stiffness `k`
/// and to each other by a coupling spring `kc`. State is `[x1, v1, x2, v2]`
/// with displacements measured from equilibrium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupledOscillators {
    pub m1: f64,       // kg
    pub m2: f64,       // kg
    pub k: f64,        // N/m, wall springs
    pub coupling: f64, // N/m, spring between the masses
}

impl Default for CoupledOscillators {
    fn default() -> Self {
        Self { m1: 1.0, m2: 1.0, k: 1.0, coupling: 0.5 }
    }
}

impl CoupledOscillators {
    /// Angular frequency of the in-phase mode (equal masses).
    pub fn symmetric_frequency(&self) -> f64 {
        (self.k / self.m1).sqrt()
    }

    /// Angular frequency of the out-of-phase mode (equal masses).
    pub fn antisymmetric_frequency(&self) -> f64 {
        ((self.k + 2.0 * self.coupling) / self.m1).sqrt()
    }

    /// Both masses displaced by `amplitude`, at rest.
    pub fn symmetric_state(amplitude: f64) -> StateVector<4> {
        StateVector::<4>::new(amplitude, 0.0, amplitude, 0.0)
    }

    /// Masses displaced by `amplitude` in opposite directions, at rest.
    pub fn antisymmetric_state(amplitude: f64) -> StateVector<4> {
        StateVector::<4>::new(amplitude, 0.0, -amplitude, 0.0)
    }
}

impl Dynamics<4> for CoupledOscillators {
    const LABELS: [&'static str; 4] = ["x1", "v1", "x2", "v2"];

    fn derivative(&self, _t: f64, s: &StateVector<4>) -> StateVector<4> {
        let (x1, v1, x2, v2) = (s[0], s[1], s[2], s[3]);
        let stretch = x1 - x2;
        let a1 = (-self.k * x1 - self.coupling * stretch) / self.m1;
        let a2 = (-self.k * x2 + self.coupling * stretch) / self.m2;
        StateVector::<4>::new(v1, a1, v2, a2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("m1", self.m1)?;
        ensure_positive("m2", self.m2)?;
        ensure_finite("k", self.k)?;
        ensure_finite("coupling", self.coupling)
    }
}

impl Mechanics<4> for CoupledOscillators {
    fn kinetic(&self, s: &StateVector<4>) -> f64 {
        0.5 * self.m1 * s[1] * s[1] + 0.5 * self.m2 * s[3] * s[3]
    }

    fn potential(&self, s: &StateVector<4>) -> f64 {
        let stretch = s[0] - s[2];
        0.5 * self.k * (s[0] * s[0] + s[2] * s[2]) + 0.5 * self.coupling * stretch * stretch
    }

    fn phase_pairs(&self, s: &StateVector<4>) -> Vec<(f64, f64)> {
        vec![(s[0], s[1]), (s[2], s[3])]
    }

    fn normal_modes(&self, s: &StateVector<4>) -> Option<NormalModes> {
        let q1 = s[0] / self.m1.sqrt();
        let q2 = s[2] / self.m2.sqrt();
        Some(NormalModes { symmetric: q1 + q2, antisymmetric: q1 - q2 })
    }
}
