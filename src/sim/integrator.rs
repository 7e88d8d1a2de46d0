use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::dynamics::{Dynamics, StateVector};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Stepping rules
// ---------------------------------------------------------------------------

/// Fixed-step explicit method used to advance a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// First order; kept as a baseline for comparison.
    Euler,
    /// Classical fourth-order Runge-Kutta.
    #[default]
    Rk4,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 2] = [IntegratorKind::Euler, IntegratorKind::Rk4];

    /// Global order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            IntegratorKind::Euler => 1,
            IntegratorKind::Rk4 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::Rk4 => "rk4",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(IntegratorKind::Euler),
            "rk4" | "runge-kutta" => Ok(IntegratorKind::Rk4),
            other => Err(ConfigError::UnknownIntegrator(other.to_string())),
        }
    }
}

/// Single explicit Euler step: s + h f(t, s).
pub fn euler_step<const N: usize, D: Dynamics<N>>(
    system: &D,
    t: f64,
    s: &StateVector<N>,
    h: f64,
) -> StateVector<N> {
    s + system.derivative(t, s) * h
}

/// Single RK4 step: advance state by h.
pub fn rk4_step<const N: usize, D: Dynamics<N>>(
    system: &D,
    t: f64,
    s: &StateVector<N>,
    h: f64,
) -> StateVector<N> {
    let half = h * 0.5;
    let k1 = system.derivative(t, s);
    let k2 = system.derivative(t + half, &(s + k1 * half));
    let k3 = system.derivative(t + half, &(s + k2 * half));
    let k4 = system.derivative(t + h, &(s + k3 * h));

    s + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

/// Advance `s` from `t` to `t + h` with the selected method.
pub fn step<const N: usize, D: Dynamics<N>>(
    kind: IntegratorKind,
    system: &D,
    t: f64,
    s: &StateVector<N>,
    h: f64,
) -> StateVector<N> {
    match kind {
        IntegratorKind::Euler => euler_step(system, t, s, h),
        IntegratorKind::Rk4 => rk4_step(system, t, s, h),
    }
}
