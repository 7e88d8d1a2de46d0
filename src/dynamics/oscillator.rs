use crate::analysis::derived::Mechanics;
use crate::error::{ensure_finite, ensure_positive, ConfigError};

use super::state::StateVector;
use super::Dynamics;

// ---------------------------------------------------------------------------
// Single damped, driven harmonic oscillator
// ---------------------------------------------------------------------------

/// `m x'' = -k x - c x' + F0 cos(wd t)`, state `[x, v]`.
///
/// With `damping` and `drive_amplitude` both zero this is the simple
/// harmonic oscillator with natural frequency `sqrt(k / m)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedDrivenOscillator {
    pub mass: f64,            // kg
    pub k: f64,               // N/m
    pub damping: f64,         // N s/m
    pub drive_amplitude: f64, // N
    pub drive_frequency: f64, // rad/s
}

impl Default for DampedDrivenOscillator {
    fn default() -> Self {
        let omega = 2.0 * std::f64::consts::PI;
        Self {
            mass: 1.0,
            k: omega * omega,
            damping: 0.5,
            drive_amplitude: 0.5,
            drive_frequency: 1.5 * omega,
        }
    }
}

impl DampedDrivenOscillator {
    /// Undamped, undriven oscillator with angular frequency `omega` and unit mass.
    pub fn simple(omega: f64) -> Self {
        Self {
            mass: 1.0,
            k: omega * omega,
            damping: 0.0,
            drive_amplitude: 0.0,
            drive_frequency: 0.0,
        }
    }

    pub fn natural_frequency(&self) -> f64 {
        (self.k / self.mass).sqrt()
    }

    pub fn is_conservative(&self) -> bool {
        self.damping == 0.0 && self.drive_amplitude == 0.0
    }

    /// Closed-form `(x, v)` of the undamped, undriven motion.
    pub fn free_solution(&self, x0: f64, v0: f64, t: f64) -> (f64, f64) {
        let w = self.natural_frequency();
        let (sin, cos) = (w * t).sin_cos();
        (x0 * cos + v0 / w * sin, -x0 * w * sin + v0 * cos)
    }

    /// Amplitude of the steady-state response at drive frequency `wd`.
    pub fn steady_state_amplitude(&self, wd: f64) -> f64 {
        let w0 = self.natural_frequency();
        let detune = w0 * w0 - wd * wd;
        let friction = self.damping * wd / self.mass;
        (self.drive_amplitude / self.mass) / (detune * detune + friction * friction).sqrt()
    }

    /// Steady-state amplitude sampled at `n` drive frequencies across `[lo, hi]`.
    pub fn resonance_curve(&self, lo: f64, hi: f64, n: usize) -> Vec<(f64, f64)> {
        if n < 2 {
            return vec![(lo, self.steady_state_amplitude(lo))];
        }
        let dw = (hi - lo) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let wd = lo + dw * i as f64;
                (wd, self.steady_state_amplitude(wd))
            })
            .collect()
    }
}

impl Dynamics<2> for DampedDrivenOscillator {
    const LABELS: [&'static str; 2] = ["x", "v"];

    fn derivative(&self, t: f64, s: &StateVector<2>) -> StateVector<2> {
        let (x, v) = (s[0], s[1]);
        let force = -self.k * x - self.damping * v
            + self.drive_amplitude * (self.drive_frequency * t).cos();
        StateVector::<2>::new(v, force / self.mass)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("mass", self.mass)?;
        ensure_finite("k", self.k)?;
        ensure_finite("damping", self.damping)?;
        ensure_finite("drive_amplitude", self.drive_amplitude)?;
        ensure_finite("drive_frequency", self.drive_frequency)
    }
}

impl Mechanics<2> for DampedDrivenOscillator {
    fn kinetic(&self, s: &StateVector<2>) -> f64 {
        0.5 * self.mass * s[1] * s[1]
    }

    fn potential(&self, s: &StateVector<2>) -> f64 {
        0.5 * self.k * s[0] * s[0]
    }

    fn phase_pairs(&self, s: &StateVector<2>) -> Vec<(f64, f64)> {
        vec![(s[0], s[1])]
    }
}
