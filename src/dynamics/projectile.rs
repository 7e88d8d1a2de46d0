use crate::analysis::derived::Mechanics;
use crate::error::{ensure_finite, ensure_positive, ConfigError};

use super::state::{StateVector, G0};
use super::Dynamics;

// ---------------------------------------------------------------------------
// Projectile under uniform gravity (no drag)
// ---------------------------------------------------------------------------

/// Point mass in a uniform gravitational field. State is `[x, y, vx, vy]`,
/// y measured upward from the launch height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub mass: f64,    // kg
    pub gravity: f64, // m/s^2, positive downward
}

impl Default for Projectile {
    fn default() -> Self {
        Self { mass: 1.0, gravity: G0 }
    }
}

impl Projectile {
    /// Initial state for a launch from the origin.
    pub fn launch_state(speed: f64, angle_deg: f64) -> StateVector<4> {
        Self::launch_state_from(0.0, speed, angle_deg)
    }

    /// Initial state for a launch from height `y0`.
    pub fn launch_state_from(y0: f64, speed: f64, angle_deg: f64) -> StateVector<4> {
        let theta = angle_deg.to_radians();
        StateVector::<4>::new(0.0, y0, speed * theta.cos(), speed * theta.sin())
    }

    /// Closed-form range on flat ground from the origin: v^2 sin(2θ) / g.
    pub fn ideal_range(&self, speed: f64, angle_deg: f64) -> f64 {
        speed * speed * (2.0 * angle_deg.to_radians()).sin() / self.gravity
    }

    /// Closed-form time of flight from the origin back to y = 0.
    pub fn ideal_flight_time(&self, speed: f64, angle_deg: f64) -> f64 {
        2.0 * speed * angle_deg.to_radians().sin() / self.gravity
    }
}

impl Dynamics<4> for Projectile {
    const LABELS: [&'static str; 4] = ["x", "y", "vx", "vy"];

    fn derivative(&self, _t: f64, s: &StateVector<4>) -> StateVector<4> {
        StateVector::<4>::new(s[2], s[3], 0.0, -self.gravity)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("mass", self.mass)?;
        ensure_finite("gravity", self.gravity)
    }
}

impl Mechanics<4> for Projectile {
    fn kinetic(&self, s: &StateVector<4>) -> f64 {
        0.5 * self.mass * (s[2] * s[2] + s[3] * s[3])
    }

    fn potential(&self, s: &StateVector<4>) -> f64 {
        self.mass * self.gravity * s[1]
    }

    fn phase_pairs(&self, s: &StateVector<4>) -> Vec<(f64, f64)> {
        vec![(s[0], s[2]), (s[1], s[3])]
    }
}
