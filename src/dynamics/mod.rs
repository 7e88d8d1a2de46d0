pub mod state;
pub mod projectile;
pub mod coupled;
pub mod oscillator;

pub use coupled::CoupledOscillators;
pub use oscillator::DampedDrivenOscillator;
pub use projectile::Projectile;
pub use state::{Sample, StateVector, TimeSeries, G0};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Equations of motion
// ---------------------------------------------------------------------------

/// Closed-form equations of motion for an `N`-dimensional first-order system.
///
/// Implementations are immutable parameter records. `derivative` must be
/// pure: RK4 evaluates it four times per step at trial states and relies on
/// identical inputs giving identical outputs.
pub trait Dynamics<const N: usize> {
    /// Column names for each state component, used by exporters and plots.
    const LABELS: [&'static str; N];

    /// ds/dt at time `t` and state `s`.
    fn derivative(&self, t: f64, s: &StateVector<N>) -> StateVector<N>;

    /// Reject non-finite or physically meaningless parameters.
    fn validate(&self) -> Result<(), ConfigError>;
}
