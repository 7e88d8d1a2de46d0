//! Fixed-step integration of small classical-mechanics systems.
//!
//! Data flows one way: parameters and an initial state go into
//! [`sim::run`], which returns a [`dynamics::TimeSeries`]; [`analysis::derive`]
//! maps that series to energies, phase-space pairs and normal modes for a
//! presenter (CLI tables, CSV/JSON export, or the `viz` binary).
//!
//! ```
//! use mech_sim::prelude::*;
//!
//! let system = CoupledOscillators::default();
//! let series = run(&system, CoupledOscillators::symmetric_state(0.5), 0.01, 1000, IntegratorKind::Rk4)?;
//! let derived = derive(&series, &system);
//! assert_eq!(derived.len(), 1001);
//! assert!(derived.energy_drift() < 1e-6);
//! # Ok::<(), mech_sim::ConfigError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod sim;

pub use error::ConfigError;

pub mod prelude {
    pub use crate::analysis::{derive, DerivedSeries, Mechanics, NormalModes};
    pub use crate::dynamics::{
        CoupledOscillators, DampedDrivenOscillator, Dynamics, Projectile, StateVector, TimeSeries,
    };
    pub use crate::error::ConfigError;
    pub use crate::sim::{run, run_for, IntegratorKind};
}
