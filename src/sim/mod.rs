pub mod integrator;
pub mod runner;
pub mod event;

pub use event::{detect, EventDetector, EventKind, GroundImpact, SimEvent, TurningPoint};
pub use integrator::{euler_step, rk4_step, step, IntegratorKind};
pub use runner::{check_inputs, run, run_for, step_count, steps_for_duration};
