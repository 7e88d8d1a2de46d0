pub mod derived;
pub mod compare;
pub mod trajectory;

pub use compare::{compare_methods, convergence, Convergence, MethodError};
pub use derived::{derive, DerivedSample, DerivedSeries, Mechanics, NormalModes};
pub use trajectory::{angle_sweep, measured_period, FlightMetrics};
