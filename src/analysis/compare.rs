use tracing::debug;

use crate::dynamics::{DampedDrivenOscillator, StateVector, TimeSeries};
use crate::error::ConfigError;
use crate::sim::{run, steps_for_duration, IntegratorKind};

// ---------------------------------------------------------------------------
// Euler vs RK4 against the closed-form oscillator
// ---------------------------------------------------------------------------

/// Error of one method against the analytic simple-harmonic solution.
#[derive(Debug, Clone)]
pub struct MethodError {
    pub kind: IntegratorKind,
    pub series: TimeSeries<2>,
    /// Largest |x_num - x_exact| over the run.
    pub max_error: f64,
    /// |x_num - x_exact| at the final sample.
    pub final_error: f64,
}

/// Result of two runs at `h` and `h/2` over the same duration.
///
/// Errors are the largest displacement error over each run, not the
/// final-time error: at a displacement peak the phase error shows up squared.
#[derive(Debug, Clone, Copy)]
pub struct Convergence {
    pub kind: IntegratorKind,
    pub coarse_error: f64,
    pub fine_error: f64,
}

impl Convergence {
    /// Error reduction from halving the step: ~2^order.
    pub fn ratio(&self) -> f64 {
        self.coarse_error / self.fine_error
    }

    /// Observed order of accuracy, log2 of the reduction ratio.
    pub fn observed_order(&self) -> f64 {
        self.ratio().log2()
    }
}

/// Displacement error of a simple-oscillator series against the closed form.
fn errors(osc: &DampedDrivenOscillator, series: &TimeSeries<2>) -> (f64, f64) {
    let x0 = series.first().state;
    let mut max_error = 0.0_f64;
    let mut last = 0.0;
    for s in series {
        let (exact, _) = osc.free_solution(x0[0], x0[1], s.time);
        last = (s.state[0] - exact).abs();
        max_error = max_error.max(last);
    }
    (max_error, last)
}

/// Integrate the undamped oscillator with every method and measure errors.
pub fn compare_methods(
    omega: f64,
    initial: StateVector<2>,
    dt: f64,
    duration: f64,
) -> Result<Vec<MethodError>, ConfigError> {
    let osc = DampedDrivenOscillator::simple(omega);
    let steps = steps_for_duration(duration, dt)?;

    IntegratorKind::ALL
        .iter()
        .map(|&kind| -> Result<MethodError, ConfigError> {
            let series = run(&osc, initial, dt, steps, kind)?;
            let (max_error, final_error) = errors(&osc, &series);
            debug!(%kind, max_error, final_error, "method error");
            Ok(MethodError { kind, series, max_error, final_error })
        })
        .collect()
}

/// Maximum error at `dt` and `dt / 2` over a fixed duration.
pub fn convergence(
    kind: IntegratorKind,
    omega: f64,
    initial: StateVector<2>,
    dt: f64,
    duration: f64,
) -> Result<Convergence, ConfigError> {
    let osc = DampedDrivenOscillator::simple(omega);
    let max_error = |h: f64| -> Result<f64, ConfigError> {
        let steps = steps_for_duration(duration, h)?;
        let series = run(&osc, initial, h, steps, kind)?;
        Ok(errors(&osc, &series).0)
    };
    Ok(Convergence {
        kind,
        coarse_error: max_error(dt)?,
        fine_error: max_error(dt / 2.0)?,
    })
}
