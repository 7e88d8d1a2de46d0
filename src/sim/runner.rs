use tracing::{debug, info};

use crate::dynamics::{Dynamics, StateVector, TimeSeries};
use crate::error::{ensure_finite, ConfigError};
use super::integrator::{step, IntegratorKind};

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Step size, initial state and system parameters, checked before any stepping.
pub fn check_inputs<const N: usize, D: Dynamics<N>>(
    system: &D,
    initial: &StateVector<N>,
    dt: f64,
) -> Result<(), ConfigError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ConfigError::NonPositiveStepSize(dt));
    }
    for (i, value) in initial.iter().enumerate() {
        ensure_finite(D::LABELS[i], *value)?;
    }
    system.validate()
}

/// Number of fixed steps covering `duration`, rounded to the nearest step.
///
/// A duration whose step count does not fit in a `usize` is an
/// `InvalidDuration`.
pub fn steps_for_duration(duration: f64, dt: f64) -> Result<usize, ConfigError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ConfigError::NonPositiveStepSize(dt));
    }
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(ConfigError::InvalidDuration(duration));
    }
    let steps = (duration / dt).round();
    // usize::MAX as f64 rounds up to 2^64; anything below it casts exactly.
    if steps >= usize::MAX as f64 {
        return Err(ConfigError::InvalidDuration(duration));
    }
    Ok(steps as usize)
}

/// Convert a signed step count from configuration.
pub fn step_count(steps: i64) -> Result<usize, ConfigError> {
    usize::try_from(steps).map_err(|_| ConfigError::NegativeStepCount(steps))
}

// ---------------------------------------------------------------------------
// Fixed-step run
// ---------------------------------------------------------------------------

/// Integrate `system` from `initial` at t = 0 for `steps` steps of size `dt`.
///
/// Returns `steps + 1` samples. All inputs are checked before the first
/// step; a diverging trajectory from an oversized `dt` is returned as is.
pub fn run<const N: usize, D: Dynamics<N>>(
    system: &D,
    initial: StateVector<N>,
    dt: f64,
    steps: usize,
    kind: IntegratorKind,
) -> Result<TimeSeries<N>, ConfigError> {
    check_inputs(system, &initial, dt)?;
    debug!(%kind, dt, steps, dim = N, "starting run");

    let mut series = TimeSeries::with_capacity(dt, initial, steps)?;
    let mut state = initial;

    for i in 0..steps {
        let t = i as f64 * dt;
        state = step(kind, system, t, &state, dt);
        series.push(state);
    }

    info!(%kind, steps, t_end = series.duration(), "run complete");
    Ok(series)
}

/// Same as [`run`] with the step count derived from a total duration.
pub fn run_for<const N: usize, D: Dynamics<N>>(
    system: &D,
    initial: StateVector<N>,
    dt: f64,
    duration: f64,
    kind: IntegratorKind,
) -> Result<TimeSeries<N>, ConfigError> {
    let steps = steps_for_duration(duration, dt)?;
    run(system, initial, dt, steps, kind)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{DampedDrivenOscillator, Projectile};

    fn oscillator() -> DampedDrivenOscillator {
        DampedDrivenOscillator::simple(2.0 * std::f64::consts::PI)
    }

    #[test]
    fn zero_steps_returns_initial_state_only() {
        let x0 = StateVector::<2>::new(1.0, 0.0);
        let series = run(&oscillator(), x0, 0.01, 0, IntegratorKind::Rk4).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().time, 0.0);
        assert_eq!(series.first().state, x0);
    }

    #[test]
    fn length_is_steps_plus_one() {
        let x0 = StateVector::<2>::new(1.0, 0.0);
        let series = run(&oscillator(), x0, 0.01, 250, IntegratorKind::Euler).unwrap();
        assert_eq!(series.len(), 251);
        assert!((series.duration() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_step() {
        let x0 = StateVector::<2>::new(1.0, 0.0);
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result = run(&oscillator(), x0, dt, 10, IntegratorKind::Rk4);
            assert!(matches!(result, Err(ConfigError::NonPositiveStepSize(_))));
        }
    }

    #[test]
    fn rejects_non_finite_initial_state() {
        let s = StateVector::<4>::new(0.0, f64::NAN, 1.0, 1.0);
        let result = run(&Projectile::default(), s, 0.01, 10, IntegratorKind::Rk4);
        assert!(matches!(
            result,
            Err(ConfigError::NonFinite { field: "y", .. })
        ));
    }

    #[test]
    fn rejects_invalid_parameters_before_stepping() {
        let osc = DampedDrivenOscillator { damping: f64::NAN, ..oscillator() };
        let result = run(&osc, StateVector::<2>::new(1.0, 0.0), 0.01, 10, IntegratorKind::Rk4);
        assert!(matches!(result, Err(ConfigError::NonFinite { field: "damping", .. })));
    }

    #[test]
    fn duration_is_rounded_to_whole_steps() {
        assert_eq!(steps_for_duration(10.0, 0.01).unwrap(), 1000);
        assert_eq!(steps_for_duration(0.0, 0.01).unwrap(), 0);
        assert!(matches!(
            steps_for_duration(-1.0, 0.01),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(step_count(-3), Err(ConfigError::NegativeStepCount(-3))));
    }

    #[test]
    fn huge_step_counts_are_config_errors() {
        assert!(matches!(
            steps_for_duration(1e30, 1e-3),
            Err(ConfigError::InvalidDuration(d)) if d == 1e30
        ));
        assert!(matches!(
            steps_for_duration(1.0, f64::MIN_POSITIVE),
            Err(ConfigError::InvalidDuration(_))
        ));

        let x0 = StateVector::<2>::new(1.0, 0.0);
        for steps in [usize::MAX, usize::MAX / 2] {
            let result = run(&oscillator(), x0, 0.01, steps, IntegratorKind::Rk4);
            assert!(matches!(result, Err(ConfigError::TooManySteps(n)) if n == steps));
        }
    }

    #[test]
    fn runs_are_deterministic() {
        let osc = DampedDrivenOscillator::default();
        let x0 = StateVector::<2>::new(1.0, 0.0);
        let a = run_for(&osc, x0, 0.005, 3.0, IntegratorKind::Rk4).unwrap();
        let b = run_for(&osc, x0, 0.005, 3.0, IntegratorKind::Rk4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_step_diverges_without_error() {
        // Euler amplifies each oscillation by sqrt(1 + (w h)^2).
        let x0 = StateVector::<2>::new(1.0, 0.0);
        let series = run(&oscillator(), x0, 0.5, 40, IntegratorKind::Euler).unwrap();
        assert!(series.last().state.norm() > 1e3);
    }
}
