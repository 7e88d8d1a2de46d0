use thiserror::Error;

/// Configuration errors. All of them are raised before the first step is
/// taken; a run never fails part-way through.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("step size must be positive and finite, got {0}")]
    NonPositiveStepSize(f64),

    #[error("step count must not be negative, got {0}")]
    NegativeStepCount(i64),

    #[error("duration must be non-negative and finite, got {0}")]
    InvalidDuration(f64),

    #[error("{0} steps do not fit in memory")]
    TooManySteps(usize),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("unknown integrator `{0}` (expected `euler` or `rk4`)")]
    UnknownIntegrator(String),

    #[error("unknown system `{0}` (expected `projectile`, `coupled` or `oscillator`)")]
    UnknownSystem(String),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("scenario must give exactly one of `steps` or `duration`")]
    AmbiguousLength,

    #[error("expected {expected} initial state components, got {got}")]
    StateLength { expected: usize, got: usize },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
}

/// Reject NaN and infinities for a named quantity.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Finite and strictly greater than zero (masses, spring constants).
pub fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
