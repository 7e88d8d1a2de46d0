use nalgebra::SVector;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2

// ---------------------------------------------------------------------------
// State vector and time series
// ---------------------------------------------------------------------------

/// Instantaneous state of one system, e.g. `[x, y, vx, vy]` or `[x1, v1, x2, v2]`.
pub type StateVector<const N: usize> = SVector<f64, N>;

/// One entry of a time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<const N: usize> {
    pub time: f64,
    pub state: StateVector<N>,
}

/// Ordered `(time, state)` pairs produced by a single run.
///
/// Entry `i` sits at `i * step_size`; a run of `n` steps holds `n + 1`
/// samples, the first being the initial condition at t = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<const N: usize> {
    step_size: f64,
    samples: Vec<Sample<N>>,
}

impl<const N: usize> TimeSeries<N> {
    /// Reserves all `steps + 1` samples; `TooManySteps` if that is impossible.
    pub(crate) fn with_capacity(
        step_size: f64,
        initial: StateVector<N>,
        steps: usize,
    ) -> Result<Self, ConfigError> {
        let len = steps.checked_add(1).ok_or(ConfigError::TooManySteps(steps))?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| ConfigError::TooManySteps(steps))?;
        samples.push(Sample { time: 0.0, state: initial });
        Ok(Self { step_size, samples })
    }

    pub(crate) fn push(&mut self, state: StateVector<N>) {
        let time = self.samples.len() as f64 * self.step_size;
        self.samples.push(Sample { time, state });
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Number of integration steps taken (one less than the sample count).
    pub fn steps(&self) -> usize {
        self.samples.len() - 1
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true: a series always holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample<N>] {
        &self.samples
    }

    pub fn first(&self) -> &Sample<N> {
        &self.samples[0]
    }

    pub fn last(&self) -> &Sample<N> {
        &self.samples[self.samples.len() - 1]
    }

    pub fn duration(&self) -> f64 {
        self.last().time
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample<N>> {
        self.samples.iter()
    }

    /// Values of one state component over time, e.g. `component(0)` for x.
    pub fn component(&self, idx: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(move |s| (s.time, s.state[idx]))
    }
}

impl<'a, const N: usize> IntoIterator for &'a TimeSeries<N> {
    type Item = &'a Sample<N>;
    type IntoIter = std::slice::Iter<'a, Sample<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
