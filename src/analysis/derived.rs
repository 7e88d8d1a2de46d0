//! Per-sample derived quantities: energies, phase-space pairs and, for the
//! coupled system, normal-mode coordinates.
//!
//! Every quantity is a stateless map over the time series; entry `i` of a
//! [`DerivedSeries`] depends only on sample `i` and the parameters.

use crate::dynamics::{StateVector, TimeSeries};

/// Mass-weighted mode coordinates of a two-body system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalModes {
    /// `x1/sqrt(m1) + x2/sqrt(m2)`
    pub symmetric: f64,
    /// `x1/sqrt(m1) - x2/sqrt(m2)`
    pub antisymmetric: f64,
}

/// Energy bookkeeping for a mechanical system with an `N`-component state.
pub trait Mechanics<const N: usize> {
    /// Sum over bodies of 1/2 m v^2.
    fn kinetic(&self, s: &StateVector<N>) -> f64;

    /// Spring or gravitational potential energy.
    fn potential(&self, s: &StateVector<N>) -> f64;

    /// `(position, velocity)` for each body.
    fn phase_pairs(&self, s: &StateVector<N>) -> Vec<(f64, f64)>;

    /// Only meaningful for coupled systems.
    fn normal_modes(&self, _s: &StateVector<N>) -> Option<NormalModes> {
        None
    }
}

/// Derived scalars for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSample {
    pub time: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
    pub phase: Vec<(f64, f64)>,
    pub normal_modes: Option<NormalModes>,
}

/// Derived quantities aligned index-for-index with a [`TimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub samples: Vec<DerivedSample>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivedSample> {
        self.samples.iter()
    }

    pub fn initial_energy(&self) -> f64 {
        self.samples.first().map_or(0.0, |d| d.total)
    }

    /// Largest `|E(t) - E(0)|` relative to `|E(0)|`.
    ///
    /// Falls back to the absolute deviation when the initial energy is zero.
    pub fn energy_drift(&self) -> f64 {
        let e0 = self.initial_energy();
        let worst = self
            .samples
            .iter()
            .map(|d| (d.total - e0).abs())
            .fold(0.0_f64, f64::max);
        if e0 == 0.0 {
            worst
        } else {
            worst / e0.abs()
        }
    }

    /// Largest magnitude of each normal-mode coordinate over the run.
    pub fn mode_amplitudes(&self) -> Option<NormalModes> {
        self.samples.iter().try_fold(
            NormalModes { symmetric: 0.0, antisymmetric: 0.0 },
            |acc, d| {
                d.normal_modes.map(|m| NormalModes {
                    symmetric: acc.symmetric.max(m.symmetric.abs()),
                    antisymmetric: acc.antisymmetric.max(m.antisymmetric.abs()),
                })
            },
        )
    }
}

/// Map a time series to its derived quantities.
pub fn derive<const N: usize, M: Mechanics<N>>(series: &TimeSeries<N>, system: &M) -> DerivedSeries {
    let samples = series
        .iter()
        .map(|s| {
            let kinetic = system.kinetic(&s.state);
            let potential = system.potential(&s.state);
            DerivedSample {
                time: s.time,
                kinetic,
                potential,
                total: kinetic + potential,
                phase: system.phase_pairs(&s.state),
                normal_modes: system.normal_modes(&s.state),
            }
        })
        .collect();
    DerivedSeries { samples }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{CoupledOscillators, DampedDrivenOscillator, Projectile};
    use crate::sim::{run, run_for, IntegratorKind};

    #[test]
    fn derived_series_is_aligned_with_time_series() {
        let osc = DampedDrivenOscillator::default();
        let series = run(&osc, StateVector::<2>::new(1.0, 0.0), 0.01, 100, IntegratorKind::Rk4)
            .unwrap();
        let derived = derive(&series, &osc);
        assert_eq!(derived.len(), series.len());
        for (s, d) in series.iter().zip(derived.iter()) {
            assert_eq!(s.time, d.time);
            assert_eq!(d.phase, vec![(s.state[0], s.state[1])]);
            assert!(d.normal_modes.is_none());
        }
    }

    #[test]
    fn spring_energy_at_release() {
        let osc = DampedDrivenOscillator::simple(2.0);
        let series = run(&osc, StateVector::<2>::new(0.5, 0.0), 0.01, 0, IntegratorKind::Rk4)
            .unwrap();
        let d = &derive(&series, &osc).samples[0];
        assert_eq!(d.kinetic, 0.0);
        assert!((d.potential - 0.5 * 4.0 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn projectile_energy_is_conserved() {
        let p = Projectile::default();
        let series = run_for(&p, Projectile::launch_state(20.0, 40.0), 0.01, 2.5, IntegratorKind::Rk4)
            .unwrap();
        let derived = derive(&series, &p);
        assert!(derived.energy_drift() < 1e-9);
    }

    #[test]
    fn damping_dissipates_energy() {
        let osc = DampedDrivenOscillator { damping: 0.8, drive_amplitude: 0.0, ..Default::default() };
        let series = run_for(&osc, StateVector::<2>::new(1.0, 0.0), 0.001, 5.0, IntegratorKind::Rk4)
            .unwrap();
        let derived = derive(&series, &osc);
        let last = derived.samples.last().unwrap();
        assert!(last.total < 0.1 * derived.initial_energy());
    }

    #[test]
    fn coupled_series_carries_modes() {
        let sys = CoupledOscillators::default();
        let series = run(&sys, CoupledOscillators::antisymmetric_state(0.2), 0.01, 500, IntegratorKind::Rk4)
            .unwrap();
        let amps = derive(&series, &sys).mode_amplitudes().unwrap();
        assert!(amps.symmetric < 1e-12);
        assert!((amps.antisymmetric - 0.4).abs() < 1e-6);
    }
}
