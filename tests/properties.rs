use std::f64::consts::PI;

use proptest::prelude::*;

use mech_sim::analysis::{angle_sweep, convergence, derive};
use mech_sim::dynamics::{CoupledOscillators, DampedDrivenOscillator, Projectile, StateVector};
use mech_sim::sim::{run, run_for, IntegratorKind};
use mech_sim::ConfigError;

/// Build the unit-mass oscillator used by most tests.
fn shm(omega: f64) -> DampedDrivenOscillator {
    DampedDrivenOscillator::simple(omega)
}

// ==================================================================================
// Energy
// ==================================================================================

#[test]
fn rk4_conserves_oscillator_energy() {
    let osc = shm(2.0 * PI);
    let series = run_for(&osc, StateVector::<2>::new(1.0, 0.0), 0.001, 10.0, IntegratorKind::Rk4).unwrap();
    let drift = derive(&series, &osc).energy_drift();
    assert!(drift < 1e-3, "relative drift {drift:.3e}");
}

#[test]
fn rk4_conserves_coupled_energy() {
    let sys = CoupledOscillators { m1: 1.0, m2: 2.5, k: 3.0, coupling: 0.7 };
    let initial = StateVector::<4>::new(0.4, -0.2, -0.1, 0.3);
    let series = run_for(&sys, initial, 0.005, 50.0, IntegratorKind::Rk4).unwrap();
    let drift = derive(&series, &sys).energy_drift();
    assert!(drift < 1e-3, "relative drift {drift:.3e}");
}

#[test]
fn euler_gains_energy_on_oscillator() {
    let osc = shm(2.0 * PI);
    let series = run_for(&osc, StateVector::<2>::new(1.0, 0.0), 0.01, 10.0, IntegratorKind::Euler).unwrap();
    let derived = derive(&series, &osc);
    let last = derived.samples.last().unwrap();
    assert!(last.total > 2.0 * derived.initial_energy());
}

// ==================================================================================
// Normal modes
// ==================================================================================

#[test]
fn symmetric_excitation_keeps_antisymmetric_mode_at_zero() {
    let sys = CoupledOscillators { m1: 2.0, m2: 2.0, k: 5.0, coupling: 1.5 };
    let series = run_for(&sys, CoupledOscillators::symmetric_state(0.8), 0.01, 40.0, IntegratorKind::Rk4).unwrap();
    let derived = derive(&series, &sys);
    for d in derived.iter() {
        let modes = d.normal_modes.unwrap();
        assert!(modes.antisymmetric.abs() < 1e-12, "t = {}: {}", d.time, modes.antisymmetric);
    }
    let peak = derived.mode_amplitudes().unwrap().symmetric;
    assert!((peak - 2.0 * 0.8 / 2.0_f64.sqrt()).abs() < 1e-9);
}

// ==================================================================================
// Convergence order
// ==================================================================================

#[test]
fn rk4_error_drops_sixteenfold_when_step_halves() {
    let c = convergence(IntegratorKind::Rk4, 2.0 * PI, StateVector::<2>::new(1.0, 0.0), 0.02, 5.0).unwrap();
    assert!((c.ratio() - 16.0).abs() < 2.0, "ratio {}", c.ratio());
}

#[test]
fn euler_error_halves_when_step_halves() {
    let c = convergence(IntegratorKind::Euler, 1.0, StateVector::<2>::new(1.0, 0.0), 0.001, 5.0).unwrap();
    assert!((c.ratio() - 2.0).abs() < 0.2, "ratio {}", c.ratio());
    assert!((c.observed_order() - 1.0).abs() < 0.1);
}

// ==================================================================================
// Projectile
// ==================================================================================

#[test]
fn complementary_angles_share_range() {
    let p = Projectile::default();
    let angles = [30.0, 60.0, 20.0, 70.0, 0.0, 90.0];
    let flights = angle_sweep(&p, 25.0, &angles, 0.001, IntegratorKind::Rk4).unwrap();
    let range = |i: usize| flights[i].range.unwrap();
    for i in (0..angles.len()).step_by(2) {
        assert!((range(i) - range(i + 1)).abs() < 1e-4, "{} vs {}", range(i), range(i + 1));
    }
    assert!(flights[1].apex > flights[0].apex);
}

// ==================================================================================
// Run contract
// ==================================================================================

#[test]
fn zero_steps_yields_only_the_initial_state() {
    let initial = CoupledOscillators::antisymmetric_state(0.3);
    let series = run(&CoupledOscillators::default(), initial, 0.01, 0, IntegratorKind::Euler).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.first().time, 0.0);
    assert_eq!(series.first().state, initial);
}

#[test]
fn non_positive_step_is_a_config_error() {
    let result = run(&Projectile::default(), Projectile::launch_state(10.0, 45.0), -0.01, 100, IntegratorKind::Rk4);
    assert!(matches!(result, Err(ConfigError::NonPositiveStepSize(dt)) if dt == -0.01));
}

proptest! {
    #[test]
    fn series_length_and_spacing(steps in 0usize..400, dt in 1e-4f64..0.5, x0 in -5.0f64..5.0) {
        let series = run(&shm(1.0), StateVector::<2>::new(x0, 0.0), dt, steps, IntegratorKind::Rk4).unwrap();
        prop_assert_eq!(series.len(), steps + 1);
        for pair in series.samples().windows(2) {
            prop_assert!(pair[1].time > pair[0].time);
            prop_assert!((pair[1].time - pair[0].time - dt).abs() < 1e-9);
        }
    }

    #[test]
    fn derived_aligns_with_series(steps in 0usize..200, coupling in 0.0f64..3.0) {
        let sys = CoupledOscillators { coupling, ..Default::default() };
        let series = run(&sys, StateVector::<4>::new(0.5, 0.0, -0.2, 0.1), 0.01, steps, IntegratorKind::Rk4).unwrap();
        let derived = derive(&series, &sys);
        prop_assert_eq!(derived.len(), series.len());
        for (s, d) in series.iter().zip(derived.iter()) {
            prop_assert_eq!(s.time, d.time);
            prop_assert!((d.total - d.kinetic - d.potential).abs() < 1e-12);
        }
    }

    #[test]
    fn same_inputs_same_output(angle in 0.0f64..90.0, speed in 0.0f64..50.0) {
        let p = Projectile::default();
        let a = run(&p, Projectile::launch_state(speed, angle), 0.01, 100, IntegratorKind::Rk4).unwrap();
        let b = run(&p, Projectile::launch_state(speed, angle), 0.01, 100, IntegratorKind::Rk4).unwrap();
        prop_assert_eq!(a, b);
    }
}
