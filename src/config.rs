//! Scenario configuration loaded from TOML.
//!
//! A scenario selects one system, its parameters and initial state, the
//! integrator, the step size, and the run length as either `steps` or
//! `duration`:
//!
//! ```toml
//! name = "Beating masses"
//! system = "coupled"        # projectile | coupled | oscillator
//! integrator = "rk4"        # euler | rk4
//! dt = 0.01
//! duration = 40.0
//!
//! [coupled]
//! m1 = 1.0
//! m2 = 1.0
//! k = 1.0
//! coupling = 0.1
//! initial = [1.0, 0.0, 0.0, 0.0]
//! ```
//!
//! Parsing produces a validated [`Scenario`]; every configuration error is
//! reported here, before any stepping happens.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::analysis::{derive, measured_period, DerivedSeries, FlightMetrics};
use crate::dynamics::{
    CoupledOscillators, DampedDrivenOscillator, Dynamics, Projectile, StateVector, TimeSeries, G0,
};
use crate::error::{ensure_finite, ConfigError};
use crate::io::json::RunSummary;
use crate::io::csv;
use crate::sim::{check_inputs, run, step_count, steps_for_duration, IntegratorKind};

// ---------------------------------------------------------------------------
// System selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    Projectile,
    Coupled,
    Oscillator,
}

impl SystemKind {
    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Projectile => "projectile",
            SystemKind::Coupled => "coupled",
            SystemKind::Oscillator => "oscillator",
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projectile" => Ok(SystemKind::Projectile),
            "coupled" | "coupled-oscillators" => Ok(SystemKind::Coupled),
            "oscillator" | "harmonic" => Ok(SystemKind::Oscillator),
            other => Err(ConfigError::UnknownSystem(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    name: Option<String>,
    system: String,
    integrator: Option<String>,
    dt: f64,
    steps: Option<i64>,
    duration: Option<f64>,
    #[serde(default)]
    projectile: ProjectileSection,
    #[serde(default)]
    coupled: CoupledSection,
    #[serde(default)]
    oscillator: OscillatorSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProjectileSection {
    mass: f64,
    gravity: f64,
    speed: f64,
    angle_deg: f64,
    height: f64,
    initial: Option<Vec<f64>>,
}

impl Default for ProjectileSection {
    fn default() -> Self {
        Self { mass: 1.0, gravity: G0, speed: 20.0, angle_deg: 45.0, height: 0.0, initial: None }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CoupledSection {
    m1: f64,
    m2: f64,
    k: f64,
    coupling: f64,
    initial: Option<Vec<f64>>,
}

impl Default for CoupledSection {
    fn default() -> Self {
        let d = CoupledOscillators::default();
        Self { m1: d.m1, m2: d.m2, k: d.k, coupling: d.coupling, initial: None }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OscillatorSection {
    mass: f64,
    k: f64,
    damping: f64,
    drive_amplitude: f64,
    drive_frequency: f64,
    initial: Option<Vec<f64>>,
}

impl Default for OscillatorSection {
    fn default() -> Self {
        let d = DampedDrivenOscillator::default();
        Self {
            mass: d.mass,
            k: d.k,
            damping: d.damping,
            drive_amplitude: d.drive_amplitude,
            drive_frequency: d.drive_frequency,
            initial: None,
        }
    }
}

fn state_from<const N: usize>(
    given: Option<&[f64]>,
    fallback: StateVector<N>,
) -> Result<StateVector<N>, ConfigError> {
    match given {
        None => Ok(fallback),
        Some(values) if values.len() == N => Ok(StateVector::<N>::from_column_slice(values)),
        Some(values) => Err(ConfigError::StateLength { expected: N, got: values.len() }),
    }
}

// ---------------------------------------------------------------------------
// Validated scenario
// ---------------------------------------------------------------------------

/// Parameters and initial state for the selected system.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemConfig {
    Projectile { params: Projectile, initial: StateVector<4> },
    Coupled { params: CoupledOscillators, initial: StateVector<4> },
    Oscillator { params: DampedDrivenOscillator, initial: StateVector<2> },
}

impl SystemConfig {
    pub fn kind(&self) -> SystemKind {
        match self {
            SystemConfig::Projectile { .. } => SystemKind::Projectile,
            SystemConfig::Coupled { .. } => SystemKind::Coupled,
            SystemConfig::Oscillator { .. } => SystemKind::Oscillator,
        }
    }
}

/// A complete, validated run description.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub system: SystemConfig,
    pub integrator: IntegratorKind,
    pub dt: f64,
    pub steps: usize,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ScenarioFile = toml::from_str(text)?;
        Self::from_file(file)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading scenario");
        Self::from_toml_str(&text)
    }

    fn from_file(file: ScenarioFile) -> Result<Self, ConfigError> {
        let kind: SystemKind = file.system.parse()?;
        let integrator = match file.integrator.as_deref() {
            Some(name) => name.parse()?,
            None => IntegratorKind::default(),
        };

        let steps = match (file.steps, file.duration) {
            (Some(n), None) => step_count(n)?,
            (None, Some(d)) => steps_for_duration(d, file.dt)?,
            _ => return Err(ConfigError::AmbiguousLength),
        };

        let system = match kind {
            SystemKind::Projectile => {
                let p = &file.projectile;
                ensure_finite("speed", p.speed)?;
                ensure_finite("angle_deg", p.angle_deg)?;
                let launch = Projectile::launch_state_from(p.height, p.speed, p.angle_deg);
                SystemConfig::Projectile {
                    params: Projectile { mass: p.mass, gravity: p.gravity },
                    initial: state_from(p.initial.as_deref(), launch)?,
                }
            }
            SystemKind::Coupled => {
                let c = &file.coupled;
                SystemConfig::Coupled {
                    params: CoupledOscillators { m1: c.m1, m2: c.m2, k: c.k, coupling: c.coupling },
                    initial: state_from(c.initial.as_deref(), StateVector::<4>::new(1.0, 0.0, 0.0, 0.0))?,
                }
            }
            SystemKind::Oscillator => {
                let o = &file.oscillator;
                SystemConfig::Oscillator {
                    params: DampedDrivenOscillator {
                        mass: o.mass,
                        k: o.k,
                        damping: o.damping,
                        drive_amplitude: o.drive_amplitude,
                        drive_frequency: o.drive_frequency,
                    },
                    initial: state_from(o.initial.as_deref(), StateVector::<2>::new(1.0, 0.0))?,
                }
            }
        };

        let scenario = Scenario {
            name: file.name.unwrap_or_else(|| kind.name().to_string()),
            system,
            integrator,
            dt: file.dt,
            steps,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Same checks `run` performs on step size, initial state and
    /// parameters, without integrating.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.system {
            SystemConfig::Projectile { params, initial } => check_inputs(params, initial, self.dt),
            SystemConfig::Coupled { params, initial } => check_inputs(params, initial, self.dt),
            SystemConfig::Oscillator { params, initial } => check_inputs(params, initial, self.dt),
        }
    }

    /// Integrate and derive.
    pub fn run(&self) -> Result<Outcome, ConfigError> {
        debug!(name = %self.name, system = %self.system.kind(), "running scenario");
        Ok(match &self.system {
            SystemConfig::Projectile { params, initial } => {
                Outcome::Projectile(RunOutput::new(params, *initial, self)?)
            }
            SystemConfig::Coupled { params, initial } => {
                Outcome::Coupled(RunOutput::new(params, *initial, self)?)
            }
            SystemConfig::Oscillator { params, initial } => {
                Outcome::Oscillator(RunOutput::new(params, *initial, self)?)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Time series and derived quantities from one run.
#[derive(Debug, Clone)]
pub struct RunOutput<const N: usize> {
    pub labels: [&'static str; N],
    pub series: TimeSeries<N>,
    pub derived: DerivedSeries,
}

impl<const N: usize> RunOutput<N> {
    fn new<D>(system: &D, initial: StateVector<N>, scenario: &Scenario) -> Result<Self, ConfigError>
    where
        D: Dynamics<N> + crate::analysis::Mechanics<N>,
    {
        let series = run(system, initial, scenario.dt, scenario.steps, scenario.integrator)?;
        let derived = derive(&series, system);
        Ok(Self { labels: D::LABELS, series, derived })
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        csv::write_run_file(path, &self.labels, &self.series, &self.derived)
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Projectile(RunOutput<4>),
    Coupled(RunOutput<4>),
    Oscillator(RunOutput<2>),
}

impl Outcome {
    pub fn derived(&self) -> &DerivedSeries {
        match self {
            Outcome::Projectile(r) | Outcome::Coupled(r) => &r.derived,
            Outcome::Oscillator(r) => &r.derived,
        }
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        match self {
            Outcome::Projectile(r) | Outcome::Coupled(r) => r.write_csv(path),
            Outcome::Oscillator(r) => r.write_csv(path),
        }
    }

    /// Summary with the metrics that make sense for the system.
    pub fn summary(&self, scenario: &Scenario) -> RunSummary {
        let (kind, name) = (scenario.integrator, scenario.name.as_str());
        match self {
            Outcome::Projectile(r) => {
                let mut s = RunSummary::from_run(name, "projectile", kind, &r.series, &r.derived);
                let angle = r.series.first().state[3].atan2(r.series.first().state[2]).to_degrees();
                let flight = FlightMetrics::from_series(angle, &r.series);
                s.range = flight.range;
                s.apex = Some(flight.apex);
                s
            }
            Outcome::Coupled(r) => {
                let mut s = RunSummary::from_run(name, "coupled", kind, &r.series, &r.derived);
                s.period = measured_period(&r.series, 1);
                s
            }
            Outcome::Oscillator(r) => {
                let mut s = RunSummary::from_run(name, "oscillator", kind, &r.series, &r.derived);
                s.period = measured_period(&r.series, 1);
                s
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const NAMES: [&str; 6] = [
        "harmonic",
        "damped-driven",
        "coupled-symmetric",
        "coupled-antisymmetric",
        "coupled-beats",
        "projectile",
    ];

    fn scenario(
        name: &str,
        system: SystemConfig,
        dt: f64,
        duration: f64,
    ) -> Result<Scenario, ConfigError> {
        Ok(Scenario {
            name: name.to_string(),
            system,
            integrator: IntegratorKind::Rk4,
            dt,
            steps: steps_for_duration(duration, dt)?,
        })
    }

    /// Built-in scenario by name.
    pub fn by_name(name: &str) -> Result<Scenario, ConfigError> {
        let omega = 2.0 * std::f64::consts::PI;
        match name {
            "harmonic" => scenario(
                name,
                SystemConfig::Oscillator {
                    params: DampedDrivenOscillator::simple(omega),
                    initial: StateVector::<2>::new(1.0, 0.0),
                },
                0.01,
                10.0,
            ),
            "damped-driven" => scenario(
                name,
                SystemConfig::Oscillator {
                    params: DampedDrivenOscillator::default(),
                    initial: StateVector::<2>::new(1.0, 0.0),
                },
                0.01,
                10.0,
            ),
            "coupled-symmetric" => scenario(
                name,
                SystemConfig::Coupled {
                    params: CoupledOscillators::default(),
                    initial: CoupledOscillators::symmetric_state(1.0),
                },
                0.01,
                30.0,
            ),
            "coupled-antisymmetric" => scenario(
                name,
                SystemConfig::Coupled {
                    params: CoupledOscillators::default(),
                    initial: CoupledOscillators::antisymmetric_state(1.0),
                },
                0.01,
                30.0,
            ),
            "coupled-beats" => scenario(
                name,
                SystemConfig::Coupled {
                    params: CoupledOscillators { coupling: 0.1, ..Default::default() },
                    initial: StateVector::<4>::new(1.0, 0.0, 0.0, 0.0),
                },
                0.01,
                80.0,
            ),
            "projectile" => scenario(
                name,
                SystemConfig::Projectile {
                    params: Projectile::default(),
                    initial: Projectile::launch_state(20.0, 45.0),
                },
                0.001,
                3.0,
            ),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUPLED: &str = r#"
        name = "beats"
        system = "coupled"
        integrator = "euler"
        dt = 0.01
        duration = 2.0

        [coupled]
        coupling = 0.1
        initial = [1.0, 0.0, 0.0, 0.0]
    "#;

    #[test]
    fn parses_coupled_scenario() {
        let s = Scenario::from_toml_str(COUPLED).unwrap();
        assert_eq!(s.name, "beats");
        assert_eq!(s.integrator, IntegratorKind::Euler);
        assert_eq!(s.steps, 200);
        match s.system {
            SystemConfig::Coupled { params, initial } => {
                assert_eq!(params.coupling, 0.1);
                assert_eq!(params.m1, 1.0);
                assert_eq!(initial[0], 1.0);
            }
            other => panic!("wrong system: {other:?}"),
        }
    }

    #[test]
    fn projectile_initial_state_comes_from_launch() {
        let s = Scenario::from_toml_str(
            "system = \"projectile\"\ndt = 0.01\nsteps = 10\n[projectile]\nspeed = 10.0\nangle_deg = 90.0\n",
        )
        .unwrap();
        let SystemConfig::Projectile { initial, .. } = s.system else {
            panic!("expected projectile");
        };
        assert!(initial[2].abs() < 1e-12);
        assert!((initial[3] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_system_is_rejected() {
        let err = Scenario::from_toml_str("system = \"pendulum\"\ndt = 0.1\nsteps = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSystem(name) if name == "pendulum"));
    }

    #[test]
    fn unknown_integrator_is_rejected() {
        let err = Scenario::from_toml_str(
            "system = \"oscillator\"\nintegrator = \"leapfrog\"\ndt = 0.1\nsteps = 1\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownIntegrator(_)));
    }

    #[test]
    fn negative_steps_and_bad_dt_are_rejected() {
        let err = Scenario::from_toml_str("system = \"oscillator\"\ndt = 0.1\nsteps = -5\n").unwrap_err();
        assert!(matches!(err, ConfigError::NegativeStepCount(-5)));
        let err = Scenario::from_toml_str("system = \"oscillator\"\ndt = -0.1\nsteps = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveStepSize(_)));
    }

    #[test]
    fn length_must_be_given_once() {
        let both = "system = \"oscillator\"\ndt = 0.1\nsteps = 5\nduration = 1.0\n";
        let neither = "system = \"oscillator\"\ndt = 0.1\n";
        assert!(matches!(Scenario::from_toml_str(both), Err(ConfigError::AmbiguousLength)));
        assert!(matches!(Scenario::from_toml_str(neither), Err(ConfigError::AmbiguousLength)));
    }

    #[test]
    fn wrong_state_length_is_rejected() {
        let text = "system = \"oscillator\"\ndt = 0.1\nsteps = 5\n[oscillator]\ninitial = [1.0, 0.0, 3.0]\n";
        assert!(matches!(
            Scenario::from_toml_str(text),
            Err(ConfigError::StateLength { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn nan_parameter_is_rejected() {
        let text = "system = \"coupled\"\ndt = 0.1\nsteps = 5\n[coupled]\nk = nan\n";
        assert!(matches!(
            Scenario::from_toml_str(text),
            Err(ConfigError::NonFinite { field: "k", .. })
        ));
    }

    #[test]
    fn nan_initial_state_is_rejected_on_load() {
        let text = "system = \"oscillator\"\ndt = 0.1\nsteps = 5\n[oscillator]\ninitial = [nan, 0.0]\n";
        assert!(matches!(
            Scenario::from_toml_str(text),
            Err(ConfigError::NonFinite { field: "x", .. })
        ));

        let mut scenario = presets::by_name("coupled-beats").unwrap();
        if let SystemConfig::Coupled { initial, .. } = &mut scenario.system {
            initial[3] = f64::INFINITY;
        }
        assert!(matches!(scenario.validate(), Err(ConfigError::NonFinite { field: "v2", .. })));
    }

    #[test]
    fn unrepresentable_duration_is_rejected_on_load() {
        let text = "system = \"oscillator\"\ndt = 1e-3\nduration = 1e30\n";
        assert!(matches!(
            Scenario::from_toml_str(text),
            Err(ConfigError::InvalidDuration(d)) if d == 1e30
        ));
    }

    #[test]
    fn every_preset_runs() {
        for name in presets::NAMES {
            let scenario = presets::by_name(name).unwrap();
            let outcome = scenario.run().unwrap();
            assert_eq!(outcome.derived().len(), scenario.steps + 1, "{name}");
        }
        assert!(matches!(presets::by_name("nope"), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn projectile_summary_has_range() {
        let scenario = presets::by_name("projectile").unwrap();
        let summary = scenario.run().unwrap().summary(&scenario);
        let ideal = Projectile::default().ideal_range(20.0, 45.0);
        assert!((summary.range.unwrap() - ideal).abs() < 1e-3);
        assert!(summary.period.is_none());
    }
}
