use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::analysis::DerivedSeries;
use crate::dynamics::TimeSeries;
use crate::sim::IntegratorKind;

/// Summary statistics computed from one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub name: String,
    pub system: &'static str,
    pub integrator: &'static str,
    pub step_size: f64,
    pub steps: usize,
    pub duration: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub energy_drift: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_symmetric_mode: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_antisymmetric_mode: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apex: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
}

impl RunSummary {
    /// Compute the system-independent part of the summary.
    pub fn from_run<const N: usize>(
        name: &str,
        system: &'static str,
        kind: IntegratorKind,
        series: &TimeSeries<N>,
        derived: &DerivedSeries,
    ) -> Self {
        let modes = derived.mode_amplitudes();
        RunSummary {
            name: name.to_string(),
            system,
            integrator: kind.name(),
            step_size: series.step_size(),
            steps: series.steps(),
            duration: series.duration(),
            initial_energy: derived.initial_energy(),
            final_energy: derived.samples.last().map_or(0.0, |d| d.total),
            energy_drift: derived.energy_drift(),
            max_symmetric_mode: modes.map(|m| m.symmetric),
            max_antisymmetric_mode: modes.map(|m| m.antisymmetric),
            range: None,
            apex: None,
            period: None,
        }
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
