use std::io::{self, Write};
use std::path::Path;

use crate::analysis::DerivedSeries;
use crate::dynamics::TimeSeries;

/// Write a run to CSV.
///
/// Columns: time, one per state component (named by `labels`),
///          kinetic, potential, total, and mode_sym, mode_anti when the
///          derived series carries normal modes.
pub fn write_run<W: Write, const N: usize>(
    writer: &mut W,
    labels: &[&str; N],
    series: &TimeSeries<N>,
    derived: &DerivedSeries,
) -> io::Result<()> {
    let with_modes = derived.iter().any(|d| d.normal_modes.is_some());

    write!(writer, "time")?;
    for label in labels {
        write!(writer, ",{label}")?;
    }
    write!(writer, ",kinetic,potential,total")?;
    if with_modes {
        write!(writer, ",mode_sym,mode_anti")?;
    }
    writeln!(writer)?;

    for (s, d) in series.iter().zip(derived.iter()) {
        write!(writer, "{:.6}", s.time)?;
        for value in s.state.iter() {
            write!(writer, ",{value:.9}")?;
        }
        write!(writer, ",{:.9},{:.9},{:.9}", d.kinetic, d.potential, d.total)?;
        if let Some(m) = d.normal_modes.filter(|_| with_modes) {
            write!(writer, ",{:.9},{:.9}", m.symmetric, m.antisymmetric)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write a run to a CSV file at the given path.
pub fn write_run_file<P: AsRef<Path>, const N: usize>(
    path: P,
    labels: &[&str; N],
    series: &TimeSeries<N>,
    derived: &DerivedSeries,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_run(&mut file, labels, series, derived)?;
    file.flush()
}
