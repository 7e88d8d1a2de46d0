use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mech_sim::analysis::{angle_sweep, compare_methods, convergence};
use mech_sim::config::{presets, Outcome, Scenario};
use mech_sim::dynamics::{DampedDrivenOscillator, Projectile, StateVector};
use mech_sim::io::json::{self, RunSummary};
use mech_sim::sim::IntegratorKind;

/// Fixed-step Euler/RK4 integration of small classical-mechanics systems.
#[derive(Parser, Debug)]
#[command(name = "mech-sim", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario described by a TOML file
    Run {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a built-in scenario
    Preset {
        /// harmonic, damped-driven, coupled-symmetric, coupled-antisymmetric, coupled-beats, projectile
        name: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compare Euler and RK4 against the analytic harmonic oscillator
    Compare {
        #[arg(long, default_value_t = 2.0 * std::f64::consts::PI)]
        omega: f64,
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
    },
    /// Launch projectiles at several angles with the same speed
    Sweep {
        #[arg(long, default_value_t = 20.0)]
        speed: f64,
        #[arg(long, value_delimiter = ',', default_values_t = [15.0, 30.0, 45.0, 60.0, 75.0])]
        angles: Vec<f64>,
        #[arg(long, default_value_t = 0.001)]
        dt: f64,
        #[arg(long, default_value = "rk4")]
        integrator: String,
    },
    /// Steady-state amplitude of the damped, driven oscillator across drive frequencies
    Resonance {
        #[arg(long, default_value_t = 0.5)]
        damping: f64,
        #[arg(long, default_value_t = 0.5)]
        drive: f64,
        #[arg(long, default_value_t = 25)]
        points: usize,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Write the time series and derived quantities as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the run summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run { path, output } => {
            let scenario = Scenario::load(&path)
                .with_context(|| format!("invalid scenario {}", path.display()))?;
            run_scenario(&scenario, &output)
        }
        Command::Preset { name, output } => run_scenario(&presets::by_name(&name)?, &output),
        Command::Compare { omega, dt, duration } => compare(omega, dt, duration),
        Command::Sweep { speed, angles, dt, integrator } => {
            sweep(speed, &angles, dt, integrator.parse()?)
        }
        Command::Resonance { damping, drive, points } => {
            resonance(damping, drive, points);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario runs
// ---------------------------------------------------------------------------

fn run_scenario(scenario: &Scenario, output: &OutputArgs) -> anyhow::Result<()> {
    let outcome = scenario.run()?;
    let summary = outcome.summary(scenario);
    print_summary(&summary, &outcome);

    if let Some(path) = &output.csv {
        outcome
            .write_csv(path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote time series");
    }
    if let Some(path) = &output.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote summary");
    }
    Ok(())
}

fn rule() {
    println!("  ──────────────────────────────────────────────────────────────────");
}

fn print_summary(summary: &RunSummary, outcome: &Outcome) {
    println!();
    println!("====================================================================");
    println!("  {} — {} ({})", summary.name, summary.system, summary.integrator);
    println!("====================================================================");
    println!(
        "  Step size:     {:>10.5} s    Steps:        {:>8}",
        summary.step_size, summary.steps
    );
    println!("  Duration:      {:>10.3} s", summary.duration);
    println!();
    println!("  Energy");
    rule();
    println!(
        "  Initial:       {:>12.6} J  Final:        {:>12.6} J",
        summary.initial_energy, summary.final_energy
    );
    println!("  Max drift:     {:>12.3e} (relative)", summary.energy_drift);
    if let (Some(s), Some(a)) = (summary.max_symmetric_mode, summary.max_antisymmetric_mode) {
        println!("  Mode peaks:    symmetric {s:.6}   antisymmetric {a:.6}");
    }
    if let Some(period) = summary.period {
        println!("  Period:        {period:>12.6} s");
    }
    if let Some(range) = summary.range {
        println!("  Range:         {range:>12.4} m");
    }
    if let Some(apex) = summary.apex {
        println!("  Apex:          {apex:>12.4} m");
    }
    println!();

    println!("  Energy timeline (sampled)");
    rule();
    println!("  {:>9}  {:>14}  {:>14}  {:>14}", "t (s)", "kinetic", "potential", "total");
    let derived = outcome.derived();
    let interval = (derived.len() / 20).max(1);
    for (i, d) in derived.iter().enumerate() {
        if i % interval != 0 && i != derived.len() - 1 {
            continue;
        }
        println!(
            "  {:>9.3}  {:>14.6}  {:>14.6}  {:>14.6}",
            d.time, d.kinetic, d.potential, d.total
        );
    }
    println!("====================================================================");
    println!();
}

// ---------------------------------------------------------------------------
// Studies
// ---------------------------------------------------------------------------

fn compare(omega: f64, dt: f64, duration: f64) -> anyhow::Result<()> {
    let x0 = StateVector::<2>::new(1.0, 0.0);
    let results = compare_methods(omega, x0, dt, duration)?;

    println!();
    println!("  Simple harmonic oscillator, omega = {omega:.4} rad/s, dt = {dt} s, T = {duration} s");
    rule();
    println!("  {:>8}  {:>14}  {:>14}  {:>10}  {:>8}", "method", "max |err|", "final |err|", "h/2 ratio", "order");
    for r in &results {
        let c = convergence(r.kind, omega, x0, dt, duration)?;
        println!(
            "  {:>8}  {:>14.6e}  {:>14.6e}  {:>10.2}  {:>8.2}",
            r.kind.name(),
            r.max_error,
            r.final_error,
            c.ratio(),
            c.observed_order()
        );
    }
    println!();
    Ok(())
}

fn sweep(speed: f64, angles: &[f64], dt: f64, kind: IntegratorKind) -> anyhow::Result<()> {
    let projectile = Projectile::default();
    let flights = angle_sweep(&projectile, speed, angles, dt, kind)?;

    println!();
    println!("  Projectile, v0 = {speed} m/s, g = {} m/s^2 ({kind})", projectile.gravity);
    rule();
    println!("  {:>8}  {:>10}  {:>10}  {:>10}  {:>10}", "angle", "range (m)", "ideal (m)", "apex (m)", "time (s)");
    for f in &flights {
        println!(
            "  {:>8.1}  {:>10}  {:>10.3}  {:>10.3}  {:>10}",
            f.angle_deg,
            f.range.map_or("-".to_string(), |r| format!("{r:.3}")),
            projectile.ideal_range(speed, f.angle_deg),
            f.apex,
            f.flight_time.map_or("-".to_string(), |t| format!("{t:.3}")),
        );
    }
    println!();
    Ok(())
}

fn resonance(damping: f64, drive: f64, points: usize) {
    let osc = DampedDrivenOscillator {
        damping,
        drive_amplitude: drive,
        ..Default::default()
    };
    let w0 = osc.natural_frequency();

    println!();
    println!("  Steady-state amplitude, w0 = {w0:.4} rad/s, c = {damping}, F0 = {drive}");
    rule();
    println!("  {:>10}  {:>10}  {:>12}", "wd (rad/s)", "wd / w0", "amplitude");
    for (wd, amp) in osc.resonance_curve(0.1 * w0, 3.0 * w0, points) {
        println!("  {:>10.4}  {:>10.3}  {:>12.6}", wd, wd / w0, amp);
    }
    println!();
}
