use mech_sim::analysis::{compare_methods, convergence};
use mech_sim::dynamics::StateVector;

fn main() -> Result<(), mech_sim::ConfigError> {
    let omega = 2.0 * std::f64::consts::PI;
    let x0 = StateVector::<2>::new(1.0, 0.0);

    println!("=== Euler vs RK4: simple harmonic oscillator ===\n");
    for r in compare_methods(omega, x0, 0.01, 10.0)? {
        println!(
            "{:>6}: max error {:.3e}, final x = {:+.6}",
            r.kind.name(),
            r.max_error,
            r.series.last().state[0]
        );
    }

    println!("\n=== Convergence (halving dt from 0.02 over 5 s) ===\n");
    for kind in mech_sim::sim::IntegratorKind::ALL {
        let c = convergence(kind, omega, x0, 0.02, 5.0)?;
        println!(
            "{:>6}: error ratio {:>6.2}  observed order {:.2} (expected {})",
            kind.name(),
            c.ratio(),
            c.observed_order(),
            kind.order()
        );
    }
    Ok(())
}
