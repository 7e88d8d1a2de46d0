use mech_sim::analysis::angle_sweep;
use mech_sim::dynamics::Projectile;
use mech_sim::sim::IntegratorKind;

fn main() -> Result<(), mech_sim::ConfigError> {
    let projectile = Projectile::default();
    let speed = 30.0;
    let angles = [15.0, 30.0, 45.0, 60.0, 75.0];

    println!("=== Range vs launch angle (v0 = {speed} m/s) ===\n");
    for (kind, dt) in [(IntegratorKind::Euler, 0.01), (IntegratorKind::Rk4, 0.01)] {
        println!("{kind}, dt = {dt} s");
        for f in angle_sweep(&projectile, speed, &angles, dt, kind)? {
            let range = f.range.unwrap_or(f64::NAN);
            let ideal = projectile.ideal_range(speed, f.angle_deg);
            println!(
                "  {:>4.0} deg  range {:>8.3} m  (ideal {:>8.3} m)  apex {:>7.3} m",
                f.angle_deg, range, ideal, f.apex
            );
        }
        println!();
    }
    Ok(())
}
