use crate::dynamics::{Projectile, TimeSeries};
use crate::error::ConfigError;
use crate::sim::{
    detect, run, steps_for_duration, EventKind, GroundImpact, IntegratorKind, TurningPoint,
};

// ---------------------------------------------------------------------------
// Projectile flight metrics
// ---------------------------------------------------------------------------

/// Summary of one projectile flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightMetrics {
    pub angle_deg: f64,
    /// Horizontal distance at ground impact. `None` if the height never drops
    /// below zero from at or above it: the run ended airborne, or it started
    /// below ground.
    pub range: Option<f64>,
    pub flight_time: Option<f64>,
    pub apex: f64,
}

impl FlightMetrics {
    /// Metrics from a projectile series with state `[x, y, vx, vy]`.
    pub fn from_series(angle_deg: f64, series: &TimeSeries<4>) -> Self {
        let apex = series.iter().map(|s| s.state[1]).fold(f64::MIN, f64::max);
        let impact = detect(series, &mut GroundImpact::new(1))
            .into_iter()
            .find(|e| e.kind == EventKind::GroundImpact);

        let (range, flight_time) = match impact {
            Some(event) => {
                let samples = series.samples();
                let (a, b) = (&samples[event.index - 1], &samples[event.index]);
                let frac = (event.time - a.time) / (b.time - a.time);
                (Some(a.state[0] + frac * (b.state[0] - a.state[0])), Some(event.time))
            }
            None => (None, None),
        };

        Self { angle_deg, range, flight_time, apex }
    }
}

/// Fly one projectile per launch angle long enough to land, same speed for all.
pub fn angle_sweep(
    projectile: &Projectile,
    speed: f64,
    angles_deg: &[f64],
    dt: f64,
    kind: IntegratorKind,
) -> Result<Vec<FlightMetrics>, ConfigError> {
    angles_deg
        .iter()
        .map(|&angle| -> Result<FlightMetrics, ConfigError> {
            // Integrate a little past the closed-form landing time.
            let t_land = projectile.ideal_flight_time(speed, angle).max(0.0);
            let steps = steps_for_duration(t_land * 1.1, dt)? + 1;
            let series = run(projectile, Projectile::launch_state(speed, angle), dt, steps, kind)?;
            Ok(FlightMetrics::from_series(angle, &series))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Oscillation period
// ---------------------------------------------------------------------------

/// Mean period from successive turning points of velocity component `velocity`.
///
/// Two turning points per period; needs at least two to return a value.
pub fn measured_period<const N: usize>(series: &TimeSeries<N>, velocity: usize) -> Option<f64> {
    let events = detect(series, &mut TurningPoint { velocity });
    if events.len() < 2 {
        return None;
    }
    let span = events[events.len() - 1].time - events[0].time;
    Some(2.0 * span / (events.len() - 1) as f64)
}
