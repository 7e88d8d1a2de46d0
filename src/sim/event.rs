use crate::dynamics::{Sample, TimeSeries};

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Projectile dropped below y = 0 from at or above it.
    GroundImpact,
    /// A velocity component changed sign: an extremum of its position.
    TurningPoint { component: usize },
}

/// A discrete event located between two consecutive samples.
///
/// `time` is linearly interpolated inside the step where the crossing
/// happened, so it is not restricted to the sampling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub index: usize,
}

/// Passive detector inspecting consecutive samples.
pub trait EventDetector<const N: usize> {
    /// Returns the event and the interpolation fraction in `[0, 1]` between
    /// `prev` and `current` at which it happened.
    fn check(&mut self, prev: &Sample<N>, current: &Sample<N>) -> Option<(EventKind, f64)>;
}

/// Fraction along a step at which `a -> b` crosses zero.
fn zero_fraction(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        (a / (a - b)).clamp(0.0, 1.0)
    }
}

/// Fires once when the height component goes from `>= 0` to `< 0`.
///
/// A launch that starts exactly on the ground counts as airborne, so a
/// horizontal throw from y = 0 lands on its first step.
pub struct GroundImpact {
    pub height: usize,
    fired: bool,
}

impl GroundImpact {
    pub fn new(height: usize) -> Self {
        Self { height, fired: false }
    }
}

impl<const N: usize> EventDetector<N> for GroundImpact {
    fn check(&mut self, prev: &Sample<N>, current: &Sample<N>) -> Option<(EventKind, f64)> {
        if self.fired {
            return None;
        }
        let (a, b) = (prev.state[self.height], current.state[self.height]);
        if a >= 0.0 && b < 0.0 {
            self.fired = true;
            Some((EventKind::GroundImpact, zero_fraction(a, b)))
        } else {
            None
        }
    }
}

/// Fires every time the given velocity component changes sign.
pub struct TurningPoint {
    pub velocity: usize,
}

impl<const N: usize> EventDetector<N> for TurningPoint {
    fn check(&mut self, prev: &Sample<N>, current: &Sample<N>) -> Option<(EventKind, f64)> {
        let (a, b) = (prev.state[self.velocity], current.state[self.velocity]);
        let crossed = (a > 0.0 && b <= 0.0) || (a < 0.0 && b >= 0.0);
        crossed.then(|| {
            (EventKind::TurningPoint { component: self.velocity }, zero_fraction(a, b))
        })
    }
}

/// Scan a series with one detector and collect every event it reports.
pub fn detect<const N: usize>(
    series: &TimeSeries<N>,
    detector: &mut dyn EventDetector<N>,
) -> Vec<SimEvent> {
    series
        .samples()
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            detector.check(&pair[0], &pair[1]).map(|(kind, frac)| SimEvent {
                time: pair[0].time + frac * (pair[1].time - pair[0].time),
                kind,
                index: i + 1,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::StateVector;

    fn sample(time: f64, y: f64, vy: f64) -> Sample<2> {
        Sample { time, state: StateVector::<2>::new(y, vy) }
    }

    #[test]
    fn ground_impact_interpolates_time() {
        let mut det = GroundImpact::new(0);
        let prev = sample(1.0, 2.0, -10.0);
        let curr = sample(1.5, -2.0, -12.0);
        let (kind, frac) = det.check(&prev, &curr).unwrap();
        assert_eq!(kind, EventKind::GroundImpact);
        assert!((frac - 0.5).abs() < 1e-12);
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn leaving_ground_level_downwards_is_impact_at_start() {
        let mut det = GroundImpact::new(0);
        let (_, frac) = det.check(&sample(0.0, 0.0, 0.0), &sample(0.1, -0.05, -1.0)).unwrap();
        assert_eq!(frac, 0.0);
    }

    #[test]
    fn touching_zero_fires_on_the_step_below_it() {
        let mut det = GroundImpact::new(0);
        assert!(det.check(&sample(0.0, 1.0, -5.0), &sample(0.1, 0.0, -6.0)).is_none());
        let (_, frac) = det.check(&sample(0.1, 0.0, -6.0), &sample(0.2, -0.6, -7.0)).unwrap();
        assert_eq!(frac, 0.0);
    }

    #[test]
    fn ascending_through_zero_is_not_impact() {
        let mut det = GroundImpact::new(0);
        assert!(det.check(&sample(0.0, -1.0, 5.0), &sample(0.1, 1.0, 5.0)).is_none());
    }

    #[test]
    fn turning_point_fires_both_directions() {
        let mut det = TurningPoint { velocity: 1 };
        assert!(det.check(&sample(0.0, 1.0, 0.5), &sample(0.1, 1.0, -0.5)).is_some());
        assert!(det.check(&sample(0.1, 1.0, -0.5), &sample(0.2, 1.0, 0.5)).is_some());
        assert!(det.check(&sample(0.2, 1.0, 0.5), &sample(0.3, 1.0, 0.7)).is_none());
    }
}
