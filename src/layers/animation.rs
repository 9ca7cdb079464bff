use crate::core::config::MarkerSyncConfig;
use crate::core::geo::LatLng;
use std::f64::consts::TAU;
use std::time::Duration;

/// Circular wander path for a moving marker
///
/// The marker starts on its anchor and eases out onto a circle of `radius`
/// degrees around it, completing one lap per `period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitAnimation {
    anchor: LatLng,
    radius: f64,
    period: Duration,
    /// Starting angle so neighbouring markers do not move in lockstep
    phase: f64,
}

impl OrbitAnimation {
    pub fn new(anchor: LatLng, radius: f64, period: Duration, phase: f64) -> Self {
        Self {
            anchor,
            radius: if radius.is_finite() { radius.abs() } else { 0.0 },
            period,
            phase,
        }
    }

    pub fn from_config(anchor: LatLng, config: &MarkerSyncConfig, phase: f64) -> Self {
        Self::new(anchor, config.orbit_radius_degrees, config.orbit_period(), phase)
    }

    pub fn anchor(&self) -> LatLng {
        self.anchor
    }

    /// Position after `elapsed` time on the path (not yet bounds-checked)
    pub fn position_at(&self, elapsed: Duration) -> LatLng {
        let period = self.period.as_secs_f64().max(f64::EPSILON);
        let t = elapsed.as_secs_f64() / period;
        let angle = self.phase + t * TAU;
        // Ease onto the circle over the first quarter lap
        let reach = ease_out_cubic((t * 4.0).min(1.0));
        let r = self.radius * reach;
        self.anchor.offset(r * angle.sin(), r * angle.cos())
    }
}

/// Decelerating curve on `[0, 1]`
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_anchor() {
        let anchor = LatLng::new(-1.29, 36.82);
        let orbit = OrbitAnimation::new(anchor, 0.001, Duration::from_secs(8), 0.3);
        assert_eq!(orbit.position_at(Duration::ZERO), anchor);
    }

    #[test]
    fn test_stays_within_radius_and_moves() {
        let anchor = LatLng::new(-1.29, 36.82);
        let orbit = OrbitAnimation::new(anchor, 0.001, Duration::from_secs(8), 0.0);

        let mut previous = orbit.position_at(Duration::ZERO);
        for frame in 1..600 {
            let position = orbit.position_at(Duration::from_millis(frame * 16));
            assert!(position.max_axis_delta(&anchor) <= 0.001 + 1e-12);
            assert_ne!(position, previous, "frame {} did not move", frame);
            previous = position;
        }
    }

    #[test]
    fn test_degenerate_radius() {
        let anchor = LatLng::new(0.0, 37.0);
        let orbit = OrbitAnimation::new(anchor, f64::NAN, Duration::from_secs(1), 0.0);
        assert_eq!(orbit.position_at(Duration::from_millis(300)), anchor);
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
