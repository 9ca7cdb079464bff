//! Coordinate repair for untrusted `[longitude, latitude]` pairs
//!
//! Profile coordinates come from seed data or remote records and may be
//! missing, non-numeric, swapped, or far outside the region the map covers.
//! Nothing in here fails: every input maps onto a finite point inside the
//! configured safe bounds.

use crate::core::config::CoordinatePolicy;
use crate::core::geo::{LatLng, LatLngBounds};
use std::sync::atomic::{AtomicU64, Ordering};

/// What the validator had to do to produce a usable coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitized {
    /// Input was already in range
    Valid,
    /// At least one axis was clamped into the safe bounds
    Clamped,
    /// Input looked like `[lat, lng]` and was swapped (and possibly clamped)
    Swapped,
    /// Input was unusable, the fallback center was returned
    Fallback,
}

/// Returns a coordinate guaranteed to be finite and inside `policy.bounds`.
pub fn sanitize_coordinates(raw: Option<&[f64]>, policy: &CoordinatePolicy) -> LatLng {
    sanitize_with_outcome(raw, policy).0
}

pub fn sanitize_with_outcome(raw: Option<&[f64]>, policy: &CoordinatePolicy) -> (LatLng, Sanitized) {
    let fallback = clamp_to_bounds(policy.fallback, &policy.bounds);

    let (first, second) = match raw {
        Some([first, second]) if first.is_finite() && second.is_finite() => (*first, *second),
        other => {
            log::debug!("unusable coordinates {:?}, using fallback", other);
            return (fallback, Sanitized::Fallback);
        }
    };

    let swapped = policy.detect_swapped && looks_swapped(first, second, policy);
    let (lng, lat) = if swapped {
        log::debug!("coordinates [{}, {}] look swapped", first, second);
        (second, first)
    } else {
        (first, second)
    };

    let candidate = LatLng::new(lat, lng);
    let clamped = clamp_to_bounds(candidate, &policy.bounds);
    let outcome = if swapped {
        Sanitized::Swapped
    } else if clamped != candidate {
        log::debug!("coordinates {:?} clamped to {:?}", candidate, clamped);
        Sanitized::Clamped
    } else {
        Sanitized::Valid
    };

    (clamped, outcome)
}

/// Heuristic only: a small first value paired with a large second value reads
/// as `[lat, lng]`. Legitimate points near the prime meridian can trip it.
fn looks_swapped(first: f64, second: f64, policy: &CoordinatePolicy) -> bool {
    first.abs() <= policy.swap_lng_threshold && second.abs() > policy.swap_lat_threshold
}

/// Clamps each axis independently. Non-finite components land on the bounds center.
pub fn clamp_to_bounds(point: LatLng, bounds: &LatLngBounds) -> LatLng {
    let center = bounds.center();
    let lat = if point.lat.is_finite() {
        point.lat.clamp(bounds.south(), bounds.north())
    } else {
        center.lat
    };
    let lng = if point.lng.is_finite() {
        point.lng.clamp(bounds.west(), bounds.east())
    } else {
        center.lng
    };
    LatLng::new(lat, lng)
}

/// Policy-carrying validator that also counts repairs for diagnostics
#[derive(Debug, Default)]
pub struct CoordinateValidator {
    policy: CoordinatePolicy,
    clamped: AtomicU64,
    swapped: AtomicU64,
    fallbacks: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairStats {
    pub clamped: u64,
    pub swapped: u64,
    pub fallbacks: u64,
}

impl CoordinateValidator {
    pub fn new(policy: CoordinatePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &CoordinatePolicy {
        &self.policy
    }

    pub fn sanitize(&self, raw: Option<&[f64]>) -> LatLng {
        self.inspect(raw).0
    }

    /// Like [`sanitize`](Self::sanitize) but also reports what was repaired
    pub fn inspect(&self, raw: Option<&[f64]>) -> (LatLng, Sanitized) {
        let (point, outcome) = sanitize_with_outcome(raw, &self.policy);
        match outcome {
            Sanitized::Valid => {}
            Sanitized::Clamped => {
                self.clamped.fetch_add(1, Ordering::Relaxed);
            }
            Sanitized::Swapped => {
                self.swapped.fetch_add(1, Ordering::Relaxed);
            }
            Sanitized::Fallback => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
            }
        }
        (point, outcome)
    }

    /// Re-checks an already structured point, e.g. an animation frame
    pub fn clamp(&self, point: LatLng) -> LatLng {
        clamp_to_bounds(point, &self.policy.bounds)
    }

    pub fn stats(&self) -> RepairStats {
        RepairStats {
            clamped: self.clamped.load(Ordering::Relaxed),
            swapped: self.swapped.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CoordinatePolicy {
        CoordinatePolicy::default()
    }

    fn assert_in_bounds(point: LatLng, policy: &CoordinatePolicy) {
        assert!(point.is_finite(), "{:?} is not finite", point);
        assert!(policy.bounds.contains(&point), "{:?} escaped the bounds", point);
    }

    #[test]
    fn test_valid_pair_passes_through() {
        let policy = policy();
        let (point, outcome) = sanitize_with_outcome(Some(&[36.8219, -1.2921]), &policy);
        assert_eq!(outcome, Sanitized::Valid);
        assert_eq!(point, LatLng::new(-1.2921, 36.8219));
    }

    #[test]
    fn test_out_of_range_clamps_to_corner() {
        let policy = policy();
        let point = sanitize_coordinates(Some(&[200.0, 95.0]), &policy);
        assert_eq!(point.lng, policy.bounds.east());
        assert_eq!(point.lat, policy.bounds.north());
    }

    #[test]
    fn test_malformed_input_uses_fallback() {
        let policy = policy();
        let cases: [Option<&[f64]>; 5] = [
            None,
            Some(&[]),
            Some(&[36.8]),
            Some(&[36.8, -1.2, 0.0]),
            Some(&[f64::NAN, -1.2]),
        ];
        for raw in cases {
            let (point, outcome) = sanitize_with_outcome(raw, &policy);
            assert_eq!(outcome, Sanitized::Fallback, "input {:?}", raw);
            assert_eq!(point, policy.fallback);
        }

        let infinite = sanitize_coordinates(Some(&[36.8, f64::INFINITY]), &policy);
        assert_eq!(infinite, policy.fallback);
    }

    #[test]
    fn test_swapped_pair_is_repaired() {
        let policy = policy();
        let (point, outcome) = sanitize_with_outcome(Some(&[-1.2921, 36.8219]), &policy);
        assert_eq!(outcome, Sanitized::Swapped);
        assert_eq!(point, LatLng::new(-1.2921, 36.8219));
    }

    #[test]
    fn test_swap_detection_can_be_disabled() {
        let policy = CoordinatePolicy {
            detect_swapped: false,
            ..policy()
        };
        let (point, outcome) = sanitize_with_outcome(Some(&[-1.2921, 36.8219]), &policy);
        assert_eq!(outcome, Sanitized::Clamped);
        assert_in_bounds(point, &policy);
    }

    #[test]
    fn test_every_input_lands_in_bounds() {
        let policy = policy();
        let values = [
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            -1000.0,
            -180.0,
            -95.0,
            -5.0,
            0.0,
            0.5,
            12.0,
            36.8,
            95.0,
            200.0,
        ];
        for a in values {
            for b in values {
                assert_in_bounds(sanitize_coordinates(Some(&[a, b]), &policy), &policy);
            }
        }
    }

    #[test]
    fn test_clamp_replaces_non_finite_axis() {
        let bounds = policy().bounds;
        let point = clamp_to_bounds(LatLng::new(f64::NAN, 100.0), &bounds);
        assert_eq!(point.lat, bounds.center().lat);
        assert_eq!(point.lng, bounds.east());
    }

    #[test]
    fn test_validator_counts_repairs() {
        let validator = CoordinateValidator::new(policy());
        validator.sanitize(Some(&[36.8, -1.3]));
        validator.sanitize(Some(&[200.0, 95.0]));
        validator.sanitize(Some(&[-1.3, 36.8]));
        validator.sanitize(None);
        validator.sanitize(Some(&[1.0]));

        assert_eq!(
            validator.stats(),
            RepairStats {
                clamped: 1,
                swapped: 1,
                fallbacks: 2,
            }
        );
    }
}
