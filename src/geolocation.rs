//! Picking the initial map center from the device position
//!
//! The position request may fail, hang forever, or report a place far outside
//! the region the map is meant for. [`resolve_center`] turns all of those into
//! a usable center plus an optional notice for the user.

use crate::core::config::MarkerSyncConfig;
use crate::core::geo::LatLng;
use crate::core::validate::clamp_to_bounds;
use crate::{MapError, Result};
use async_trait::async_trait;
use std::fmt;

/// Source of the device's current position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<LatLng>;
}

/// Always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub LatLng);

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<LatLng> {
        Ok(self.0)
    }
}

/// Stands in for a device without location support
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocation;

#[async_trait]
impl GeolocationProvider for UnavailableLocation {
    async fn current_position(&self) -> Result<LatLng> {
        Err(MapError::Geolocation("location services unavailable".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterNotice {
    /// No position could be obtained in time
    LocationUnavailable,
    /// The device is outside the covered region, the default center is shown
    Relocated,
}

impl fmt::Display for CenterNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CenterNotice::LocationUnavailable => write!(f, "Location unavailable"),
            CenterNotice::Relocated => write!(f, "Relocated to the default region"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CenterResolution {
    pub center: LatLng,
    /// Where the device actually is, when known
    pub device_position: Option<LatLng>,
    pub notice: Option<CenterNotice>,
}

impl CenterResolution {
    /// Zoom to show this center at: close in on the viewer, region-wide after
    /// a relocation, the configured default otherwise
    pub fn zoom(&self, config: &MarkerSyncConfig) -> f64 {
        match (self.notice, self.device_position) {
            (Some(CenterNotice::Relocated), _) => config.relocated_zoom,
            (None, Some(_)) => config.located_zoom,
            _ => config.default_zoom,
        }
    }
}

/// Resolves the map center. Never fails; every problem degrades to the
/// configured default center.
pub async fn resolve_center<P>(provider: &P, config: &MarkerSyncConfig) -> CenterResolution
where
    P: GeolocationProvider + ?Sized,
{
    let default_center = config.default_center();
    let unavailable = CenterResolution {
        center: default_center,
        device_position: None,
        notice: Some(CenterNotice::LocationUnavailable),
    };

    let position =
        match tokio::time::timeout(config.geolocation_timeout(), provider.current_position()).await
        {
            Ok(Ok(position)) if position.is_valid() => position,
            Ok(Ok(position)) => {
                log::warn!("geolocation returned an invalid position {:?}", position);
                return unavailable;
            }
            Ok(Err(e)) => {
                log::warn!("geolocation failed: {}", e);
                return unavailable;
            }
            Err(_) => {
                log::warn!(
                    "geolocation timed out after {:?}",
                    config.geolocation_timeout()
                );
                return unavailable;
            }
        };

    if position.max_axis_delta(&default_center) > config.relocate_threshold_degrees {
        log::info!(
            "device at {:?} is outside the covered region, centering on {:?}",
            position,
            default_center
        );
        return CenterResolution {
            center: default_center,
            device_position: Some(position),
            notice: Some(CenterNotice::Relocated),
        };
    }

    CenterResolution {
        center: clamp_to_bounds(position, &config.coordinates.bounds),
        device_position: Some(position),
        notice: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct NeverResolves;

    #[async_trait]
    impl GeolocationProvider for NeverResolves {
        async fn current_position(&self) -> Result<LatLng> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_nearby_position_is_used() {
        let config = MarkerSyncConfig::default();
        let here = LatLng::new(-1.30, 36.80);
        let resolution = resolve_center(&FixedLocation(here), &config).await;

        assert_eq!(resolution.center, here);
        assert_eq!(resolution.device_position, Some(here));
        assert!(resolution.notice.is_none());
        assert_eq!(resolution.zoom(&config), config.located_zoom);
    }

    #[tokio::test]
    async fn test_distant_position_relocates() {
        let config = MarkerSyncConfig::default();
        let paris = LatLng::new(48.8566, 2.3522);
        let resolution = resolve_center(&FixedLocation(paris), &config).await;

        assert_eq!(resolution.center, config.default_center());
        assert_eq!(resolution.notice, Some(CenterNotice::Relocated));
        assert_eq!(resolution.device_position, Some(paris));
        assert_eq!(resolution.zoom(&config), config.relocated_zoom);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let config = MarkerSyncConfig::default();
        let resolution = resolve_center(&UnavailableLocation, &config).await;

        assert_eq!(resolution.center, config.default_center());
        assert_eq!(resolution.notice, Some(CenterNotice::LocationUnavailable));
        assert_eq!(
            resolution.notice.map(|n| n.to_string()).as_deref(),
            Some("Location unavailable")
        );
        assert_eq!(resolution.zoom(&config), config.default_zoom);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let config = MarkerSyncConfig::default();
        let started = tokio::time::Instant::now();
        let resolution = resolve_center(&NeverResolves, &config).await;

        assert!(started.elapsed() >= Duration::from_millis(config.geolocation_timeout_ms));
        assert_eq!(resolution.notice, Some(CenterNotice::LocationUnavailable));
    }

    #[tokio::test]
    async fn test_invalid_position_is_rejected() {
        let config = MarkerSyncConfig::default();
        let resolution = resolve_center(&FixedLocation(LatLng::new(f64::NAN, 36.8)), &config).await;
        assert_eq!(resolution.center, config.default_center());
        assert_eq!(resolution.notice, Some(CenterNotice::LocationUnavailable));
    }
}
