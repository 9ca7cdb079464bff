//! Configuration system for marker synchronization tuning
//!
//! This module provides preset profiles plus a fully custom configuration for
//! the marker lifecycle manager, the coordinate validator and geolocation
//! fallback behavior. Everything is serde (de)serializable so a host can ship
//! it as JSON.

use crate::core::constants::*;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SyncProfile {
    #[default]
    Balanced,
    /// Fewer markers and slower animation frames
    BatterySaver,
    Custom(MarkerSyncConfig),
}

impl SyncProfile {
    pub fn resolve(&self) -> MarkerSyncConfig {
        match self {
            Self::Balanced => MarkerSyncConfig::default(),
            Self::BatterySaver => MarkerSyncConfig {
                debounce_ms: 750,
                max_markers: 50,
                frame_interval_ms: 66,
                ..MarkerSyncConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

/// Rules the coordinate validator applies to raw `[lng, lat]` pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatePolicy {
    pub bounds: LatLngBounds,
    pub fallback: LatLng,
    pub detect_swapped: bool,
    pub swap_lng_threshold: f64,
    pub swap_lat_threshold: f64,
}

impl Default for CoordinatePolicy {
    fn default() -> Self {
        let (south, west, north, east) = SAFE_BOUNDS;
        Self {
            bounds: LatLngBounds::from_coords(south, west, north, east),
            fallback: LatLng::from_lng_lat(DEFAULT_CENTER_LNG_LAT),
            detect_swapped: true,
            swap_lng_threshold: SWAP_LNG_THRESHOLD,
            swap_lat_threshold: SWAP_LAT_THRESHOLD,
        }
    }
}

impl CoordinatePolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_valid() {
            return Err(MapError::Config(format!(
                "safe bounds are empty or non-finite: {:?}",
                self.bounds
            )));
        }
        if !self.bounds.contains(&self.fallback) {
            return Err(MapError::Config(format!(
                "fallback {:?} lies outside the safe bounds",
                self.fallback
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSyncConfig {
    pub coordinates: CoordinatePolicy,
    pub debounce_ms: u64,
    pub max_markers: usize,
    pub jitter_degrees: f64,
    pub frame_interval_ms: u64,
    pub orbit_radius_degrees: f64,
    pub orbit_period_ms: u64,
    pub online_color: String,
    pub offline_color: String,
    pub placeholder_image: String,
    pub default_zoom: f64,
    pub located_zoom: f64,
    pub relocated_zoom: f64,
    pub viewer_color: String,
    pub geolocation_timeout_ms: u64,
    pub relocate_threshold_degrees: f64,
    /// Fixed seed for jitter, mostly for reproducible tests
    pub rng_seed: Option<u64>,
}

impl Default for MarkerSyncConfig {
    fn default() -> Self {
        Self {
            coordinates: CoordinatePolicy::default(),
            debounce_ms: DEBOUNCE_MS,
            max_markers: MAX_MARKERS,
            jitter_degrees: JITTER_DEGREES,
            frame_interval_ms: FRAME_INTERVAL_MS,
            orbit_radius_degrees: ORBIT_RADIUS_DEGREES,
            orbit_period_ms: ORBIT_PERIOD_MS,
            online_color: ONLINE_BORDER_COLOR.to_string(),
            offline_color: OFFLINE_BORDER_COLOR.to_string(),
            placeholder_image: PLACEHOLDER_IMAGE_URL.to_string(),
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
            relocated_zoom: RELOCATED_ZOOM,
            viewer_color: VIEWER_MARKER_COLOR.to_string(),
            geolocation_timeout_ms: GEOLOCATION_TIMEOUT_MS,
            relocate_threshold_degrees: RELOCATE_THRESHOLD_DEGREES,
            rng_seed: None,
        }
    }
}

impl MarkerSyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn orbit_period(&self) -> Duration {
        Duration::from_millis(self.orbit_period_ms.max(1))
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }

    pub fn default_center(&self) -> LatLng {
        self.coordinates.fallback
    }

    pub fn validate(&self) -> Result<()> {
        self.coordinates.validate()?;
        if !(self.jitter_degrees.is_finite() && self.jitter_degrees >= 0.0) {
            return Err(MapError::Config(format!(
                "jitter_degrees must be a non-negative number, got {}",
                self.jitter_degrees
            )));
        }
        if !(self.orbit_radius_degrees.is_finite() && self.orbit_radius_degrees >= 0.0) {
            return Err(MapError::Config(format!(
                "orbit_radius_degrees must be a non-negative number, got {}",
                self.orbit_radius_degrees
            )));
        }
        Ok(())
    }

    /// Parses a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MarkerSyncConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
