//! Prelude module for common nearby-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use nearby_map::prelude::*;`

pub use crate::core::{
    config::{CoordinatePolicy, MarkerSyncConfig, SyncProfile},
    geo::{LatLng, LatLngBounds},
    locations::{ReferenceLocation, REFERENCE_LOCATIONS},
    validate::{sanitize_coordinates, CoordinateValidator, Sanitized},
};

pub use crate::layers::{animation::OrbitAnimation, marker::ProfileMarker};

pub use crate::profile::{
    directory::StaticDirectory, Gender, Profile, ProfileDirectory, ProfileFilter,
};

pub use crate::surface::{
    headless::HeadlessSurface, MapSurface, MarkerCallback, MarkerEvent, MarkerHandle,
};

pub use crate::sync::{MarkerLifecycleManager, SelectionSlot, SyncPhase};

pub use crate::context::{SessionContext, UserProfile, UserProfileContext};

pub use crate::geolocation::{resolve_center, CenterResolution, GeolocationProvider};

pub use crate::store::{AppStore, Theme};

pub use crate::{MapError, Result};
