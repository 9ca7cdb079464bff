//! # nearby-map
//!
//! Keeps a map surface's markers in sync with a list of nearby profiles.
//!
//! The crate validates untrusted coordinates into a safe region, places one
//! marker per profile on an abstract [`MapSurface`](surface::MapSurface),
//! debounces bursts of refresh requests, animates moving profiles, and tears
//! everything down cleanly. Session, user-profile and app-wide state are
//! explicit containers handed to consumers rather than ambient globals.

pub mod context;
pub mod core;
pub mod geolocation;
pub mod layers;
pub mod prelude;
pub mod profile;
pub mod runtime;
pub mod spatial;
pub mod store;
pub mod surface;
pub mod sync;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{CoordinatePolicy, MarkerSyncConfig, SyncProfile},
    geo::{LatLng, LatLngBounds},
    validate::{sanitize_coordinates, CoordinateValidator},
};

pub use context::{session::SessionContext, user::UserProfileContext};
pub use geolocation::{resolve_center, CenterResolution, GeolocationProvider};
pub use layers::{animation::OrbitAnimation, marker::ProfileMarker};
pub use profile::{directory::StaticDirectory, Profile, ProfileDirectory, ProfileFilter};
pub use store::AppStore;
pub use surface::{headless::HeadlessSurface, MapSurface, MarkerHandle};
pub use sync::{
    manager::{MarkerLifecycleManager, SyncPhase},
    selection::SelectionSlot,
};

/// Result type used throughout the library
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Map surface error: {0}")]
    Surface(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` honoring `RUST_LOG`; repeated calls are ignored
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
