pub mod config;
pub mod constants;
pub mod geo;
pub mod locations;
pub mod validate;

// Re-export the essential types
pub use config::{CoordinatePolicy, MarkerSyncConfig, SyncProfile};
pub use geo::{LatLng, LatLngBounds};
pub use locations::{cycle_location, ReferenceLocation, REFERENCE_LOCATIONS};
pub use validate::{clamp_to_bounds, sanitize_coordinates, CoordinateValidator, Sanitized};
