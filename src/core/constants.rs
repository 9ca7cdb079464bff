//! Core constants for the nearby map.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default map center (Nairobi) as `[longitude, latitude]`.
pub const DEFAULT_CENTER_LNG_LAT: [f64; 2] = [36.8219, -1.2921];

/// Safe bounding box covering the target region, `(south, west, north, east)`.
pub const SAFE_BOUNDS: (f64, f64, f64, f64) = (-5.0, 33.5, 5.5, 42.0);

/// Quiet period collapsing bursts of refresh requests.
pub const DEBOUNCE_MS: u64 = 500;

/// Upper bound on markers placed per refresh.
pub const MAX_MARKERS: usize = 100;

/// Full width of the random jitter window in degrees (about 200 m).
pub const JITTER_DEGREES: f64 = 0.002;

/// One animation frame at roughly 60 fps.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Radius of the circular path followed by moving markers, in degrees.
pub const ORBIT_RADIUS_DEGREES: f64 = 0.0005;

/// Time for a moving marker to complete one circle.
pub const ORBIT_PERIOD_MS: u64 = 8_000;

/// A first coordinate at or below this magnitude looks like a latitude.
pub const SWAP_LNG_THRESHOLD: f64 = 10.0;

/// A second coordinate above this magnitude looks like a longitude.
pub const SWAP_LAT_THRESHOLD: f64 = 20.0;

/// Zoom used when no device position is known.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Zoom used when centering on the viewer's own position.
pub const LOCATED_ZOOM: f64 = 14.0;

/// Region-wide zoom used after relocating a distant viewer.
pub const RELOCATED_ZOOM: f64 = 7.0;

/// Give up on geolocation after this long.
pub const GEOLOCATION_TIMEOUT_MS: u64 = 10_000;

/// Positions further than this from the default center (either axis) get relocated.
pub const RELOCATE_THRESHOLD_DEGREES: f64 = 1.0;

/// Border color for online profiles.
pub const ONLINE_BORDER_COLOR: &str = "#10B981";

/// Border color for offline or unknown profiles.
pub const OFFLINE_BORDER_COLOR: &str = "#FFFFFF";

/// Fill color of the viewer's own marker.
pub const VIEWER_MARKER_COLOR: &str = "#FF385C";

/// Profile id reserved for the viewer's own marker.
pub const VIEWER_MARKER_ID: &str = "viewer";

/// Image shown when a profile has none.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg";
