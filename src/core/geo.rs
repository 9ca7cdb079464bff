use serde::{Deserialize, Serialize};

/// Mean earth radius used for haversine distances
const EARTH_RADIUS: f64 = 6378137.0;

/// Meters covered by one degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a `[longitude, latitude]` ordered pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns the coordinate as a `[longitude, latitude]` ordered pair
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Returns a new coordinate shifted by the given degree offsets
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> LatLng {
        LatLng::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// Largest per-axis difference in degrees
    pub fn max_axis_delta(&self, other: &LatLng) -> f64 {
        (self.lat - other.lat).abs().max((self.lng - other.lng).abs())
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Bounds collapsed onto a single point, ready to be extended
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    /// Checks the corners are finite and ordered
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south() <= self.north()
            && self.west() <= self.east()
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Pulls every side inward by `margin` degrees, stopping at the center
    pub fn shrink(&self, margin: f64) -> LatLngBounds {
        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        let center = self.center();
        LatLngBounds::from_coords(
            (self.south() + margin).min(center.lat),
            (self.west() + margin).min(center.lng),
            (self.north() - margin).max(center.lat),
            (self.east() - margin).max(center.lng),
        )
    }

    /// Builds the smallest bounds covering every point, `None` when empty
    pub fn covering<'a, I>(points: I) -> Option<LatLngBounds>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = LatLngBounds::from_point(*first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::from_lng_lat([36.8219, -1.2921]);
        assert_eq!(coord.lat, -1.2921);
        assert_eq!(coord.lng, 36.8219);
        assert!(coord.is_valid());
        assert_eq!(coord.to_lng_lat(), [36.8219, -1.2921]);
    }

    #[test]
    fn test_shrink_stops_at_center() {
        let bounds = LatLngBounds::from_coords(-5.0, 33.5, 5.5, 42.0);
        let inner = bounds.shrink(0.5);
        assert_eq!(inner.south(), -4.5);
        assert_eq!(inner.east(), 41.5);

        let collapsed = bounds.shrink(100.0);
        assert_eq!(collapsed.south_west, bounds.center());
        assert_eq!(collapsed.north_east, bounds.center());
        assert_eq!(bounds.shrink(f64::NAN), bounds);
    }

    #[test]
    fn test_non_finite_is_invalid() {
        assert!(!LatLng::new(f64::NAN, 10.0).is_valid());
        assert!(!LatLng::new(1.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_lat_lng_distance() {
        let nairobi = LatLng::new(-1.2921, 36.8219);
        let mombasa = LatLng::new(-4.0435, 39.6682);
        let distance = nairobi.distance_to(&mombasa);

        // Roughly 440 km as the crow flies
        assert!((distance - 440_000.0).abs() < 15_000.0);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(-5.0, 33.5, 5.5, 42.0);
        assert!(bounds.contains(&LatLng::new(-1.29, 36.82)));
        assert!(!bounds.contains(&LatLng::new(36.82, -1.29)));
    }

    #[test]
    fn test_covering_bounds() {
        let points = [
            LatLng::new(-1.0, 36.0),
            LatLng::new(-4.0, 39.5),
            LatLng::new(0.5, 35.0),
        ];
        let bounds = LatLngBounds::covering(points.iter()).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-4.0, 35.0));
        assert_eq!(bounds.north_east, LatLng::new(0.5, 39.5));
        assert!(LatLngBounds::covering(std::iter::empty()).is_none());
    }
}
