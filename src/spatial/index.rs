use crate::core::geo::{LatLng, LatLngBounds, METERS_PER_DEGREE};

use rstar::{RTree, RTreeObject, AABB};

/// A positioned item that can be indexed via an R-tree
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub position: LatLng,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, position: LatLng, data: T) -> Self {
        Self { id, position, data }
    }

    fn key(&self) -> [f64; 2] {
        self.position.to_lng_lat()
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.key())
    }
}

/// R-tree over `[lng, lat]` points
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    /// Builds the tree in one pass, cheaper than repeated inserts
    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn query(&self, bounds: &LatLngBounds) -> Vec<&SpatialItem<T>> {
        let envelope = AABB::from_corners(
            [bounds.west(), bounds.south()],
            [bounds.east(), bounds.north()],
        );
        self.rtree.locate_in_envelope(&envelope).collect()
    }

    /// Items within `radius_m` meters (great-circle) of `center`
    pub fn query_radius(&self, center: &LatLng, radius_m: f64) -> Vec<&SpatialItem<T>> {
        if !(radius_m.is_finite() && radius_m >= 0.0) {
            return Vec::new();
        }

        // Coarse degree box first, exact haversine second
        let d_lat = radius_m / METERS_PER_DEGREE * 1.01;
        let cos_lat = center.lat.to_radians().cos().abs().max(0.01);
        let d_lng = d_lat / cos_lat;
        let bounds = LatLngBounds::from_coords(
            center.lat - d_lat,
            center.lng - d_lng,
            center.lat + d_lat,
            center.lng + d_lng,
        );

        self.query(&bounds)
            .into_iter()
            .filter(|item| item.position.distance_to(center) <= radius_m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex<u32> {
        SpatialIndex::bulk_load(vec![
            SpatialItem::new("nairobi".into(), LatLng::new(-1.2921, 36.8219), 1),
            SpatialItem::new("westlands".into(), LatLng::new(-1.2697, 36.8066), 2),
            SpatialItem::new("mombasa".into(), LatLng::new(-4.0435, 39.6682), 3),
        ])
    }

    #[test]
    fn test_radius_query() {
        let index = index();
        let center = LatLng::new(-1.2921, 36.8219);

        let mut near: Vec<_> = index
            .query_radius(&center, 5_000.0)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        near.sort();
        assert_eq!(near, vec!["nairobi", "westlands"]);

        assert_eq!(index.query_radius(&center, 1_000_000.0).len(), 3);
        assert!(index.query_radius(&center, f64::NAN).is_empty());
    }

    #[test]
    fn test_bounds_query() {
        let index = index();
        let coast = LatLngBounds::from_coords(-5.0, 39.0, -3.0, 41.0);
        let hits = index.query(&coast);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data, 3);
        assert_eq!(index.len(), 3);

        assert!(SpatialIndex::<u32>::bulk_load(Vec::new()).is_empty());
    }
}
