//! In-memory map surface
//!
//! Records every marker, position write and view change without drawing
//! anything. Used by the demo app and by tests, which can also simulate
//! pointer input and make marker construction fail for chosen profiles.

use super::{MapSurface, MarkerCallback, MarkerEvent, MarkerHandle};
use crate::core::geo::{LatLng, LatLngBounds};
use crate::layers::marker::ProfileMarker;
use crate::runtime::lock;
use crate::{MapError, Result};
use fxhash::FxHashSet as HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Last camera change requested through the surface
#[derive(Debug, Clone, PartialEq)]
pub enum ViewChange {
    FitBounds { bounds: LatLngBounds, padding: f64 },
    FlyTo { center: LatLng, zoom: f64 },
}

#[derive(Default)]
struct SurfaceState {
    /// Attached markers in creation order
    markers: Vec<Arc<HeadlessMarker>>,
    failing_profiles: HashSet<String>,
    view: Option<ViewChange>,
    next_id: u64,
}

#[derive(Default, Clone)]
pub struct HeadlessSurface {
    state: Arc<Mutex<SurfaceState>>,
    position_writes: Arc<AtomicU64>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `add_marker` fail for this profile id
    pub fn fail_profile(&self, profile_id: impl Into<String>) {
        lock(&self.state).failing_profiles.insert(profile_id.into());
    }

    pub fn marker_count(&self) -> usize {
        lock(&self.state).markers.len()
    }

    pub fn markers(&self) -> Vec<Arc<HeadlessMarker>> {
        lock(&self.state).markers.clone()
    }

    pub fn marker_for(&self, profile_id: &str) -> Option<Arc<HeadlessMarker>> {
        lock(&self.state)
            .markers
            .iter()
            .find(|marker| marker.profile_id == profile_id)
            .cloned()
    }

    pub fn last_view(&self) -> Option<ViewChange> {
        lock(&self.state).view.clone()
    }

    /// Total `set_position` calls accepted across all markers
    pub fn position_writes(&self) -> u64 {
        self.position_writes.load(Ordering::SeqCst)
    }

    /// Simulates a click on the marker showing `profile_id`
    pub fn click(&self, profile_id: &str) -> bool {
        self.emit(profile_id, MarkerEvent::Click)
    }

    pub fn hover(&self, profile_id: &str, entered: bool) -> bool {
        let event = if entered {
            MarkerEvent::HoverStart
        } else {
            MarkerEvent::HoverEnd
        };
        self.emit(profile_id, event)
    }

    fn emit(&self, profile_id: &str, event: MarkerEvent) -> bool {
        match self.marker_for(profile_id) {
            Some(marker) => {
                marker.dispatch(event);
                true
            }
            None => false,
        }
    }
}

impl MapSurface for HeadlessSurface {
    fn add_marker(&self, marker: &ProfileMarker) -> Result<Arc<dyn MarkerHandle>> {
        if !marker.position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot place marker for {} at {:?}",
                marker.profile_id, marker.position
            )));
        }

        let mut state = lock(&self.state);
        if state.failing_profiles.contains(&marker.profile_id) {
            return Err(MapError::Surface(format!(
                "marker element for {} could not be created",
                marker.profile_id
            )));
        }

        state.next_id += 1;
        let handle = Arc::new(HeadlessMarker {
            id: format!("marker-{}", state.next_id),
            profile_id: marker.profile_id.clone(),
            label: marker.label.clone(),
            border_color: marker.border_color.clone(),
            inner: Mutex::new(MarkerState {
                position: marker.position,
                highlighted: false,
                removed: false,
            }),
            callbacks: Mutex::new(Vec::new()),
            surface: Arc::downgrade(&self.state),
            position_writes: self.position_writes.clone(),
        });
        state.markers.push(handle.clone());
        Ok(handle)
    }

    fn fit_bounds(&self, bounds: &LatLngBounds, padding: f64) -> Result<()> {
        if !bounds.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot fit view to {:?}",
                bounds
            )));
        }
        lock(&self.state).view = Some(ViewChange::FitBounds {
            bounds: bounds.clone(),
            padding,
        });
        Ok(())
    }

    fn fly_to(&self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot fly to {:?}",
                center
            )));
        }
        lock(&self.state).view = Some(ViewChange::FlyTo { center, zoom });
        Ok(())
    }
}

struct MarkerState {
    position: LatLng,
    highlighted: bool,
    removed: bool,
}

pub struct HeadlessMarker {
    id: String,
    profile_id: String,
    label: String,
    border_color: String,
    inner: Mutex<MarkerState>,
    callbacks: Mutex<Vec<MarkerCallback>>,
    surface: Weak<Mutex<SurfaceState>>,
    position_writes: Arc<AtomicU64>,
}

impl HeadlessMarker {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn border_color(&self) -> &str {
        &self.border_color
    }

    pub fn is_highlighted(&self) -> bool {
        lock(&self.inner).highlighted
    }

    fn dispatch(&self, event: MarkerEvent) {
        if self.is_removed() {
            return;
        }
        // Callbacks may call back into this marker
        let callbacks = lock(&self.callbacks).clone();
        for callback in callbacks {
            callback(self, event);
        }
    }
}

impl std::fmt::Debug for HeadlessMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessMarker")
            .field("id", &self.id)
            .field("profile_id", &self.profile_id)
            .field("position", &self.position())
            .finish()
    }
}

impl MarkerHandle for HeadlessMarker {
    fn id(&self) -> &str {
        &self.id
    }

    fn profile_id(&self) -> &str {
        &self.profile_id
    }

    fn position(&self) -> LatLng {
        lock(&self.inner).position
    }

    fn set_position(&self, position: LatLng) -> Result<()> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!("{:?}", position)));
        }
        let mut inner = lock(&self.inner);
        if inner.removed {
            return Err(MapError::Surface(format!("{} was removed", self.id)));
        }
        inner.position = position;
        self.position_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_highlighted(&self, highlighted: bool) {
        lock(&self.inner).highlighted = highlighted;
    }

    fn on_event(&self, callback: MarkerCallback) {
        lock(&self.callbacks).push(callback);
    }

    fn remove(&self) {
        {
            let mut inner = lock(&self.inner);
            if inner.removed {
                return;
            }
            inner.removed = true;
        }
        lock(&self.callbacks).clear();
        if let Some(surface) = self.surface.upgrade() {
            lock(&surface).markers.retain(|marker| marker.id != self.id);
        }
    }

    fn is_removed(&self) -> bool {
        lock(&self.inner).removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MarkerSyncConfig;
    use crate::profile::Profile;
    use std::sync::atomic::AtomicUsize;

    fn marker(id: &str) -> ProfileMarker {
        ProfileMarker::for_profile(
            &Profile::new(id, id),
            LatLng::new(-1.29, 36.82),
            &MarkerSyncConfig::default(),
        )
    }

    #[test]
    fn test_add_move_remove() {
        let surface = HeadlessSurface::new();
        let handle = surface.add_marker(&marker("a")).unwrap();
        assert_eq!(surface.marker_count(), 1);
        assert_eq!(handle.profile_id(), "a");

        handle.set_position(LatLng::new(-1.3, 36.83)).unwrap();
        assert_eq!(surface.marker_for("a").unwrap().position(), LatLng::new(-1.3, 36.83));
        assert_eq!(surface.position_writes(), 1);

        handle.remove();
        handle.remove();
        assert_eq!(surface.marker_count(), 0);
        assert!(handle.is_removed());
        assert!(handle.set_position(LatLng::new(-1.3, 36.83)).is_err());
    }

    #[test]
    fn test_rejects_invalid_geometry_and_injected_failures() {
        let surface = HeadlessSurface::new();
        let mut bad = marker("nan");
        bad.position = LatLng::new(f64::NAN, 36.0);
        assert!(matches!(
            surface.add_marker(&bad),
            Err(MapError::InvalidCoordinates(_))
        ));

        surface.fail_profile("b");
        assert!(matches!(surface.add_marker(&marker("b")), Err(MapError::Surface(_))));
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_events_reach_callbacks() {
        let surface = HeadlessSurface::new();
        let handle = surface.add_marker(&marker("a")).unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        handle.on_event(Arc::new(move |marker: &dyn MarkerHandle, event: MarkerEvent| match event {
            MarkerEvent::Click => {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            MarkerEvent::HoverStart => marker.set_highlighted(true),
            MarkerEvent::HoverEnd => marker.set_highlighted(false),
        }));

        assert!(surface.click("a"));
        assert!(surface.hover("a", true));
        assert!(surface.marker_for("a").unwrap().is_highlighted());
        assert!(surface.hover("a", false));
        assert!(!surface.marker_for("a").unwrap().is_highlighted());
        assert!(!surface.click("missing"));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_view_changes() {
        let surface = HeadlessSurface::new();
        surface.fly_to(LatLng::new(-1.29, 36.82), 12.0).unwrap();
        assert_eq!(
            surface.last_view(),
            Some(ViewChange::FlyTo {
                center: LatLng::new(-1.29, 36.82),
                zoom: 12.0
            })
        );
        let bounds = LatLngBounds::from_coords(-2.0, 36.0, -1.0, 37.0);
        surface.fit_bounds(&bounds, 100.0).unwrap();
        assert!(matches!(surface.last_view(), Some(ViewChange::FitBounds { .. })));
        assert!(surface
            .fit_bounds(&LatLngBounds::from_coords(1.0, 0.0, -1.0, 0.0), 0.0)
            .is_err());
    }
}
