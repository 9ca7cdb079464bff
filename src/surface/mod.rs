//! Map surface boundary
//!
//! The marker manager never talks to a concrete mapping SDK. It places and
//! moves markers through [`MapSurface`] and [`MarkerHandle`], so any widget
//! that can draw a positioned element and report clicks can host it.

pub mod headless;

use crate::core::geo::{LatLng, LatLngBounds};
use crate::layers::marker::ProfileMarker;
use crate::Result;
use std::sync::Arc;

pub use headless::{HeadlessMarker, HeadlessSurface, ViewChange};

/// Pointer interactions a surface reports for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEvent {
    Click,
    HoverStart,
    HoverEnd,
}

pub type MarkerCallback = Arc<dyn Fn(&dyn MarkerHandle, MarkerEvent) + Send + Sync>;

/// Opaque handle to one marker placed on a surface
pub trait MarkerHandle: Send + Sync {
    /// Surface-assigned identifier
    fn id(&self) -> &str;

    fn profile_id(&self) -> &str;

    fn position(&self) -> LatLng;

    fn set_position(&self, position: LatLng) -> Result<()>;

    /// Hover emphasis (scale up, stronger shadow)
    fn set_highlighted(&self, highlighted: bool);

    fn on_event(&self, callback: MarkerCallback);

    /// Detaches the marker from the surface. Idempotent.
    fn remove(&self);

    fn is_removed(&self) -> bool;
}

/// Capabilities the marker manager needs from a map widget
pub trait MapSurface: Send + Sync {
    fn add_marker(&self, marker: &ProfileMarker) -> Result<Arc<dyn MarkerHandle>>;

    fn fit_bounds(&self, bounds: &LatLngBounds, padding: f64) -> Result<()>;

    fn fly_to(&self, center: LatLng, zoom: f64) -> Result<()>;
}
