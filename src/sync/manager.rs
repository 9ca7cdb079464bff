//! Marker lifecycle management
//!
//! [`MarkerLifecycleManager`] keeps the markers on a [`MapSurface`] in step
//! with the latest list of profiles:
//!
//! - refresh requests are debounced; a burst collapses into one apply using
//!   the most recent arguments
//! - every apply tears down the previous markers and animation loops before
//!   placing new ones, so nothing from an older cycle survives
//! - each moving profile gets its own animation loop, cancelled on the next
//!   apply or on [`cleanup`](MarkerLifecycleManager::cleanup)
//!
//! All mutation of the active marker set happens under one lock. Timers and
//! animation frames carry the sequence number they were started with and
//! become no-ops once it is stale, so nothing from a cancelled cycle can
//! reach the surface.

use crate::core::config::MarkerSyncConfig;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::locations::cycle_location;
use crate::core::validate::{clamp_to_bounds, CoordinateValidator, Sanitized};
use crate::geolocation::CenterResolution;
use crate::layers::{animation::OrbitAnimation, marker::ProfileMarker};
use crate::profile::Profile;
use crate::runtime::{self, lock, AsyncHandle};
use crate::surface::{MapSurface, MarkerEvent, MarkerHandle};
use crate::sync::selection::SelectionSlot;
use crate::Result;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    RefreshScheduled,
    Applying,
}

/// Read-only view of one active marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSnapshot {
    pub marker_id: String,
    pub profile_id: String,
    pub position: LatLng,
    pub animated: bool,
}

struct ActiveMarker {
    profile_id: String,
    handle: Arc<dyn MarkerHandle>,
    animated: bool,
}

struct RefreshRequest {
    center: LatLng,
    profiles: Vec<Profile>,
}

struct ManagerState {
    phase: SyncPhase,
    /// Bumped by every schedule and cleanup; a timer only fires if it still matches
    schedule_seq: u64,
    /// Bumped by every teardown; animation frames only write if it still matches
    display_epoch: u64,
    pending_timer: Option<Box<dyn AsyncHandle>>,
    pending_request: Option<RefreshRequest>,
    markers: Vec<ActiveMarker>,
    animations: Vec<Box<dyn AsyncHandle>>,
    /// "You are here" marker; survives refreshes, removed by cleanup
    viewer: Option<Arc<dyn MarkerHandle>>,
    /// Last applied arguments, replayed when visibility changes
    last_request: Option<(LatLng, Vec<Profile>)>,
    show_all: bool,
    applied_refreshes: u64,
    rng: fastrand::Rng,
}

struct Inner {
    surface: Arc<dyn MapSurface>,
    config: MarkerSyncConfig,
    validator: CoordinateValidator,
    selection: SelectionSlot,
    state: Mutex<ManagerState>,
}

/// Synchronizes profile markers on a map surface. Dropping it runs
/// [`cleanup`](Self::cleanup).
pub struct MarkerLifecycleManager {
    inner: Arc<Inner>,
}

impl MarkerLifecycleManager {
    pub fn new(surface: Arc<dyn MapSurface>, config: MarkerSyncConfig) -> Self {
        Self::with_selection(surface, config, SelectionSlot::new())
    }

    /// Shares an existing selection slot with other screens
    pub fn with_selection(
        surface: Arc<dyn MapSurface>,
        config: MarkerSyncConfig,
        selection: SelectionSlot,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let validator = CoordinateValidator::new(config.coordinates.clone());

        Self {
            inner: Arc::new(Inner {
                surface,
                config,
                validator,
                selection,
                state: Mutex::new(ManagerState {
                    phase: SyncPhase::Idle,
                    schedule_seq: 0,
                    display_epoch: 0,
                    pending_timer: None,
                    pending_request: None,
                    markers: Vec::new(),
                    animations: Vec::new(),
                    viewer: None,
                    last_request: None,
                    show_all: true,
                    applied_refreshes: 0,
                    rng,
                }),
            }),
        }
    }

    /// Requests a resync around `center`. Calls within the debounce window
    /// replace each other; only the last one is applied. Needs a Tokio runtime.
    pub fn schedule_refresh(&self, center: LatLng, profiles: Vec<Profile>) {
        let mut state = self.inner.state();
        state.schedule_seq += 1;
        let seq = state.schedule_seq;

        if let Some(timer) = state.pending_timer.take() {
            timer.cancel();
        }
        state.pending_request = Some(RefreshRequest { center, profiles });
        state.phase = SyncPhase::RefreshScheduled;

        let weak = Arc::downgrade(&self.inner);
        let delay = self.inner.config.debounce();
        state.pending_timer = Some(runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_scheduled(seq);
            }
        }));
    }

    /// Applies immediately, superseding any scheduled refresh
    pub fn refresh_now(&self, center: LatLng, profiles: Vec<Profile>) {
        let mut state = self.inner.state();
        self.inner.cancel_pending(&mut state);
        self.inner.apply_refresh(&mut state, center, profiles);
    }

    /// Cancels the pending refresh and every animation loop, and removes every
    /// marker. Safe to call repeatedly.
    pub fn cleanup(&self) {
        self.inner.cleanup();
    }

    /// Shows or hides all profile markers. A refresh still waiting on its
    /// debounce picks up the new setting; otherwise the last one is replayed.
    pub fn set_show_all(&self, show: bool) {
        let replay = {
            let mut state = self.inner.state();
            if state.show_all == show {
                return;
            }
            state.show_all = show;
            if state.pending_request.is_some() {
                None
            } else {
                state.last_request.clone()
            }
        };
        if let Some((center, profiles)) = replay {
            self.schedule_refresh(center, profiles);
        }
    }

    /// Moves the view to a resolved center and shows the viewer's own marker
    /// when their position lies inside the safe bounds.
    pub fn center_view(&self, resolution: &CenterResolution) -> Result<()> {
        let config = &self.inner.config;
        let center = self.inner.validator.clamp(resolution.center);
        self.inner.surface.fly_to(center, resolution.zoom(config))?;

        let mut state = self.inner.state();
        if let Some(previous) = state.viewer.take() {
            previous.remove();
        }
        match resolution.device_position {
            Some(position) if config.coordinates.bounds.contains(&position) => {
                let marker = ProfileMarker::viewer(position, config);
                state.viewer = Some(self.inner.surface.add_marker(&marker)?);
            }
            Some(position) => {
                log::debug!("viewer at {:?} is outside the map region, not shown", position);
            }
            None => {}
        }
        Ok(())
    }

    /// Position of the viewer's own marker, if shown
    pub fn viewer_position(&self) -> Option<LatLng> {
        self.inner.state().viewer.as_ref().map(|handle| handle.position())
    }

    pub fn show_all(&self) -> bool {
        self.inner.state().show_all
    }

    /// Fits the surface view around every active marker. Returns `false`
    /// when nothing is displayed.
    pub fn focus_on_markers(&self, padding: f64) -> Result<bool> {
        let positions: Vec<LatLng> = self
            .inner
            .state()
            .markers
            .iter()
            .map(|marker| marker.handle.position())
            .collect();

        match LatLngBounds::covering(positions.iter()) {
            Some(bounds) => {
                self.inner.surface.fit_bounds(&bounds, padding)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.inner.state().phase
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.inner.state().pending_timer.is_some()
    }

    pub fn active_marker_count(&self) -> usize {
        self.inner.state().markers.len()
    }

    /// Animation loops that have not been cancelled or stopped on their own
    pub fn active_animation_count(&self) -> usize {
        self.inner
            .state()
            .animations
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Number of applies performed so far
    pub fn applied_refreshes(&self) -> u64 {
        self.inner.state().applied_refreshes
    }

    /// Center passed to the last applied refresh, after validation
    pub fn center(&self) -> Option<LatLng> {
        self.inner
            .state()
            .last_request
            .as_ref()
            .map(|(center, _)| *center)
    }

    pub fn markers(&self) -> Vec<MarkerSnapshot> {
        self.inner
            .state()
            .markers
            .iter()
            .map(|marker| MarkerSnapshot {
                marker_id: marker.handle.id().to_string(),
                profile_id: marker.profile_id.clone(),
                position: marker.handle.position(),
                animated: marker.animated,
            })
            .collect()
    }

    pub fn selection(&self) -> &SelectionSlot {
        &self.inner.selection
    }

    pub fn selected(&self) -> Option<Profile> {
        self.inner.selection.selected()
    }

    pub fn clear_selection(&self) {
        self.inner.selection.clear();
    }

    pub fn subscribe_selection(&self) -> tokio::sync::watch::Receiver<Option<Profile>> {
        self.inner.selection.subscribe()
    }

    pub fn config(&self) -> &MarkerSyncConfig {
        &self.inner.config
    }

    pub fn validator(&self) -> &CoordinateValidator {
        &self.inner.validator
    }
}

impl Drop for MarkerLifecycleManager {
    fn drop(&mut self) {
        self.inner.cleanup();
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, ManagerState> {
        lock(&self.state)
    }

    fn fire_scheduled(self: &Arc<Self>, seq: u64) {
        let mut state = self.state();
        if state.schedule_seq != seq || state.phase != SyncPhase::RefreshScheduled {
            return;
        }
        state.pending_timer = None;
        if let Some(request) = state.pending_request.take() {
            self.apply_refresh(&mut state, request.center, request.profiles);
        } else {
            state.phase = SyncPhase::Idle;
        }
    }

    fn cancel_pending(&self, state: &mut ManagerState) {
        state.schedule_seq += 1;
        state.pending_request = None;
        if let Some(timer) = state.pending_timer.take() {
            timer.cancel();
        }
    }

    fn cleanup(&self) {
        let mut state = self.state();
        self.cancel_pending(&mut state);
        let removed = self.teardown(&mut state);
        if let Some(viewer) = state.viewer.take() {
            viewer.remove();
        }
        state.phase = SyncPhase::Idle;
        if removed > 0 {
            log::debug!("cleanup removed {} markers", removed);
        }
    }

    /// Cancels animation loops and removes every active marker
    fn teardown(&self, state: &mut ManagerState) -> usize {
        state.display_epoch += 1;
        for animation in state.animations.drain(..) {
            animation.cancel();
        }
        let removed = state.markers.len();
        for marker in state.markers.drain(..) {
            marker.handle.remove();
        }
        removed
    }

    fn apply_refresh(
        self: &Arc<Self>,
        state: &mut ManagerState,
        center: LatLng,
        mut profiles: Vec<Profile>,
    ) {
        state.phase = SyncPhase::Applying;
        state.applied_refreshes += 1;
        self.teardown(state);

        let center = self.validator.clamp(center);
        let cap = self.config.max_markers;
        if profiles.len() > cap {
            log::debug!("capping {} profiles to {}", profiles.len(), cap);
            profiles.truncate(cap);
        }
        state.last_request = Some((center, profiles.clone()));

        if !state.show_all {
            state.phase = SyncPhase::Idle;
            log::info!("markers hidden, {} profiles not displayed", profiles.len());
            return;
        }

        let epoch = state.display_epoch;
        let mut failures = 0usize;
        for (index, profile) in profiles.iter().enumerate() {
            let position = self.resolve_position(state, index, profile);
            match self.place_marker(state, profile, position, epoch) {
                Ok(marker) => state.markers.push(marker),
                Err(err) => {
                    failures += 1;
                    log::warn!("skipping marker for profile {}: {}", profile.id, err);
                }
            }
        }

        state.phase = SyncPhase::Idle;
        log::info!(
            "placed {} markers around ({:.4}, {:.4}), {} skipped",
            state.markers.len(),
            center.lat,
            center.lng,
            failures
        );
    }

    /// The profile's own coordinates when usable, otherwise a jittered
    /// reference location picked by list position
    fn resolve_position(
        &self,
        state: &mut ManagerState,
        index: usize,
        profile: &Profile,
    ) -> LatLng {
        if profile.coordinates.is_some() {
            let (position, outcome) = self.validator.inspect(profile.raw_coordinates());
            if outcome != Sanitized::Fallback {
                return position;
            }
        }

        let anchor = cycle_location(index);
        let jitter = self.config.jitter_degrees;
        let d_lng = (state.rng.f64() - 0.5) * jitter;
        let d_lat = (state.rng.f64() - 0.5) * jitter;
        log::debug!("profile {} placed near {}", profile.id, anchor.name);
        self.validator.clamp(anchor.position().offset(d_lat, d_lng))
    }

    fn place_marker(
        self: &Arc<Self>,
        state: &mut ManagerState,
        profile: &Profile,
        position: LatLng,
        epoch: u64,
    ) -> Result<ActiveMarker> {
        let animated = profile.is_moving;
        // Keep the whole orbit inside the bounds so no frame gets clamped flat
        let position = if animated {
            let radius = self.config.orbit_radius_degrees;
            clamp_to_bounds(position, &self.config.coordinates.bounds.shrink(radius))
        } else {
            position
        };

        let marker = ProfileMarker::for_profile(profile, position, &self.config);
        let handle = self.surface.add_marker(&marker)?;

        let selection = self.selection.clone();
        let selected = profile.clone();
        handle.on_event(Arc::new(move |marker: &dyn MarkerHandle, event: MarkerEvent| match event {
            MarkerEvent::Click => selection.select(selected.clone()),
            MarkerEvent::HoverStart => marker.set_highlighted(true),
            MarkerEvent::HoverEnd => marker.set_highlighted(false),
        }));

        if animated {
            let phase = state.rng.f64() * TAU;
            let orbit = OrbitAnimation::from_config(position, &self.config, phase);
            let frame = self.config.frame_interval();
            let weak = Arc::downgrade(self);
            let task_handle = handle.clone();
            state
                .animations
                .push(runtime::spawn(animate(weak, task_handle, orbit, epoch, frame)));
        }

        Ok(ActiveMarker {
            profile_id: profile.id.clone(),
            handle,
            animated,
        })
    }

    /// Moves one animated marker; `false` ends its loop
    fn advance_marker(
        &self,
        handle: &dyn MarkerHandle,
        orbit: &OrbitAnimation,
        elapsed: Duration,
        epoch: u64,
    ) -> bool {
        let state = self.state();
        if state.display_epoch != epoch || handle.is_removed() {
            return false;
        }
        let position = self.validator.clamp(orbit.position_at(elapsed));
        match handle.set_position(position) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("stopping animation for {}: {}", handle.profile_id(), err);
                false
            }
        }
    }
}

async fn animate(
    inner: Weak<Inner>,
    handle: Arc<dyn MarkerHandle>,
    orbit: OrbitAnimation,
    epoch: u64,
    frame: Duration,
) {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.advance_marker(handle.as_ref(), &orbit, started.elapsed(), epoch) {
            break;
        }
    }
}
