use std::{collections::VecDeque, sync::Arc, time::Instant};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::controller::{
    extract_search_key, BoundaryLayerController, ControllerOptions, LayerKey, MapEvent,
    PendingSearch, SearchAttempt, SearchError, SearchStatus,
};
use crate::feature::{BoundaryCollection, PointCollection};
use crate::host::{MapHost, ScreenPos};
use crate::index::build_index;
use crate::marker::marker_for;

/// Owns the host map for its mounted lifetime and wires data, markers and
/// the boundary controller to it.
pub struct MapSurface<H: MapHost> {
    config: Config,
    host: Option<H>,
    controller: BoundaryLayerController<H::Layer>,
    boundaries: Option<Arc<BoundaryCollection>>,
    points: Option<Arc<PointCollection>>,
    pending: Option<PendingSearch>,
    selection_active: bool,
    events: VecDeque<MapEvent>,
}

impl<H: MapHost> MapSurface<H> {
    pub fn new(config: Config) -> Self {
        let controller = BoundaryLayerController::new(ControllerOptions::from(&config));
        Self {
            config,
            host: None,
            controller,
            boundaries: None,
            points: None,
            pending: None,
            selection_active: false,
            events: VecDeque::new(),
        }
    }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    #[inline] pub fn is_mounted(&self) -> bool { self.host.is_some() }

    #[inline] pub fn host(&self) -> Option<&H> { self.host.as_ref() }

    #[inline] pub fn host_mut(&mut self) -> Option<&mut H> { self.host.as_mut() }

    #[inline] pub fn controller(&self) -> &BoundaryLayerController<H::Layer> { &self.controller }

    #[inline] pub fn boundaries(&self) -> Option<&Arc<BoundaryCollection>> { self.boundaries.as_ref() }

    #[inline] pub fn points(&self) -> Option<&Arc<PointCollection>> { self.points.as_ref() }

    #[inline] pub fn pending_search(&self) -> Option<&PendingSearch> { self.pending.as_ref() }

    /// When the pending search (if any) wants to run next.
    #[inline] pub fn next_retry_at(&self) -> Option<Instant> { self.pending.as_ref().map(|p| p.due) }

    /// Create the basemap and the tooltip element.
    pub fn mount(&mut self, mut host: H) {
        if self.host.is_some() {
            warn!("map surface already mounted; ignoring second mount");
            return;
        }
        host.init_basemap(self.config.initial_center(), self.config.initial_zoom, &self.config.tiles);
        self.controller.mount(&mut host);
        self.host = Some(host);
        info!("map created at {:?}, zoom {}", self.config.initial_center, self.config.initial_zoom);
    }

    /// Tear down the map and drop everything tied to it. Returns the host.
    pub fn unmount(&mut self) -> Option<H> {
        let mut host = self.host.take()?;
        self.controller.teardown(&mut host);
        host.destroy();

        self.boundaries = None;
        self.points = None;
        self.pending = None;
        self.selection_active = false;
        self.events.clear();
        info!("map removed");
        Some(host)
    }

    /// Completion of the boundary fetch. Failures leave the layer absent.
    pub fn on_boundaries_loaded(&mut self, result: Result<BoundaryCollection>) {
        if !self.is_mounted() {
            debug!("boundary data arrived after unmount; dropped");
            return;
        }
        match result {
            Ok(collection) => self.attach_boundaries(Arc::new(collection)),
            Err(e) => error!("Error loading ZCTA GeoJSON: {e:#}"),
        }
    }

    /// Completion of the plant fetch. Failures leave the layer absent.
    pub fn on_points_loaded(&mut self, result: Result<PointCollection>) {
        if !self.is_mounted() {
            debug!("plant data arrived after unmount; dropped");
            return;
        }
        match result {
            Ok(collection) => self.attach_points(Arc::new(collection)),
            Err(e) => error!("Error loading Plants GeoJSON: {e:#}"),
        }
    }

    /// Attach (or re-attach) the boundary layer. The same `Arc` twice is a no-op.
    ///
    /// A rebuild drops the tracked highlight, so an active selection is
    /// cleared with it and hover resumes.
    pub fn attach_boundaries(&mut self, collection: Arc<BoundaryCollection>) {
        let Some(host) = self.host.as_mut() else {
            warn!("cannot attach boundaries: map not mounted");
            return;
        };
        if self.controller.attach(host, collection.clone()) {
            self.boundaries = Some(collection);
            self.end_selection();
        }
    }

    /// Remove the boundary layer, e.g. when its data goes away.
    pub fn detach_boundaries(&mut self) {
        if let Some(host) = self.host.as_mut() {
            self.controller.detach(host);
        }
        if self.boundaries.take().is_some() {
            info!("ZCTA data removed; layer detached");
        }
        self.end_selection();
    }

    /// Render plant markers and rebuild the point index.
    pub fn attach_points(&mut self, points: Arc<PointCollection>) {
        let Some(host) = self.host.as_mut() else {
            warn!("cannot attach plants: map not mounted");
            return;
        };

        let markers = points.iter()
            .filter_map(|plant| plant.point().map(|p| (p, marker_for(plant))))
            .collect::<Vec<_>>();
        host.remove_point_layer();
        host.add_point_layer(markers);

        self.controller.set_points(build_index(self.config.index, &points));
        info!("energy plant layer added ({} plants)", points.len());
        self.points = Some(points);
    }

    /// Key of the layer drawn for a boundary code.
    pub fn key_for(&self, code: &str) -> Option<LayerKey> {
        self.controller.key_for(code)
    }

    pub fn hover_enter(&mut self, key: LayerKey, pointer: ScreenPos) {
        let Some(host) = self.host.as_mut() else { return };
        if let Some(event) = self.controller.hover_enter(host, key, pointer) {
            self.emit(event);
        }
    }

    pub fn hover_exit(&mut self, key: LayerKey) {
        let Some(host) = self.host.as_mut() else { return };
        if let Some(event) = self.controller.hover_exit(host, key) {
            self.emit(event);
        }
    }

    pub fn pointer_move(&mut self, at: ScreenPos) {
        if let Some(host) = self.host.as_mut() {
            self.controller.pointer_move(host, at);
        }
    }

    pub fn click(&mut self, key: LayerKey) {
        let Some(host) = self.host.as_mut() else { return };
        if let Some(event) = self.controller.click(host, key) {
            self.emit(event);
        }
    }

    /// Highlight the boundary matching a free-text query.
    ///
    /// Runs the first attempt immediately. If the layer is not ready or the
    /// code is absent, a retry is scheduled; see [`MapSurface::poll`]. A new
    /// search supersedes a pending one.
    pub fn highlight(&mut self, query: &str, now: Instant) -> SearchStatus {
        let Some(code) = extract_search_key(query) else {
            return SearchStatus::Failed(SearchError::EmptyQuery);
        };
        if let Some(previous) = self.pending.take() {
            debug!("search for {} superseded by {code}", previous.code);
        }
        self.attempt(PendingSearch { code, attempt: 1, due: now }, now)
    }

    /// Run the pending search if its retry is due.
    pub fn poll(&mut self, now: Instant) -> Option<SearchStatus> {
        if self.pending.as_ref().is_none_or(|p| p.due > now) {
            return None;
        }
        let search = self.pending.take()?;
        Some(self.attempt(search, now))
    }

    /// Drop the tracked highlight and any pending search.
    pub fn clear_highlight(&mut self) {
        self.pending = None;
        if let Some(host) = self.host.as_mut() {
            self.controller.clear_highlight(host);
        }
        self.emit(MapEvent::SelectionCleared);
    }

    /// Hand queued events to the presentation layer.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }

    fn attempt(&mut self, mut search: PendingSearch, now: Instant) -> SearchStatus {
        let outcome = match self.host.as_mut() {
            Some(host) => self.controller.try_highlight(host, &search.code),
            None => SearchAttempt::NotReady,
        };

        let reason = match outcome {
            SearchAttempt::Found(event) => {
                info!("attempt {}: highlighted ZCTA {}", search.attempt, search.code);
                self.emit(event);
                return SearchStatus::Highlighted { code: search.code, attempts: search.attempt };
            }
            SearchAttempt::NotReady => "map, ZCTA layer or lookup table not ready",
            SearchAttempt::Missing => "layer not found",
        };

        let policy = self.config.retry;
        if search.attempt >= policy.max_attempts {
            error!("max retries reached for ZCTA {}: {reason}", search.code);
            self.emit(MapEvent::SearchFailed { code: search.code.clone(), attempts: search.attempt });
            return SearchStatus::Failed(SearchError::NotFound { code: search.code, attempts: search.attempt });
        }

        let retry_at = now + policy.delay_after(search.attempt);
        warn!("attempt {}: ZCTA {}: {reason}; retrying", search.attempt, search.code);
        search.attempt += 1;
        search.due = retry_at;

        let status = SearchStatus::Pending { code: search.code.clone(), next_attempt: search.attempt, retry_at };
        self.pending = Some(search);
        status
    }

    fn end_selection(&mut self) {
        if self.selection_active {
            debug!("boundary layer replaced; selection cleared");
            self.emit(MapEvent::SelectionCleared);
        }
    }

    fn emit(&mut self, event: MapEvent) {
        match &event {
            MapEvent::BoundaryHover { .. } if self.selection_active => {
                return;
            }
            MapEvent::BoundaryClick { .. } => self.selection_active = true,
            MapEvent::SelectionCleared => self.selection_active = false,
            _ => {}
        }
        self.events.push_back(event);
    }
}
