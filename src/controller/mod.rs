//! Boundary layer controller: lookup table, tracked highlight, and the
//! hover / click / programmatic-search state machine.

mod search;
mod tooltip;

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::feature::{BoundaryCollection, BoundaryFeature, PlantFeature};
use crate::geom::is_valid_bounds;
use crate::host::{MapHost, PathStyle, ScreenPos};
use crate::index::{LinearIndex, PointIndex};

pub use search::{extract_search_key, PendingSearch, RetryPolicy, SearchError, SearchStatus};
use tooltip::Tooltip;

/// Identifies one boundary layer of one attached collection.
///
/// Keys from a replaced collection carry an old generation and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey {
    generation: u64,
    index: usize,
}

impl LayerKey {
    /// Position of the feature in its collection.
    #[inline] pub fn index(&self) -> usize { self.index }
}

/// Outbound events for the presentation layer.
#[derive(Debug, Clone)]
pub enum MapEvent {
    BoundaryClick { boundary: Arc<BoundaryFeature>, points: Vec<Arc<PlantFeature>> },
    BoundaryHover { boundary: Option<Arc<BoundaryFeature>>, points: Vec<Arc<PlantFeature>> },
    SearchFailed { code: String, attempts: u32 },
    SelectionCleared,
}

/// Styling and view parameters used by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub default_style: PathStyle,
    pub highlight_style: PathStyle,
    pub fit_padding: u32,
    pub fallback_zoom: u8,
    pub tooltip_offset: f64,
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        Self {
            default_style: config.default_style.clone(),
            highlight_style: config.highlight_style.clone(),
            fit_padding: config.fit_padding,
            fallback_zoom: config.fallback_zoom,
            tooltip_offset: config.tooltip_offset,
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self { Self::from(&Config::default()) }
}

/// Result of one programmatic highlight attempt.
#[derive(Debug)]
pub enum SearchAttempt {
    Found(MapEvent),
    /// Layer not attached or lookup table empty.
    NotReady,
    /// Table ready but the code is absent.
    Missing,
}

/// The boundary layer currently on the map.
#[derive(Debug)]
struct AttachedLayer<L> {
    generation: u64,
    source: Arc<BoundaryCollection>,
    handles: Vec<Option<L>>,
    lookup: AHashMap<Arc<str>, usize>,
}

/// The tracked (click / search) highlight. Resolved through the lookup table
/// at the moment of use; codeless boundaries fall back to their slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Highlight {
    code: Option<Arc<str>>,
    slot: usize,
}

pub struct BoundaryLayerController<L> {
    options: ControllerOptions,
    layer: Option<AttachedLayer<L>>,
    generation: u64,
    highlight: Option<Highlight>,
    index: Box<dyn PointIndex>,
    tooltip: Tooltip,
}

impl<L: Copy + Eq + std::fmt::Debug> BoundaryLayerController<L> {
    pub fn new(options: ControllerOptions) -> Self {
        let tooltip = Tooltip::new(options.tooltip_offset);
        Self {
            options,
            layer: None,
            generation: 0,
            highlight: None,
            index: Box::new(LinearIndex::default()),
            tooltip,
        }
    }

    /// True once a layer is attached and its lookup table is non-empty.
    pub fn is_ready(&self) -> bool {
        self.layer.as_ref().is_some_and(|l| !l.lookup.is_empty())
    }

    /// Number of codes in the lookup table.
    pub fn lookup_len(&self) -> usize {
        self.layer.as_ref().map_or(0, |l| l.lookup.len())
    }

    /// The collection the current layer was built from.
    pub fn source(&self) -> Option<&Arc<BoundaryCollection>> {
        self.layer.as_ref().map(|l| &l.source)
    }

    /// Code of the tracked highlight, if any.
    pub fn highlighted_code(&self) -> Option<&str> {
        self.highlight.as_ref().and_then(|h| h.code.as_deref())
    }

    #[inline] pub fn is_tracking_pointer(&self) -> bool { self.tooltip.is_tracking() }

    /// Key of the layer drawn for a boundary code.
    pub fn key_for(&self, code: &str) -> Option<LayerKey> {
        let layer = self.layer.as_ref()?;
        let index = *layer.lookup.get(code)?;
        Some(LayerKey { generation: layer.generation, index })
    }

    /// Key of the layer at a collection position.
    pub fn key_at(&self, index: usize) -> Option<LayerKey> {
        let layer = self.layer.as_ref()?;
        layer.handles.get(index)?.as_ref()?;
        Some(LayerKey { generation: layer.generation, index })
    }

    /// Replace the spatial index used for contained-point queries.
    pub fn set_points(&mut self, index: Box<dyn PointIndex>) {
        self.index = index;
    }

    pub fn points_within(&self, boundary: &BoundaryFeature) -> Vec<Arc<PlantFeature>> {
        self.index.points_within(boundary)
    }

    /// Create the owned tooltip resource.
    pub fn mount<H: MapHost<Layer = L>>(&mut self, host: &mut H) {
        self.tooltip.create(host);
    }

    /// Release the tooltip and its subscription and forget the layer.
    pub fn teardown<H: MapHost<Layer = L>>(&mut self, host: &mut H) {
        self.detach(host);
        self.tooltip.release(host);
    }

    /// Build the boundary layer and lookup table from `collection`.
    ///
    /// A collection that is the same allocation as the attached one is a no-op
    /// and returns false. Otherwise the old layer is removed and the highlight
    /// reset.
    pub fn attach<H: MapHost<Layer = L>>(&mut self, host: &mut H, collection: Arc<BoundaryCollection>) -> bool {
        if self.layer.as_ref().is_some_and(|l| Arc::ptr_eq(&l.source, &collection)) {
            return false;
        }
        if self.layer.is_some() {
            self.detach(host);
            info!("removed existing ZCTA layer for new boundary data");
        }

        self.generation += 1;
        let mut handles: Vec<Option<L>> = vec![None; collection.len()];
        let mut lookup: AHashMap<Arc<str>, usize> = AHashMap::with_capacity(collection.len());

        let features = collection.features();
        host.add_boundary_layer(features, &self.options.default_style, &mut |idx, handle| {
            let Some(slot) = handles.get_mut(idx) else { return };
            *slot = Some(handle);
            if let Some(code) = features[idx].code_arc() {
                lookup.insert(code.clone(), idx);
            }
        });

        info!("ZCTA layer attached: {} features, {} codes", collection.len(), lookup.len());
        self.layer = Some(AttachedLayer { generation: self.generation, source: collection, handles, lookup });
        self.highlight = None;
        true
    }

    /// Remove the boundary layer and clear the lookup table.
    pub fn detach<H: MapHost<Layer = L>>(&mut self, host: &mut H) {
        if self.layer.take().is_some() {
            host.remove_boundary_layer();
        }
        self.highlight = None;
        self.tooltip.hide(host);
    }

    /// Pointer entered a boundary.
    pub fn hover_enter<H: MapHost<Layer = L>>(&mut self, host: &mut H, key: LayerKey, pointer: ScreenPos) -> Option<MapEvent> {
        let Some((feature, handle)) = self.resolve_key(key) else {
            debug!("ignoring hover on stale layer {key:?}");
            return None;
        };
        if self.tracked_handle() == Some(handle) {
            return None;
        }

        host.set_style(handle, &self.options.highlight_style);
        host.bring_to_front(handle);
        self.tooltip.show(host, &format!("ZIP: {}", feature.display_code()), pointer);

        let points = self.index.points_within(&feature);
        Some(MapEvent::BoundaryHover { boundary: Some(feature), points })
    }

    /// Pointer left a boundary.
    pub fn hover_exit<H: MapHost<Layer = L>>(&mut self, host: &mut H, key: LayerKey) -> Option<MapEvent> {
        if let Some((_, handle)) = self.resolve_key(key) {
            if self.tracked_handle() != Some(handle) {
                host.set_style(handle, &self.options.default_style);
            }
        }
        self.tooltip.hide(host);
        Some(MapEvent::BoundaryHover { boundary: None, points: Vec::new() })
    }

    /// Pointer moved while a boundary is hovered.
    pub fn pointer_move<H: MapHost<Layer = L>>(&mut self, host: &mut H, at: ScreenPos) {
        self.tooltip.follow(host, at);
    }

    /// Boundary clicked: it becomes the tracked highlight.
    pub fn click<H: MapHost<Layer = L>>(&mut self, host: &mut H, key: LayerKey) -> Option<MapEvent> {
        let Some((feature, handle)) = self.resolve_key(key) else {
            debug!("ignoring click on stale layer {key:?}");
            return None;
        };

        if let Some(previous) = self.tracked_handle() {
            if previous != handle {
                host.set_style(previous, &self.options.default_style);
            }
            debug!("click cleared previous highlight");
        }
        self.highlight = None;

        self.set_highlight(host, key.index, &feature, handle);

        let points = self.index.points_within(&feature);
        Some(MapEvent::BoundaryClick { boundary: feature, points })
    }

    /// One programmatic highlight attempt for `code`.
    ///
    /// On success the previous highlight is cleared, the view fit to the
    /// boundary and a click event produced. On failure nothing changes.
    pub fn try_highlight<H: MapHost<Layer = L>>(&mut self, host: &mut H, code: &str) -> SearchAttempt {
        let Some(layer) = self.layer.as_ref().filter(|l| !l.lookup.is_empty()) else {
            return SearchAttempt::NotReady;
        };
        let Some(&slot) = layer.lookup.get(code) else {
            return SearchAttempt::Missing;
        };
        let Some(handle) = layer.handles[slot] else {
            return SearchAttempt::Missing;
        };
        let feature = layer.source.features()[slot].clone();

        self.clear_highlight(host);
        self.set_highlight(host, slot, &feature, handle);
        self.fit_view(host, handle, code);

        let points = self.index.points_within(&feature);
        SearchAttempt::Found(MapEvent::BoundaryClick { boundary: feature, points })
    }

    /// Restyle the tracked highlight to default and forget it.
    pub fn clear_highlight<H: MapHost<Layer = L>>(&mut self, host: &mut H) {
        if let Some(previous) = self.tracked_handle() {
            host.set_style(previous, &self.options.default_style);
        } else if let Some(highlight) = &self.highlight {
            warn!("previous highlight {:?} not found in current layer", highlight.code);
        }
        self.highlight = None;
    }

    fn set_highlight<H: MapHost<Layer = L>>(&mut self, host: &mut H, slot: usize, feature: &BoundaryFeature, handle: L) {
        host.set_style(handle, &self.options.highlight_style);
        host.bring_to_front(handle);
        self.highlight = Some(Highlight { code: feature.code_arc().cloned(), slot });
    }

    fn fit_view<H: MapHost<Layer = L>>(&self, host: &mut H, handle: L, code: &str) {
        match host.layer_bounds(handle) {
            Some(bounds) if is_valid_bounds(&bounds) => {
                host.fit_bounds(bounds, self.options.fit_padding);
                debug!("fit map to bounds of ZCTA {code}");
            }
            Some(_) => {
                warn!("invalid bounds for ZCTA {code}; falling back to its center");
                match host.layer_center(handle) {
                    Some(center) => host.set_view(center, self.options.fallback_zoom),
                    None => host.set_zoom(self.options.fallback_zoom),
                }
            }
            None => {
                warn!("layer for ZCTA {code} exposes no bounds");
                host.set_zoom(self.options.fallback_zoom);
            }
        }
    }

    /// Live handle of the tracked highlight, re-resolved by code.
    fn tracked_handle(&self) -> Option<L> {
        let highlight = self.highlight.as_ref()?;
        let layer = self.layer.as_ref()?;
        let slot = match &highlight.code {
            Some(code) => *layer.lookup.get(code)?,
            None => highlight.slot,
        };
        *layer.handles.get(slot)?
    }

    fn resolve_key(&self, key: LayerKey) -> Option<(Arc<BoundaryFeature>, L)> {
        let layer = self.layer.as_ref().filter(|l| l.generation == key.generation)?;
        let handle = (*layer.handles.get(key.index)?)?;
        Some((layer.source.features()[key.index].clone(), handle))
    }
}
