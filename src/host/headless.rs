use std::{collections::BTreeSet, sync::Arc};

use geo::{Coord, Point, Rect};
use tracing::trace;

use crate::feature::BoundaryFeature;
use crate::geom::{geometry_bounds, geometry_center};
use crate::marker::MarkerDescriptor;

use super::{ListenerId, MapHost, PathStyle, ScreenPos, TileLayer};

/// Layer handle of the headless map. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(usize);

#[derive(Debug, Clone)]
struct Layer {
    code: Option<Arc<str>>,
    style: PathStyle,
    bounds: Option<Rect<f64>>,
    center: Option<Coord<f64>>,
    z: u64,
    attached: bool,
}

/// Current camera of the headless map.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    pub center: Coord<f64>,
    pub zoom: u8,
    /// Bounds and padding of the last `fit_bounds` call.
    pub fitted: Option<(Rect<f64>, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub text: String,
    pub at: ScreenPos,
    pub visible: bool,
}

/// A [`MapHost`] that renders nothing and records everything.
///
/// Used by the command-line tool and the test-suite to drive the full
/// hover / click / search state machine without a browser.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    view: Option<HeadlessView>,
    tiles: Option<TileLayer>,
    layers: Vec<Layer>,
    markers: Vec<(Point<f64>, MarkerDescriptor)>,
    tooltip: Option<TooltipState>,
    listeners: BTreeSet<ListenerId>,
    next_listener: u64,
    next_z: u64,
    destroyed: bool,
}

impl HeadlessMap {
    pub fn new() -> Self { Self::default() }

    /// Camera, once the basemap exists.
    #[inline] pub fn view(&self) -> Option<&HeadlessView> { self.view.as_ref() }

    #[inline] pub fn tiles(&self) -> Option<&TileLayer> { self.tiles.as_ref() }

    #[inline] pub fn markers(&self) -> &[(Point<f64>, MarkerDescriptor)] { &self.markers }

    #[inline] pub fn tooltip(&self) -> Option<&TooltipState> { self.tooltip.as_ref() }

    #[inline] pub fn listener_count(&self) -> usize { self.listeners.len() }

    #[inline] pub fn is_destroyed(&self) -> bool { self.destroyed }

    /// Number of boundary layers currently on the map.
    pub fn attached_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.attached).count()
    }

    pub fn style_of(&self, layer: LayerId) -> Option<&PathStyle> {
        self.layers.get(layer.0).map(|l| &l.style)
    }

    /// Attached layer drawn for the given boundary code (last one wins).
    pub fn layer_for_code(&self, code: &str) -> Option<LayerId> {
        self.layers.iter().enumerate().rev()
            .find(|(_, l)| l.attached && l.code.as_deref() == Some(code))
            .map(|(i, _)| LayerId(i))
    }

    /// Codes of attached layers currently painted with `style`, sorted.
    pub fn codes_with_style(&self, style: &PathStyle) -> Vec<String> {
        let mut codes: Vec<String> = self.layers.iter()
            .filter(|l| l.attached && l.style == *style)
            .map(|l| l.code.as_deref().unwrap_or_default().to_string())
            .collect();
        codes.sort();
        codes
    }

    /// Attached layer with the highest z-order.
    pub fn front_layer(&self) -> Option<LayerId> {
        self.layers.iter().enumerate()
            .filter(|(_, l)| l.attached)
            .max_by_key(|(_, l)| l.z)
            .map(|(i, _)| LayerId(i))
    }

    /// Override the bounds and center a layer reports, e.g. to mimic a
    /// degenerate geometry.
    pub fn override_extent(&mut self, layer: LayerId, bounds: Option<Rect<f64>>, center: Option<Coord<f64>>) {
        if let Some(l) = self.layers.get_mut(layer.0) {
            l.bounds = bounds;
            l.center = center;
        }
    }

    fn bump_z(&mut self) -> u64 {
        self.next_z += 1;
        self.next_z
    }
}

impl MapHost for HeadlessMap {
    type Layer = LayerId;

    fn init_basemap(&mut self, center: Coord<f64>, zoom: u8, tiles: &TileLayer) {
        self.view = Some(HeadlessView { center, zoom, fitted: None });
        self.tiles = Some(tiles.clone());
        self.destroyed = false;
    }

    fn add_boundary_layer(
        &mut self,
        features: &[Arc<BoundaryFeature>],
        style: &PathStyle,
        on_each: &mut dyn FnMut(usize, LayerId),
    ) {
        for (idx, feature) in features.iter().enumerate() {
            let z = self.bump_z();
            let id = LayerId(self.layers.len());
            self.layers.push(Layer {
                code: feature.code_arc().cloned(),
                style: style.clone(),
                bounds: feature.geometry().and_then(geometry_bounds),
                center: feature.geometry().and_then(geometry_center),
                z,
                attached: true,
            });
            on_each(idx, id);
        }
        trace!("headless: added {} boundary layers", features.len());
    }

    fn remove_boundary_layer(&mut self) {
        for layer in &mut self.layers {
            layer.attached = false;
        }
    }

    fn add_point_layer(&mut self, markers: Vec<(Point<f64>, MarkerDescriptor)>) {
        self.markers = markers;
    }

    fn remove_point_layer(&mut self) {
        self.markers.clear();
    }

    fn set_style(&mut self, layer: LayerId, style: &PathStyle) {
        if let Some(l) = self.layers.get_mut(layer.0) {
            l.style = style.clone();
        }
    }

    fn bring_to_front(&mut self, layer: LayerId) {
        let z = self.bump_z();
        if let Some(l) = self.layers.get_mut(layer.0) {
            l.z = z;
        }
    }

    fn layer_bounds(&self, layer: LayerId) -> Option<Rect<f64>> {
        self.layers.get(layer.0).and_then(|l| l.bounds)
    }

    fn layer_center(&self, layer: LayerId) -> Option<Coord<f64>> {
        self.layers.get(layer.0).and_then(|l| l.center)
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: u32) {
        if let Some(view) = &mut self.view {
            view.center = bounds.center();
            view.fitted = Some((bounds, padding));
        }
    }

    fn set_view(&mut self, center: Coord<f64>, zoom: u8) {
        if let Some(view) = &mut self.view {
            view.center = center;
            view.zoom = zoom;
        }
    }

    fn set_zoom(&mut self, zoom: u8) {
        if let Some(view) = &mut self.view {
            view.zoom = zoom;
        }
    }

    fn create_tooltip(&mut self) {
        self.tooltip = Some(TooltipState { text: String::new(), at: ScreenPos::default(), visible: false });
    }

    fn show_tooltip(&mut self, text: &str, at: ScreenPos) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.text = text.to_string();
            tooltip.at = at;
            tooltip.visible = true;
        }
    }

    fn move_tooltip(&mut self, at: ScreenPos) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.at = at;
        }
    }

    fn hide_tooltip(&mut self) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.visible = false;
        }
    }

    fn remove_tooltip(&mut self) {
        self.tooltip = None;
    }

    fn subscribe_pointer_move(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn unsubscribe_pointer_move(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn destroy(&mut self) {
        self.remove_boundary_layer();
        self.markers.clear();
        self.view = None;
        self.destroyed = true;
    }
}
