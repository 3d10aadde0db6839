//! Contract with the external mapping library.
//!
//! Tile rendering, projection and DOM event dispatch live on the other side of
//! [`MapHost`]. The controller only ever talks to the map through it.

mod headless;

use std::{fmt, sync::Arc};

use geo::{Coord, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::feature::BoundaryFeature;
use crate::marker::MarkerDescriptor;

pub use headless::{HeadlessMap, HeadlessView, LayerId, TooltipState};

/// Paint style of a boundary path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl PathStyle {
    /// Resting style of every ZCTA outline.
    pub fn boundary_default() -> Self {
        Self {
            color: "#702963".into(),
            weight: 3.0,
            opacity: 0.7,
            fill_color: "#D2042D".into(),
            fill_opacity: 0.1,
            dash_array: None,
        }
    }

    /// Style of the hovered / selected ZCTA.
    pub fn boundary_highlight() -> Self {
        Self {
            color: "#666".into(),
            weight: 4.0,
            opacity: 0.7,
            fill_color: "#D2042D".into(),
            fill_opacity: 0.5,
            dash_array: Some(String::new()),
        }
    }
}

/// Basemap tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
        }
    }
}

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn offset(self, by: f64) -> Self { Self { x: self.x + by, y: self.y + by } }
}

/// Handle for a document-level pointer-move subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// The mapping library, as seen by the surface and the boundary controller.
///
/// Coordinates are `geo` coordinates: `x` is longitude, `y` latitude.
pub trait MapHost {
    /// Opaque interactive layer handle, one per boundary feature.
    type Layer: Copy + Eq + fmt::Debug;

    /// Create the basemap and its tile layer.
    fn init_basemap(&mut self, center: Coord<f64>, zoom: u8, tiles: &TileLayer);

    /// Render a boundary layer with `style`, calling `on_each` once per feature
    /// with its index and its layer handle.
    fn add_boundary_layer(
        &mut self,
        features: &[Arc<BoundaryFeature>],
        style: &PathStyle,
        on_each: &mut dyn FnMut(usize, Self::Layer),
    );

    /// Remove the boundary layer. Handles it produced become stale.
    fn remove_boundary_layer(&mut self);

    /// Render plant markers with bound tooltips.
    fn add_point_layer(&mut self, markers: Vec<(Point<f64>, MarkerDescriptor)>);

    fn remove_point_layer(&mut self);

    fn set_style(&mut self, layer: Self::Layer, style: &PathStyle);

    fn bring_to_front(&mut self, layer: Self::Layer);

    /// Bounds of the layer, or None if the layer exposes no bounds.
    fn layer_bounds(&self, layer: Self::Layer) -> Option<Rect<f64>>;

    fn layer_center(&self, layer: Self::Layer) -> Option<Coord<f64>>;

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: u32);

    fn set_view(&mut self, center: Coord<f64>, zoom: u8);

    fn set_zoom(&mut self, zoom: u8);

    /// Create the (hidden) tooltip element.
    fn create_tooltip(&mut self);

    fn show_tooltip(&mut self, text: &str, at: ScreenPos);

    fn move_tooltip(&mut self, at: ScreenPos);

    fn hide_tooltip(&mut self);

    fn remove_tooltip(&mut self);

    fn subscribe_pointer_move(&mut self) -> ListenerId;

    fn unsubscribe_pointer_move(&mut self, id: ListenerId);

    /// Tear the map down.
    fn destroy(&mut self);
}
