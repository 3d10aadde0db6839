#![doc = "zctamap public API"]
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod feature;
pub mod geom;
pub mod host;
pub mod index;
pub mod io;
pub mod marker;
pub mod surface;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use controller::{BoundaryLayerController, LayerKey, MapEvent, SearchError, SearchStatus};

#[doc(inline)]
pub use dashboard::{DashboardState, DashboardView, ZipForm};

#[doc(inline)]
pub use feature::{BoundaryCollection, BoundaryFeature, EnergySource, PlantFeature, PointCollection};

#[doc(inline)]
pub use host::{HeadlessMap, MapHost, PathStyle, ScreenPos};

#[doc(inline)]
pub use index::{points_within, IndexKind, PointIndex};

#[doc(inline)]
pub use io::DataSource;

#[doc(inline)]
pub use surface::MapSurface;
