mod boundary;
mod collection;
mod plant;

pub use boundary::{extract_boundary_code, BoundaryFeature, CodeKeys, MISSING_CODE};
pub use collection::{BoundaryCollection, PointCollection};
pub use plant::{EnergySource, PlantFeature, PlantProperties};
