mod bounds;
mod pip;

pub use bounds::{is_valid_bounds, geometry_bounds, geometry_center};
pub use pip::{point_in_geometry, point_in_multipolygon, point_in_polygon};
