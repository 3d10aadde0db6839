mod geojson;
mod source;

pub use geojson::{parse_geometry, read_boundaries, read_points};
pub use source::{fetch_bytes, load_boundaries, load_points, DataSource};
