mod linear;
mod rtree;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::feature::{BoundaryFeature, PlantFeature, PointCollection};

pub use linear::LinearIndex;
pub use rtree::RTreeIndex;

/// Answers "which plants lie inside this boundary?".
///
/// Implementations return plants in collection order, so repeated queries with
/// unchanged inputs yield identical output whatever the index strategy.
pub trait PointIndex {
    fn points_within(&self, boundary: &BoundaryFeature) -> Vec<Arc<PlantFeature>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Which index to build over the plant collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Full scan per query. Fine for a few thousand plants.
    #[default]
    Linear,
    /// R-tree prefilter on the boundary's bounding rectangle.
    Rtree,
}

/// Build an index of the given kind over a plant collection.
pub fn build_index(kind: IndexKind, points: &PointCollection) -> Box<dyn PointIndex> {
    match kind {
        IndexKind::Linear => Box::new(LinearIndex::new(points.clone())),
        IndexKind::Rtree => Box::new(RTreeIndex::new(points.clone())),
    }
}

/// Plants of `all_points` contained in `boundary`, by linear scan.
pub fn points_within(boundary: &BoundaryFeature, all_points: &PointCollection) -> Vec<Arc<PlantFeature>> {
    linear::scan(boundary, all_points.iter())
}
