use std::sync::Arc;

use geo::Geometry;

use crate::feature::{BoundaryFeature, PlantFeature, PointCollection};
use crate::geom::point_in_geometry;

use super::PointIndex;

#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    points: PointCollection,
}

impl LinearIndex {
    pub fn new(points: PointCollection) -> Self {
        Self { points }
    }
}

impl PointIndex for LinearIndex {
    fn points_within(&self, boundary: &BoundaryFeature) -> Vec<Arc<PlantFeature>> {
        scan(boundary, self.points.iter())
    }

    fn len(&self) -> usize { self.points.len() }
}

pub(super) fn scan<'a>(
    boundary: &BoundaryFeature,
    points: impl Iterator<Item = &'a Arc<PlantFeature>>,
) -> Vec<Arc<PlantFeature>> {
    let Some(area) = boundary.geometry().filter(|g| is_areal(g)) else {
        return Vec::new();
    };

    points
        .filter(|plant| plant.point().is_some_and(|p| point_in_geometry(p, area)))
        .cloned()
        .collect()
}

#[inline]
pub(super) fn is_areal(geometry: &Geometry<f64>) -> bool {
    matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
}
