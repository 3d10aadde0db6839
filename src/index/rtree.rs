use std::sync::Arc;

use rstar::{RTree, RTreeObject, AABB};

use crate::feature::{BoundaryFeature, PlantFeature, PointCollection};
use crate::geom::{geometry_bounds, point_in_geometry};

use super::{linear::is_areal, PointIndex};

/// A plant location in the R-tree, associated with its collection position.
#[derive(Debug, Clone)]
struct IndexedPoint {
    idx: usize, // Position of the plant in the collection
    coord: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coord)
    }
}

/// Bounding-rectangle prefilter followed by the exact ray-casting test.
#[derive(Debug, Clone)]
pub struct RTreeIndex {
    points: PointCollection,
    rtree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    pub fn new(points: PointCollection) -> Self {
        let entries = points.iter().enumerate()
            .filter_map(|(idx, plant)| plant.point().map(|p| (idx, p)))
            .filter(|(_, p)| p.x().is_finite() && p.y().is_finite())
            .map(|(idx, p)| IndexedPoint { idx, coord: [p.x(), p.y()] })
            .collect();

        Self { rtree: RTree::bulk_load(entries), points }
    }
}

impl PointIndex for RTreeIndex {
    fn points_within(&self, boundary: &BoundaryFeature) -> Vec<Arc<PlantFeature>> {
        let Some(area) = boundary.geometry().filter(|g| is_areal(g)) else {
            return Vec::new();
        };
        let Some(rect) = geometry_bounds(area) else {
            return Vec::new();
        };

        let envelope: AABB<[f64; 2]> = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut hits: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| {
                let plant = &self.points.features()[entry.idx];
                plant.point().is_some_and(|p| point_in_geometry(p, area))
            })
            .map(|entry| entry.idx)
            .collect();

        // Keep collection order so output matches the linear scan.
        hits.sort_unstable();
        hits.into_iter().map(|idx| self.points.features()[idx].clone()).collect()
    }

    fn len(&self) -> usize { self.points.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{CodeKeys, PlantProperties};
    use crate::index::LinearIndex;
    use geo::{polygon, Geometry};
    use serde_json::Map;

    fn grid_points() -> PointCollection {
        let mut plants = Vec::new();
        for i in 0..20 {
            for j in 0..20 {
                plants.push(PlantFeature::at(i as f64 * 0.5, j as f64 * 0.5, PlantProperties {
                    name: Some(format!("p{i}-{j}")),
                    ..Default::default()
                }));
            }
        }
        PointCollection::new(plants)
    }

    #[test]
    fn agrees_with_linear_scan() {
        let points = grid_points();
        let boundary = BoundaryFeature::new(
            Some(Geometry::Polygon(polygon![
                (x: 1.1, y: 1.1), (x: 6.2, y: 1.3), (x: 4.0, y: 7.7), (x: 1.1, y: 1.1),
            ])),
            Map::new(),
            &CodeKeys::default(),
        );

        let linear = LinearIndex::new(points.clone()).points_within(&boundary);
        let rtree = RTreeIndex::new(points).points_within(&boundary);

        assert!(!linear.is_empty());
        let names = |v: &[Arc<PlantFeature>]| v.iter().map(|p| p.name().unwrap().to_string()).collect::<Vec<_>>();
        assert_eq!(names(&linear), names(&rtree));
    }
}
