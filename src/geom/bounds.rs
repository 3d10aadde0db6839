use geo::{BoundingRect, Centroid, Coord, Geometry, Rect};

/// Bounding rectangle of an areal geometry, or None for empty / non-areal shapes.
pub fn geometry_bounds(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => polygon.bounding_rect(),
        Geometry::MultiPolygon(multipolygon) => multipolygon.bounding_rect(),
        _ => None,
    }
}

/// Area-weighted centroid of an areal geometry.
pub fn geometry_center(geometry: &Geometry<f64>) -> Option<Coord<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => polygon.centroid().map(|p| p.0),
        Geometry::MultiPolygon(multipolygon) => multipolygon.centroid().map(|p| p.0),
        _ => None,
    }
}

/// A rectangle can be fit to only if both corners are finite.
#[inline]
pub fn is_valid_bounds(rect: &Rect<f64>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    [min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite())
}
