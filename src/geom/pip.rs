use geo::{Geometry, LineString, MultiPolygon, Point, Polygon};

/// Ray-casting point-in-polygon test.
///
/// Ring 0 is the exterior; every following ring is a hole. A point lying
/// strictly inside a horizontal edge counts as inside. A point inside any
/// hole is outside the polygon.
pub fn point_in_polygon(point: Point<f64>, polygon: &Polygon<f64>) -> bool {
    let (x, y) = point.x_y();

    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    for (i, ring) in rings.enumerate() {
        let inside = match ring_parity(x, y, ring) {
            Crossing::OnEdge => return true,
            Crossing::Parity(inside) => inside,
        };

        if i == 0 && !inside {
            return false;
        }
        if i > 0 && inside {
            return false;
        }
    }

    true
}

/// True if the point lies in any constituent polygon.
pub fn point_in_multipolygon(point: Point<f64>, multipolygon: &MultiPolygon<f64>) -> bool {
    multipolygon.0.iter().any(|polygon| point_in_polygon(point, polygon))
}

/// Dispatch on geometry type. Only areal geometries can contain a point.
pub fn point_in_geometry(point: Point<f64>, geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => point_in_polygon(point, polygon),
        Geometry::MultiPolygon(multipolygon) => point_in_multipolygon(point, multipolygon),
        _ => false,
    }
}

enum Crossing {
    OnEdge,
    Parity(bool),
}

/// Odd-even crossing count of a horizontal ray from (x, y) against one ring.
fn ring_parity(x: f64, y: f64, ring: &LineString<f64>) -> Crossing {
    let coords = &ring.0;
    if coords.is_empty() {
        return Crossing::Parity(false);
    }

    let mut inside = false;
    let mut k = coords.len() - 1;
    for j in 0..coords.len() {
        let (xi, yi) = (coords[j].x, coords[j].y);
        let (xk, yk) = (coords[k].x, coords[k].y);
        k = j;

        if yi == yk && yi == y && x > xi.min(xk) && x < xi.max(xk) {
            return Crossing::OnEdge;
        }

        let intersect = ((yi > y) != (yk > y)) && (x < (xk - xi) * (y - yi) / (yk - yi) + xi);
        if intersect {
            inside = !inside;
        }
    }
    Crossing::Parity(inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, Centroid, LineString};

    fn square(min: f64, max: f64) -> LineString<f64> {
        line_string![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
            (x: min, y: min),
        ]
    }

    #[test]
    fn outside_bounding_box_is_never_inside() {
        let poly = Polygon::new(square(0.0, 10.0), vec![]);
        for p in [point!(x: -1.0, y: 5.0), point!(x: 11.0, y: 5.0), point!(x: 5.0, y: 10.5), point!(x: 5.0, y: -0.1)] {
            assert!(!point_in_polygon(p, &poly), "{p:?} should be outside");
        }
    }

    #[test]
    fn centroid_of_convex_polygon_is_inside() {
        let tri = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 1.0, y: 3.0), (x: 0.0, y: 0.0)];
        let hex = polygon![
            (x: 2.0, y: 0.0), (x: 4.0, y: 1.0), (x: 4.0, y: 3.0),
            (x: 2.0, y: 4.0), (x: 0.0, y: 3.0), (x: 0.0, y: 1.0), (x: 2.0, y: 0.0),
        ];
        for poly in [tri, hex] {
            let c = poly.centroid().unwrap();
            assert!(point_in_polygon(c, &poly));
        }
    }

    #[test]
    fn hole_subtracts_area() {
        let poly = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        assert!(!point_in_polygon(point!(x: 5.0, y: 5.0), &poly));
        assert!(point_in_polygon(point!(x: 2.0, y: 2.0), &poly));
        assert!(point_in_polygon(point!(x: 8.0, y: 5.0), &poly));
    }

    #[test]
    fn point_on_horizontal_edge_counts_as_inside() {
        let poly = Polygon::new(square(0.0, 10.0), vec![]);
        assert!(point_in_polygon(point!(x: 5.0, y: 0.0), &poly));
        assert!(point_in_polygon(point!(x: 5.0, y: 10.0), &poly));
    }

    #[test]
    fn multipolygon_matches_any_member() {
        let mp = MultiPolygon(vec![
            Polygon::new(square(0.0, 1.0), vec![]),
            Polygon::new(square(5.0, 6.0), vec![]),
        ]);
        assert!(point_in_multipolygon(point!(x: 5.5, y: 5.5), &mp));
        assert!(point_in_multipolygon(point!(x: 0.5, y: 0.5), &mp));
        assert!(!point_in_multipolygon(point!(x: 3.0, y: 3.0), &mp));
    }

    #[test]
    fn non_areal_geometry_contains_nothing() {
        let line = Geometry::LineString(square(0.0, 10.0));
        assert!(!point_in_geometry(point!(x: 5.0, y: 5.0), &line));
        let pt = Geometry::Point(point!(x: 5.0, y: 5.0));
        assert!(!point_in_geometry(point!(x: 5.0, y: 5.0), &pt));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        let poly = Polygon::new(LineString::new(vec![]), vec![]);
        assert!(!point_in_polygon(point!(x: 0.0, y: 0.0), &poly));
    }
}
