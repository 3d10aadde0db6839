use std::f64::consts::TAU;

use geo::{coord, Centroid, LineString, Point, Polygon};
use serde_json::json;
use zctamap::{
    feature::{CodeKeys, PlantProperties},
    geom::{point_in_geometry, point_in_polygon},
    points_within, BoundaryFeature, PlantFeature, PointCollection,
};

fn regular_polygon(sides: usize, radius: f64, (cx, cy): (f64, f64)) -> Polygon<f64> {
    let ring: Vec<_> = (0..sides)
        .map(|i| {
            let t = TAU * i as f64 / sides as f64;
            coord! { x: cx + radius * t.cos(), y: cy + radius * t.sin() }
        })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}

#[test]
fn regular_polygons_contain_their_centroid() {
    for sides in 3..=24 {
        let polygon = regular_polygon(sides, 0.05, (-89.4, 43.07));
        let centroid = polygon.centroid().unwrap();
        assert!(point_in_polygon(centroid, &polygon), "{sides}-gon should contain its centroid");
    }
}

#[test]
fn points_outside_bounding_box_are_outside() {
    let polygon = regular_polygon(7, 1.0, (0.0, 0.0));
    for p in [(1.01, 0.0), (-1.01, 0.5), (0.0, 1.2), (0.3, -1.5), (10.0, 10.0)] {
        assert!(!point_in_polygon(Point::new(p.0, p.1), &polygon), "{p:?} lies outside the bbox");
    }
}

#[test]
fn hole_excludes_points() {
    let outer = regular_polygon(16, 2.0, (0.0, 0.0));
    let hole = regular_polygon(16, 1.0, (0.0, 0.0));
    let ring = hole.exterior().clone();
    let donut = Polygon::new(outer.exterior().clone(), vec![ring]);

    assert!(!point_in_geometry(Point::new(0.0, 0.0), &donut.clone().into()));
    assert!(point_in_geometry(Point::new(1.5, 0.0), &donut.into()));
}

#[test]
fn contained_points_are_stable_and_ordered() {
    let props = json!({ "ZCTA5CE10": "53703" }).as_object().cloned().unwrap();
    let boundary = BoundaryFeature::new(
        Some(regular_polygon(12, 0.05, (-89.4, 43.07)).into()),
        props,
        &CodeKeys::default(),
    );

    let plant = |name: &str, lon: f64, lat: f64| {
        PlantFeature::at(lon, lat, PlantProperties { name: Some(name.into()), ..Default::default() })
    };
    let points = PointCollection::new(vec![
        plant("b", -89.39, 43.07),
        plant("outside", -89.2, 43.07),
        plant("a", -89.41, 43.075),
        plant("c", -89.4, 43.07),
    ]);

    let first = points_within(&boundary, &points);
    let names: Vec<_> = first.iter().map(|p| p.name().unwrap()).collect();
    assert_eq!(names, ["b", "a", "c"]);

    let second = points_within(&boundary, &points);
    assert_eq!(first.len(), second.len());
    assert!(first.iter().zip(&second).all(|(x, y)| std::sync::Arc::ptr_eq(x, y)));
}

#[test]
fn featureless_boundary_contains_nothing() {
    let boundary = BoundaryFeature::new(None, Default::default(), &CodeKeys::default());
    let points = PointCollection::new(vec![PlantFeature::at(0.0, 0.0, PlantProperties::default())]);
    assert!(points_within(&boundary, &points).is_empty());
}
