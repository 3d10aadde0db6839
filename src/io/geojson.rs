use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::feature::{BoundaryCollection, BoundaryFeature, CodeKeys, PlantFeature, PlantProperties, PointCollection};

/// Read boundary features from GeoJSON bytes.
/// Accepts a FeatureCollection or a lone Feature (normalized to a one-element collection).
pub fn read_boundaries(bytes: &[u8], keys: &CodeKeys) -> Result<BoundaryCollection> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse boundary GeoJSON")?;

    let mut features = Vec::new();
    for (idx, feature) in feature_values(&value)?.into_iter().enumerate() {
        match parse_feature_geometry(feature) {
            Ok(geometry) => features.push(BoundaryFeature::new(geometry, properties_of(feature), keys)),
            Err(e) => warn!("skipping boundary feature {idx}: {e:#}"),
        }
    }

    debug!("parsed {} boundary features", features.len());
    Ok(BoundaryCollection::new(features))
}

/// Read plant features from GeoJSON bytes.
pub fn read_points(bytes: &[u8]) -> Result<PointCollection> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse plant GeoJSON")?;

    let mut features = Vec::new();
    for (idx, feature) in feature_values(&value)?.into_iter().enumerate() {
        let geometry = match parse_feature_geometry(feature) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!("skipping plant feature {idx}: {e:#}");
                continue;
            }
        };
        let properties = match serde_json::from_value::<PlantProperties>(Value::Object(properties_of(feature))) {
            Ok(properties) => properties,
            Err(e) => {
                warn!("skipping plant feature {idx}: bad properties: {e}");
                continue;
            }
        };
        features.push(PlantFeature::new(geometry, properties));
    }

    debug!("parsed {} plant features", features.len());
    Ok(PointCollection::new(features))
}

/// Feature objects of a FeatureCollection, or the single Feature itself.
fn feature_values(value: &Value) -> Result<Vec<&Value>> {
    match value["type"].as_str() {
        Some("FeatureCollection") => {
            let features = value["features"].as_array()
                .ok_or_else(|| anyhow!("FeatureCollection has no \"features\" array"))?;
            Ok(features.iter().collect())
        }
        Some("Feature") => Ok(vec![value]),
        Some(other) => bail!("Expected Feature or FeatureCollection, found {other:?}"),
        None => bail!("GeoJSON document has no \"type\""),
    }
}

fn properties_of(feature: &Value) -> Map<String, Value> {
    feature["properties"].as_object().cloned().unwrap_or_default()
}

fn parse_feature_geometry(feature: &Value) -> Result<Option<Geometry<f64>>> {
    match &feature["geometry"] {
        Value::Null => Ok(None),
        geometry => parse_geometry(geometry).map(Some),
    }
}

/// Parse a GeoJSON geometry object into a `geo::Geometry`.
pub fn parse_geometry(geometry: &Value) -> Result<Geometry<f64>> {
    let ty = geometry["type"].as_str()
        .ok_or_else(|| anyhow!("geometry has no \"type\""))?;

    if ty == "GeometryCollection" {
        let members = geometry["geometries"].as_array()
            .ok_or_else(|| anyhow!("GeometryCollection has no \"geometries\" array"))?;
        let members = members.iter().map(parse_geometry).collect::<Result<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(members)));
    }

    let coords = geometry.get("coordinates")
        .ok_or_else(|| anyhow!("{ty} geometry has no \"coordinates\""))?;

    Ok(match ty {
        "Point" => Geometry::Point(Point(parse_position(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            array(coords)?.iter().map(|c| parse_position(c).map(Point)).collect::<Result<_>>()?
        )),
        "LineString" => Geometry::LineString(parse_line(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString(
            array(coords)?.iter().map(parse_line).collect::<Result<_>>()?
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            array(coords)?.iter().map(parse_polygon).collect::<Result<_>>()?
        )),
        other => bail!("unsupported geometry type {other:?}"),
    })
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("expected a coordinate array, found {value}"))
}

/// Parse a position `[x, y, ...]`; extra ordinates (altitude) are ignored.
fn parse_position(value: &Value) -> Result<Coord<f64>> {
    let pair = array(value)?;
    if pair.len() < 2 {
        bail!("position needs at least two ordinates, found {}", pair.len());
    }
    let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(array(value)?.iter().map(parse_position).collect::<Result<_>>()?))
}

/// Parse a ring, closing it if the source left it open.
fn parse_ring(value: &Value) -> Result<LineString<f64>> {
    let mut ring = parse_line(value)?;
    if let (Some(first), Some(last)) = (ring.0.first().copied(), ring.0.last().copied()) {
        if first != last {
            ring.0.push(first);
        }
    }
    Ok(ring)
}

/// Polygon coordinates: exterior ring followed by hole rings.
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let rings = array(value)?;
    let Some((exterior, holes)) = rings.split_first() else {
        bail!("Invalid Polygon: missing exterior ring");
    };
    Ok(Polygon::new(
        parse_ring(exterior)?,
        holes.iter().map(parse_ring).collect::<Result<_>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lone_feature_becomes_one_element_collection() {
        let doc = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE10": "53703" },
            "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] },
        });
        let boundaries = read_boundaries(doc.to_string().as_bytes(), &CodeKeys::default()).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries.features()[0].code(), Some("53703"));
    }

    #[test]
    fn open_rings_are_closed() {
        let geom = parse_geometry(&json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2]]],
        })).unwrap();
        let Geometry::Polygon(poly) = geom else { panic!("expected polygon") };
        assert_eq!(poly.exterior().0.len(), 5);
        assert_eq!(poly.exterior().0.first(), poly.exterior().0.last());
    }

    #[test]
    fn multipolygon_with_holes() {
        let geom = parse_geometry(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]], [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]],
                [[[20, 20], [21, 20], [21, 21], [20, 20]]],
            ],
        })).unwrap();
        let Geometry::MultiPolygon(mp) = geom else { panic!("expected multipolygon") };
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
    }

    #[test]
    fn bad_features_are_skipped_not_fatal() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "ok" },
                  "geometry": { "type": "Point", "coordinates": [-89.38, 43.07] } },
                { "type": "Feature", "properties": { "name": "bad" },
                  "geometry": { "type": "Point", "coordinates": ["a", "b"] } },
                { "type": "Feature", "properties": { "name": "nowhere" }, "geometry": null },
            ],
        });
        let points = read_points(doc.to_string().as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points.features()[0].name(), Some("ok"));
        assert!(points.features()[1].point().is_none());
    }

    #[test]
    fn mistyped_properties_keep_the_plant() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "Capitol Solar", "installedMW": "1.2" },
                  "geometry": { "type": "Point", "coordinates": [-89.384, 43.0746] } },
                { "type": "Feature", "properties": { "name": 12345, "primarySource": "Wind" },
                  "geometry": { "type": "Point", "coordinates": [-89.36, 43.08] } },
            ],
        });
        let points = read_points(doc.to_string().as_bytes()).unwrap();
        assert_eq!(points.len(), 2);

        let first = points.features()[0].properties();
        assert_eq!(first.name.as_deref(), Some("Capitol Solar"));
        assert_eq!(first.installed_mw, None);

        let second = &points.features()[1];
        assert_eq!(second.name(), None);
        assert_eq!(second.source(), Some(crate::feature::EnergySource::Wind));
        assert!(second.point().is_some());
    }

    #[test]
    fn non_geojson_documents_are_errors() {
        assert!(read_points(b"{\"type\": \"Topology\"}").is_err());
        assert!(read_points(b"not json").is_err());
    }
}
