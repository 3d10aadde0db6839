use std::sync::Arc;

use geo::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display text for a boundary without a usable code. Never a lookup key.
pub const MISSING_CODE: &str = "N/A";

/// Ordered property keys that may carry the boundary code, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeKeys(Vec<String>);

impl Default for CodeKeys {
    fn default() -> Self {
        Self::new(["ZCTA5CE10", "ZCTA5CE20"])
    }
}

impl CodeKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    #[inline] pub fn keys(&self) -> &[String] { &self.0 }
}

/// Read the boundary code: the first candidate key holding a non-empty string wins.
/// A literal [`MISSING_CODE`] counts as no code.
pub fn extract_boundary_code<'a>(properties: &'a Map<String, Value>, keys: &CodeKeys) -> Option<&'a str> {
    keys.keys().iter()
        .filter_map(|key| properties.get(key).and_then(Value::as_str))
        .find(|code| !code.is_empty() && *code != MISSING_CODE)
}

/// A ZCTA polygon (or multipolygon) plus its property bag.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    code: Option<Arc<str>>,
    geometry: Option<Geometry<f64>>,
    properties: Map<String, Value>,
}

impl BoundaryFeature {
    pub fn new(geometry: Option<Geometry<f64>>, properties: Map<String, Value>, keys: &CodeKeys) -> Self {
        let code = extract_boundary_code(&properties, keys).map(Arc::from);
        Self { code, geometry, properties }
    }

    /// Boundary code, if any of the candidate keys carried one.
    #[inline] pub fn code(&self) -> Option<&str> { self.code.as_deref() }

    #[inline] pub(crate) fn code_arc(&self) -> Option<&Arc<str>> { self.code.as_ref() }

    /// Boundary code for display, `"N/A"` when missing.
    #[inline] pub fn display_code(&self) -> &str { self.code().unwrap_or(MISSING_CODE) }

    #[inline] pub fn geometry(&self) -> Option<&Geometry<f64>> { self.geometry.as_ref() }

    #[inline] pub fn properties(&self) -> &Map<String, Value> { &self.properties }

    /// State FIPS code (2010 or 2020 schema).
    pub fn state_fips(&self) -> Option<&str> {
        ["STATEFP10", "STATEFP20"].iter()
            .find_map(|key| self.properties.get(*key).and_then(Value::as_str))
    }

    /// Land area in square meters (2010 or 2020 schema).
    pub fn land_area(&self) -> Option<f64> {
        ["ALAND10", "ALAND20"].iter()
            .find_map(|key| self.properties.get(*key).and_then(Value::as_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn primary_key_wins() {
        let p = props(json!({ "ZCTA5CE10": "53703", "ZCTA5CE20": "53704" }));
        assert_eq!(extract_boundary_code(&p, &CodeKeys::default()), Some("53703"));
    }

    #[test]
    fn falls_back_to_legacy_key() {
        let p = props(json!({ "ZCTA5CE10": null, "ZCTA5CE20": "53704" }));
        assert_eq!(extract_boundary_code(&p, &CodeKeys::default()), Some("53704"));

        let p = props(json!({ "ZCTA5CE10": "", "ZCTA5CE20": "53704" }));
        assert_eq!(extract_boundary_code(&p, &CodeKeys::default()), Some("53704"));
    }

    #[test]
    fn missing_code_displays_sentinel() {
        let feature = BoundaryFeature::new(None, props(json!({ "NAME": "x" })), &CodeKeys::default());
        assert_eq!(feature.code(), None);
        assert_eq!(feature.display_code(), MISSING_CODE);
    }

    #[test]
    fn sentinel_value_is_not_a_code() {
        let p = props(json!({ "ZCTA5CE10": "N/A", "ZCTA5CE20": "53704" }));
        assert_eq!(extract_boundary_code(&p, &CodeKeys::default()), Some("53704"));

        let feature = BoundaryFeature::new(None, props(json!({ "ZCTA5CE10": "N/A" })), &CodeKeys::default());
        assert_eq!(feature.code(), None);
        assert_eq!(feature.display_code(), MISSING_CODE);
    }

    #[test]
    fn third_schema_is_a_config_change() {
        let keys = CodeKeys::new(["ZCTA5CE30", "ZCTA5CE20"]);
        let p = props(json!({ "ZCTA5CE30": "10001" }));
        assert_eq!(extract_boundary_code(&p, &keys), Some("10001"));
    }

    #[test]
    fn descriptive_fields() {
        let p = props(json!({ "ZCTA5CE20": "53703", "STATEFP20": "55", "ALAND20": 4_123_456.0 }));
        let feature = BoundaryFeature::new(None, p, &CodeKeys::default());
        assert_eq!(feature.state_fips(), Some("55"));
        assert_eq!(feature.land_area(), Some(4_123_456.0));
    }
}
