use std::fmt;

use geo::{Geometry, Point};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Primary energy source of a plant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnergySource {
    Solar,
    NaturalGas,
    Wind,
    Petroleum,
    Coal,
    BatteryStorage,
    Hydroelectric,
    Other(String),
}

impl EnergySource {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Solar" => Self::Solar,
            "Natural Gas" => Self::NaturalGas,
            "Wind" => Self::Wind,
            "Petroleum" => Self::Petroleum,
            "Coal" => Self::Coal,
            "Battery Storage" => Self::BatteryStorage,
            "Hydroelectric" => Self::Hydroelectric,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Solar => "Solar",
            Self::NaturalGas => "Natural Gas",
            Self::Wind => "Wind",
            Self::Petroleum => "Petroleum",
            Self::Coal => "Coal",
            Self::BatteryStorage => "Battery Storage",
            Self::Hydroelectric => "Hydroelectric",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known plant attributes, as published in the EIA plant dataset.
///
/// A field of the wrong type reads as missing; the plant itself is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantProperties {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub utility_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub city_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub tech_desc: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub primary_source: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sector_name: Option<String>,
    #[serde(rename = "installedMW", deserialize_with = "lenient")]
    pub installed_mw: Option<f64>,
    #[serde(rename = "totalMW", deserialize_with = "lenient")]
    pub total_mw: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantFeature {
    geometry: Option<Geometry<f64>>,
    properties: PlantProperties,
}

impl PlantFeature {
    pub fn new(geometry: Option<Geometry<f64>>, properties: PlantProperties) -> Self {
        Self { geometry, properties }
    }

    /// Convenience constructor for a point plant.
    pub fn at(lon: f64, lat: f64, properties: PlantProperties) -> Self {
        Self::new(Some(Geometry::Point(Point::new(lon, lat))), properties)
    }

    #[inline] pub fn geometry(&self) -> Option<&Geometry<f64>> { self.geometry.as_ref() }

    #[inline] pub fn properties(&self) -> &PlantProperties { &self.properties }

    /// Location, if the geometry is a single point.
    pub fn point(&self) -> Option<Point<f64>> {
        match self.geometry {
            Some(Geometry::Point(point)) => Some(point),
            _ => None,
        }
    }

    #[inline] pub fn name(&self) -> Option<&str> { self.properties.name.as_deref() }

    pub fn source(&self) -> Option<EnergySource> {
        self.properties.primary_source.as_deref().map(EnergySource::from_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn properties_use_dataset_field_names() {
        let props: PlantProperties = serde_json::from_value(json!({
            "name": "Blount Street",
            "utilityName": "Madison Gas & Electric",
            "primarySource": "Natural Gas",
            "installedMW": 190.0,
            "totalMW": 100.5,
            "unrelated": true,
        })).unwrap();
        assert_eq!(props.utility_name.as_deref(), Some("Madison Gas & Electric"));
        assert_eq!(props.installed_mw, Some(190.0));
        assert_eq!(props.total_mw, Some(100.5));
        assert_eq!(props.city_name, None);
    }

    #[test]
    fn mistyped_fields_read_as_missing() {
        let props: PlantProperties = serde_json::from_value(json!({
            "name": 12345,
            "primarySource": "Solar",
            "installedMW": "1.2",
            "totalMW": null,
        })).unwrap();
        assert_eq!(props.name, None);
        assert_eq!(props.primary_source.as_deref(), Some("Solar"));
        assert_eq!(props.installed_mw, None);
        assert_eq!(props.total_mw, None);
    }

    #[test]
    fn source_labels_round_trip() {
        for label in ["Solar", "Natural Gas", "Battery Storage", "Geothermal"] {
            assert_eq!(EnergySource::from_label(label).label(), label);
        }
        assert_eq!(EnergySource::from_label("Geothermal"), EnergySource::Other("Geothermal".into()));
    }
}
