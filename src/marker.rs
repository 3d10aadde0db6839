use serde::Serialize;

use crate::feature::{EnergySource, PlantFeature};

pub const SOLAR_ICON_PATH: &str = "/icons/solar.png";
pub const NATURAL_GAS_ICON_PATH: &str = "/icons/natural-gas.png";
pub const WIND_ICON_PATH: &str = "/icons/wind.png";
pub const PETROLEUM_ICON_PATH: &str = "/icons/petroleum.png";
pub const COAL_ICON_PATH: &str = "/icons/coal.png";
pub const INDUSTRIAL_BATTERY_ICON_PATH: &str = "/icons/industrial-battery.png";
pub const HYDROELECTRIC_ICON_PATH: &str = "/icons/hydroelectric.png";

/// Round image icon for a known energy source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageIcon {
    pub path: &'static str,
    pub alt: String,
    pub class_name: &'static str,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl ImageIcon {
    fn new(path: &'static str, name: &str) -> Self {
        Self {
            path,
            alt: format!("{name} icon"),
            class_name: "custom-plant-icon",
            size: [20, 20],
            anchor: [10, 10],
            popup_anchor: [0, -10],
        }
    }
}

/// Plain circle used for unknown sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub radius: f64,
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for CircleMarker {
    fn default() -> Self {
        Self {
            radius: 5.0,
            fill_color: "#0078FF",
            color: "#000",
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerIcon {
    Image(ImageIcon),
    Circle(CircleMarker),
}

/// Everything the host needs to draw one plant marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub icon: MarkerIcon,
    pub tooltip: String,
}

/// Icon for a source category. Unknown or missing categories get the default circle.
pub fn classify_marker(source: Option<&EnergySource>) -> MarkerIcon {
    let (path, name) = match source {
        Some(EnergySource::Solar) => (SOLAR_ICON_PATH, "Solar"),
        Some(EnergySource::NaturalGas) => (NATURAL_GAS_ICON_PATH, "Natural Gas"),
        Some(EnergySource::Wind) => (WIND_ICON_PATH, "Wind"),
        Some(EnergySource::Petroleum) => (PETROLEUM_ICON_PATH, "Petroleum"),
        Some(EnergySource::Coal) => (COAL_ICON_PATH, "Coal"),
        Some(EnergySource::BatteryStorage) => (INDUSTRIAL_BATTERY_ICON_PATH, "Industrial Battery"),
        Some(EnergySource::Hydroelectric) => (HYDROELECTRIC_ICON_PATH, "Hydroelectric"),
        Some(EnergySource::Other(_)) | None => return MarkerIcon::Circle(CircleMarker::default()),
    };
    MarkerIcon::Image(ImageIcon::new(path, name))
}

/// Tooltip shown when the plant has no name of its own.
pub fn default_tooltip(source: Option<&EnergySource>) -> &'static str {
    match source {
        Some(EnergySource::Solar) => "Solar Energy Plant",
        Some(EnergySource::NaturalGas) => "Natural Gas Energy Plant",
        Some(EnergySource::Wind) => "Wind Energy Plant",
        Some(EnergySource::Petroleum) => "Petroleum Energy Plant",
        Some(EnergySource::Coal) => "Coal Energy Plant",
        Some(EnergySource::BatteryStorage) => "Battery Storage Plant",
        Some(EnergySource::Hydroelectric) => "Hydroelectric Power Plant",
        Some(EnergySource::Other(_)) | None => "Energy Plant",
    }
}

/// Marker for one plant feature.
pub fn marker_for(plant: &PlantFeature) -> MarkerDescriptor {
    let source = plant.source();
    let tooltip = plant.name()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_tooltip(source.as_ref()).to_string());

    MarkerDescriptor { icon: classify_marker(source.as_ref()), tooltip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::PlantProperties;

    fn plant(name: Option<&str>, source: Option<&str>) -> PlantFeature {
        PlantFeature::at(-89.4, 43.07, PlantProperties {
            name: name.map(str::to_string),
            primary_source: source.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn known_sources_get_image_icons() {
        let MarkerIcon::Image(icon) = classify_marker(Some(&EnergySource::Solar)) else {
            panic!("solar should use an image icon");
        };
        assert_eq!(icon.path, SOLAR_ICON_PATH);
        assert_eq!(icon.alt, "Solar icon");

        let MarkerIcon::Image(icon) = classify_marker(Some(&EnergySource::BatteryStorage)) else {
            panic!("battery should use an image icon");
        };
        assert_eq!(icon.alt, "Industrial Battery icon");
    }

    #[test]
    fn unknown_or_missing_source_falls_back_to_circle() {
        let other = EnergySource::from_label("Geothermal");
        assert_eq!(classify_marker(Some(&other)), MarkerIcon::Circle(CircleMarker::default()));
        assert_eq!(classify_marker(None), MarkerIcon::Circle(CircleMarker::default()));
    }

    #[test]
    fn tooltip_prefers_name() {
        assert_eq!(marker_for(&plant(Some("Capitol Solar"), Some("Solar"))).tooltip, "Capitol Solar");
        assert_eq!(marker_for(&plant(None, Some("Hydroelectric"))).tooltip, "Hydroelectric Power Plant");
        assert_eq!(marker_for(&plant(None, Some("Geothermal"))).tooltip, "Energy Plant");
        assert_eq!(marker_for(&plant(Some(""), None)).tooltip, "Energy Plant");
    }
}
