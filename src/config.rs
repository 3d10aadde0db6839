use std::path::Path;

use anyhow::{Context, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::controller::RetryPolicy;
use crate::feature::CodeKeys;
use crate::host::{PathStyle, TileLayer};
use crate::index::IndexKind;
use crate::io::DataSource;

/// Dashboard configuration. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// ZCTA boundary GeoJSON (URL or path).
    pub boundaries: DataSource,
    /// Energy plant GeoJSON (URL or path).
    pub plants: DataSource,
    /// Property keys carrying the ZCTA code, highest priority first.
    pub code_keys: CodeKeys,
    /// Initial map center as `[lat, lng]`.
    pub initial_center: [f64; 2],
    pub initial_zoom: u8,
    pub tiles: TileLayer,
    pub default_style: PathStyle,
    pub highlight_style: PathStyle,
    /// Pixel padding when fitting the view to a searched boundary.
    pub fit_padding: u32,
    /// Zoom used when a boundary's bounds cannot be fit.
    pub fallback_zoom: u8,
    /// Tooltip distance from the pointer, in pixels.
    pub tooltip_offset: f64,
    pub retry: RetryPolicy,
    pub index: IndexKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boundaries: DataSource::Path("data/zcta.geojson".into()),
            plants: DataSource::Path("data/EnergyPlants.json".into()),
            code_keys: CodeKeys::default(),
            initial_center: [43.073051, -89.401230],
            initial_zoom: 10,
            tiles: TileLayer::default(),
            default_style: PathStyle::boundary_default(),
            highlight_style: PathStyle::boundary_highlight(),
            fit_padding: 80,
            fallback_zoom: 10,
            tooltip_offset: 15.0,
            retry: RetryPolicy::default(),
            index: IndexKind::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid config JSON")
    }

    /// Initial center as a geo coordinate (x = lng, y = lat).
    #[inline]
    pub fn initial_center(&self) -> Coord<f64> {
        Coord { x: self.initial_center[1], y: self.initial_center[0] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_json_str(r#"{
            "plants": "https://example.org/plants.json",
            "codeKeys": ["ZCTA5CE20"],
            "retry": { "maxAttempts": 3 },
            "index": "rtree"
        }"#).unwrap();

        assert_eq!(config.plants, DataSource::Url("https://example.org/plants.json".into()));
        assert_eq!(config.code_keys, CodeKeys::new(["ZCTA5CE20"]));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(200));
        assert_eq!(config.index, IndexKind::Rtree);
        assert_eq!(config.initial_zoom, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_json_str(r#"{ "zoom": 4 }"#).is_err());
    }

    #[test]
    fn center_is_lat_lng() {
        let c = Config::default().initial_center();
        assert_eq!((c.x, c.y), (-89.401230, 43.073051));
    }
}
