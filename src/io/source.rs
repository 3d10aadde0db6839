use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::feature::{BoundaryCollection, CodeKeys, PointCollection};

use super::{read_boundaries, read_points};

/// Where a feature collection comes from: an HTTP(S) URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl TryFrom<String> for DataSource {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self { source.to_string() }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the raw bytes behind a source. URLs must answer with a success status.
pub fn fetch_bytes(source: &DataSource) -> Result<Vec<u8>> {
    match source {
        DataSource::Path(path) => std::fs::read(path)
            .with_context(|| format!("read {}", path.display())),
        DataSource::Url(url) => fetch_url(url),
    }
}

#[cfg(feature = "download")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;
    Ok(resp.bytes().with_context(|| format!("read body of {url}"))?.to_vec())
}

#[cfg(not(feature = "download"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    anyhow::bail!("Cannot fetch {url}: built without the \"download\" feature")
}

/// Fetch and parse the boundary collection.
pub fn load_boundaries(source: &DataSource, keys: &CodeKeys) -> Result<BoundaryCollection> {
    info!("loading boundaries from {source}");
    let bytes = fetch_bytes(source)?;
    read_boundaries(&bytes, keys).with_context(|| format!("boundaries from {source}"))
}

/// Fetch and parse the plant collection.
pub fn load_points(source: &DataSource) -> Result<PointCollection> {
    info!("loading plants from {source}");
    let bytes = fetch_bytes(source)?;
    read_points(&bytes).with_context(|| format!("plants from {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!("https://example.org/z.json".parse::<DataSource>().unwrap(),
                   DataSource::Url("https://example.org/z.json".into()));
        assert_eq!("data/z.json".parse::<DataSource>().unwrap(),
                   DataSource::Path("data/z.json".into()));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type":"FeatureCollection","features":[
            {{"type":"Feature","properties":{{"name":"A","primarySource":"Wind"}},
              "geometry":{{"type":"Point","coordinates":[1.0,2.0]}}}}]}}"#).unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let points = load_points(&source).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = DataSource::Path("/definitely/not/here.geojson".into());
        assert!(load_points(&source).is_err());
    }
}
