use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use tracing::info;

use crate::{io::geojson::read_features_from_geojson_bytes, types::GeometrySet, MapError};

/// Supplies the immutable state and county geometry, once, at mount.
pub trait GeometrySource {
    fn load(&self) -> Result<GeometrySet, MapError>;
}

/// An already-resolved geometry set.
impl GeometrySource for GeometrySet {
    fn load(&self) -> Result<GeometrySet, MapError> { Ok(self.clone()) }
}

/// Reads states and counties from two GeoJSON FeatureCollection files.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    states: PathBuf,
    counties: PathBuf,
}

impl GeoJsonSource {
    pub fn new(states: impl Into<PathBuf>, counties: impl Into<PathBuf>) -> Self {
        Self { states: states.into(), counties: counties.into() }
    }

    /// Parse both collections from in-memory bytes.
    pub fn from_bytes(states: &[u8], counties: &[u8]) -> Result<GeometrySet> {
        Ok(GeometrySet {
            states: read_features_from_geojson_bytes(states).context("Failed to read state features")?,
            counties: read_features_from_geojson_bytes(counties).context("Failed to read county features")?,
        })
    }

    fn read(&self) -> Result<GeometrySet> {
        let states = read_file(&self.states)?;
        let counties = read_file(&self.counties)?;
        Self::from_bytes(&states, &counties)
    }
}

impl GeometrySource for GeoJsonSource {
    fn load(&self) -> Result<GeometrySet, MapError> {
        let set = self.read().map_err(|err| MapError::GeometryLoad(format!("{err:#}")))?;
        info!(states = set.states.len(), counties = set.counties.len(), "loaded geometry");
        Ok(set)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
