use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    geom::Viewport,
    layer::{LayerStyle, MetricLabel},
    scale::Palette,
    view::TransitionConfig,
    MapError,
};

/// Every tunable of the map. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: Viewport,
    /// Flip y for latitude-style (y-up) geometry. Pre-projected input is y-down.
    pub reflect_y: bool,
    pub transition: TransitionConfig,
    pub style: LayerStyle,
    pub palette: Palette,
    pub label: MetricLabel,
}

impl MapConfig {
    /// Parse and validate. Transition bounds outside `[1, 8]` are rejected.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid map configuration")?;
        config.validate().context("Invalid map configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        self.transition.validate()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load config {}", path.display()))
    }
}
