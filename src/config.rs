use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

// Configuration for the mapper: a table of well-known CIDR names and the
// default rendering parameters. Loaded once and passed by reference; there
// is no process-global configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub common_cidrs: BTreeMap<String, String>,
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub default_engine: String,
    pub node_size: u32,
    pub font_size: u32,
    pub edge_width: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            default_engine: "dot".to_string(),
            node_size: 2000,
            font_size: 8,
            edge_width: 1,
        }
    }
}

impl MapperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}
