use std::path::Path;

use serde::Deserialize;

use crate::description::FieldPolicy;
use crate::light::PlatformVersion;
use crate::model_resolver::ModelLocations;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub models: ModelLocations,
    pub platform: PlatformVersion,
    pub field_policy: FieldPolicy,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl BridgeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
