//! The top-level engine configuration

use crate::defaults::SceneDefaults;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration for the lighting engine
///
/// Passed explicitly into the resolver and traversal code; nothing in the
/// engine reads process-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EosConfig {
    /// Metadata namespace holding scene settings and the enable flag
    pub namespace: String,

    /// Decimal places used when comparing numeric states before a command
    pub float_precision: u32,

    /// Configured default scene settings, layered under item metadata
    pub scene_defaults: SceneDefaults,
}

impl Default for EosConfig {
    fn default() -> Self {
        Self {
            namespace: "eos".to_string(),
            float_precision: 3,
            scene_defaults: SceneDefaults::builtin(),
        }
    }
}

impl EosConfig {
    /// Load configuration from a YAML file
    ///
    /// Scene defaults from the file are layered over the built-in `on`/`off`
    /// defaults, so a partial file only overrides what it mentions.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading engine configuration from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: EosConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.scene_defaults = config.scene_defaults.over_builtin();

        Ok(config)
    }
}
