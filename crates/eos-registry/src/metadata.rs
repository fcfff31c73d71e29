//! Per-item, per-namespace metadata

use serde_json::Value;
use std::collections::HashMap;

/// Metadata attached to an item under one namespace
///
/// The host platform's metadata model: a bare string value plus a
/// configuration mapping. The engine reads the value for the enable flag
/// and the configuration for scene settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// The namespace's bare value, e.g. `"true"` or `"disabled"`
    pub value: Option<String>,

    /// Keyed configuration, e.g. scene settings
    pub configuration: HashMap<String, Value>,
}

impl Metadata {
    /// Metadata with a bare value and no configuration
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            configuration: HashMap::new(),
        }
    }

    /// Metadata with a configuration mapping and no bare value
    pub fn with_configuration(configuration: HashMap<String, Value>) -> Self {
        Self {
            value: None,
            configuration,
        }
    }
}
