//! Configuration for the Eos lighting engine
//!
//! Provides the [`EosConfig`] passed into resolution and traversal (metadata
//! namespace, numeric comparison precision, and configured scene defaults)
//! and YAML loading for it. The scene defaults form the two outermost layers
//! of the settings lookup; see `eos-engine` for the lookup order.

mod config;
mod defaults;
mod error;

pub use config::EosConfig;
pub use defaults::{SceneDefaults, Settings, TypeDefaults};
pub use error::{ConfigError, ConfigResult};
