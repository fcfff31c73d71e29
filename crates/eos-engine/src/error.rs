//! Error types for scene resolution and light updates

use crate::resolve::SceneType;
use eos_core::{ItemType, LightType, RawState};
use thiserror::Error;

/// Result type for the internal resolution steps
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Why a scene could not be resolved to a target state
///
/// Every variant is absorbed at the [`crate::state_for_scene`] boundary:
/// it is logged and the item's current state is returned unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// The item's type does not map onto a light class
    #[error("item type '{item_type}' does not map to a light type")]
    UnknownLightType { item_type: ItemType },

    /// No scene type could be inferred from the metadata layers
    #[error("no scene type could be determined for scene '{scene}'")]
    UnknownSceneType { scene: String },

    /// A required setting was absent (or explicitly null) at every layer
    #[error("no '{key}' setting found for scene '{scene}'")]
    MissingSetting { key: &'static str, scene: String },

    /// The level-source item does not exist
    #[error("level source item '{name}' does not exist")]
    ItemNotFound { name: String },

    /// The level-source item's state is undefined or not numeric
    ///
    /// The field cannot be called `source`: thiserror reserves that name
    /// for error chaining and would require it to implement `Error`.
    #[error("level source item '{item}' has no usable numeric state")]
    UnresolvableLevel { item: String },

    /// A setting value's shape does not fit its use
    #[error("value for '{key}' has an unusable shape")]
    InvalidShape { key: &'static str },

    /// The inferred scene type cannot apply to this light class
    #[error("{scene_type} scenes are not valid for {light_type} items")]
    InvalidCombination {
        scene_type: SceneType,
        light_type: LightType,
    },

    /// The computed raw state cannot be encoded for this light class
    #[error("computed state {raw:?} is not valid for {light_type} items")]
    InvalidEncoding { raw: RawState, light_type: LightType },
}

/// Errors surfaced by light update and group traversal entry points
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpdateError {
    /// The named item does not exist
    #[error("item '{0}' does not exist")]
    ItemNotFound(String),

    /// The named item is not a light
    #[error("item '{name}' is a {item_type}, not a light")]
    NotALight { name: String, item_type: ItemType },

    /// The named item is not a group
    #[error("item '{name}' is a {item_type}, not a group")]
    NotAGroup { name: String, item_type: ItemType },

    /// No scene group encloses the item
    #[error("no scene group encloses '{0}'")]
    NoSceneGroup(String),

    /// The active scene could not be resolved
    #[error("no scene could be resolved for '{0}'")]
    NoScene(String),
}
