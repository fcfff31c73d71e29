//! Core types for the Eos lighting engine
//!
//! This crate provides the fundamental vocabulary shared by the registry,
//! configuration, and resolution crates: items and their types, light-type
//! classes, scene name sentinels, state-string parsing helpers, and the
//! `RawState` sum type produced by scene resolution before device encoding.

mod item;
mod scene;
mod state;

pub use item::{Item, ItemType, ItemTypeError, LightType};
pub use scene::{is_manual, is_parent, SCENE_MANUAL, SCENE_OFF, SCENE_ON, SCENE_PARENT};
pub use state::{constrain, is_undefined, parse_level, value_as_f64, RawState};

/// Metadata key holding a fixed target state
pub const KEY_STATE: &str = "state";

/// Metadata key naming the item whose numeric state drives
/// threshold and scaled scenes
pub const KEY_LEVEL_SOURCE: &str = "level_source";

/// Metadata key for the threshold a level is compared against
pub const KEY_LEVEL_THRESHOLD: &str = "level_threshold";

/// Metadata key for the upper bound of a scaled scene's level range
pub const KEY_LEVEL_HIGH: &str = "level_high";

/// Metadata key for the lower bound of a scaled scene's level range
pub const KEY_LEVEL_LOW: &str = "level_low";

/// Metadata key for the state at or above the upper level bound
pub const KEY_STATE_ABOVE: &str = "state_above";

/// Metadata key for the state at or below the lower level bound
pub const KEY_STATE_BELOW: &str = "state_below";

/// Metadata key for the state at the upper end of a scaled range
pub const KEY_STATE_HIGH: &str = "state_high";

/// Metadata key for the state at the lower end of a scaled range
pub const KEY_STATE_LOW: &str = "state_low";
