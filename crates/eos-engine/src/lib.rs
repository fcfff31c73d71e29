//! Scene resolution and group traversal for the Eos lighting engine
//!
//! Two cooperating responsibilities form the core:
//!
//! - [`state_for_scene`]: a pure function mapping an item, its active scene,
//!   and the layered scene settings to a concrete device-state string. Any
//!   misconfiguration degrades to the item's unchanged current state.
//! - [`update_scene`] / [`update_group`]: depth-first traversal over a
//!   group's lights and subgroups, applying [`update_light`] to each light
//!   with per-light fault isolation, and gating subgroup recursion on the
//!   `parent` scene sentinel.
//!
//! The engine is synchronous and stateless between invocations; the host
//! platform triggers it (typically from a scene-selector change) and all
//! state lives in the [`eos_registry::ItemRegistry`].

mod error;
mod resolve;
mod settings;
mod update;

pub use error::{ResolveError, ResolveResult, UpdateError};
pub use resolve::{state_for_scene, SceneType};
pub use settings::SettingLookup;
pub use update::{update_group, update_light, update_scene, UpdateOutcome};
