//! In-process item registry for the Eos lighting engine
//!
//! This crate realizes the collaborator contracts the engine consumes: an
//! item/group registry with membership and scene association, a per-item
//! metadata store, and command dispatch that only issues a command when the
//! new state actually differs from the current one.
//!
//! The registry is DashMap-backed and synchronous; each engine invocation
//! reads its own consistent snapshot and the registry holds no per-call
//! state.

mod metadata;
mod registry;

pub use metadata::Metadata;
pub use registry::{ItemRegistry, SharedItemRegistry};
