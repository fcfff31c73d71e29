//! Light updates and group traversal
//!
//! Traversal visits a group's light members first, then recurses into its
//! subgroups, depth-first. Each light is updated in isolation: a failure is
//! captured, logged, and the loop continues, so one bad light never aborts
//! its siblings. Subgroup recursion is gated on the `parent` scene sentinel
//! when requested and carries a visited set so cyclic group membership
//! cannot recurse forever.

use crate::error::UpdateError;
use crate::resolve::state_for_scene;
use eos_config::EosConfig;
use eos_core::{is_manual, is_parent, Item, ItemType};
use eos_registry::ItemRegistry;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What a light update did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The item's enable flag is off; nothing was done
    Disabled,
    /// The active scene is `manual`; nothing was done
    ManualScene,
    /// A command was sent with this state
    CommandSent(String),
    /// The resolved state matched the current one; no command was sent
    Unchanged(String),
}

/// Update a single light from its active scene
///
/// Skips disabled items (namespace metadata value `false` or `disabled`,
/// case-insensitively) and items whose scene is the `manual` sentinel.
/// Otherwise resolves the target state and sends a command only if it
/// differs from the current state.
pub fn update_light(
    registry: &ItemRegistry,
    config: &EosConfig,
    name: &str,
) -> Result<UpdateOutcome, UpdateError> {
    let item = registry
        .item(name)
        .ok_or_else(|| UpdateError::ItemNotFound(name.to_string()))?;
    if !item.is_light() {
        return Err(UpdateError::NotALight {
            name: name.to_string(),
            item_type: item.item_type,
        });
    }

    if let Some(flag) = registry.metadata_value(name, &config.namespace) {
        let flag = flag.to_ascii_lowercase();
        if flag == "false" || flag == "disabled" {
            debug!(item = %name, "Skipping update for disabled light");
            return Ok(UpdateOutcome::Disabled);
        }
    }
    debug!(item = %name, "Processing light update");

    let scene = registry
        .scene_for_item(name)
        .ok_or_else(|| UpdateError::NoScene(name.to_string()))?;
    debug!(item = %name, scene = %scene, "Resolved active scene");

    if is_manual(&scene) {
        debug!(item = %name, "Scene is manual, no action taken");
        return Ok(UpdateOutcome::ManualScene);
    }

    let new_state = state_for_scene(registry, config, &item, &scene);
    if registry.send_command_if_changed(name, &new_state, config.float_precision) {
        debug!(item = %name, state = %new_state, "Command sent to light");
        Ok(UpdateOutcome::CommandSent(new_state))
    } else {
        debug!(item = %name, state = %new_state, "No command sent to light");
        Ok(UpdateOutcome::Unchanged(new_state))
    }
}

/// Update every light reachable from the scene group enclosing `trigger`
///
/// Entry point for a scene-selector change: the trigger's scene group is
/// resolved, its lights are updated, and its subgroups are recursed with
/// the `parent`-sentinel gate enabled.
pub fn update_scene(
    registry: &ItemRegistry,
    config: &EosConfig,
    trigger: &str,
) -> Result<(), UpdateError> {
    let group = registry
        .scene_group(trigger)
        .ok_or_else(|| UpdateError::NoSceneGroup(trigger.to_string()))?;
    debug!(trigger, group = %group.name, "Updating scene group");

    // the triggering group's own lights are updated unconditionally; its
    // subgroups only follow along if their scene is the parent sentinel
    let mut visited = HashSet::new();
    visited.insert(group.name.clone());
    for subgroup in update_lights_collect_subgroups(registry, config, &group) {
        visit_group(registry, config, &subgroup, true, &mut visited);
    }
    Ok(())
}

/// Update a group's lights and subgroups
///
/// With `only_if_scene_parent` set, a group whose own scene state is not the
/// `parent` sentinel is skipped entirely (it has an independent scene that
/// must not be overridden).
pub fn update_group(
    registry: &ItemRegistry,
    config: &EosConfig,
    group: &str,
    only_if_scene_parent: bool,
) -> Result<(), UpdateError> {
    let item = registry
        .item(group)
        .ok_or_else(|| UpdateError::ItemNotFound(group.to_string()))?;
    if !item.is_group() {
        return Err(UpdateError::NotAGroup {
            name: group.to_string(),
            item_type: item.item_type,
        });
    }

    let mut visited = HashSet::new();
    visit_group(registry, config, &item, only_if_scene_parent, &mut visited);
    Ok(())
}

fn visit_group(
    registry: &ItemRegistry,
    config: &EosConfig,
    group: &Item,
    only_if_scene_parent: bool,
    visited: &mut HashSet<String>,
) {
    if only_if_scene_parent {
        let scene_state = registry
            .scene_item(&group.name)
            .map(|item| item.state.to_ascii_lowercase());
        if !scene_state.as_deref().is_some_and(is_parent) {
            debug!(
                group = %group.name,
                scene = scene_state.as_deref().unwrap_or("<none>"),
                "Group has its own scene, skipping subtree"
            );
            return;
        }
    }
    if !visited.insert(group.name.clone()) {
        warn!(group = %group.name, "Group already visited, membership cycle detected");
        return;
    }

    for subgroup in update_lights_collect_subgroups(registry, config, group) {
        visit_group(registry, config, &subgroup, only_if_scene_parent, visited);
    }
}

/// Update the light members of a group, isolating per-light failures, and
/// collect its subgroup members for recursion (lights first, then subgroups)
fn update_lights_collect_subgroups(
    registry: &ItemRegistry,
    config: &EosConfig,
    group: &Item,
) -> Vec<Item> {
    let mut subgroups = Vec::new();
    for member in registry.member_names(&group.name) {
        match registry.item(&member) {
            Some(item) if item.item_type == ItemType::Scene => {}
            Some(item) if item.is_group() => subgroups.push(item),
            Some(item) if item.is_light() => {
                if let Err(error) = update_light(registry, config, &item.name) {
                    warn!(light = %item.name, %error, "Light update failed, continuing");
                }
            }
            Some(_) => {}
            None => {
                warn!(member = %member, group = %group.name, "Group member does not exist, skipping");
            }
        }
    }
    subgroups
}
