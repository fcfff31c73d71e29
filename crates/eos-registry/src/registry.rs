//! The item/group registry and command dispatch

use crate::metadata::Metadata;
use dashmap::DashMap;
use eos_core::{is_parent, Item, ItemType, SCENE_MANUAL};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of items, group membership, and metadata
///
/// The registry is responsible for:
/// - Storing items and their current states
/// - Tracking group membership (each item has at most one parent group)
/// - Storing per-item, per-namespace metadata
/// - Dispatching commands, skipping those that would not change state
pub struct ItemRegistry {
    /// All items keyed by name
    items: DashMap<String, Item>,
    /// Direct members of each group, in insertion order
    members: DashMap<String, Vec<String>>,
    /// Parent group of each item
    parents: DashMap<String, String>,
    /// Metadata keyed by item name, then namespace
    metadata: DashMap<String, HashMap<String, Metadata>>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            members: DashMap::new(),
            parents: DashMap::new(),
            metadata: DashMap::new(),
        }
    }

    /// Add or replace an item
    pub fn add_item(&self, item: Item) {
        self.items.insert(item.name.clone(), item);
    }

    /// Get an item by name
    pub fn item(&self, name: &str) -> Option<Item> {
        self.items.get(name).map(|i| i.clone())
    }

    /// Get an item's current state string
    pub fn state(&self, name: &str) -> Option<String> {
        self.items.get(name).map(|i| i.state.clone())
    }

    /// Set an item's state, returning false if the item is unknown
    pub fn set_state(&self, name: &str, state: impl Into<String>) -> bool {
        match self.items.get_mut(name) {
            Some(mut item) => {
                item.state = state.into();
                true
            }
            None => false,
        }
    }

    /// Record `member` as a direct member of `group`
    ///
    /// An item has at most one parent group; adding it to a second group
    /// moves it.
    pub fn add_to_group(&self, group: &str, member: &str) {
        if let Some(previous) = self.parents.insert(member.to_string(), group.to_string()) {
            if previous != group {
                if let Some(mut siblings) = self.members.get_mut(&previous) {
                    siblings.retain(|name| name != member);
                }
            }
        }
        let mut members = self.members.entry(group.to_string()).or_default();
        if !members.iter().any(|name| name == member) {
            members.push(member.to_string());
        }
    }

    /// The parent group of an item, if any
    pub fn parent_group(&self, name: &str) -> Option<String> {
        self.parents.get(name).map(|g| g.clone())
    }

    /// Names of the direct members of a group, including names that no
    /// longer resolve to an item
    pub fn member_names(&self, group: &str) -> Vec<String> {
        self.members
            .get(group)
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    /// Direct members of a group
    pub fn members(&self, group: &str) -> Vec<Item> {
        self.member_names(group)
            .iter()
            .filter_map(|n| self.item(n))
            .collect()
    }

    /// Direct members of a group that map to a light class
    pub fn light_members(&self, group: &str) -> Vec<Item> {
        self.members(group)
            .into_iter()
            .filter(|item| item.is_light())
            .collect()
    }

    /// Direct members of a group that are themselves groups
    pub fn group_members(&self, group: &str) -> Vec<Item> {
        self.members(group)
            .into_iter()
            .filter(|item| item.is_group())
            .collect()
    }

    /// The scene-selector member of a group, if it has one
    pub fn scene_item(&self, group: &str) -> Option<Item> {
        self.members(group)
            .into_iter()
            .find(|item| item.item_type == ItemType::Scene)
    }

    /// The nearest enclosing group of `name` that carries a scene item
    ///
    /// For a group with its own scene item this is the group itself; for
    /// lights and scene items it is found by walking up the parent chain.
    pub fn scene_group(&self, name: &str) -> Option<Item> {
        let mut visited = HashSet::new();
        let mut current = self.item(name)?;
        loop {
            if current.is_group() && self.scene_item(&current.name).is_some() {
                return Some(current);
            }
            if !visited.insert(current.name.clone()) {
                warn!(item = %name, "Group membership cycle while resolving scene group");
                return None;
            }
            let parent = self.parent_group(&current.name)?;
            current = self.item(&parent)?;
        }
    }

    /// Resolve the active scene for an item
    ///
    /// Reads the scene item of the item's scene group, lowercased. The
    /// `parent` sentinel defers to the next enclosing scene group; when the
    /// whole chain is `parent` there is no concrete scene and the result
    /// degrades to `manual`.
    pub fn scene_for_item(&self, name: &str) -> Option<String> {
        let mut visited = HashSet::new();
        let mut group = self.scene_group(name)?;
        loop {
            let scene_item = self.scene_item(&group.name)?;
            let scene = scene_item.state.to_ascii_lowercase();
            if !is_parent(&scene) {
                return Some(scene);
            }
            if !visited.insert(group.name.clone()) {
                warn!(item = %name, group = %group.name, "Group membership cycle while resolving scene");
                return None;
            }
            let enclosing = self
                .parent_group(&group.name)
                .and_then(|parent| self.scene_group(&parent));
            match enclosing {
                Some(parent_group) => group = parent_group,
                None => {
                    warn!(
                        item = %name,
                        group = %group.name,
                        "Scene is 'parent' but no enclosing scene group exists, treating as manual"
                    );
                    return Some(SCENE_MANUAL.to_string());
                }
            }
        }
    }

    /// Attach metadata to an item under a namespace
    pub fn set_metadata(&self, name: &str, namespace: &str, metadata: Metadata) {
        self.metadata
            .entry(name.to_string())
            .or_default()
            .insert(namespace.to_string(), metadata);
    }

    /// The bare metadata value for an item in a namespace
    pub fn metadata_value(&self, name: &str, namespace: &str) -> Option<String> {
        self.metadata
            .get(name)?
            .get(namespace)?
            .value
            .clone()
    }

    /// The metadata configuration mapping for an item in a namespace
    pub fn metadata_configuration(&self, name: &str, namespace: &str) -> HashMap<String, Value> {
        self.metadata
            .get(name)
            .and_then(|namespaces| namespaces.get(namespace).map(|m| m.configuration.clone()))
            .unwrap_or_default()
    }

    /// Send a command unless it would leave the state unchanged
    ///
    /// Numeric states are compared to `precision` decimal places; comma
    /// lists of numbers (HSB states) are compared elementwise the same way;
    /// anything else is compared as exact strings. Returns true only if a
    /// command was actually issued.
    pub fn send_command_if_changed(&self, name: &str, command: &str, precision: u32) -> bool {
        let Some(current) = self.state(name) else {
            warn!(item = %name, "Cannot send command to unknown item");
            return false;
        };
        if states_equal(&current, command, precision) {
            debug!(item = %name, %command, "Command matches current state, not sent");
            return false;
        }
        self.set_state(name, command);
        debug!(item = %name, %command, previous = %current, "Command sent");
        true
    }

    /// The total number of items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to a registry
pub type SharedItemRegistry = Arc<ItemRegistry>;

fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

/// Compare two state strings with limited numeric precision
fn states_equal(a: &str, b: &str, precision: u32) -> bool {
    if let (Ok(a), Ok(b)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        return round_to(a, precision) == round_to(b, precision);
    }
    let a_parts: Vec<&str> = a.split(',').collect();
    let b_parts: Vec<&str> = b.split(',').collect();
    if a_parts.len() == b_parts.len() && a_parts.len() > 1 {
        let numeric = a_parts
            .iter()
            .zip(&b_parts)
            .map(|(x, y)| Some((x.trim().parse::<f64>().ok()?, y.trim().parse::<f64>().ok()?)))
            .collect::<Option<Vec<_>>>();
        if let Some(pairs) = numeric {
            return pairs
                .iter()
                .all(|(x, y)| round_to(*x, precision) == round_to(*y, precision));
        }
    }
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_core::LightType;

    fn make_registry() -> ItemRegistry {
        let registry = ItemRegistry::new();
        registry.add_item(Item::undefined("gLiving", ItemType::Group));
        registry.add_item(Item::new("Living_Scene", ItemType::Scene, "evening"));
        registry.add_item(Item::new("Living_Lamp", ItemType::Dimmer, "40"));
        registry.add_to_group("gLiving", "Living_Scene");
        registry.add_to_group("gLiving", "Living_Lamp");
        registry
    }

    #[test]
    fn test_membership_queries() {
        let registry = make_registry();
        registry.add_item(Item::undefined("gReading", ItemType::Group));
        registry.add_to_group("gLiving", "gReading");

        assert_eq!(registry.members("gLiving").len(), 3);
        assert_eq!(registry.light_members("gLiving").len(), 1);
        assert_eq!(registry.group_members("gLiving").len(), 1);
        assert_eq!(
            registry.scene_item("gLiving").unwrap().name,
            "Living_Scene"
        );
        assert_eq!(
            LightType::of(registry.light_members("gLiving")[0].item_type),
            Some(LightType::Dimmer)
        );
    }

    #[test]
    fn test_scene_group_walks_parents() {
        let registry = make_registry();
        assert_eq!(registry.scene_group("Living_Lamp").unwrap().name, "gLiving");
        assert_eq!(registry.scene_group("Living_Scene").unwrap().name, "gLiving");
        assert_eq!(registry.scene_group("gLiving").unwrap().name, "gLiving");
    }

    #[test]
    fn test_scene_for_item() {
        let registry = make_registry();
        assert_eq!(
            registry.scene_for_item("Living_Lamp").as_deref(),
            Some("evening")
        );
    }

    #[test]
    fn test_scene_for_item_parent_chain() {
        let registry = make_registry();
        registry.add_item(Item::undefined("gReading", ItemType::Group));
        registry.add_item(Item::new("Reading_Scene", ItemType::Scene, "PARENT"));
        registry.add_item(Item::new("Reading_Lamp", ItemType::Switch, "OFF"));
        registry.add_to_group("gLiving", "gReading");
        registry.add_to_group("gReading", "Reading_Scene");
        registry.add_to_group("gReading", "Reading_Lamp");

        // the subgroup defers to the enclosing group's scene
        assert_eq!(
            registry.scene_for_item("Reading_Lamp").as_deref(),
            Some("evening")
        );
    }

    #[test]
    fn test_scene_parent_at_root_degrades_to_manual() {
        let registry = ItemRegistry::new();
        registry.add_item(Item::undefined("gTop", ItemType::Group));
        registry.add_item(Item::new("Top_Scene", ItemType::Scene, "parent"));
        registry.add_item(Item::new("Top_Light", ItemType::Switch, "ON"));
        registry.add_to_group("gTop", "Top_Scene");
        registry.add_to_group("gTop", "Top_Light");

        assert_eq!(
            registry.scene_for_item("Top_Light").as_deref(),
            Some(SCENE_MANUAL)
        );
    }

    #[test]
    fn test_metadata_store() {
        let registry = make_registry();
        let mut configuration = HashMap::new();
        configuration.insert("state".to_string(), serde_json::json!(80));
        registry.set_metadata(
            "Living_Lamp",
            "eos",
            Metadata {
                value: Some("true".to_string()),
                configuration: configuration.clone(),
            },
        );

        assert_eq!(
            registry.metadata_value("Living_Lamp", "eos").as_deref(),
            Some("true")
        );
        assert_eq!(
            registry.metadata_configuration("Living_Lamp", "eos"),
            configuration
        );
        assert!(registry.metadata_value("Living_Lamp", "other").is_none());
        assert!(registry.metadata_configuration("gLiving", "eos").is_empty());
    }

    #[test]
    fn test_send_command_skips_equal_states() {
        let registry = make_registry();
        assert!(!registry.send_command_if_changed("Living_Lamp", "40", 3));
        // within precision, no command
        assert!(!registry.send_command_if_changed("Living_Lamp", "40.0001", 3));
        assert!(registry.send_command_if_changed("Living_Lamp", "60", 3));
        assert_eq!(registry.state("Living_Lamp").as_deref(), Some("60"));
    }

    #[test]
    fn test_send_command_compares_hsb_elementwise() {
        let registry = make_registry();
        registry.add_item(Item::new("Hue_Strip", ItemType::Color, "120,50,75"));
        assert!(!registry.send_command_if_changed("Hue_Strip", "120.0,50.0,75.0", 3));
        assert!(registry.send_command_if_changed("Hue_Strip", "120,50,80", 3));
    }

    #[test]
    fn test_send_command_unknown_item() {
        let registry = make_registry();
        assert!(!registry.send_command_if_changed("Missing", "ON", 3));
    }

    #[test]
    fn test_regroup_moves_member() {
        let registry = make_registry();
        registry.add_item(Item::undefined("gOther", ItemType::Group));
        registry.add_to_group("gOther", "Living_Lamp");

        assert!(registry
            .light_members("gLiving")
            .iter()
            .all(|item| item.name != "Living_Lamp"));
        assert_eq!(registry.light_members("gOther").len(), 1);
        assert_eq!(registry.parent_group("Living_Lamp").as_deref(), Some("gOther"));
    }
}
