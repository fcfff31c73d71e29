//! Layered settings lookup
//!
//! A setting for a (light, scene) pair can live in four places, checked most
//! to least specific:
//!
//! 1. the scene's entry in the item's metadata configuration
//! 2. the item's metadata configuration itself (item-level default)
//! 3. the configured type+scene defaults
//! 4. the configured type-level defaults
//!
//! The first layer where the key is *present* decides the outcome, even when
//! the stored value is an explicit `null` (which means "no value" and stops
//! the search). Probing can be capped at a shallower layer; scene-type
//! inference relies on this to find the most specific layer that defines any
//! scene settings at all.

use eos_config::SceneDefaults;
use eos_core::LightType;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// All four layers enabled
pub(crate) const DEPTH_ALL: u8 = 4;

/// An ordered view over the settings layers for one item and scene
pub struct SettingLookup<'a> {
    item_name: &'a str,
    scene: &'a str,
    light_type: LightType,
    metadata: &'a HashMap<String, Value>,
    defaults: &'a SceneDefaults,
}

impl<'a> SettingLookup<'a> {
    pub fn new(
        item_name: &'a str,
        scene: &'a str,
        light_type: LightType,
        metadata: &'a HashMap<String, Value>,
        defaults: &'a SceneDefaults,
    ) -> Self {
        Self {
            item_name,
            scene,
            light_type,
            metadata,
            defaults,
        }
    }

    /// Look up a setting across all enabled layers
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.get_at(key, DEPTH_ALL)
    }

    /// Look up a setting, consulting only the first `depth` layers (1..=4)
    pub fn get_at(&self, key: &str, depth: u8) -> Option<&'a Value> {
        let (value, layer) = self.first_present(key, depth)?;
        match value {
            Value::Null => {
                debug!(
                    item = %self.item_name,
                    scene = %self.scene,
                    key,
                    layer,
                    "Setting is explicitly null, treating as no value"
                );
                None
            }
            value => {
                debug!(
                    item = %self.item_name,
                    scene = %self.scene,
                    key,
                    layer,
                    ?value,
                    "Resolved setting"
                );
                Some(value)
            }
        }
    }

    /// Find the first enabled layer where the key is present
    fn first_present(&self, key: &str, depth: u8) -> Option<(&'a Value, &'static str)> {
        if depth >= 1 {
            if let Some(Value::Object(scene_settings)) = self.metadata.get(self.scene) {
                if let Some(value) = scene_settings.get(key) {
                    return Some((value, "item-scene"));
                }
            }
        }
        if depth >= 2 {
            if let Some(value) = self.metadata.get(key) {
                return Some((value, "item-default"));
            }
        }
        if depth >= 3 {
            if let Some(value) = self.defaults.scene_setting(self.light_type, self.scene, key) {
                return Some((value, "type-scene"));
            }
        }
        if depth >= 4 {
            if let Some(value) = self.defaults.type_setting(self.light_type, key) {
                return Some((value, "type-default"));
            }
        }
        debug!(
            item = %self.item_name,
            scene = %self.scene,
            key,
            depth,
            "No value found"
        );
        None
    }
}
