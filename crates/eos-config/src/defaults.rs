//! Configured default scene settings, keyed by light type
//!
//! Metadata on an item always wins; these defaults form the two outermost
//! layers of the settings lookup: per-type-per-scene settings, then
//! per-type settings applying to every scene of that type.

use eos_core::{LightType, KEY_STATE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A flat map of setting key to value for one scene or one type
pub type Settings = HashMap<String, Value>;

/// Default settings for one light type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDefaults {
    /// Per-scene settings, keyed by lowercase scene name
    #[serde(default)]
    pub scenes: HashMap<String, Settings>,

    /// Settings applying to every scene of this type
    #[serde(default)]
    pub defaults: Settings,
}

/// Default scene settings for all light types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneDefaults(HashMap<LightType, TypeDefaults>);

impl SceneDefaults {
    /// An empty set of defaults
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in defaults for the `on` and `off` scenes
    ///
    /// Switches get fixed ON/OFF states; dimmers and color lights get full
    /// and zero brightness (a bare number on a color light keeps its current
    /// hue and saturation).
    pub fn builtin() -> Self {
        let mut defaults = Self::default();
        defaults.set_scene_setting(LightType::Switch, "on", KEY_STATE, json!("ON"));
        defaults.set_scene_setting(LightType::Switch, "off", KEY_STATE, json!("OFF"));
        defaults.set_scene_setting(LightType::Dimmer, "on", KEY_STATE, json!(100));
        defaults.set_scene_setting(LightType::Dimmer, "off", KEY_STATE, json!(0));
        defaults.set_scene_setting(LightType::Color, "on", KEY_STATE, json!(100));
        defaults.set_scene_setting(LightType::Color, "off", KEY_STATE, json!(0));
        defaults
    }

    /// Look up a setting in the type+scene layer
    ///
    /// Presence is meaningful: a key stored as explicit `null` is returned
    /// as `Some(&Value::Null)`, which the resolver treats as "no value".
    pub fn scene_setting(&self, light_type: LightType, scene: &str, key: &str) -> Option<&Value> {
        self.0
            .get(&light_type)?
            .scenes
            .get(&scene.to_ascii_lowercase())?
            .get(key)
    }

    /// Look up a setting in the type layer
    pub fn type_setting(&self, light_type: LightType, key: &str) -> Option<&Value> {
        self.0.get(&light_type)?.defaults.get(key)
    }

    /// Set a setting in the type+scene layer
    pub fn set_scene_setting(
        &mut self,
        light_type: LightType,
        scene: &str,
        key: &str,
        value: Value,
    ) {
        self.0
            .entry(light_type)
            .or_default()
            .scenes
            .entry(scene.to_ascii_lowercase())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Set a setting in the type layer
    pub fn set_type_setting(&mut self, light_type: LightType, key: &str, value: Value) {
        self.0
            .entry(light_type)
            .or_default()
            .defaults
            .insert(key.to_string(), value);
    }

    /// Layer these defaults over the built-ins
    ///
    /// Scene maps from `self` replace built-in scene maps wholesale;
    /// built-in scenes not mentioned here survive.
    pub fn over_builtin(self) -> Self {
        let mut merged = Self::builtin();
        for (light_type, type_defaults) in self.0 {
            let target = merged.0.entry(light_type).or_default();
            for (scene, settings) in type_defaults.scenes {
                target.scenes.insert(scene, settings);
            }
            for (key, value) in type_defaults.defaults {
                target.defaults.insert(key, value);
            }
        }
        merged
    }
}
