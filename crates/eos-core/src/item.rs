//! Item vocabulary: item types, the light-type classes, and the Item record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for unrecognized item-type names
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown item type '{0}'")]
pub struct ItemTypeError(pub String);

/// The kinds of items known to the engine
///
/// Mirrors the host platform's item vocabulary, restricted to the kinds the
/// engine cares about. `Scene` is the selector item that carries a group's
/// active scene name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Switch,
    Dimmer,
    Color,
    Rollershutter,
    Number,
    String,
    Group,
    Scene,
}

impl ItemType {
    /// Canonical lowercase name of this item type
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Switch => "switch",
            ItemType::Dimmer => "dimmer",
            ItemType::Color => "color",
            ItemType::Rollershutter => "rollershutter",
            ItemType::Number => "number",
            ItemType::String => "string",
            ItemType::Group => "group",
            ItemType::Scene => "scene",
        }
    }
}

impl FromStr for ItemType {
    type Err = ItemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "switch" => Ok(ItemType::Switch),
            "dimmer" => Ok(ItemType::Dimmer),
            "color" => Ok(ItemType::Color),
            "rollershutter" => Ok(ItemType::Rollershutter),
            "number" => Ok(ItemType::Number),
            "string" => Ok(ItemType::String),
            "group" => Ok(ItemType::Group),
            "scene" => Ok(ItemType::Scene),
            other => Err(ItemTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The device-type class a light resolves to
///
/// This determines the expected shape and clamping rules of the encoded
/// target state: on/off for switches, a 0-100 percentage for dimmers, and
/// an "H,S,V" triple for color lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    Switch,
    Dimmer,
    Color,
}

impl LightType {
    /// Map an item type onto a light class
    ///
    /// Rollershutters are percent-valued actuators and resolve like dimmers.
    /// Non-light item types map to `None`.
    pub fn of(item_type: ItemType) -> Option<LightType> {
        match item_type {
            ItemType::Switch => Some(LightType::Switch),
            ItemType::Dimmer | ItemType::Rollershutter => Some(LightType::Dimmer),
            ItemType::Color => Some(LightType::Color),
            _ => None,
        }
    }

    /// Map a platform item-type name onto a light class, case-insensitively
    pub fn from_item_type(item_type: &str) -> Option<LightType> {
        item_type
            .parse::<ItemType>()
            .ok()
            .and_then(LightType::of)
    }

    /// Canonical lowercase name of this light class
    pub fn as_str(&self) -> &'static str {
        match self {
            LightType::Switch => "switch",
            LightType::Dimmer => "dimmer",
            LightType::Color => "color",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item: a named, typed entity whose state is a string
///
/// States are kept as strings and parsed on demand, matching the host
/// platform's stringly state model. Undefined states are represented by
/// the `NULL`/`UNDEF` sentinels (see [`crate::is_undefined`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    pub state: String,
}

impl Item {
    /// Create a new item with the given state
    pub fn new(name: impl Into<String>, item_type: ItemType, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type,
            state: state.into(),
        }
    }

    /// Create a new item in the undefined state
    pub fn undefined(name: impl Into<String>, item_type: ItemType) -> Self {
        Self::new(name, item_type, "NULL")
    }

    /// Whether this item maps to a light class
    pub fn is_light(&self) -> bool {
        LightType::of(self.item_type).is_some()
    }

    /// Whether this item is a group
    pub fn is_group(&self) -> bool {
        self.item_type == ItemType::Group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_type_mapping() {
        assert_eq!(LightType::of(ItemType::Switch), Some(LightType::Switch));
        assert_eq!(LightType::of(ItemType::Dimmer), Some(LightType::Dimmer));
        assert_eq!(
            LightType::of(ItemType::Rollershutter),
            Some(LightType::Dimmer)
        );
        assert_eq!(LightType::of(ItemType::Color), Some(LightType::Color));
        assert_eq!(LightType::of(ItemType::Group), None);
        assert_eq!(LightType::of(ItemType::Number), None);
    }

    #[test]
    fn test_light_type_from_name() {
        assert_eq!(LightType::from_item_type("Switch"), Some(LightType::Switch));
        assert_eq!(
            LightType::from_item_type("ROLLERSHUTTER"),
            Some(LightType::Dimmer)
        );
        assert_eq!(LightType::from_item_type("color"), Some(LightType::Color));
        assert_eq!(LightType::from_item_type("contact"), None);
    }

    #[test]
    fn test_item_type_roundtrip() {
        for name in [
            "switch",
            "dimmer",
            "color",
            "rollershutter",
            "number",
            "string",
            "group",
            "scene",
        ] {
            let parsed: ItemType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("contact".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_item_predicates() {
        assert!(Item::new("porch", ItemType::Dimmer, "40").is_light());
        assert!(!Item::new("porch", ItemType::Dimmer, "40").is_group());
        assert!(Item::undefined("hall", ItemType::Group).is_group());
        assert!(!Item::undefined("hall", ItemType::Group).is_light());
    }
}
