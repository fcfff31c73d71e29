//! Scene resolution: from an item, a scene, and the settings layers to a
//! concrete device state string
//!
//! Resolution is a pure function of the item, the current metadata, and the
//! states of any referenced level-source items. It never raises past its own
//! boundary: any misconfiguration is logged and the item's current state is
//! returned unchanged, so a bad scene definition can never turn a light into
//! an error for its whole group.

use crate::error::{ResolveError, ResolveResult};
use crate::settings::{SettingLookup, DEPTH_ALL};
use eos_config::EosConfig;
use eos_core::{
    constrain, is_undefined, parse_level, value_as_f64, Item, LightType, RawState, KEY_LEVEL_HIGH,
    KEY_LEVEL_LOW, KEY_LEVEL_SOURCE, KEY_LEVEL_THRESHOLD, KEY_STATE, KEY_STATE_ABOVE,
    KEY_STATE_BELOW, KEY_STATE_HIGH, KEY_STATE_LOW,
};
use eos_registry::ItemRegistry;
use serde_json::Value;
use std::fmt;
use tracing::{debug, error};

/// How a scene's target state is computed
///
/// Inferred from which setting keys are present, never declared: a `state`
/// key means `Fixed`, any of the scaling range keys means `Scaled`, and a
/// `level_threshold` key means `Threshold`. The most specific settings layer
/// that defines any of these decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    Fixed,
    Threshold,
    Scaled,
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SceneType::Fixed => "fixed",
            SceneType::Threshold => "threshold",
            SceneType::Scaled => "scaled",
        })
    }
}

/// Resolve the target state for `item` under `scene`
///
/// This is the fallback boundary: errors from the resolution steps are
/// logged and the item's current state string is returned unchanged.
pub fn state_for_scene(
    registry: &ItemRegistry,
    config: &EosConfig,
    item: &Item,
    scene: &str,
) -> String {
    match resolve(registry, config, item, scene) {
        Ok(state) => {
            debug!(item = %item.name, scene, state = %state, "Resolved target state");
            state
        }
        Err(err) => {
            error!(
                item = %item.name,
                scene,
                error = %err,
                "Scene resolution failed, keeping current state"
            );
            item.state.clone()
        }
    }
}

fn resolve(
    registry: &ItemRegistry,
    config: &EosConfig,
    item: &Item,
    scene: &str,
) -> ResolveResult<String> {
    let light_type = LightType::of(item.item_type).ok_or(ResolveError::UnknownLightType {
        item_type: item.item_type,
    })?;

    let metadata = registry.metadata_configuration(&item.name, &config.namespace);
    let lookup = SettingLookup::new(
        &item.name,
        scene,
        light_type,
        &metadata,
        &config.scene_defaults,
    );

    let scene_type =
        infer_scene_type(&lookup).ok_or_else(|| ResolveError::UnknownSceneType {
            scene: scene.to_string(),
        })?;
    debug!(item = %item.name, scene, %scene_type, %light_type, "Inferred scene type");

    let raw = match scene_type {
        SceneType::Fixed => fixed_state(&lookup, scene)?,
        SceneType::Threshold => threshold_state(registry, &lookup, scene)?,
        SceneType::Scaled if matches!(light_type, LightType::Dimmer | LightType::Color) => {
            scaled_state(registry, &lookup, scene)?
        }
        SceneType::Scaled => {
            return Err(ResolveError::InvalidCombination {
                scene_type,
                light_type,
            })
        }
    };

    encode(&raw, light_type, item)
}

/// Infer the scene type by checking the layers at increasing depth
///
/// Within one depth the check order is fixed, then scaled, then threshold;
/// the first depth where any of these keys yields a value wins.
fn infer_scene_type(lookup: &SettingLookup) -> Option<SceneType> {
    for depth in 1..=DEPTH_ALL {
        if lookup.get_at(KEY_STATE, depth).is_some() {
            return Some(SceneType::Fixed);
        }
        if [KEY_LEVEL_HIGH, KEY_LEVEL_LOW, KEY_STATE_HIGH, KEY_STATE_LOW]
            .iter()
            .any(|key| lookup.get_at(key, depth).is_some())
        {
            return Some(SceneType::Scaled);
        }
        if lookup.get_at(KEY_LEVEL_THRESHOLD, depth).is_some() {
            return Some(SceneType::Threshold);
        }
    }
    None
}

fn require<'a>(
    lookup: &SettingLookup<'a>,
    key: &'static str,
    scene: &str,
) -> ResolveResult<&'a Value> {
    lookup.get(key).ok_or_else(|| ResolveError::MissingSetting {
        key,
        scene: scene.to_string(),
    })
}

fn raw_from(value: &Value, key: &'static str) -> ResolveResult<RawState> {
    RawState::from_value(value).ok_or(ResolveError::InvalidShape { key })
}

fn numeric_setting(lookup: &SettingLookup, key: &'static str, scene: &str) -> ResolveResult<f64> {
    let value = require(lookup, key, scene)?;
    value_as_f64(value).ok_or(ResolveError::InvalidShape { key })
}

fn fixed_state(lookup: &SettingLookup, scene: &str) -> ResolveResult<RawState> {
    raw_from(require(lookup, KEY_STATE, scene)?, KEY_STATE)
}

/// Resolve the numeric state of the scene's level-source item
fn level_value(
    registry: &ItemRegistry,
    lookup: &SettingLookup,
    scene: &str,
) -> ResolveResult<f64> {
    let source = require(lookup, KEY_LEVEL_SOURCE, scene)?
        .as_str()
        .filter(|name| !name.is_empty())
        .ok_or(ResolveError::InvalidShape {
            key: KEY_LEVEL_SOURCE,
        })?;
    let level_item = registry
        .item(source)
        .ok_or_else(|| ResolveError::ItemNotFound {
            name: source.to_string(),
        })?;
    if is_undefined(&level_item.state) {
        return Err(ResolveError::UnresolvableLevel {
            item: source.to_string(),
        });
    }
    let level = parse_level(&level_item.state).ok_or_else(|| ResolveError::UnresolvableLevel {
        item: source.to_string(),
    })?;
    debug!(source, level, scene, "Resolved level source");
    Ok(level)
}

fn threshold_state(
    registry: &ItemRegistry,
    lookup: &SettingLookup,
    scene: &str,
) -> ResolveResult<RawState> {
    let level = level_value(registry, lookup, scene)?;
    let threshold = numeric_setting(lookup, KEY_LEVEL_THRESHOLD, scene)?;
    let above = raw_from(require(lookup, KEY_STATE_ABOVE, scene)?, KEY_STATE_ABOVE)?;
    let below = raw_from(require(lookup, KEY_STATE_BELOW, scene)?, KEY_STATE_BELOW)?;

    // strict comparison: a level exactly at the threshold takes the below state
    Ok(if level > threshold { above } else { below })
}

fn scaled_state(
    registry: &ItemRegistry,
    lookup: &SettingLookup,
    scene: &str,
) -> ResolveResult<RawState> {
    let level = level_value(registry, lookup, scene)?;
    let level_high = numeric_setting(lookup, KEY_LEVEL_HIGH, scene)?;
    let level_low = match lookup.get(KEY_LEVEL_LOW) {
        Some(value) => value_as_f64(value).ok_or(ResolveError::InvalidShape {
            key: KEY_LEVEL_LOW,
        })?,
        None => 0.0,
    };
    let state_high = raw_from(require(lookup, KEY_STATE_HIGH, scene)?, KEY_STATE_HIGH)?;
    let state_low = raw_from(require(lookup, KEY_STATE_LOW, scene)?, KEY_STATE_LOW)?;
    let state_above = match lookup.get(KEY_STATE_ABOVE) {
        Some(value) => raw_from(value, KEY_STATE_ABOVE)?,
        None => state_high.clone(),
    };
    let state_below = match lookup.get(KEY_STATE_BELOW) {
        Some(value) => raw_from(value, KEY_STATE_BELOW)?,
        None => state_low.clone(),
    };

    if level > level_high {
        return Ok(state_above);
    }
    // a level exactly at the low bound takes the below state; a level
    // exactly at the high bound stays in the linear branch
    if level <= level_low {
        return Ok(state_below);
    }

    let factor = (level - level_low) / (level_high - level_low);
    let scale = |low: f64, high: f64| (low + (high - low) * factor).round();
    match (&state_low, &state_high) {
        (RawState::Number(low), RawState::Number(high)) => Ok(RawState::Number(scale(*low, *high))),
        (RawState::Triple(low), RawState::Triple(high)) => Ok(RawState::Triple([
            scale(low[0], high[0]),
            scale(low[1], high[1]),
            scale(low[2], high[2]),
        ])),
        _ => Err(ResolveError::InvalidShape {
            key: KEY_STATE_HIGH,
        }),
    }
}

/// Encode a raw state for the device-type class
fn encode(raw: &RawState, light_type: LightType, item: &Item) -> ResolveResult<String> {
    let invalid = || ResolveError::InvalidEncoding {
        raw: raw.clone(),
        light_type,
    };
    match light_type {
        LightType::Switch => match raw {
            RawState::Text(text)
                if text.eq_ignore_ascii_case("on") || text.eq_ignore_ascii_case("off") =>
            {
                Ok(text.to_ascii_uppercase())
            }
            _ => Err(invalid()),
        },
        LightType::Dimmer => match raw {
            RawState::Number(level) => {
                Ok(format!("{}", constrain(level.round(), 0.0, 100.0) as i64))
            }
            _ => Err(invalid()),
        },
        LightType::Color => match raw {
            // a bare number sets brightness, keeping the current hue and
            // saturation (or 0,0 when the current state is undefined)
            RawState::Number(level) => {
                let current = if is_undefined(&item.state) {
                    "0,0,0".to_string()
                } else {
                    item.state.clone()
                };
                let mut parts = current.split(',');
                let (Some(hue), Some(saturation)) = (parts.next(), parts.next()) else {
                    return Err(invalid());
                };
                let value = constrain(level.round(), 0.0, 100.0) as i64;
                Ok(format!("{},{},{}", hue, saturation, value))
            }
            RawState::Triple([h, s, v]) => {
                // single-step wraparound, not a full modulo: 360 -> 1, -1 -> 358
                let hue = if *h > 359.0 {
                    *h - 359.0
                } else if *h < 0.0 {
                    *h + 359.0
                } else {
                    *h
                };
                Ok(format!(
                    "{},{},{}",
                    hue.round() as i64,
                    constrain(*s, 0.0, 100.0).round() as i64,
                    constrain(*v, 0.0, 100.0).round() as i64
                ))
            }
            RawState::Text(_) => Err(invalid()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_config::SceneDefaults;
    use eos_core::ItemType;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup_for<'a>(
        metadata: &'a HashMap<String, Value>,
        defaults: &'a SceneDefaults,
    ) -> SettingLookup<'a> {
        SettingLookup::new("lamp", "evening", LightType::Dimmer, metadata, defaults)
    }

    #[test]
    fn test_scene_type_fixed_wins_within_depth() {
        let metadata: HashMap<String, Value> = serde_json::from_value(json!({
            "evening": { "state": 40, "level_high": 100, "level_threshold": 50 }
        }))
        .unwrap();
        let defaults = SceneDefaults::empty();
        let lookup = lookup_for(&metadata, &defaults);
        assert_eq!(infer_scene_type(&lookup), Some(SceneType::Fixed));
    }

    #[test]
    fn test_scene_type_shallow_layer_wins_over_deeper() {
        // threshold key at the item-scene layer beats a fixed state in the
        // type defaults
        let metadata: HashMap<String, Value> = serde_json::from_value(json!({
            "evening": { "level_threshold": 50 }
        }))
        .unwrap();
        let mut defaults = SceneDefaults::empty();
        defaults.set_type_setting(LightType::Dimmer, KEY_STATE, json!(40));
        let lookup = lookup_for(&metadata, &defaults);
        assert_eq!(infer_scene_type(&lookup), Some(SceneType::Threshold));
    }

    #[test]
    fn test_scene_type_none_without_keys() {
        let metadata = HashMap::new();
        let defaults = SceneDefaults::empty();
        let lookup = lookup_for(&metadata, &defaults);
        assert_eq!(infer_scene_type(&lookup), None);
    }

    #[test]
    fn test_encode_switch() {
        let item = Item::new("plug", ItemType::Switch, "OFF");
        let on = RawState::Text("on".to_string());
        assert_eq!(encode(&on, LightType::Switch, &item).unwrap(), "ON");
        let off = RawState::Text("Off".to_string());
        assert_eq!(encode(&off, LightType::Switch, &item).unwrap(), "OFF");
        let bad = RawState::Text("toggle".to_string());
        assert!(encode(&bad, LightType::Switch, &item).is_err());
        let numeric = RawState::Number(1.0);
        assert!(encode(&numeric, LightType::Switch, &item).is_err());
    }

    #[test]
    fn test_encode_dimmer_clamps() {
        let item = Item::new("lamp", ItemType::Dimmer, "40");
        assert_eq!(
            encode(&RawState::Number(150.0), LightType::Dimmer, &item).unwrap(),
            "100"
        );
        assert_eq!(
            encode(&RawState::Number(-20.0), LightType::Dimmer, &item).unwrap(),
            "0"
        );
        assert_eq!(
            encode(&RawState::Number(54.6), LightType::Dimmer, &item).unwrap(),
            "55"
        );
        assert!(encode(&RawState::Text("ON".to_string()), LightType::Dimmer, &item).is_err());
    }

    #[test]
    fn test_encode_color_number_keeps_hue_saturation() {
        let item = Item::new("strip", ItemType::Color, "120,50,75");
        assert_eq!(
            encode(&RawState::Number(30.0), LightType::Color, &item).unwrap(),
            "120,50,30"
        );
        let undefined = Item::new("strip", ItemType::Color, "UNDEF");
        assert_eq!(
            encode(&RawState::Number(130.0), LightType::Color, &undefined).unwrap(),
            "0,0,100"
        );
    }

    #[test]
    fn test_encode_color_triple_hue_wraparound() {
        let item = Item::new("strip", ItemType::Color, "0,0,0");
        assert_eq!(
            encode(&RawState::Triple([360.0, 100.0, 100.0]), LightType::Color, &item).unwrap(),
            "1,100,100"
        );
        assert_eq!(
            encode(&RawState::Triple([-1.0, 100.0, 100.0]), LightType::Color, &item).unwrap(),
            "358,100,100"
        );
        assert_eq!(
            encode(&RawState::Triple([200.0, 150.0, -5.0]), LightType::Color, &item).unwrap(),
            "200,100,0"
        );
    }
}
