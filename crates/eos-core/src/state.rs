//! State-string parsing helpers and the resolved raw state

use serde_json::Value;

/// Whether a state string is one of the host's undefined sentinels
pub fn is_undefined(state: &str) -> bool {
    state.eq_ignore_ascii_case("null") || state.eq_ignore_ascii_case("undef")
}

/// Parse a state string as a numeric level
pub fn parse_level(state: &str) -> Option<f64> {
    state.trim().parse().ok()
}

/// Clamp a value into `[min, max]`
pub fn constrain(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Numeric view of a metadata value, accepting numeric strings
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A resolved state before device encoding
///
/// Scene resolution produces one of three shapes: a bare string (fixed
/// switch states and the like), a number (dimmer levels, color brightness),
/// or a hue/saturation/value triple. Encoding pattern-matches on the shape
/// instead of probing the value at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum RawState {
    Text(String),
    Number(f64),
    Triple([f64; 3]),
}

impl RawState {
    /// Classify a metadata value by shape
    ///
    /// Arrays must have exactly three numeric elements; booleans, objects,
    /// nulls, and other array lengths have no raw-state shape.
    pub fn from_value(value: &Value) -> Option<RawState> {
        match value {
            Value::String(s) => Some(RawState::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(RawState::Number),
            Value::Array(elements) if elements.len() == 3 => {
                let mut triple = [0.0f64; 3];
                for (slot, element) in triple.iter_mut().zip(elements) {
                    *slot = value_as_f64(element)?;
                }
                Some(RawState::Triple(triple))
            }
            _ => None,
        }
    }
}
