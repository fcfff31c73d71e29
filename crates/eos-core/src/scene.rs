//! Scene name constants and sentinel checks
//!
//! Scene names are matched case-insensitively throughout the engine. Two
//! names are sentinels rather than real scenes: `manual` suspends automatic
//! updates for the item, and `parent` makes a subgroup defer to whatever
//! scene its enclosing group resolved.

/// Built-in scene turning lights on
pub const SCENE_ON: &str = "on";

/// Built-in scene turning lights off
pub const SCENE_OFF: &str = "off";

/// Sentinel scene suspending automatic updates
pub const SCENE_MANUAL: &str = "manual";

/// Sentinel scene deferring to the enclosing group's scene
pub const SCENE_PARENT: &str = "parent";

/// Whether a scene name is the `manual` sentinel
pub fn is_manual(scene: &str) -> bool {
    scene.eq_ignore_ascii_case(SCENE_MANUAL)
}

/// Whether a scene name is the `parent` sentinel
pub fn is_parent(scene: &str) -> bool {
    scene.eq_ignore_ascii_case(SCENE_PARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_case_insensitive() {
        assert!(is_manual("manual"));
        assert!(is_manual("Manual"));
        assert!(is_parent("PARENT"));
        assert!(!is_manual("evening"));
        assert!(!is_parent("manual"));
    }
}
