//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::keys;

type DefTuple = (&'static str, &'static str, bool, &'static str);

const DEFS: &[DefTuple] = &[
    (
        keys::TILES_DIR,
        "plugins/dynmap/web/tiles",
        true,
        "Dynmap tiles directory",
    ),
    (keys::WORLD, "", true, "World to take a snapshot of"),
    (keys::MAP, "", true, "Map to take a snapshot of"),
    (keys::SCALE, "", false, "Scale factor applied to the tile size (e.g. 0.5)"),
    (keys::TILE_SIZE, "", false, "Fixed output tile size in pixels (e.g. 64)"),
    (keys::BACKGROUND, "", false, "Background color as #RRGGBB"),
    (keys::OUTPUT_DIR, "snapshots", false, "Directory snapshots are written to"),
    (keys::INTERACTIVE, "false", false, "Ask for settings through prompts"),
    (keys::MESSAGE, "", false, "Message passed along with a delivered snapshot"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_definition() {
        for key in [
            keys::TILES_DIR,
            keys::WORLD,
            keys::MAP,
            keys::SCALE,
            keys::TILE_SIZE,
            keys::BACKGROUND,
            keys::OUTPUT_DIR,
            keys::INTERACTIVE,
            keys::MESSAGE,
        ] {
            let def = &DEFAULT_SETTINGS[key];
            assert_eq!(def.key, key);
            assert!(!def.description.is_empty());
        }
        assert_eq!(DEFAULT_SETTINGS.len(), DEFS.len());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(get_default(keys::OUTPUT_DIR), Some("snapshots"));
        assert_eq!(get_default(keys::WORLD), Some(""));
        assert_eq!(get_default("UNKNOWN"), None);
    }
}
