//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

use super::keys;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
///
/// Empty values are accepted for optional settings; they mean "not set".
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        keys::SCALE => {
            if value.is_empty() {
                return Ok(());
            }
            let v: f64 = value.parse().map_err(|_| "must be a decimal number")?;
            if !v.is_finite() || v <= 0.0 {
                return Err("must be greater than 0".into());
            }
        }
        keys::TILE_SIZE => {
            if value.is_empty() {
                return Ok(());
            }
            let v: u32 = value.parse().map_err(|_| "must be a positive integer")?;
            if v == 0 {
                return Err("must be greater than 0".into());
            }
        }
        keys::BACKGROUND => {
            if !value.is_empty() && !RE_HEX_COLOR.is_match(value) {
                return Err("must be a hex color like #ff0000".into());
            }
        }
        keys::WORLD | keys::MAP => {
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err("must be a plain directory name".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, keys::INTERACTIVE)
}
