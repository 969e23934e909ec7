//! SettingsManager: environment-backed settings with defaults, validation and feature status.

use std::collections::HashMap;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;
use super::{FeatureStatus, keys};

/// Holds explicitly set values on top of [`DEFAULT_SETTINGS`].
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    values: HashMap<String, String>,
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every known key from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every known key through `lookup`. Unknown keys are never queried.
    ///
    /// Values are stored unvalidated; [`AppConfig::load`](super::AppConfig::load)
    /// rejects bad ones with the offending key in the message.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut values = HashMap::new();
        for key in DEFAULT_SETTINGS.keys() {
            if let Some(value) = lookup(key) {
                tracing::debug!("Setting from environment: {key}");
                values.insert(key.to_string(), value.trim().to_string());
            }
        }
        Self { values }
    }

    /// Get a setting value. Falls back to default if not set.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.values.get(key) {
            return Ok(val.clone());
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            anyhow::bail!("unknown setting key: {key}");
        }

        let value = value.trim();
        validate_setting(key, value).map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// True when a boolean setting is set to `true`.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get_setting(key).is_ok_and(|v| v == "true")
    }

    /// Check that every setting holds a valid value.
    pub fn validate_all(&self) -> Result<(), anyhow::Error> {
        for key in DEFAULT_SETTINGS.keys() {
            let value = self.get_setting(key)?;
            validate_setting(key, &value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        }
        Ok(())
    }

    /// Check whether a snapshot can be taken without asking the user.
    pub fn check_feature_status(&self) -> FeatureStatus {
        let mut status = FeatureStatus {
            snapshot_configured: true,
            ..FeatureStatus::default()
        };

        let mut required: Vec<_> = DEFAULT_SETTINGS.values().filter(|d| d.required).collect();
        required.sort_by_key(|d| d.key);
        for def in required {
            if self.get_setting(def.key).unwrap_or_default().is_empty() {
                status.missing_settings.push(def.key.to_string());
                status.snapshot_configured = false;
            }
        }

        let scale = self.get_setting(keys::SCALE).unwrap_or_default();
        let tile_size = self.get_setting(keys::TILE_SIZE).unwrap_or_default();
        if !scale.is_empty() && !tile_size.is_empty() {
            status.warnings.push(format!(
                "{} and {} are mutually exclusive",
                keys::SCALE,
                keys::TILE_SIZE
            ));
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(pairs: &[(&str, &str)]) -> SettingsManager {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SettingsManager::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let sm = SettingsManager::new();
        assert_eq!(sm.get_setting(keys::OUTPUT_DIR).unwrap(), "snapshots");
        assert_eq!(sm.get_setting(keys::WORLD).unwrap(), "");
        assert!(sm.get_setting("NOT_A_KEY").is_err());
    }

    #[test]
    fn test_lookup_values_override_defaults() {
        let sm = manager(&[(keys::OUTPUT_DIR, " /tmp/out "), ("UNRELATED", "x")]);
        assert_eq!(sm.get_setting(keys::OUTPUT_DIR).unwrap(), "/tmp/out");
        assert!(sm.get_setting("UNRELATED").is_err());
    }

    #[test]
    fn test_set_setting_validates() {
        let mut sm = SettingsManager::new();
        sm.set_setting(keys::SCALE, "0.25").unwrap();
        assert_eq!(sm.get_setting(keys::SCALE).unwrap(), "0.25");
        assert!(sm.set_setting(keys::SCALE, "-1").is_err());
        assert!(sm.set_setting("NOT_A_KEY", "1").is_err());
    }

    #[test]
    fn test_is_enabled() {
        assert!(!SettingsManager::new().is_enabled(keys::INTERACTIVE));
        assert!(manager(&[(keys::INTERACTIVE, "true")]).is_enabled(keys::INTERACTIVE));
        assert!(!manager(&[(keys::INTERACTIVE, "yes")]).is_enabled(keys::INTERACTIVE));
        assert!(!SettingsManager::new().is_enabled("NOT_A_KEY"));
    }

    #[test]
    fn test_validate_all_reports_key() {
        let sm = manager(&[(keys::TILE_SIZE, "big")]);
        let err = sm.validate_all().unwrap_err();
        assert!(err.to_string().contains(keys::TILE_SIZE));
    }

    #[test]
    fn test_feature_status_missing_world_and_map() {
        let status = SettingsManager::new().check_feature_status();
        assert!(!status.snapshot_configured);
        assert_eq!(status.missing_settings, vec![keys::MAP, keys::WORLD]);
    }

    #[test]
    fn test_feature_status_configured_with_warning() {
        let sm = manager(&[
            (keys::WORLD, "world"),
            (keys::MAP, "flat"),
            (keys::SCALE, "0.5"),
            (keys::TILE_SIZE, "64"),
        ]);
        let status = sm.check_feature_status();
        assert!(status.snapshot_configured);
        assert_eq!(status.warnings.len(), 1);
    }
}
