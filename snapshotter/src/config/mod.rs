//! Configuration management: defaults, validation, loading from `.env` + environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod validation;

pub use app_config::AppConfig;
pub use manager::SettingsManager;

/// Setting keys.
pub mod keys {
    pub const TILES_DIR: &str = "SNAPSHOT_TILES_DIR";
    pub const WORLD: &str = "SNAPSHOT_WORLD";
    pub const MAP: &str = "SNAPSHOT_MAP";
    pub const SCALE: &str = "SNAPSHOT_SCALE";
    pub const TILE_SIZE: &str = "SNAPSHOT_TILE_SIZE";
    pub const BACKGROUND: &str = "SNAPSHOT_BACKGROUND";
    pub const OUTPUT_DIR: &str = "SNAPSHOT_OUTPUT_DIR";
    pub const INTERACTIVE: &str = "SNAPSHOT_INTERACTIVE";
    pub const MESSAGE: &str = "SNAPSHOT_MESSAGE";
}

/// Whether enough is configured to take a snapshot unattended.
#[derive(Debug, Clone, Default)]
pub struct FeatureStatus {
    pub snapshot_configured: bool,
    pub missing_settings: Vec<String>,
    pub warnings: Vec<String>,
}
