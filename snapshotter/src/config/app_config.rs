//! Runtime snapshot configuration loaded from the settings manager.

use std::path::PathBuf;

use tile_mosaic::{BackgroundColor, MosaicError, MosaicOptions, SizingPolicy};

use super::keys;
use super::manager::SettingsManager;

/// Everything one snapshot run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tiles_dir: PathBuf,
    pub world: String,
    pub map: String,
    pub scale: Option<f64>,
    pub tile_size: Option<u32>,
    pub background: Option<String>,
    pub output_dir: PathBuf,
    pub message: Option<String>,
}

impl AppConfig {
    /// Load configuration from the settings manager.
    ///
    /// Every value is validated first, so a bad `SNAPSHOT_SCALE` fails here
    /// with the key in the message instead of deep inside assembly.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        sm.validate_all()?;
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };

        Ok(Self {
            tiles_dir: PathBuf::from(g(keys::TILES_DIR)),
            world: g(keys::WORLD),
            map: g(keys::MAP),
            scale: non_empty(g(keys::SCALE)).map(|s| s.parse::<f64>()).transpose()?,
            tile_size: non_empty(g(keys::TILE_SIZE)).map(|s| s.parse::<u32>()).transpose()?,
            background: non_empty(g(keys::BACKGROUND)),
            output_dir: PathBuf::from(g(keys::OUTPUT_DIR)),
            message: non_empty(g(keys::MESSAGE)),
        })
    }

    /// Sizing and background options for the assembler.
    pub fn mosaic_options(&self) -> Result<MosaicOptions, MosaicError> {
        let sizing = SizingPolicy::from_options(self.scale, self.tile_size)?;
        let background = self
            .background
            .as_deref()
            .map(str::parse::<BackgroundColor>)
            .transpose()?;
        Ok(MosaicOptions::new()
            .with_sizing(sizing)
            .with_background(background))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
