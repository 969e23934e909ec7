//! Snapshot persistence as timestamped PNG files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use image::{DynamicImage, ImageFormat};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Writes snapshots into one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    output_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `image` named after the current local time, world and map.
    pub fn save(
        &self,
        image: &DynamicImage,
        world: &str,
        map: &str,
    ) -> Result<PathBuf, SnapshotStoreError> {
        self.save_at(image, world, map, Local::now())
    }

    /// Save `image` named after `now`, world and map.
    ///
    /// The PNG is encoded to a hidden temporary file and renamed into place,
    /// so a failed encode never leaves a truncated snapshot behind. A snapshot
    /// with the same name (same minute, world and map) is replaced.
    pub fn save_at<Tz: TimeZone>(
        &self,
        image: &DynamicImage,
        world: &str,
        map: &str,
        now: DateTime<Tz>,
    ) -> Result<PathBuf, SnapshotStoreError>
    where
        Tz::Offset: std::fmt::Display,
    {
        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = snapshot_file_name(now, world, map);
        let path = self.output_dir.join(&file_name);
        let partial = self.output_dir.join(format!(".{file_name}.partial"));

        if let Err(e) = image.save_with_format(&partial, ImageFormat::Png) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, &path)?;

        tracing::info!(path = %path.display(), "Snapshot saved");
        Ok(path)
    }
}

/// `{dd}-{mm}-{YYYY}--{HH}-{MM}--{world}-{map}.png`
pub fn snapshot_file_name<Tz: TimeZone>(now: DateTime<Tz>, world: &str, map: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}--{world}-{map}.png", now.format("%d-%m-%Y--%H-%M"))
}
