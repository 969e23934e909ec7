//! Dynmap tile directory access.
//!
//! Lists worlds and maps under a Dynmap `tiles` root, discovers tile
//! coordinates for one map and decodes tile images into
//! [`tile_mosaic::Tile`] values.
//!
//! On-disk layout: `{root}/{world}/{map}/{x>>5}_{z>>5}/{x}_{z}.{ext}`.
//! Files starting with `z` are zoomed-out overview tiles and are ignored.

pub mod layout;
pub mod loader;

pub use layout::{MapDir, TileEntry, TilesRoot, tile_path};
pub use loader::{DiskTileSource, TileSource, load_tiles};

use std::path::PathBuf;

use tile_mosaic::GridCoord;

/// Unified error type for the dynmap-tiles crate.
#[derive(Debug, thiserror::Error)]
pub enum TileStoreError {
    #[error("tiles directory not found: {0}")]
    TilesDirNotFound(PathBuf),

    #[error("world not found: {world} (in {root})")]
    WorldNotFound { root: PathBuf, world: String },

    #[error("map not found: {world}/{map}")]
    MapNotFound { world: String, map: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode tile {coord} from {path}: {source}")]
    Decode {
        coord: GridCoord,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TileStoreError {
    /// True for the missing tiles dir / world / map cases.
    pub fn is_missing_resource(&self) -> bool {
        matches!(
            self,
            Self::TilesDirNotFound(_) | Self::WorldNotFound { .. } | Self::MapNotFound { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
