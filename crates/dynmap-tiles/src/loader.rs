//! Tile image loading.

use image::{DynamicImage, ImageReader};
use rayon::prelude::*;
use tracing::{debug, info};

use tile_mosaic::Tile;

use crate::TileStoreError;
use crate::layout::{MapDir, TileEntry};

/// Source of tile entries and their decoded images.
///
/// Abstracts the on-disk layout so the snapshot pipeline can be driven by
/// in-memory tiles in tests.
pub trait TileSource: Send + Sync {
    /// All tiles available from this source.
    fn entries(&self) -> Result<Vec<TileEntry>, TileStoreError>;

    /// Decode the image of one entry.
    fn load(&self, entry: &TileEntry) -> Result<DynamicImage, TileStoreError>;
}

/// Tiles of one Dynmap map directory.
#[derive(Debug, Clone)]
pub struct DiskTileSource {
    map: MapDir,
}

impl DiskTileSource {
    pub fn new(map: MapDir) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &MapDir {
        &self.map
    }
}

impl TileSource for DiskTileSource {
    fn entries(&self) -> Result<Vec<TileEntry>, TileStoreError> {
        self.map.discover()
    }

    /// Format is sniffed from the file contents, so JPEG, PNG and WebP tiles
    /// all load regardless of extension.
    fn load(&self, entry: &TileEntry) -> Result<DynamicImage, TileStoreError> {
        let decode_err = |source| TileStoreError::Decode {
            coord: entry.coord,
            path: entry.path.clone(),
            source,
        };
        let reader = ImageReader::open(&entry.path)
            .map_err(|e| TileStoreError::io(&entry.path, e))?
            .with_guessed_format()
            .map_err(|e| TileStoreError::io(&entry.path, e))?;
        reader.decode().map_err(decode_err)
    }
}

/// Discover and decode every tile of `source` on the rayon pool.
///
/// The first failure aborts the load.
pub fn load_tiles(source: &dyn TileSource) -> Result<Vec<Tile>, TileStoreError> {
    let entries = source.entries()?;
    info!(tiles = entries.len(), "Loading tile images");

    let tiles = entries
        .par_iter()
        .map(|entry| {
            let image = source.load(entry)?;
            Ok(Tile::new(entry.coord, image))
        })
        .collect::<Result<Vec<_>, TileStoreError>>()?;

    debug!(tiles = tiles.len(), "Tile images loaded");
    Ok(tiles)
}
