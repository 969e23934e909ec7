//! Coordinate-to-pixel mapping and canvas sizing.
//!
//! A [`Layout`] is computed once from the full coordinate set and a tile size.
//! Placement and canvas dimensions both read the same [`GridBounds`], so the
//! two can never disagree. Changing the tile size or the coordinate set means
//! building a new layout.

use std::collections::HashSet;

use tracing::debug;

use crate::coord::{GridBounds, GridCoord, PixelOffset};
use crate::error::MosaicError;

/// Pixel geometry for one assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    bounds: GridBounds,
    tile_size: u32,
    width: u32,
    height: u32,
}

impl Layout {
    /// Build the layout for `coords` with tiles of `tile_size` pixels.
    ///
    /// Fails on an empty set, on duplicate coordinates, on a zero tile size
    /// and when the canvas exceeds [`MAX_CANVAS_PIXELS`](crate::coord::MAX_CANVAS_PIXELS).
    pub fn new<I>(coords: I, tile_size: u32) -> Result<Self, MosaicError>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        if tile_size == 0 {
            return Err(MosaicError::InvalidTileSize(0));
        }
        Self::from_set(&check_unique(coords)?, tile_size)
    }

    /// Build the layout for an already deduplicated coordinate set.
    pub fn from_set(coords: &HashSet<GridCoord>, tile_size: u32) -> Result<Self, MosaicError> {
        if tile_size == 0 {
            return Err(MosaicError::InvalidTileSize(0));
        }

        let bounds =
            GridBounds::from_coords(coords.iter().copied()).ok_or(MosaicError::EmptyTileSet)?;
        let (width, height) = bounds.canvas_size(tile_size)?;

        debug!(
            tiles = coords.len(),
            columns = bounds.columns(),
            rows = bounds.rows(),
            tile_size,
            width,
            height,
            "Computed mosaic layout"
        );

        Ok(Self {
            bounds,
            tile_size,
            width,
            height,
        })
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Canvas `(width, height)` in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixel rows occupied by one grid row.
    pub fn band_height(&self) -> u32 {
        self.tile_size
    }

    /// Top-left pixel of the tile at `coord`.
    ///
    /// `coord` must belong to the coordinate set the layout was built from.
    pub fn offset_of(&self, coord: GridCoord) -> PixelOffset {
        debug_assert!(self.bounds.contains(coord), "{coord} outside layout bounds");
        let t = u64::from(self.tile_size);
        // Both products are below the canvas size, which fits in u32.
        PixelOffset {
            x: (self.bounds.column_of(coord) * t) as u32,
            y: (self.bounds.row_of(coord) * t) as u32,
        }
    }
}

/// Collect `coords` into a set, failing on the first repeated coordinate.
pub fn check_unique<I>(coords: I) -> Result<HashSet<GridCoord>, MosaicError>
where
    I: IntoIterator<Item = GridCoord>,
{
    let mut seen = HashSet::new();
    for coord in coords {
        if !seen.insert(coord) {
            return Err(MosaicError::DuplicateCoord { coord });
        }
    }
    Ok(seen)
}
