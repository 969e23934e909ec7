//! Grid coordinates and their bounding box.
//!
//! Grid space is the unbounded integer lattice tiles live on. It is distinct
//! from pixel space: `x` grows rightward in both, but `z` grows upward on the
//! canvas, so the tile with the largest `z` ends up in pixel row 0.

use std::fmt;

use crate::error::MosaicError;

/// Largest canvas, in pixels, an assembly may allocate (4 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 30;

/// Logical position of one tile in the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Top-left pixel of a tile on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: u32,
    pub y: u32,
}

/// Inclusive bounding box of a coordinate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl GridBounds {
    /// Bounding box of `coords`, or `None` when the iterator is empty.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_z: first.z,
            max_z: first.z,
        };

        Some(iter.fold(init, |b, c| Self {
            min_x: b.min_x.min(c.x),
            max_x: b.max_x.max(c.x),
            min_z: b.min_z.min(c.z),
            max_z: b.max_z.max(c.z),
        }))
    }

    /// Number of tile columns covered (`maxX - minX + 1`).
    pub fn columns(&self) -> u64 {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as u64
    }

    /// Number of tile rows covered (`maxZ - minZ + 1`).
    pub fn rows(&self) -> u64 {
        (i64::from(self.max_z) - i64::from(self.min_z) + 1) as u64
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        (self.min_x..=self.max_x).contains(&coord.x) && (self.min_z..=self.max_z).contains(&coord.z)
    }

    /// Column index of `coord` counted from the left edge.
    pub fn column_of(&self, coord: GridCoord) -> u64 {
        (i64::from(coord.x) - i64::from(self.min_x)) as u64
    }

    /// Row index of `coord` counted from the top edge (maximum `z` is row 0).
    pub fn row_of(&self, coord: GridCoord) -> u64 {
        (i64::from(self.max_z) - i64::from(coord.z)) as u64
    }

    /// Canvas dimensions for tiles of `tile_size` pixels.
    ///
    /// Fails when a side does not fit in `u32` or the canvas holds more than
    /// [`MAX_CANVAS_PIXELS`]. Sparse sets far apart hit the second limit.
    pub fn canvas_size(&self, tile_size: u32) -> Result<(u32, u32), MosaicError> {
        let too_large = || self.too_large(tile_size);
        let width = scale_to_pixels(self.columns(), tile_size).ok_or_else(too_large)?;
        let height = scale_to_pixels(self.rows(), tile_size).ok_or_else(too_large)?;

        let pixels = u64::from(width) * u64::from(height);
        if pixels > MAX_CANVAS_PIXELS {
            return Err(too_large());
        }
        Ok((width, height))
    }

    pub(crate) fn too_large(&self, tile_size: u32) -> MosaicError {
        MosaicError::CanvasTooLarge {
            columns: self.columns(),
            rows: self.rows(),
            tile_size,
        }
    }
}

fn scale_to_pixels(cells: u64, tile_size: u32) -> Option<u32> {
    cells
        .checked_mul(u64::from(tile_size))
        .and_then(|px| u32::try_from(px).ok())
}
