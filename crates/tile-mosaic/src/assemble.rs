//! Mosaic assembly entry point.
//!
//! Validation, size resolution, layout, compositing and background are run
//! in that order. Nothing is produced unless every step succeeds.

use image::DynamicImage;
use tracing::info;

use crate::background::{BackgroundColor, apply_background};
use crate::compose::composite;
use crate::coord::{GridBounds, GridCoord};
use crate::error::MosaicError;
use crate::layout::{Layout, check_unique};
use crate::sizing::{SizingPolicy, native_tile_size};

/// One map tile: its grid position and decoded image.
#[derive(Debug, Clone)]
pub struct Tile {
    coord: GridCoord,
    image: DynamicImage,
}

impl Tile {
    pub fn new(coord: GridCoord, image: DynamicImage) -> Self {
        Self { coord, image }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// `(width, height)` of the source image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Sizing and background configuration for one assembly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MosaicOptions {
    pub sizing: SizingPolicy,
    pub background: Option<BackgroundColor>,
}

impl MosaicOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the sizing policy.
    pub fn with_sizing(mut self, sizing: SizingPolicy) -> Self {
        self.sizing = sizing;
        self
    }

    /// Builder: set the background color.
    pub fn with_background(mut self, color: Option<BackgroundColor>) -> Self {
        self.background = color;
        self
    }
}

/// Finished composite image plus the geometry it was built with.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub image: DynamicImage,
    pub native_tile_size: u32,
    pub tile_size: u32,
    pub bounds: GridBounds,
    pub tile_count: usize,
}

impl Mosaic {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Assemble `tiles` into one image.
///
/// # Errors
/// Returns an invalid-input [`MosaicError`] for an empty set, duplicate
/// coordinates, bad sizing parameters or an oversized canvas, and a
/// corrupt-input error when tiles are not all square and the same size.
pub fn assemble(tiles: Vec<Tile>, options: &MosaicOptions) -> Result<Mosaic, MosaicError> {
    if tiles.is_empty() {
        return Err(MosaicError::EmptyTileSet);
    }
    options.sizing.validate()?;

    // Placement ambiguity is reported before any image is inspected.
    let coords = check_unique(tiles.iter().map(Tile::coord))?;
    let native = native_tile_size(&tiles)?;
    let tile_size = options.sizing.resolve(native)?;
    let layout = Layout::from_set(&coords, tile_size)?;

    let tile_count = tiles.len();
    let (width, height) = layout.canvas_size();
    info!(
        tiles = tile_count,
        native,
        tile_size,
        width,
        height,
        "Assembling mosaic"
    );

    let canvas = composite(&layout, tiles)?;
    let image = apply_background(canvas, options.background);

    Ok(Mosaic {
        image,
        native_tile_size: native,
        tile_size,
        bounds: layout.bounds(),
        tile_count,
    })
}
