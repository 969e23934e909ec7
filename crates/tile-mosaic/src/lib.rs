//! Map tile mosaic assembly.
//!
//! Stitches a sparse grid of square map tiles into one composite image:
//! grid-to-pixel layout, tile size resolution (native, scaled or fixed),
//! band-parallel compositing and an optional solid background.
//!
//! This crate performs no I/O. Callers discover and decode tiles, hand them
//! over as [`Tile`] values and persist the returned [`Mosaic`].

pub mod assemble;
pub mod background;
pub mod compose;
pub mod coord;
pub mod error;
pub mod layout;
pub mod sizing;

// Re-exports for convenience
pub use assemble::{Mosaic, MosaicOptions, Tile, assemble};
pub use background::{BackgroundColor, apply_background};
pub use coord::{GridBounds, GridCoord, MAX_CANVAS_PIXELS, PixelOffset};
pub use error::{ErrorKind, MosaicError};
pub use layout::Layout;
pub use sizing::{SizingPolicy, native_tile_size};
