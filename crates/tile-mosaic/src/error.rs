//! Error type for mosaic assembly.

use crate::coord::GridCoord;

/// Broad classification of a [`MosaicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an unusable request (empty set, bad options).
    InvalidInput,
    /// The tile images themselves are inconsistent.
    CorruptInput,
}

/// Unified error type for the tile-mosaic crate.
#[derive(Debug, thiserror::Error)]
pub enum MosaicError {
    #[error("no tiles to assemble")]
    EmptyTileSet,

    #[error("duplicate tile coordinate {coord}")]
    DuplicateCoord { coord: GridCoord },

    #[error("scale factor must be a positive number, got {0}")]
    InvalidScale(f64),

    #[error("scale factor {factor} turns native tile size {native} into zero pixels")]
    ScaledToZero { native: u32, factor: f64 },

    #[error("fixed tile size must be positive, got {0}")]
    InvalidTileSize(u32),

    #[error("scale ({scale}) and fixed tile size ({tile_size}) are mutually exclusive")]
    ConflictingSizing { scale: f64, tile_size: u32 },

    #[error("invalid background color: {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("tile {coord} is not square ({width}x{height})")]
    NonSquareTile {
        coord: GridCoord,
        width: u32,
        height: u32,
    },

    #[error("tile {coord} is {width}x{height}, expected {expected}x{expected}")]
    TileSizeMismatch {
        coord: GridCoord,
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("canvas for {columns}x{rows} tiles of {tile_size}px exceeds the canvas size limit")]
    CanvasTooLarge {
        columns: u64,
        rows: u64,
        tile_size: u32,
    },
}

impl MosaicError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonSquareTile { .. } | Self::TileSizeMismatch { .. } => ErrorKind::CorruptInput,
            _ => ErrorKind::InvalidInput,
        }
    }
}
