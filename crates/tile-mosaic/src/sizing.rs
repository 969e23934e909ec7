//! Tile size resolution: native size inference and sizing policies.

use tracing::debug;

use crate::assemble::Tile;
use crate::error::MosaicError;

/// Rule for the pixel size every tile is resized to before placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizingPolicy {
    /// Keep the native tile size.
    #[default]
    Native,
    /// Multiply the native size by a positive factor (rounded).
    Scale(f64),
    /// Use an explicit tile size in pixels.
    Fixed(u32),
}

impl SizingPolicy {
    /// Build a policy from the two optional user inputs.
    ///
    /// Supplying both is ambiguous and rejected.
    pub fn from_options(scale: Option<f64>, tile_size: Option<u32>) -> Result<Self, MosaicError> {
        let policy = match (scale, tile_size) {
            (Some(scale), Some(tile_size)) => {
                return Err(MosaicError::ConflictingSizing { scale, tile_size });
            }
            (Some(factor), None) => Self::Scale(factor),
            (None, Some(size)) => Self::Fixed(size),
            (None, None) => Self::Native,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy parameters without a native size.
    pub fn validate(&self) -> Result<(), MosaicError> {
        match *self {
            Self::Scale(factor) if !(factor.is_finite() && factor > 0.0) => {
                Err(MosaicError::InvalidScale(factor))
            }
            Self::Fixed(0) => Err(MosaicError::InvalidTileSize(0)),
            _ => Ok(()),
        }
    }

    /// Output tile size for tiles of `native` pixels.
    pub fn resolve(&self, native: u32) -> Result<u32, MosaicError> {
        self.validate()?;
        let size = match *self {
            Self::Native => native,
            Self::Fixed(size) => size,
            Self::Scale(factor) => {
                let scaled = (f64::from(native) * factor).round();
                if scaled < 1.0 {
                    return Err(MosaicError::ScaledToZero { native, factor });
                }
                if scaled > f64::from(u32::MAX) {
                    return Err(MosaicError::InvalidScale(factor));
                }
                scaled as u32
            }
        };
        debug!(native, size, policy = ?self, "Resolved tile size");
        Ok(size)
    }
}

/// Native tile size shared by every tile in `tiles`.
///
/// Every tile is checked, not just a sample: each must be square and match
/// the first tile's size.
pub fn native_tile_size(tiles: &[Tile]) -> Result<u32, MosaicError> {
    let first = tiles.first().ok_or(MosaicError::EmptyTileSet)?;
    let expected = square_side(first)?;

    for tile in &tiles[1..] {
        let side = square_side(tile)?;
        if side != expected {
            return Err(MosaicError::TileSizeMismatch {
                coord: tile.coord(),
                expected,
                width: side,
                height: side,
            });
        }
    }

    debug!(tiles = tiles.len(), native = expected, "Validated native tile size");
    Ok(expected)
}

fn square_side(tile: &Tile) -> Result<u32, MosaicError> {
    let (width, height) = tile.dimensions();
    if width != height {
        return Err(MosaicError::NonSquareTile {
            coord: tile.coord(),
            width,
            height,
        });
    }
    Ok(width)
}
