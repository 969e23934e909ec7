//! Image composition: tile resizing, source-over blending and the
//! band-parallel canvas fill.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

use crate::assemble::Tile;
use crate::error::MosaicError;
use crate::layout::Layout;

/// Resampling filter for tile resizing (bicubic).
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Overlay `top` onto `base` at the given position.
///
/// `top` is alpha-composited (source-over). Pixels falling outside `base`
/// are clipped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let (Some(target_x), Some(target_y)) = (x.checked_add(dx), y.checked_add(dy)) else {
            continue;
        };
        if target_x < base.width() && target_y < base.height() {
            let dst = base.get_pixel_mut(target_x, target_y);
            blend_over(&mut dst.0, &pixel.0);
        }
    }
}

/// Resize a tile image to `size`x`size` and convert it to RGBA.
///
/// Consumes the source so its buffer is freed as soon as the resized copy
/// exists. Tiles already at the target size are only converted.
pub fn resize_tile(image: DynamicImage, size: u32) -> RgbaImage {
    if image.width() == size && image.height() == size {
        return image.into_rgba8();
    }

    debug!(
        orig_w = image.width(),
        orig_h = image.height(),
        size,
        "Resizing tile"
    );
    image.resize_exact(size, size, RESIZE_FILTER).into_rgba8()
}

/// Transparent canvas for `layout`, or `CanvasTooLarge` if it cannot be allocated.
fn alloc_canvas(layout: &Layout) -> Result<RgbaImage, MosaicError> {
    let (width, height) = layout.canvas_size();
    let too_large = || layout.bounds().too_large(layout.tile_size());

    let len = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|px| px.checked_mul(4))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(too_large)?;

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| too_large())?;
    buffer.resize(len, 0u8);
    RgbaImage::from_raw(width, height, buffer).ok_or_else(too_large)
}

/// Paint every tile onto a fresh transparent canvas sized by `layout`.
///
/// The canvas is split into one horizontal band per grid row. Bands never
/// overlap, so they are filled in parallel without locking.
pub fn composite(layout: &Layout, tiles: Vec<Tile>) -> Result<RgbaImage, MosaicError> {
    let (width, height) = layout.canvas_size();
    let bounds = layout.bounds();
    let tile_size = layout.tile_size();

    let mut bands: Vec<Vec<Tile>> = (0..bounds.rows()).map(|_| Vec::new()).collect();
    for tile in tiles {
        let row = bounds.row_of(tile.coord()) as usize;
        bands[row].push(tile);
    }

    let mut canvas = alloc_canvas(layout)?;
    let band_len = width as usize * layout.band_height() as usize * 4;
    let buffer: &mut [u8] = &mut canvas;

    buffer
        .par_chunks_mut(band_len)
        .zip(bands.into_par_iter())
        .for_each(|(band, row_tiles)| {
            if row_tiles.is_empty() {
                return;
            }
            let resized: Vec<(u32, RgbaImage)> = row_tiles
                .into_par_iter()
                .map(|tile| {
                    let x = layout.offset_of(tile.coord()).x;
                    (x, resize_tile(tile.into_image(), tile_size))
                })
                .collect();
            for (x, image) in resized {
                blit_into_band(band, width, x, &image);
            }
        });

    debug!(width, height, "Composited tiles onto canvas");
    Ok(canvas)
}

/// Source-over composite one tile into a band slice starting at pixel column `x`.
fn blit_into_band(band: &mut [u8], canvas_width: u32, x: u32, tile: &RgbaImage) {
    let stride = canvas_width as usize * 4;
    let row_len = tile.width() as usize * 4;

    for (y, src_row) in tile.as_raw().chunks_exact(row_len).enumerate() {
        let start = y * stride + x as usize * 4;
        let dst_row = &mut band[start..start + row_len];
        for (dst, src) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            blend_over(dst, src);
        }
    }
}

/// Porter-Duff source-over for one RGBA8 pixel, in place on `dst`.
pub(crate) fn blend_over(dst: &mut [u8], src: &[u8]) {
    match src[3] {
        255 => {
            dst.copy_from_slice(&src[..4]);
            return;
        }
        0 => return,
        _ => {}
    }

    let src_a = f32::from(src[3]) / 255.0;
    let dst_a = f32::from(dst[3]) / 255.0;
    let inv = 1.0 - src_a;
    let out_a = src_a + dst_a * inv;

    for i in 0..3 {
        let c = (f32::from(src[i]) * src_a + f32::from(dst[i]) * dst_a * inv) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GridCoord;
    use image::{Rgb, RgbImage, Rgba};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn solid(size: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, color))
    }

    #[test]
    fn overlay_does_not_panic_on_out_of_bounds() {
        let mut base = RgbaImage::new(100, 100);
        let top = RgbaImage::new(50, 50);
        overlay(&mut base, &top, 80, 80); // partially out of bounds
    }

    #[test]
    fn overlay_opaque_replaces_pixels() {
        let mut base = RgbaImage::from_pixel(4, 4, GREEN);
        let top = RgbaImage::from_pixel(2, 2, RED);
        overlay(&mut base, &top, 1, 1);
        assert_eq!(*base.get_pixel(0, 0), GREEN);
        assert_eq!(*base.get_pixel(1, 1), RED);
        assert_eq!(*base.get_pixel(2, 2), RED);
        assert_eq!(*base.get_pixel(3, 3), GREEN);
    }

    #[test]
    fn blend_transparent_source_keeps_destination() {
        let mut dst = [10, 20, 30, 255];
        blend_over(&mut dst, &[200, 200, 200, 0]);
        assert_eq!(dst, [10, 20, 30, 255]);
    }

    #[test]
    fn blend_onto_transparent_copies_source() {
        let mut dst = [0, 0, 0, 0];
        blend_over(&mut dst, &[200, 100, 50, 128]);
        assert_eq!(dst, [200, 100, 50, 128]);
    }

    #[test]
    fn blend_half_alpha_over_opaque_is_opaque_mix() {
        let mut dst = [0, 0, 255, 255];
        blend_over(&mut dst, &[255, 0, 0, 128]);
        assert_eq!(dst[3], 255);
        assert!((127..=129).contains(&dst[0]), "red was {}", dst[0]);
        assert!((126..=128).contains(&dst[2]), "blue was {}", dst[2]);
    }

    #[test]
    fn resize_tile_skips_when_size_matches() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        let out = resize_tile(img, 8);
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(*out.get_pixel(7, 7), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn resize_tile_hits_target_size() {
        let out = resize_tile(solid(128, RED), 64);
        assert_eq!(out.dimensions(), (64, 64));
        let px = out.get_pixel(32, 32);
        assert!(px[0] >= 254 && px[1] <= 1 && px[3] >= 254, "got {px:?}");
    }

    #[test]
    fn composite_places_rows_top_down() {
        // (0,1) is the top row, (0,0) the bottom row.
        let tiles = vec![
            Tile::new(GridCoord::new(0, 0), solid(4, RED)),
            Tile::new(GridCoord::new(0, 1), solid(4, GREEN)),
        ];
        let layout = Layout::new(tiles.iter().map(Tile::coord), 4).unwrap();
        let canvas = composite(&layout, tiles).unwrap();

        assert_eq!(canvas.dimensions(), (4, 8));
        assert_eq!(*canvas.get_pixel(0, 0), GREEN);
        assert_eq!(*canvas.get_pixel(3, 3), GREEN);
        assert_eq!(*canvas.get_pixel(0, 4), RED);
        assert_eq!(*canvas.get_pixel(3, 7), RED);
    }

    #[test]
    fn composite_leaves_holes_transparent() {
        let tiles = vec![
            Tile::new(GridCoord::new(0, 0), solid(2, RED)),
            Tile::new(GridCoord::new(1, 1), solid(2, RED)),
        ];
        let layout = Layout::new(tiles.iter().map(Tile::coord), 2).unwrap();
        let canvas = composite(&layout, tiles).unwrap();

        // (0,1) is top-left and (1,0) is bottom-right; both are missing.
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
        assert_eq!(*canvas.get_pixel(2, 0), RED);
        assert_eq!(*canvas.get_pixel(0, 2), RED);
    }
}
