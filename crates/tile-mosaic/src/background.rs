//! Solid background compositing.

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, Rgb, Rgba, RgbaImage};
use tracing::debug;

use crate::compose::overlay;
use crate::error::MosaicError;

/// Opaque background color, parsed from `#RRGGBB` or `#RGB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor(pub Rgb<u8>);

impl BackgroundColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb([r, g, b]))
    }
}

impl FromStr for BackgroundColor {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MosaicError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #abc is shorthand for #aabbcc
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Composite `image` over an optional solid background.
///
/// Without a color the image is returned as RGBA with its alpha intact.
/// With a color the result is opaque RGB.
pub fn apply_background(image: RgbaImage, color: Option<BackgroundColor>) -> DynamicImage {
    let Some(color) = color else {
        return DynamicImage::ImageRgba8(image);
    };

    debug!(color = %color, "Applying background color");
    let [r, g, b] = color.0.0;
    let (width, height) = image.dimensions();
    let mut background = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
    overlay(&mut background, &image, 0, 0);
    drop(image);

    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(background).into_rgb8())
}
