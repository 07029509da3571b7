use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

use crate::drawer::DrawerKind;
use crate::error::{Error, Result};
use crate::mask::ColorMask;
use crate::symbol::Symbol;

/*---- Rendering ----*/

/// Share of the image width taken by an embedded image.
const EMBEDDED_IMAGE_RATIO: f32 = 0.25;

/// Pixel geometry of a rendered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Side of one module, in pixels.
    pub box_size: u32,
    /// Quiet zone around the symbol, in modules.
    pub border: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { box_size: 10, border: 4 }
    }
}

impl RenderOptions {
    /// Side in pixels of the image rendered for `symbol`.
    pub fn image_side(&self, symbol: &Symbol) -> u32 {
        (symbol.size() as u32 + 2 * self.border) * self.box_size
    }
}

/// Renders a symbol with the given drawer and color mask, optionally pasting
/// an image over its center.
///
/// # Arguments
///
/// * `symbol` - The encoded QR symbol.
/// * `drawer` - Shape painted for each dark module.
/// * `mask` - Colors applied over the painted modules.
/// * `embedded` - Optional image pasted at the center, about a quarter of the width.
/// * `options` - Module size and quiet zone.
///
/// # Example
///
/// ```rust
/// use qrstyle::drawer::DrawerKind;
/// use qrstyle::mask::MaskKind;
/// use qrstyle::render::{render, RenderOptions};
/// use qrstyle::symbol::Symbol;
///
/// let symbol = Symbol::encode("Hello, World!").unwrap();
/// let options = RenderOptions::default();
/// let img = render(&symbol, DrawerKind::Rounded, &MaskKind::RadialGradient.library_default(), None, options);
/// assert_eq!(img.width(), options.image_side(&symbol));
/// ```
pub fn render(
    symbol: &Symbol,
    drawer: DrawerKind,
    mask: &ColorMask,
    embedded: Option<&DynamicImage>,
    options: RenderOptions,
) -> RgbaImage {
    let side = options.image_side(symbol);
    let mut coverage = GrayImage::new(side, side);
    drawer.draw(symbol, &mut coverage, options.box_size, options.border);

    let mut img = mask.apply(&coverage);
    if let Some(embedded) = embedded {
        paste_centered(&mut img, embedded, options.box_size);
    }

    debug!(side, drawer = drawer.name(), embedded = embedded.is_some(), "Rendered styled QR image");
    img
}

/// Alpha-composites `embedded` over the center of `img`.
///
/// The offset is snapped down to the module grid so the pasted image
/// covers whole modules.
fn paste_centered(img: &mut RgbaImage, embedded: &DynamicImage, box_size: u32) {
    let total = img.width();
    let approx = (total as f32 * EMBEDDED_IMAGE_RATIO) as u32;
    let offset = (total / 2 - approx / 2) / box_size * box_size;
    let side = total.saturating_sub(offset * 2).max(1);

    let logo = imageops::resize(&embedded.to_rgba8(), side, side, FilterType::Lanczos3);
    imageops::overlay(img, &logo, i64::from(offset), i64::from(offset));
}

/*---- Serialization ----*/

/// Decodes uploaded image bytes (PNG or JPEG) into a bitmap.
///
/// # Errors
///
/// Returns [`Error::EmbeddedImage`] if the bytes are not a supported image.
pub fn decode_embedded(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(Error::EmbeddedImage)
}

/// Encodes an image as a PNG byte buffer.
///
/// # Errors
///
/// Returns [`Error::Image`] if the encoder fails.
pub fn to_png_bytes(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MaskKind;
    use image::{Rgba, RgbaImage};

    fn red_png(side: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(side, side, Rgba([255, 0, 0, 255]));
        to_png_bytes(&img).unwrap()
    }

    #[test]
    fn test_image_side_includes_border() {
        let symbol = Symbol::encode("Hello").unwrap();
        let options = RenderOptions::default();
        // 21 modules + 2 * 4 border, 10 pixels each.
        assert_eq!(options.image_side(&symbol), 290);
    }

    #[test]
    fn test_render_keeps_quiet_zone_background() {
        let symbol = Symbol::encode("Hello").unwrap();
        let img = render(&symbol, DrawerKind::Square, &MaskKind::SolidFill.library_default(), None, RenderOptions::default());
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        // First module of the top left finder pattern starts after the border.
        assert_eq!(*img.get_pixel(40, 40), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_circle_edges_blend_into_background() {
        let symbol = Symbol::encode("Hello").unwrap();
        let img = render(&symbol, DrawerKind::Circle, &MaskKind::SolidFill.library_default(), None, RenderOptions::default());
        // Module (0, 0) spans pixels 40..50; its disc edge crosses pixel (41, 41).
        let edge = img.get_pixel(41, 41)[0];
        assert!(edge > 0 && edge < 255, "got {edge}");
        assert_eq!(*img.get_pixel(45, 45), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_embedded_image_lands_in_center() {
        let symbol = Symbol::encode("https://example.com").unwrap();
        let logo = decode_embedded(&red_png(16)).unwrap();
        let img = render(&symbol, DrawerKind::Square, &MaskKind::SolidFill.library_default(), Some(&logo), RenderOptions::default());
        let center = img.width() / 2;
        assert_eq!(*img.get_pixel(center, center), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_round_trip_keeps_dimensions() {
        let symbol = Symbol::encode("Hello").unwrap();
        let img = render(&symbol, DrawerKind::Circle, &MaskKind::Image.sample(), None, RenderOptions { box_size: 3, border: 2 });
        let bytes = to_png_bytes(&img).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), img.dimensions());
        assert_eq!(img.width(), (21 + 4) * 3);
    }

    #[test]
    fn test_decode_embedded_rejects_garbage() {
        let err = decode_embedded(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::EmbeddedImage(_)));
    }
}
