//! QR symbol encoding.
//!
//! Encoding itself is delegated to the [`qrcode`] crate. This module only pins
//! the parameters every styled image uses (error correction level High, the
//! smallest version that fits) and keeps the resulting module grid around in a
//! form the drawers can query cheaply, including outside the symbol bounds.
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::error::Result;

/// An encoded QR symbol: a square grid of dark and light modules.
///
/// # Example
///
/// ```rust
/// use qrstyle::symbol::Symbol;
///
/// let symbol = Symbol::encode("https://example.com").unwrap();
/// assert!(symbol.size() >= 21);
/// assert!(symbol.is_dark(0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Width and height in modules, between 21 and 177.
    size: i32,
    /// Row-major module colors, `true` for dark.
    modules: Vec<bool>,
}

impl Symbol {
    /// Encodes `text` at error correction level High.
    ///
    /// The version is chosen automatically ("fit" sizing): the smallest
    /// version able to hold the data wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`](crate::Error::Encode) when the data does not
    /// fit in any version at level High.
    pub fn encode(text: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
        let size = code.width() as i32;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        debug!(size, bytes = text.len(), "Encoded QR symbol");
        Ok(Self { size, modules })
    }

    /// Returns the width and height of this symbol, in modules.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns the color of the module at the given coordinates, `false` for
    /// light and `true` for dark.
    ///
    /// The top left corner has the coordinates (x=0, y=0). Coordinates
    /// outside the symbol return `false`, so drawers can ask about neighbors
    /// of edge modules without bounds checks.
    pub fn is_dark(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x)
            && (0..self.size).contains(&y)
            && self.modules[(y * self.size + x) as usize]
    }

    /// Iterates over the coordinates of every dark module.
    pub fn dark_modules(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size)
            .flat_map(move |y| (0..self.size).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.is_dark(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_encode_picks_smallest_fitting_version() {
        // Version 1 at level H holds 7 bytes; "Hello" fits.
        let symbol = Symbol::encode("Hello").unwrap();
        assert_eq!(symbol.size(), 21);
    }

    #[test]
    fn test_encode_grows_with_data() {
        let small = Symbol::encode("https://example.com").unwrap();
        let large = Symbol::encode(&"x".repeat(300)).unwrap();
        assert!(large.size() > small.size());
    }

    #[test]
    fn test_finder_pattern_corners_are_dark() {
        let symbol = Symbol::encode("HELLO WORLD").unwrap();
        let last = symbol.size() - 1;
        assert!(symbol.is_dark(0, 0));
        assert!(symbol.is_dark(last, 0));
        assert!(symbol.is_dark(0, last));
    }

    #[test]
    fn test_out_of_bounds_is_light() {
        let symbol = Symbol::encode("HELLO WORLD").unwrap();
        assert!(!symbol.is_dark(-1, 0));
        assert!(!symbol.is_dark(0, -1));
        assert!(!symbol.is_dark(symbol.size(), 0));
    }

    #[test]
    fn test_dark_modules_matches_is_dark() {
        let symbol = Symbol::encode("abc").unwrap();
        for (x, y) in symbol.dark_modules() {
            assert!(symbol.is_dark(x, y));
        }
        assert!(symbol.dark_modules().count() > 0);
    }

    #[test]
    fn test_encode_rejects_oversized_data() {
        // Version 40-H caps out at 1273 bytes.
        let err = Symbol::encode(&"x".repeat(4000)).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }
}
