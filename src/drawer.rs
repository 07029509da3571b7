//! Module drawers: the visual shape painted for each dark module.
//!
//! Drawers paint onto a grayscale coverage layer where 255 marks "module
//! here" and 0 marks background. Colors are applied afterwards by a
//! [`ColorMask`](crate::mask::ColorMask).
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::debug;

use crate::symbol::Symbol;

const COVERED: Luma<u8> = Luma([255u8]);

/// Fraction of the box kept by the gapped square drawer.
const GAPPED_SIZE_RATIO: f32 = 0.8;
/// Fraction of the box width (or height) kept by the bar drawers.
const BAR_SHRINK_RATIO: f32 = 0.8;
/// Samples per pixel axis when measuring how much of a pixel a disc covers.
const DISC_SUBSAMPLES: u32 = 4;

/// The closed set of module drawing styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DrawerKind {
    /// Each module fills its whole box.
    #[default]
    #[serde(rename = "SquareModuleDrawer")]
    Square,
    /// Each module is a square slightly smaller than its box.
    #[serde(rename = "GappedSquareModuleDrawer")]
    GappedSquare,
    /// Each module is the circle inscribed in its box.
    #[serde(rename = "CircleModuleDrawer")]
    Circle,
    /// Modules round off every corner not shared with a neighbor.
    #[serde(rename = "RoundedModuleDrawer")]
    Rounded,
    /// Vertically adjacent modules merge into bars with round ends.
    #[serde(rename = "VerticalBarsDrawer")]
    VerticalBars,
    /// Horizontally adjacent modules merge into bars with round ends.
    #[serde(rename = "HorizontalBarsDrawer")]
    HorizontalBars,
}

impl DrawerKind {
    /// Every drawer, in the order the forms list them.
    pub const ALL: [DrawerKind; 6] = [
        DrawerKind::Square,
        DrawerKind::GappedSquare,
        DrawerKind::Circle,
        DrawerKind::Rounded,
        DrawerKind::VerticalBars,
        DrawerKind::HorizontalBars,
    ];

    /// Returns the name shown in the style selector.
    pub fn name(self) -> &'static str {
        match self {
            DrawerKind::Square => "SquareModuleDrawer",
            DrawerKind::GappedSquare => "GappedSquareModuleDrawer",
            DrawerKind::Circle => "CircleModuleDrawer",
            DrawerKind::Rounded => "RoundedModuleDrawer",
            DrawerKind::VerticalBars => "VerticalBarsDrawer",
            DrawerKind::HorizontalBars => "HorizontalBarsDrawer",
        }
    }

    /// Looks a drawer up by its selector name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Looks a drawer up by name, falling back to [`DrawerKind::Square`] for
    /// names outside the closed set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrstyle::drawer::DrawerKind;
    ///
    /// assert_eq!(DrawerKind::from_name_or_default("CircleModuleDrawer"), DrawerKind::Circle);
    /// assert_eq!(DrawerKind::from_name_or_default("Sparkles"), DrawerKind::Square);
    /// ```
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            debug!(name, "Unknown module drawer, using default");
            Self::default()
        })
    }

    /// Paints every dark module of `symbol` onto `layer`.
    ///
    /// `box_size` is the side of one module in pixels and `border` the quiet
    /// zone width in modules. `layer` must be at least
    /// `(symbol.size() + 2 * border) * box_size` pixels wide and tall.
    pub fn draw(self, symbol: &Symbol, layer: &mut GrayImage, box_size: u32, border: u32) {
        let step = box_size as i32;
        let offset = border as i32;
        for (x, y) in symbol.dark_modules() {
            let origin = ((x + offset) * step, (y + offset) * step);
            let cell = Cell {
                origin,
                box_size,
                north: symbol.is_dark(x, y - 1),
                south: symbol.is_dark(x, y + 1),
                west: symbol.is_dark(x - 1, y),
                east: symbol.is_dark(x + 1, y),
            };
            match self {
                DrawerKind::Square => cell.fill(layer),
                DrawerKind::GappedSquare => cell.gapped(layer),
                DrawerKind::Circle => cell.circle(layer),
                DrawerKind::Rounded => cell.rounded(layer),
                DrawerKind::VerticalBars => cell.vertical_bar(layer),
                DrawerKind::HorizontalBars => cell.horizontal_bar(layer),
            }
        }
    }
}

/// One dark module and the state of its four orthogonal neighbors.
struct Cell {
    origin: (i32, i32),
    box_size: u32,
    north: bool,
    south: bool,
    west: bool,
    east: bool,
}

impl Cell {
    fn rect(layer: &mut GrayImage, x: i32, y: i32, width: u32, height: u32) {
        draw_filled_rect_mut(layer, Rect::at(x, y).of_size(width.max(1), height.max(1)), COVERED);
    }

    fn fill(&self, layer: &mut GrayImage) {
        let (x, y) = self.origin;
        Self::rect(layer, x, y, self.box_size, self.box_size);
    }

    fn gapped(&self, layer: &mut GrayImage) {
        let side = shrink(self.box_size, GAPPED_SIZE_RATIO);
        let pad = ((self.box_size - side) / 2) as i32;
        let (x, y) = self.origin;
        Self::rect(layer, x + pad, y + pad, side, side);
    }

    fn circle(&self, layer: &mut GrayImage) {
        let radius = f64::from(self.box_size) / 2.0;
        let (x, y) = self.origin;
        disc(layer, (f64::from(x) + radius, f64::from(y) + radius), radius);
    }

    /// A corner stays square when a neighbor touches either of its sides.
    fn rounded(&self, layer: &mut GrayImage) {
        self.circle(layer);

        let (x, y) = self.origin;
        let near = self.box_size / 2;
        let far = self.box_size - near;
        let mid = near as i32;
        if self.north || self.west {
            Self::rect(layer, x, y, near, near);
        }
        if self.north || self.east {
            Self::rect(layer, x + mid, y, far, near);
        }
        if self.south || self.west {
            Self::rect(layer, x, y + mid, near, far);
        }
        if self.south || self.east {
            Self::rect(layer, x + mid, y + mid, far, far);
        }
    }

    fn vertical_bar(&self, layer: &mut GrayImage) {
        let width = shrink(self.box_size, BAR_SHRINK_RATIO);
        let pad = ((self.box_size - width) / 2) as i32;
        let radius = f64::from(width) / 2.0;
        let cap = (width / 2) as i32;
        let (x, y) = (self.origin.0 + pad, self.origin.1);
        let bottom = y + self.box_size as i32;
        let cap_x = f64::from(x) + radius;

        let top_cap = if self.north { 0 } else { cap };
        let bottom_cap = if self.south { 0 } else { cap };
        Self::rect(layer, x, y + top_cap, width, (bottom - bottom_cap - y - top_cap).max(0) as u32);
        if !self.north {
            disc(layer, (cap_x, f64::from(y) + radius), radius);
        }
        if !self.south {
            disc(layer, (cap_x, f64::from(bottom) - radius), radius);
        }
    }

    fn horizontal_bar(&self, layer: &mut GrayImage) {
        let height = shrink(self.box_size, BAR_SHRINK_RATIO);
        let pad = ((self.box_size - height) / 2) as i32;
        let radius = f64::from(height) / 2.0;
        let cap = (height / 2) as i32;
        let (x, y) = (self.origin.0, self.origin.1 + pad);
        let right = x + self.box_size as i32;
        let cap_y = f64::from(y) + radius;

        let left_cap = if self.west { 0 } else { cap };
        let right_cap = if self.east { 0 } else { cap };
        Self::rect(layer, x + left_cap, y, (right - right_cap - x - left_cap).max(0) as u32, height);
        if !self.west {
            disc(layer, (f64::from(x) + radius, cap_y), radius);
        }
        if !self.east {
            disc(layer, (f64::from(right) - radius, cap_y), radius);
        }
    }
}

/// Paints a disc centered on `center` in pixel coordinates, where pixel
/// (x, y) spans `[x, x + 1)`. Edge pixels get coverage proportional to the
/// share of their subsamples inside the disc. Existing coverage is never
/// lowered.
fn disc(layer: &mut GrayImage, center: (f64, f64), radius: f64) {
    let (width, height) = layer.dimensions();
    let (cx, cy) = center;
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil().max(0.0) as u32).min(width);
    let y1 = ((cy + radius).ceil().max(0.0) as u32).min(height);
    let step = 1.0 / f64::from(DISC_SUBSAMPLES);
    let samples = DISC_SUBSAMPLES * DISC_SUBSAMPLES;

    for py in y0..y1 {
        for px in x0..x1 {
            let mut inside = 0;
            for sy in 0..DISC_SUBSAMPLES {
                for sx in 0..DISC_SUBSAMPLES {
                    let dx = f64::from(px) + (f64::from(sx) + 0.5) * step - cx;
                    let dy = f64::from(py) + (f64::from(sy) + 0.5) * step - cy;
                    if dx * dx + dy * dy <= radius * radius {
                        inside += 1;
                    }
                }
            }
            if inside == 0 {
                continue;
            }
            let level = (inside * 255 / samples) as u8;
            let pixel = layer.get_pixel_mut(px, py);
            pixel[0] = pixel[0].max(level);
        }
    }
}

fn shrink(box_size: u32, ratio: f32) -> u32 {
    ((box_size as f32 * ratio).round() as u32).clamp(1, box_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: u32 = 10;

    /// Renders `symbol` with no border so module (x, y) starts at pixel (x * BOX, y * BOX).
    fn layer_for(kind: DrawerKind, symbol: &Symbol) -> GrayImage {
        let side = symbol.size() as u32 * BOX;
        let mut layer = GrayImage::new(side, side);
        kind.draw(symbol, &mut layer, BOX, 0);
        layer
    }

    fn covered(layer: &GrayImage, x: u32, y: u32) -> bool {
        layer.get_pixel(x, y)[0] == 255
    }

    #[test]
    fn test_names_round_trip() {
        for kind in DrawerKind::ALL {
            assert_eq!(DrawerKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_square() {
        assert_eq!(DrawerKind::from_name("squaremoduledrawer"), None);
        assert_eq!(DrawerKind::from_name_or_default(""), DrawerKind::Square);
    }

    #[test]
    fn test_square_fills_box_corners() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::Square, &symbol);
        // Module (0, 0) is the top left finder pattern corner.
        assert!(covered(&layer, 0, 0));
        assert!(covered(&layer, BOX - 1, BOX - 1));
    }

    #[test]
    fn test_gapped_square_leaves_margin() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::GappedSquare, &symbol);
        assert!(!covered(&layer, 0, 0));
        assert!(covered(&layer, BOX / 2, BOX / 2));
    }

    #[test]
    fn test_circle_leaves_box_corners_empty() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::Circle, &symbol);
        assert!(!covered(&layer, 0, 0));
        assert!(covered(&layer, 4, 4));
    }

    #[test]
    fn test_circle_is_centered_in_even_box() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::Circle, &symbol);
        // Mirror pixels around the box center carry the same coverage.
        for i in 0..BOX {
            for j in 0..BOX {
                assert_eq!(layer.get_pixel(i, j), layer.get_pixel(BOX - 1 - i, j), "at ({i}, {j})");
                assert_eq!(layer.get_pixel(i, j), layer.get_pixel(i, BOX - 1 - j), "at ({i}, {j})");
            }
        }
        // The last column and row of the box are reached.
        assert!(covered(&layer, BOX - 1, BOX / 2));
        assert!(covered(&layer, BOX / 2, BOX - 1));
    }

    #[test]
    fn test_circle_edge_is_antialiased() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::Circle, &symbol);
        let level = layer.get_pixel(1, 1)[0];
        assert!(level > 0 && level < 255, "got {level}");
    }

    #[test]
    fn test_rounded_keeps_corners_shared_with_neighbors() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::Rounded, &symbol);
        // Module (0, 0) has no north or west neighbor: round corner.
        assert!(!covered(&layer, 0, 0));
        // Module (1, 0) has west and east neighbors in the finder pattern
        // top row: every corner stays square.
        assert!(covered(&layer, BOX, 0));
        assert!(covered(&layer, 2 * BOX - 1, 0));
    }

    #[test]
    fn test_vertical_bar_merges_with_module_below() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::VerticalBars, &symbol);
        // Column 0 of the finder pattern is dark for 7 modules; the seam
        // between rows 0 and 1 must be painted in the bar's middle.
        assert!(covered(&layer, BOX / 2, BOX - 1));
        assert!(covered(&layer, BOX / 2, BOX));
        // Bars are narrower than the box.
        assert!(!covered(&layer, 0, BOX));
    }

    #[test]
    fn test_horizontal_bar_merges_with_module_right() {
        let symbol = Symbol::encode("HELLO").unwrap();
        let layer = layer_for(DrawerKind::HorizontalBars, &symbol);
        assert!(covered(&layer, BOX - 1, BOX / 2));
        assert!(covered(&layer, BOX, BOX / 2));
        assert!(!covered(&layer, BOX, 0));
    }

    #[test]
    fn test_tiny_boxes_do_not_panic() {
        let symbol = Symbol::encode("HELLO").unwrap();
        for kind in DrawerKind::ALL {
            let side = symbol.size() as u32;
            let mut layer = GrayImage::new(side, side);
            kind.draw(&symbol, &mut layer, 1, 0);
        }
    }
}
