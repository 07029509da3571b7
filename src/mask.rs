//! Color masks: how color is laid across a rendered symbol.
//!
//! A mask turns the drawers' coverage layer into the final RGBA image. Each
//! pixel blends the mask's background color with its foreground color at that
//! position, weighted by coverage.
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
use serde::Serialize;
use tracing::debug;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const GRAY: Rgb<u8> = Rgb([100, 100, 100]);

/// Side of the generated sample image used by [`MaskKind::sample`].
const SAMPLE_IMAGE_SIDE: u32 = 100;

/// The closed set of color masks, by selector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MaskKind {
    /// One foreground color everywhere.
    #[default]
    #[serde(rename = "SolidFillColorMask")]
    SolidFill,
    /// Foreground fades outward from the center in circles.
    #[serde(rename = "RadialGradiantColorMask")]
    RadialGradient,
    /// Foreground fades outward from the center in squares.
    #[serde(rename = "SquareGradiantColorMask")]
    SquareGradient,
    /// Foreground fades from the left edge to the right edge.
    #[serde(rename = "HorizontalGradiantColorMask")]
    HorizontalGradient,
    /// Foreground fades from the top edge to the bottom edge.
    #[serde(rename = "VerticalGradiantColorMask")]
    VerticalGradient,
    /// Foreground sampled from a reference image.
    #[serde(rename = "ImageColorMask")]
    Image,
}

impl MaskKind {
    /// Every mask, in selector order.
    pub const ALL: [MaskKind; 6] = [
        MaskKind::SolidFill,
        MaskKind::RadialGradient,
        MaskKind::SquareGradient,
        MaskKind::HorizontalGradient,
        MaskKind::VerticalGradient,
        MaskKind::Image,
    ];

    /// Returns the name shown in the color mask selector.
    pub fn name(self) -> &'static str {
        match self {
            MaskKind::SolidFill => "SolidFillColorMask",
            MaskKind::RadialGradient => "RadialGradiantColorMask",
            MaskKind::SquareGradient => "SquareGradiantColorMask",
            MaskKind::HorizontalGradient => "HorizontalGradiantColorMask",
            MaskKind::VerticalGradient => "VerticalGradiantColorMask",
            MaskKind::Image => "ImageColorMask",
        }
    }

    /// Looks a mask up by its selector name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Looks a mask up by name, falling back to [`MaskKind::SolidFill`].
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            debug!(name, "Unknown color mask, using default");
            Self::default()
        })
    }

    /// Builds this mask with its stock colors: black on white, gradients
    /// running from black to blue.
    ///
    /// The image mask has no stock reference image; it gets the generated
    /// sample gradient.
    pub fn library_default(self) -> ColorMask {
        match self {
            MaskKind::SolidFill => ColorMask::Solid { back: WHITE, front: BLACK },
            MaskKind::RadialGradient => ColorMask::RadialGradient { back: WHITE, center: BLACK, edge: BLUE },
            MaskKind::SquareGradient => ColorMask::SquareGradient { back: WHITE, center: BLACK, edge: BLUE },
            MaskKind::HorizontalGradient => ColorMask::HorizontalGradient { back: WHITE, left: BLACK, right: BLUE },
            MaskKind::VerticalGradient => ColorMask::VerticalGradient { back: WHITE, top: BLACK, bottom: BLUE },
            MaskKind::Image => ColorMask::Image { back: WHITE, image: sample_gradient_image() },
        }
    }

    /// Builds this mask with the fixed sample palette the style studio uses:
    /// every gradient runs from black to gray on white.
    pub fn sample(self) -> ColorMask {
        match self {
            MaskKind::SolidFill => ColorMask::Solid { back: WHITE, front: BLACK },
            MaskKind::RadialGradient => ColorMask::RadialGradient { back: WHITE, center: BLACK, edge: GRAY },
            MaskKind::SquareGradient => ColorMask::SquareGradient { back: WHITE, center: BLACK, edge: GRAY },
            MaskKind::HorizontalGradient => ColorMask::HorizontalGradient { back: WHITE, left: BLACK, right: GRAY },
            MaskKind::VerticalGradient => ColorMask::VerticalGradient { back: WHITE, top: BLACK, bottom: GRAY },
            MaskKind::Image => ColorMask::Image { back: WHITE, image: sample_gradient_image() },
        }
    }
}

/// A color mask together with the parameters its kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMask {
    Solid { back: Rgb<u8>, front: Rgb<u8> },
    /// Foreground fades from `center` to `edge` with euclidean distance from
    /// the image center.
    RadialGradient { back: Rgb<u8>, center: Rgb<u8>, edge: Rgb<u8> },
    /// Like the radial gradient, but distance is measured as the larger of
    /// the horizontal and vertical offsets.
    SquareGradient { back: Rgb<u8>, center: Rgb<u8>, edge: Rgb<u8> },
    HorizontalGradient { back: Rgb<u8>, left: Rgb<u8>, right: Rgb<u8> },
    VerticalGradient { back: Rgb<u8>, top: Rgb<u8>, bottom: Rgb<u8> },
    /// Foreground is sampled from `image` stretched over the whole output.
    Image { back: Rgb<u8>, image: RgbImage },
}

impl ColorMask {
    /// Returns the background color.
    pub fn back(&self) -> Rgb<u8> {
        match self {
            ColorMask::Solid { back, .. }
            | ColorMask::RadialGradient { back, .. }
            | ColorMask::SquareGradient { back, .. }
            | ColorMask::HorizontalGradient { back, .. }
            | ColorMask::VerticalGradient { back, .. }
            | ColorMask::Image { back, .. } => *back,
        }
    }

    /// Colors a coverage layer.
    ///
    /// Pixels with coverage 0 get the background color, pixels with coverage
    /// 255 the foreground color at that position, anything between is
    /// blended linearly.
    pub fn apply(&self, coverage: &GrayImage) -> RgbaImage {
        let (width, height) = coverage.dimensions();
        let reference = match self {
            ColorMask::Image { image, .. } => Some(imageops::resize(image, width, height, FilterType::CatmullRom)),
            _ => None,
        };
        let back = self.back();
        let side = f64::from(width);

        RgbaImage::from_fn(width, height, |x, y| {
            let level = coverage.get_pixel(x, y)[0];
            if level == 0 {
                return opaque(back);
            }
            let front = match (self, &reference) {
                (ColorMask::Image { .. }, Some(reference)) => *reference.get_pixel(x, y),
                _ => self.foreground(x, y, side),
            };
            opaque(lerp(back, front, f64::from(level) / 255.0))
        })
    }

    /// Foreground color at pixel (x, y) of an output `side` pixels wide.
    fn foreground(&self, x: u32, y: u32, side: f64) -> Rgb<u8> {
        let half = side / 2.0;
        let (x, y) = (f64::from(x), f64::from(y));
        let (dx, dy) = (x - half, y - half);
        match self {
            ColorMask::Solid { front, .. } => *front,
            ColorMask::RadialGradient { center, edge, .. } => {
                let distance = (dx * dx + dy * dy).sqrt() / (std::f64::consts::SQRT_2 * half);
                lerp(*center, *edge, distance)
            }
            ColorMask::SquareGradient { center, edge, .. } => {
                lerp(*center, *edge, dx.abs().max(dy.abs()) / half)
            }
            ColorMask::HorizontalGradient { left, right, .. } => lerp(*left, *right, x / side),
            ColorMask::VerticalGradient { top, bottom, .. } => lerp(*top, *bottom, y / side),
            // Sampled from the resized reference in `apply`.
            ColorMask::Image { back, .. } => *back,
        }
    }
}

/// The 100x100 sample image fed to the image mask: red fades left to right,
/// green top to bottom, blue along the diagonal.
pub fn sample_gradient_image() -> RgbImage {
    let side = f64::from(SAMPLE_IMAGE_SIDE);
    RgbImage::from_fn(SAMPLE_IMAGE_SIDE, SAMPLE_IMAGE_SIDE, |x, y| {
        let (x, y) = (f64::from(x), f64::from(y));
        Rgb([
            (255.0 * (1.0 - x / side)) as u8,
            (255.0 * (1.0 - y / side)) as u8,
            (255.0 * (1.0 - (x + y) / (2.0 * side))) as u8,
        ])
    })
}

fn lerp(from: Rgb<u8>, to: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (f64::from(from[i]) * (1.0 - t) + f64::from(to[i]) * t) as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}
