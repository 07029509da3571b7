//! The generation pipeline behind both forms.
//!
//! A [`Plan`] lists the image variants a form produces. [`generate`] runs a
//! plan for one submission and is the only place failures are caught: the
//! caller gets a [`GenerateOutcome`] it can show as-is.
use base64::{engine::general_purpose, Engine as _};
use tracing::{info, warn};

use crate::drawer::DrawerKind;
use crate::error::Result;
use crate::mask::{ColorMask, MaskKind};
use crate::render::{decode_embedded, render, to_png_bytes, RenderOptions};
use crate::symbol::Symbol;

/// Hint shown under every generation failure.
pub const FAILURE_HINT: &str = "Try another color mask or style combination.";

/// Which set of images a submission produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Fixed trio: rounded modules, a radial gradient, and the embedded image.
    Classic,
    /// User-selected drawer and mask: plain, masked, and embedded variants.
    Studio { drawer: DrawerKind, mask: MaskKind },
}

impl Plan {
    /// Builds a studio plan from selector names, falling back to the default
    /// drawer and mask for unknown names.
    pub fn studio(style: &str, mask: &str) -> Self {
        Plan::Studio {
            drawer: DrawerKind::from_name_or_default(style),
            mask: MaskKind::from_name_or_default(mask),
        }
    }

    fn variants(self) -> Vec<Variant> {
        match self {
            Plan::Classic => vec![
                Variant {
                    label: "Image 1",
                    download_label: "Download 1",
                    filename: "QR 1.png",
                    drawer: DrawerKind::Rounded,
                    mask: MaskKind::SolidFill.library_default(),
                    embedded: false,
                },
                Variant {
                    label: "Image 2",
                    download_label: "Download 2",
                    filename: "QR 2.png",
                    drawer: DrawerKind::Square,
                    mask: MaskKind::RadialGradient.library_default(),
                    embedded: false,
                },
                Variant {
                    label: "Image 3",
                    download_label: "Download 3",
                    filename: "QR 3.png",
                    drawer: DrawerKind::Square,
                    mask: MaskKind::SolidFill.library_default(),
                    embedded: true,
                },
            ],
            Plan::Studio { drawer, mask } => vec![
                Variant {
                    label: "Plain",
                    download_label: "Download QR",
                    filename: "qrcode.png",
                    drawer,
                    mask: MaskKind::SolidFill.sample(),
                    embedded: false,
                },
                Variant {
                    label: mask.name(),
                    download_label: "Download masked QR",
                    filename: "qrcode-masked.png",
                    drawer,
                    mask: mask.sample(),
                    embedded: false,
                },
                Variant {
                    label: "Embedded image",
                    download_label: "Download embedded QR",
                    filename: "qrcode-embedded.png",
                    drawer,
                    mask: mask.sample(),
                    embedded: true,
                },
            ],
        }
    }
}

/// One image of a plan.
struct Variant {
    label: &'static str,
    download_label: &'static str,
    filename: &'static str,
    drawer: DrawerKind,
    mask: ColorMask,
    /// Rendered only when the submission carries an image.
    embedded: bool,
}

/// A rendered, PNG-encoded image ready for display and download.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub label: String,
    pub download_label: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl GeneratedImage {
    /// Returns the PNG as base64.
    pub fn base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.png)
    }

    /// Returns the PNG as a `data:` URI for inline display and download links.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64())
    }
}

/// Result of one submission.
#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    /// The text was empty; nothing was rendered and nothing is reported.
    Skipped,
    Rendered(Vec<GeneratedImage>),
    /// Generation failed; the message is meant for the user.
    Failed(String),
}

/// Runs `plan` for one submission.
///
/// # Arguments
///
/// * `text` - The content to encode. Empty text is a silent no-op.
/// * `embedded` - Optional uploaded image bytes (PNG or JPEG).
/// * `plan` - Which variants to render.
/// * `options` - Module size and quiet zone.
///
/// # Example
///
/// ```rust
/// use qrstyle::generate::{generate, GenerateOutcome, Plan};
/// use qrstyle::render::RenderOptions;
///
/// let plan = Plan::studio("SquareModuleDrawer", "SolidFillColorMask");
/// match generate("https://example.com", None, plan, RenderOptions::default()) {
///     GenerateOutcome::Rendered(images) => assert_eq!(images.len(), 2),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub fn generate(text: &str, embedded: Option<&[u8]>, plan: Plan, options: RenderOptions) -> GenerateOutcome {
    if text.is_empty() {
        return GenerateOutcome::Skipped;
    }

    match try_generate(text, embedded, plan, options) {
        Ok(images) => {
            info!(count = images.len(), ?plan, "Generated QR images");
            GenerateOutcome::Rendered(images)
        }
        Err(e) => {
            warn!(error = %e, ?plan, "QR generation failed");
            GenerateOutcome::Failed(format!("Error generating QR code: {e}"))
        }
    }
}

fn try_generate(text: &str, embedded: Option<&[u8]>, plan: Plan, options: RenderOptions) -> Result<Vec<GeneratedImage>> {
    let symbol = Symbol::encode(text)?;
    let embedded = embedded.map(decode_embedded).transpose()?;

    plan.variants()
        .into_iter()
        .filter(|variant| !variant.embedded || embedded.is_some())
        .map(|variant| -> Result<GeneratedImage> {
            let logo = if variant.embedded { embedded.as_ref() } else { None };
            let img = render(&symbol, variant.drawer, &variant.mask, logo, options);
            Ok(GeneratedImage {
                label: variant.label.to_string(),
                download_label: variant.download_label.to_string(),
                filename: variant.filename.to_string(),
                width: img.width(),
                height: img.height(),
                png: to_png_bytes(&img)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn rendered(outcome: GenerateOutcome) -> Vec<GeneratedImage> {
        match outcome {
            GenerateOutcome::Rendered(images) => images,
            other => panic!("expected rendered images, got {other:?}"),
        }
    }

    fn logo_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255]));
        to_png_bytes(&img).unwrap()
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let outcome = generate("", Some(logo_png().as_slice()), Plan::Classic, RenderOptions::default());
        assert!(matches!(outcome, GenerateOutcome::Skipped));
    }

    #[test]
    fn test_empty_text_skips_before_decoding_upload() {
        let outcome = generate("", Some(&b"garbage"[..]), Plan::studio("", ""), RenderOptions::default());
        assert!(matches!(outcome, GenerateOutcome::Skipped));
    }

    #[test]
    fn test_example_scenario_yields_two_downloadable_pngs() {
        let plan = Plan::studio("SquareModuleDrawer", "SolidFillColorMask");
        let images = rendered(generate("https://example.com", None, plan, RenderOptions::default()));
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].filename, "qrcode.png");
        assert_eq!(images[1].filename, "qrcode-masked.png");
        for image in &images {
            let decoded = image::load_from_memory_with_format(&image.png, ImageFormat::Png).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (image.width, image.height));
        }
    }

    #[test]
    fn test_every_style_and_mask_pair_renders() {
        for drawer in DrawerKind::ALL {
            for mask in MaskKind::ALL {
                let plan = Plan::studio(drawer.name(), mask.name());
                let images = rendered(generate("pair", None, plan, RenderOptions { box_size: 2, border: 1 }));
                assert_eq!(images.len(), 2);
                assert!(images.iter().all(|image| !image.png.is_empty()));
            }
        }
    }

    #[test]
    fn test_embedded_image_adds_third_output() {
        let logo = logo_png();
        let classic = rendered(generate("hello", Some(logo.as_slice()), Plan::Classic, RenderOptions::default()));
        assert_eq!(classic.len(), 3);
        assert_eq!(classic[2].filename, "QR 3.png");

        let studio = rendered(generate("hello", Some(logo.as_slice()), Plan::studio("CircleModuleDrawer", "ImageColorMask"), RenderOptions::default()));
        assert_eq!(studio.len(), 3);
        assert_eq!(studio[2].filename, "qrcode-embedded.png");
    }

    #[test]
    fn test_unknown_names_fall_back() {
        assert_eq!(
            Plan::studio("Sparkles", "Rainbow"),
            Plan::Studio { drawer: DrawerKind::Square, mask: MaskKind::SolidFill }
        );
        let images = rendered(generate("hello", None, Plan::studio("Sparkles", "Rainbow"), RenderOptions::default()));
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_bad_upload_is_reported() {
        let outcome = generate("hello", Some(&b"garbage"[..]), Plan::Classic, RenderOptions::default());
        match outcome {
            GenerateOutcome::Failed(message) => assert!(message.starts_with("Error generating QR code:")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_text_is_reported() {
        let outcome = generate(&"x".repeat(4000), None, Plan::Classic, RenderOptions::default());
        assert!(matches!(outcome, GenerateOutcome::Failed(_)));
    }

    #[test]
    fn test_data_uri_prefix() {
        let images = rendered(generate("hello", None, Plan::Classic, RenderOptions::default()));
        assert!(images[0].data_uri().starts_with("data:image/png;base64,iVBOR"));
    }
}
