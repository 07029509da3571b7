//! # qrstyle
//!
//! Styled QR code images behind two small web forms.
//!
//! `qrstyle` encodes text into a QR symbol at error correction level High,
//! draws its modules with one of several shapes, colors them with a solid fill,
//! a gradient or a reference image, optionally pastes an uploaded image over
//! the center, and serializes the result to PNG. The bundled server exposes
//! this as a style studio form, a classic quick form and a small JSON API.
//!
//! ## Features
//!
//! - Six module drawers: square, gapped square, circle, rounded, vertical bars, horizontal bars.
//! - Six color masks: solid fill, radial, square, horizontal and vertical gradients, image.
//! - Embedded center image for logos (PNG or JPEG upload).
//! - PNG output, shown inline and offered for download under a fixed filename.
//! - Unknown style or mask names fall back to square modules on a solid fill.
//!
//! ## Example
//!
//! Render the default studio pair for a URL:
//!
//! ```rust
//! use qrstyle::generate::{generate, GenerateOutcome, Plan};
//! use qrstyle::render::RenderOptions;
//!
//! let plan = Plan::studio("RoundedModuleDrawer", "RadialGradiantColorMask");
//! if let GenerateOutcome::Rendered(images) = generate("https://example.com", None, plan, RenderOptions::default()) {
//!     for image in &images {
//!         println!("{} -> {} bytes", image.filename, image.png.len());
//!     }
//! }
//! ```
//!
//! Drive the pieces directly:
//!
//! ```rust
//! use qrstyle::{drawer::DrawerKind, mask::MaskKind, render, symbol::Symbol};
//!
//! let symbol = Symbol::encode("Hello, World!").unwrap();
//! let img = render::render(&symbol, DrawerKind::Circle, &MaskKind::SquareGradient.sample(), None, Default::default());
//! let png = render::to_png_bytes(&img).unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`symbol`]: QR encoding via the `qrcode` crate.
//! - [`drawer`]: Module shapes.
//! - [`mask`]: Color masks.
//! - [`render`]: Drawing, embedding and PNG serialization.
//! - [`generate`]: The per-submission pipeline used by the forms.
//! - [`server`]: axum routes, templates and the JSON API.

pub mod config;
pub mod drawer;
pub mod error;
pub mod generate;
pub mod mask;
pub mod render;
pub mod server;
pub mod symbol;

pub use error::{Error, Result};
