use qrcode::types::QrError;
use thiserror::Error;

/// Errors raised while encoding, rendering or serializing a styled QR code.
#[derive(Debug, Error)]
pub enum Error {
    /// The text could not be encoded, usually because it exceeds the capacity
    /// of a version 40 symbol at error correction level High.
    #[error("failed to encode QR symbol: {0}")]
    Encode(#[from] QrError),

    /// The uploaded embedded image could not be decoded.
    #[error("failed to decode embedded image: {0}")]
    EmbeddedImage(#[source] image::ImageError),

    /// Any other imaging failure, e.g. while writing the PNG buffer.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
