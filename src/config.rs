//! Server configuration: command-line flags with environment fallbacks.
use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;

use crate::render::RenderOptions;

/// Largest module box accepted, in pixels. With the widest border a version
/// 40 symbol stays under 4500 pixels per side.
const MAX_BOX_SIZE: u32 = 20;
const MAX_BORDER: u32 = 20;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Styled QR code generator web forms", long_about = None)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "QRSTYLE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "QRSTYLE_PORT", default_value_t = 8501)]
    pub port: u16,

    /// Side of one QR module, in pixels.
    #[arg(long, env = "QRSTYLE_BOX_SIZE", default_value_t = 10)]
    pub box_size: u32,

    /// Quiet zone around the symbol, in modules.
    #[arg(long, env = "QRSTYLE_BORDER", default_value_t = 4)]
    pub border: u32,

    /// Maximum accepted request body, upload included, in bytes.
    #[arg(long, env = "QRSTYLE_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("box size must be between 1 and 20 pixels, got {0}")]
    BoxSize(u32),
    #[error("border must be at most 20 modules, got {0}")]
    Border(u32),
    #[error("max upload size must be positive")]
    UploadLimit,
    #[error("invalid listen address {0:?}")]
    Address(String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
            box_size: render.box_size,
            border: render.border,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Checks ranges clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BOX_SIZE).contains(&self.box_size) {
            return Err(ConfigError::BoxSize(self.box_size));
        }
        if self.border > MAX_BORDER {
            return Err(ConfigError::Border(self.border));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::UploadLimit);
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Parses `host:port` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Address`] when the host is not an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            box_size: self.box_size,
            border: self.border,
        }
    }
}
