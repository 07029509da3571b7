//! HTTP front end: the two generator forms and a small JSON API.

pub mod api;
pub mod form;
pub mod pages;
pub mod router;

use std::sync::Arc;

use anyhow::Result;
use tera::Tera;

use crate::config::ServerConfig;
use crate::render::RenderOptions;

/// Immutable state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    templates: Tera,
    render: RenderOptions,
    max_upload_bytes: usize,
}

impl AppState {
    /// Compiles the page templates and captures the render settings.
    ///
    /// # Errors
    ///
    /// Fails if a bundled template does not parse.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Inner {
                templates: pages::load_templates()?,
                render: config.render_options(),
                max_upload_bytes: config.max_upload_bytes,
            }),
        })
    }

    pub fn templates(&self) -> &Tera {
        &self.inner.templates
    }

    pub fn render_options(&self) -> RenderOptions {
        self.inner.render
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.inner.max_upload_bytes
    }
}

/// Binds the configured address and serves until ctrl-c.
pub async fn start_server(config: &ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let state = AppState::new(config)?;
    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("QR style server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
            }
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}
