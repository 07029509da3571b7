//! JSON endpoints for scripted use.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tokio::task::{self, JoinError};
use tracing::error;

use super::form::GenerateForm;
use super::AppState;
use crate::drawer::DrawerKind;
use crate::generate::{generate as run_plan, GenerateOutcome, Plan, FAILURE_HINT};
use crate::mask::MaskKind;
use crate::render::RenderOptions;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Runs `plan` on the blocking pool so rendering never stalls a runtime worker.
pub(super) async fn generate_blocking(
    text: String,
    image: Option<Vec<u8>>,
    plan: Plan,
    options: RenderOptions,
) -> Result<GenerateOutcome, (StatusCode, Json<Value>)> {
    task::spawn_blocking(move || run_plan(&text, image.as_deref(), plan, options))
        .await
        .map_err(task_failed)
}

fn task_failed(e: JoinError) -> (StatusCode, Json<Value>) {
    error!(error = %e, "QR generation task failed");
    err_json(500, &format!("QR generation task failed: {e}"))
}

/// POST /api/generate – Render a submission and return the PNGs as base64
///
/// Generation failures are reported in the body with status 200; only
/// malformed requests get an error status.
pub async fn generate(State(state): State<AppState>, multipart: Multipart) -> ApiResult {
    let form = GenerateForm::read(multipart).await?;
    let plan = form.requested_plan();

    let body = match generate_blocking(form.text, form.image, plan, state.render_options()).await? {
        GenerateOutcome::Skipped => json!({ "status": "skipped", "images": [] }),
        GenerateOutcome::Rendered(images) => {
            let images: Vec<Value> = images
                .iter()
                .map(|image| {
                    json!({
                        "label": image.label,
                        "download_label": image.download_label,
                        "filename": image.filename,
                        "width": image.width,
                        "height": image.height,
                        "png_base64": image.base64(),
                    })
                })
                .collect();
            json!({ "status": "ok", "images": images })
        }
        GenerateOutcome::Failed(message) => {
            json!({ "status": "error", "error": message, "hint": FAILURE_HINT })
        }
    };

    Ok(Json(body))
}

/// GET /api/styles – List the selectable drawers and masks
pub async fn styles() -> Json<Value> {
    Json(json!({
        "drawers": DrawerKind::ALL,
        "masks": MaskKind::ALL,
        "default_drawer": DrawerKind::default(),
        "default_mask": MaskKind::default(),
    }))
}

pub async fn status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn generate_blocking_renders_off_runtime() {
        let options = RenderOptions { box_size: 2, border: 1 };
        let outcome = generate_blocking("hello".into(), None, Plan::Classic, options).await.unwrap();
        match outcome {
            GenerateOutcome::Rendered(images) => assert_eq!(images.len(), 2),
            other => panic!("expected rendered images, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicked_task_is_internal_error() {
        let join_error = task::spawn_blocking(|| panic!("render exploded")).await.unwrap_err();
        let (status, Json(body)) = task_failed(join_error);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().starts_with("QR generation task failed"));
    }
}
