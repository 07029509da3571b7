//! Multipart form decoding shared by the pages and the JSON API.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::api::err_json;
use crate::drawer::DrawerKind;
use crate::generate::Plan;
use crate::mask::MaskKind;

/// Fields of one generator submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateForm {
    pub text: String,
    pub style: String,
    pub mask: String,
    /// Uploaded image bytes. Browsers send an empty file part when nothing
    /// was picked; that is stored as `None`.
    pub image: Option<Vec<u8>>,
    /// `"classic"` selects the fixed trio; anything else the studio plan.
    pub plan: String,
}

impl GenerateForm {
    /// Reads every known field from `multipart`, ignoring unknown ones.
    pub async fn read(mut multipart: Multipart) -> Result<Self, (StatusCode, Json<Value>)> {
        let mut form = GenerateForm::default();

        while let Some(field) = multipart.next_field().await.map_err(reject)? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "text" => form.text = field.text().await.map_err(reject)?,
                "style" => form.style = field.text().await.map_err(reject)?,
                "mask" => form.mask = field.text().await.map_err(reject)?,
                "plan" => form.plan = field.text().await.map_err(reject)?,
                "image" => {
                    let data = field.bytes().await.map_err(reject)?;
                    form.image = (!data.is_empty()).then(|| data.to_vec());
                }
                _ => {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }

    /// Studio plan for the submitted style and mask names.
    pub fn studio_plan(&self) -> Plan {
        Plan::studio(&self.style, &self.mask)
    }

    /// Plan picked by the `plan` field, for API callers.
    pub fn requested_plan(&self) -> Plan {
        if self.plan.eq_ignore_ascii_case("classic") {
            Plan::Classic
        } else {
            self.studio_plan()
        }
    }

    /// Style name to preselect when re-rendering the form.
    pub fn selected_style(&self) -> &'static str {
        DrawerKind::from_name(&self.style).unwrap_or_default().name()
    }

    /// Mask name to preselect when re-rendering the form.
    pub fn selected_mask(&self) -> &'static str {
        MaskKind::from_name(&self.mask).unwrap_or_default().name()
    }
}

fn reject(e: MultipartError) -> (StatusCode, Json<Value>) {
    err_json(e.status().as_u16(), &e.body_text())
}
