//! HTML pages for the two generator forms.
//!
//! Both forms post back to their own URL and the response re-renders the
//! page with the submitted values, the generated images, or the failure
//! message. Downloads are `data:` links carrying a fixed filename, so no
//! image is kept between requests.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use super::api::{err_json, generate_blocking};
use super::form::GenerateForm;
use super::AppState;
use crate::drawer::DrawerKind;
use crate::generate::{GenerateOutcome, GeneratedImage, Plan, FAILURE_HINT};
use crate::mask::MaskKind;

type PageResult = Result<Html<String>, (StatusCode, Json<Value>)>;

/// Sample sheet of every module drawer.
const DRAWER_SAMPLES_URL: &str =
    "https://raw.githubusercontent.com/lincolnloop/python-qrcode/main/doc/module_drawers.png";
/// Sample sheet of every color mask.
const MASK_SAMPLES_URL: &str =
    "https://raw.githubusercontent.com/lincolnloop/python-qrcode/main/doc/color_masks.png";

/// Compiles the bundled templates.
pub fn load_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("results.html", include_str!("../../templates/results.html")),
        ("studio.html", include_str!("../../templates/studio.html")),
        ("classic.html", include_str!("../../templates/classic.html")),
    ])?;
    Ok(tera)
}

#[derive(Debug, Serialize)]
struct Choice {
    name: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct ImageView {
    label: String,
    download_label: String,
    filename: String,
    width: u32,
    height: u32,
    data_uri: String,
}

impl From<&GeneratedImage> for ImageView {
    fn from(image: &GeneratedImage) -> Self {
        Self {
            label: image.label.clone(),
            download_label: image.download_label.clone(),
            filename: image.filename.clone(),
            width: image.width,
            height: image.height,
            data_uri: image.data_uri(),
        }
    }
}

/// Everything a page template can show.
#[derive(Debug, Default, Serialize)]
struct PageView {
    text: String,
    styles: Vec<Choice>,
    masks: Vec<Choice>,
    images: Vec<ImageView>,
    error: Option<String>,
    hint: Option<&'static str>,
    drawer_samples_url: &'static str,
    mask_samples_url: &'static str,
}

impl PageView {
    fn new(form: &GenerateForm) -> Self {
        let (style, mask) = (form.selected_style(), form.selected_mask());
        Self {
            text: form.text.clone(),
            styles: DrawerKind::ALL
                .iter()
                .map(|kind| Choice { name: kind.name(), selected: kind.name() == style })
                .collect(),
            masks: MaskKind::ALL
                .iter()
                .map(|kind| Choice { name: kind.name(), selected: kind.name() == mask })
                .collect(),
            drawer_samples_url: DRAWER_SAMPLES_URL,
            mask_samples_url: MASK_SAMPLES_URL,
            ..Self::default()
        }
    }

    fn with_outcome(mut self, outcome: GenerateOutcome) -> Self {
        match outcome {
            GenerateOutcome::Skipped => {}
            GenerateOutcome::Rendered(images) => {
                self.images = images.iter().map(ImageView::from).collect();
            }
            GenerateOutcome::Failed(message) => {
                self.error = Some(message);
                self.hint = Some(FAILURE_HINT);
            }
        }
        self
    }
}

fn render_page(state: &AppState, template: &str, view: &PageView) -> PageResult {
    let context = Context::from_serialize(view).map_err(|e| err_json(500, &e.to_string()))?;
    let html = state.templates().render(template, &context).map_err(|e| {
        tracing::error!(template, "Template rendering failed: {e}");
        err_json(500, "Failed to render page")
    })?;
    Ok(Html(html))
}

/// GET / – Style studio form
pub async fn studio_form(State(state): State<AppState>) -> PageResult {
    render_page(&state, "studio.html", &PageView::new(&GenerateForm::default()))
}

/// POST / – Generate with the selected style and color mask
pub async fn studio_submit(State(state): State<AppState>, multipart: Multipart) -> PageResult {
    let mut form = GenerateForm::read(multipart).await?;
    let plan = form.studio_plan();
    let outcome = generate_blocking(form.text.clone(), form.image.take(), plan, state.render_options()).await?;
    render_page(&state, "studio.html", &PageView::new(&form).with_outcome(outcome))
}

/// GET /classic – Quick form with fixed styles
pub async fn classic_form(State(state): State<AppState>) -> PageResult {
    render_page(&state, "classic.html", &PageView::new(&GenerateForm::default()))
}

/// POST /classic – Generate the fixed trio
pub async fn classic_submit(State(state): State<AppState>, multipart: Multipart) -> PageResult {
    let mut form = GenerateForm::read(multipart).await?;
    let outcome = generate_blocking(form.text.clone(), form.image.take(), Plan::Classic, state.render_options()).await?;
    render_page(&state, "classic.html", &PageView::new(&form).with_outcome(outcome))
}
