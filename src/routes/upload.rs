use axum::extract::Multipart;
use axum::{Json, extract::State};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};
use crate::extract::extract_json;
use crate::models::{AppState, ApplianceAttributes, UploadResponse};

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub const ANALYSIS_PROMPT: &str = "Analyze this image and tell me if it contains a utility device. \
If it does, identify the device, estimate its production year, provide some additional information \
about it, and estimate its total volume in liters. Return the result as JSON in the following format: \
{\"brand\": \"Brand name\", \"year\": \"Estimated production year\", \"freestanding\": true/false, \
\"hasFridge\": true/false, \"totalVolume\": \"Estimated total volume in liters\"}";

/// `photo.JPG` -> allowed, `archive.tar.gz` -> checks `gz`, `png` -> no dot, rejected.
#[must_use]
pub fn allowed_file(filename: &str) -> bool {
    filename.rsplit_once('.').is_some_and(|(_, ext)| {
        let ext = ext.to_ascii_lowercase();
        ALLOWED_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Read the answer as the attributes the prompt asks for. A mismatch is
/// only logged; the result is relayed either way.
fn check_shape(result: &JsonValue) -> Result<ApplianceAttributes, serde_json::Error> {
    ApplianceAttributes::deserialize(result)
}

/// Analyze an appliance photo with the configured vision model.
///
/// Accepts a multipart form whose file part is named `file`.
///
/// # Errors
///
/// 400 for a missing, unnamed or non-image file; 500 if the model call
/// fails or its answer holds no parseable fenced JSON.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        // A `file` field without a filename is a plain form value, not a file part.
        let Some(filename) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(AppError::bad_request("No selected file"));
        }
        if !allowed_file(&filename) {
            return Err(AppError::bad_request("File type not allowed"));
        }
        file = Some((filename, field.bytes().await?.to_vec()));
        break;
    }

    let Some((filename, bytes)) = file else {
        return Err(AppError::bad_request("No file part"));
    };

    let image = B64.encode(&bytes);
    tracing::info!(%filename, bytes = bytes.len(), "analyzing upload");

    let answer = state.vision.analyze(ANALYSIS_PROMPT, &image).await?;
    let result = extract_json(&answer)?;
    if let Err(e) = check_shape(&result) {
        tracing::debug!(error = %e, "model answer differs from the requested attributes");
    }

    Ok(Json(UploadResponse { result, image }))
}
