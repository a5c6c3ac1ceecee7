#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::domain::models::Backend;
use crate::domain::models::ContentPart;
use crate::domain::models::EditError;
use crate::domain::models::GenerateRequest;
use crate::domain::models::GenerateResponse;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationResult;
use crate::domain::models::UploadedImage;

pub const NO_IMAGES_MESSAGE: &str = "No images uploaded. Please upload at least one image.";
pub const NO_INSTRUCTION_MESSAGE: &str =
    "No instruction provided. Please describe the edit you want.";

/// Checks the preconditions of an edit without touching the network.
pub fn validate(prompt: &str, images: &[UploadedImage]) -> Result<(), EditError> {
    if images.is_empty() {
        return Err(EditError::Validation(NO_IMAGES_MESSAGE.to_string()));
    }
    if prompt.trim().is_empty() {
        return Err(EditError::Validation(NO_INSTRUCTION_MESSAGE.to_string()));
    }

    return Ok(());
}

/// One inline part per image in upload order, then the prompt.
pub fn build_request(model: &str, prompt: &str, images: &[UploadedImage]) -> GenerateRequest {
    let mut parts = images
        .iter()
        .map(|image| {
            return ContentPart::InlineData {
                mime_type: Some(image.mime_type().to_string()),
                data: image.base64().to_string(),
            };
        })
        .collect::<Vec<ContentPart>>();
    parts.push(ContentPart::Text(prompt.to_string()));

    return GenerateRequest {
        model: model.to_string(),
        parts,
    };
}

/// First part of the first candidate carrying inline data. Text parts are
/// skipped and the scan stops at the first match.
pub fn select_image_part(response: &GenerateResponse) -> Option<(Option<&str>, &str)> {
    for part in response.first_candidate_parts() {
        if let ContentPart::InlineData { mime_type, data } = part {
            if data.is_empty() {
                continue;
            }
            return Some((mime_type.as_deref(), data.as_str()));
        }
    }

    return None;
}

pub async fn generate_edit(
    backend: &(dyn Backend + Send + Sync),
    model: &str,
    prompt: &str,
    images: &[UploadedImage],
) -> Result<GenerationResult, EditError> {
    validate(prompt, images)?;

    let request = build_request(model, prompt, images);
    tracing::info!(
        backend = backend.name().to_string(),
        model = model,
        images = images.len(),
        "requesting edit"
    );

    let response = backend
        .generate_content(&request)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "edit request failed");
            return EditError::RemoteService(err.to_string());
        })?;

    let (mime_type, data) = select_image_part(&response).ok_or_else(|| {
        tracing::warn!(
            candidates = response.candidates.len(),
            "model returned no image"
        );
        return EditError::ModelRefusal;
    })?;

    let bytes = BASE64.decode(data).map_err(|err| {
        return EditError::RemoteService(format!("The model returned an invalid image: {err}"));
    })?;

    let result = GenerationResult::new(
        GeneratedImage::new(mime_type, bytes),
        prompt,
        images.iter().map(|e| return e.preview.clone()).collect(),
    );
    tracing::info!(id = result.id(), mime_type = result.image().mime_type, "edit completed");

    return Ok(result);
}
