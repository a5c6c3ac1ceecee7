#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::DateTime;
use chrono::Local;
use uuid::Uuid;

use super::Preview;

pub const DEFAULT_RESULT_MIME_TYPE: &str = "image/png";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(mime_type: Option<&str>, data: Vec<u8>) -> GeneratedImage {
        let mime_type = match mime_type {
            Some(mime) if !mime.trim().is_empty() => mime.trim().to_string(),
            _ => DEFAULT_RESULT_MIME_TYPE.to_string(),
        };

        return GeneratedImage { mime_type, data };
    }

    pub fn data_url(&self) -> String {
        return format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64.encode(&self.data)
        );
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => return "jpg",
            "image/webp" => return "webp",
            "image/gif" => return "gif",
            _ => return "png",
        }
    }
}

/// Output of one successful edit. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct GenerationResult {
    id: String,
    image: GeneratedImage,
    prompt: String,
    timestamp: DateTime<Local>,
    original_images: Vec<Preview>,
}

impl GenerationResult {
    pub fn new(image: GeneratedImage, prompt: &str, original_images: Vec<Preview>) -> Self {
        return GenerationResult {
            id: Uuid::new_v4().to_string(),
            image,
            prompt: prompt.to_string(),
            timestamp: Local::now(),
            original_images,
        };
    }

    pub fn id(&self) -> &str {
        return &self.id;
    }

    pub fn image(&self) -> &GeneratedImage {
        return &self.image;
    }

    pub fn prompt(&self) -> &str {
        return &self.prompt;
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        return self.timestamp;
    }

    pub fn original_images(&self) -> &[Preview] {
        return &self.original_images;
    }
}
