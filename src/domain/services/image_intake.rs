#[cfg(test)]
#[path = "image_intake_test.rs"]
mod tests;

use std::path::Path;

use anyhow::Result;
use image::ImageFormat;
use tokio::fs;

use crate::domain::models::ImageFile;
use crate::domain::models::Previews;
use crate::domain::models::UploadedImage;

pub const DEFAULT_MAX_IMAGES: usize = 2;

fn format_mime_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => return Some("image/png"),
        ImageFormat::Jpeg => return Some("image/jpeg"),
        ImageFormat::Gif => return Some("image/gif"),
        ImageFormat::WebP => return Some("image/webp"),
        ImageFormat::Bmp => return Some("image/bmp"),
        ImageFormat::Tiff => return Some("image/tiff"),
        _ => return None,
    }
}

/// Resolves a MIME type from the file extension first, then the file's magic
/// bytes. Anything unrecognised is `application/octet-stream`.
pub fn detect_mime_type(path: &Path, data: &[u8]) -> String {
    let from_extension = ImageFormat::from_path(path)
        .ok()
        .and_then(format_mime_type);
    if let Some(mime) = from_extension {
        return mime.to_string();
    }

    if let Some(mime) = image::guess_format(data).ok().and_then(format_mime_type) {
        return mime.to_string();
    }

    return "application/octet-stream".to_string();
}

pub async fn load_image_file(path: &Path) -> Result<ImageFile> {
    let data = fs::read(path).await?;
    let name = path
        .file_name()
        .map(|e| return e.to_string_lossy().to_string())
        .unwrap_or_else(|| return path.to_string_lossy().to_string());
    let mime_type = detect_mime_type(path, &data);

    tracing::debug!(name = name, mime_type = mime_type, bytes = data.len(), "loaded file");

    return Ok(ImageFile::new(&name, &mime_type, data));
}

pub struct ImageIntake {
    max_images: usize,
    previews: Previews,
}

impl Default for ImageIntake {
    fn default() -> ImageIntake {
        return ImageIntake::new(DEFAULT_MAX_IMAGES);
    }
}

impl ImageIntake {
    pub fn new(max_images: usize) -> ImageIntake {
        return ImageIntake {
            max_images,
            previews: Previews::default(),
        };
    }

    pub fn max_images(&self) -> usize {
        return self.max_images;
    }

    pub fn previews(&self) -> &Previews {
        return &self.previews;
    }

    /// Appends the image typed files that still fit. Returns `None` when no
    /// file qualified, leaving the caller's list as it is.
    pub fn add_images(
        &self,
        files: Vec<ImageFile>,
        current: &[UploadedImage],
    ) -> Option<Vec<UploadedImage>> {
        let remaining = self.max_images.saturating_sub(current.len());
        let offered = files.len();

        let accepted = files
            .into_iter()
            .filter(|file| return file.is_image())
            .take(remaining)
            .map(|file| return UploadedImage::new(file, &self.previews))
            .collect::<Vec<UploadedImage>>();

        tracing::debug!(
            offered = offered,
            accepted = accepted.len(),
            remaining = remaining,
            "add images"
        );

        if accepted.is_empty() {
            return None;
        }

        let mut images = current.to_vec();
        images.extend(accepted);

        return Some(images);
    }

    pub fn remove_image(&self, id: &str, current: &[UploadedImage]) -> Vec<UploadedImage> {
        return current
            .iter()
            .filter(|image| return image.id != id)
            .cloned()
            .collect();
    }

    pub fn clear_images(&self) -> Vec<UploadedImage> {
        return vec![];
    }
}
