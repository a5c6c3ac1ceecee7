#[cfg(test)]
#[path = "uploaded_image_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::OnceCell;
use uuid::Uuid;

/// A file offered for intake, before any filtering has happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: &str, mime_type: &str, data: Vec<u8>) -> ImageFile {
        return ImageFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            data,
        };
    }

    pub fn is_image(&self) -> bool {
        return self.mime_type.starts_with("image/");
    }
}

#[derive(Debug)]
struct PreviewHandle {
    url: String,
    mime_type: String,
    data: Arc<[u8]>,
}

/// Displayable reference to a source image. Clones share one handle, which is
/// released once the last clone is dropped.
#[derive(Clone, Debug)]
pub struct Preview {
    handle: Arc<PreviewHandle>,
}

impl Preview {
    pub fn url(&self) -> &str {
        return &self.handle.url;
    }

    pub fn mime_type(&self) -> &str {
        return &self.handle.mime_type;
    }

    pub fn data(&self) -> &[u8] {
        return &self.handle.data;
    }
}

impl PartialEq for Preview {
    fn eq(&self, other: &Preview) -> bool {
        return self.handle.url == other.handle.url;
    }
}

impl Eq for Preview {}

/// Hands out previews and keeps a weak record of each so leaks show up in
/// `live`.
#[derive(Default, Debug)]
pub struct Previews {
    handles: Mutex<Vec<Weak<PreviewHandle>>>,
}

impl Previews {
    pub fn create(&self, mime_type: &str, data: Arc<[u8]>) -> Preview {
        let handle = Arc::new(PreviewHandle {
            url: format!("preview://{}", Uuid::new_v4()),
            mime_type: mime_type.to_string(),
            data,
        });

        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|e| return e.strong_count() > 0);
            handles.push(Arc::downgrade(&handle));
        }

        return Preview { handle };
    }

    /// Number of previews still referenced by an image or a result.
    pub fn live(&self) -> usize {
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|e| return e.strong_count() > 0);
            return handles.len();
        }

        return 0;
    }
}

#[derive(Debug)]
struct ImagePayload {
    name: String,
    mime_type: String,
    data: Arc<[u8]>,
    base64: OnceCell<String>,
}

/// A source image accepted by intake. Clones share the payload, so the base64
/// encoding is computed at most once whichever clone asks first.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub id: String,
    pub preview: Preview,
    payload: Arc<ImagePayload>,
}

impl UploadedImage {
    pub fn new(file: ImageFile, previews: &Previews) -> UploadedImage {
        let data: Arc<[u8]> = Arc::from(file.data);
        let preview = previews.create(&file.mime_type, data.clone());

        return UploadedImage {
            id: Uuid::new_v4().to_string(),
            preview,
            payload: Arc::new(ImagePayload {
                name: file.name,
                mime_type: file.mime_type,
                data,
                base64: OnceCell::new(),
            }),
        };
    }

    pub fn name(&self) -> &str {
        return &self.payload.name;
    }

    pub fn mime_type(&self) -> &str {
        return &self.payload.mime_type;
    }

    pub fn data(&self) -> &[u8] {
        return &self.payload.data;
    }

    pub fn base64(&self) -> &str {
        return self.payload.base64.get_or_init(|| {
            tracing::debug!(id = self.id, bytes = self.payload.data.len(), "encoding image");
            return BASE64.encode(&self.payload.data);
        });
    }

    pub fn is_base64_cached(&self) -> bool {
        return self.payload.base64.get().is_some();
    }
}

impl PartialEq for UploadedImage {
    fn eq(&self, other: &UploadedImage) -> bool {
        return self.id == other.id;
    }
}

impl Eq for UploadedImage {}
