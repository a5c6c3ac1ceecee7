use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::image_intake::load_image_file;
use super::orchestrator;
use super::Downloads;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::GenerationResult;
use crate::domain::models::ImageFile;
use crate::domain::models::UploadedImage;

pub const SUGGESTED_PROMPTS: [&str; 5] = [
    "Enhance image quality and lighting",
    "Add a cinematic cyberpunk look",
    "Remove background and place in a studio",
    "Convert to a watercolor painting",
    "Make it look like a vintage 90s photo",
];

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /add (/a) [PATH...] - Adds one or more images from disk. Up to the configured maximum (2 by default) are kept, non-image files are skipped.
- /remove (/rm) [NUMBER] - Removes the source image with the given number.
- /clear - Removes all source images.
- /restore (/r) [NUMBER] - Shows a result from history again, along with the prompt that produced it.
- /save (/s) [PATH?] - Saves the displayed result. Without a path, a timestamped file is written to the output directory.
- /suggest [NUMBER?] - Lists suggested prompts, or fills in the selected one.
- /quit /exit (/q) - Exit Lumina.
- /help (/h) - Provides this help menu.

Anything else you type is sent to the model as the edit instruction.

HOTKEYS:
- Enter - Submit the prompt or command.
- ALT+Left / ALT+Right - Move the before/after divider.
- Mouse drag on the result - Move the before/after divider.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

async fn load_images(paths: Vec<PathBuf>, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let mut files: Vec<ImageFile> = vec![];
    let mut errors: Vec<String> = vec![];

    for path in paths {
        match load_image_file(&path).await {
            Ok(file) => files.push(file),
            Err(err) => {
                tracing::warn!(path = ?path, error = ?err, "failed to read file");
                errors.push(format!("Failed to read {}: {err}", path.to_string_lossy()));
            }
        }
    }

    tx.send(Event::ImagesLoaded(files, errors))?;

    return Ok(());
}

async fn save_result(
    result: GenerationResult,
    target: Option<PathBuf>,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let res = Downloads::default()
        .save(&result, target)
        .await
        .map_err(|err| return err.to_string());

    tx.send(Event::ResultSaved(res))?;

    return Ok(());
}

fn generate_edit(
    backend: Arc<dyn Backend + Send + Sync>,
    prompt: String,
    images: Vec<UploadedImage>,
    tx: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let model = Config::get(ConfigKey::Model);
        let res = orchestrator::generate_edit(backend.as_ref(), &model, &prompt, &images).await;

        if let Err(err) = tx.send(Event::EditCompleted(res)) {
            tracing::error!(error = ?err, "failed to deliver edit result");
        }
    });
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend: Arc<dyn Backend + Send + Sync> = Arc::from(backend);

        loop {
            let action = match rx.recv().await {
                Some(action) => action,
                None => return Ok(()),
            };

            match action {
                Action::LoadImages(paths) => {
                    load_images(paths, &tx).await?;
                }
                Action::GenerateEdit(prompt, images) => {
                    generate_edit(backend.clone(), prompt, images, tx.clone());
                }
                Action::SaveResult(result, target) => {
                    save_result(result, target, &tx).await?;
                }
            }
        }
    }
}
