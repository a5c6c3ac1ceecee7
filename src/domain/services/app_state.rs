#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::actions::SUGGESTED_PROMPTS;
use super::orchestrator;
use super::History;
use super::ImageCanvas;
use super::ImageIntake;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ComparisonSlider;
use crate::domain::models::EditError;
use crate::domain::models::GenerationResult;
use crate::domain::models::ImageFile;
use crate::domain::models::Preview;
use crate::domain::models::ProcessingStatus;
use crate::domain::models::SlashCommand;
use crate::domain::models::UploadedImage;

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    return column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height);
}

pub struct AppState {
    pub canvas: ImageCanvas,
    pub current_result: Option<GenerationResult>,
    pub error: Option<String>,
    pub history: History,
    pub images: Vec<UploadedImage>,
    pub notice: Option<String>,
    pub prompt: String,
    pub result_rect: Rect,
    pub slider: ComparisonSlider,
    pub status: ProcessingStatus,
    intake: ImageIntake,
}

impl AppState {
    pub fn new(max_images: usize) -> AppState {
        return AppState {
            canvas: ImageCanvas::default(),
            current_result: None,
            error: None,
            history: History::default(),
            images: vec![],
            notice: Some(
                "Add 1 or 2 images with /add PATH, describe your edit, and press Enter. Type /help for all commands."
                    .to_string(),
            ),
            prompt: "".to_string(),
            result_rect: Rect::default(),
            slider: ComparisonSlider::default(),
            status: ProcessingStatus::Idle,
            intake: ImageIntake::new(max_images),
        };
    }

    /// Surfaces a broken credential or unreachable service up front. The app
    /// keeps running either way.
    pub async fn check_backend(&mut self, backend: &BackendBox) {
        if let Err(err) = backend.health_check().await {
            tracing::error!(error = ?err, "backend health check failed");
            self.error = Some(format!(
                "Hey, it looks like I can't reach {}. Edits will fail until this is fixed.\n\nError: {err}",
                backend.name()
            ));
        }
    }

    pub fn intake(&self) -> &ImageIntake {
        return &self.intake;
    }

    pub fn is_processing(&self) -> bool {
        return self.status == ProcessingStatus::Processing;
    }

    /// Returns `(should_break, handled)`. Input that isn't a command is left
    /// for the caller to submit as a prompt.
    pub fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, true));
        }

        if command.is_help() {
            self.notice = Some(help_text());
        } else if command.is_add() {
            self.load_images(command.path_args(), tx)?;
        } else if command.is_remove() {
            match command.index_arg() {
                Some(idx) if self.remove_image_at(idx) => {}
                _ => {
                    self.notice = Some(format!(
                        "Use /remove N where N is between 1 and {}.",
                        self.images.len()
                    ));
                }
            }
        } else if command.is_clear() {
            self.clear_images();
        } else if command.is_restore() {
            match command.index_arg() {
                Some(idx) if self.restore(idx) => {}
                _ => {
                    self.notice = Some(format!(
                        "Use /restore N where N is between 1 and {}.",
                        self.history.len()
                    ));
                }
            }
        } else if command.is_save() {
            self.save_result(command.path_arg(), tx)?;
        } else if command.is_suggest() {
            match command.index_arg() {
                Some(idx) if idx < SUGGESTED_PROMPTS.len() => {
                    self.set_prompt(SUGGESTED_PROMPTS[idx]);
                }
                _ => {
                    let list = SUGGESTED_PROMPTS
                        .iter()
                        .enumerate()
                        .map(|(idx, prompt)| return format!("- ({}) {prompt}", idx + 1))
                        .collect::<Vec<String>>()
                        .join("\n");
                    self.notice = Some(format!("Suggested prompts, use /suggest N:\n{list}"));
                }
            }
        }

        return Ok((false, true));
    }

    pub fn load_images(
        &mut self,
        paths: Vec<PathBuf>,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        if self.is_processing() {
            self.notice = Some("Please wait for the current edit to finish.".to_string());
            return Ok(());
        }
        if paths.is_empty() {
            self.notice = Some("Use /add PATH to add one or more images.".to_string());
            return Ok(());
        }
        if self.images.len() >= self.intake.max_images() {
            self.notice = Some(format!(
                "You can use at most {} images. Remove one with /remove N first.",
                self.intake.max_images()
            ));
            return Ok(());
        }

        self.status = ProcessingStatus::Uploading;
        tx.send(Action::LoadImages(paths))?;

        return Ok(());
    }

    pub fn handle_images_loaded(&mut self, files: Vec<ImageFile>, errors: Vec<String>) {
        if self.status == ProcessingStatus::Uploading {
            self.status = ProcessingStatus::Idle;
        }

        let offered = files.len();
        let before = self.images.len();
        if let Some(images) = self.intake.add_images(files, &self.images) {
            self.images = images;
        }

        let added = self.images.len() - before;
        let mut notes = errors;
        if added < offered {
            notes.push(format!(
                "Skipped {} file(s) that were not images or did not fit ({}/{} slots used).",
                offered - added,
                self.images.len(),
                self.intake.max_images()
            ));
        }
        if added > 0 {
            notes.insert(0, format!("Added {added} image(s)."));
        }

        self.notice = Some(notes.join("\n"));
    }

    pub fn remove_image_at(&mut self, idx: usize) -> bool {
        let id = match self.images.get(idx) {
            Some(image) => image.id.to_string(),
            None => return false,
        };

        self.images = self.intake.remove_image(&id, &self.images);
        return true;
    }

    pub fn clear_images(&mut self) {
        self.images = self.intake.clear_images();
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    /// Stores `input` as the prompt and submits it. While an edit is in
    /// flight the stored prompt is left untouched.
    pub fn submit_prompt(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        if self.is_processing() {
            self.notice = Some("An edit is already in progress.".to_string());
            return Ok(false);
        }

        self.set_prompt(input);
        return self.submit(tx);
    }

    /// Validates and dispatches an edit for the current prompt and images.
    /// Returns whether a request was sent.
    pub fn submit(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if self.is_processing() {
            self.notice = Some("An edit is already in progress.".to_string());
            return Ok(false);
        }

        if let Err(err) = orchestrator::validate(&self.prompt, &self.images) {
            self.fail(err);
            return Ok(false);
        }

        self.error = None;
        self.status = ProcessingStatus::Processing;
        tx.send(Action::GenerateEdit(
            self.prompt.to_string(),
            self.images.clone(),
        ))?;

        return Ok(true);
    }

    pub fn handle_edit_completed(&mut self, res: Result<GenerationResult, EditError>) {
        match res {
            Ok(result) => {
                self.history.record(result.clone());
                self.current_result = Some(result);
                self.status = ProcessingStatus::Success;
                self.notice = Some("Edit complete. Use /save to download it.".to_string());
            }
            Err(err) => {
                self.fail(err);
            }
        }
    }

    fn fail(&mut self, err: EditError) {
        tracing::warn!(kind = err.kind(), error = %err, "edit failed");
        self.status = ProcessingStatus::Error;
        self.error = Some(err.to_string());
    }

    /// Shows a past result and its prompt again. The intake list is left
    /// alone since the original files may no longer be held.
    pub fn restore(&mut self, idx: usize) -> bool {
        let item = match self.history.get(idx) {
            Some(item) => item.clone(),
            None => return false,
        };

        self.prompt = item.prompt().to_string();
        self.current_result = Some(item);
        return true;
    }

    pub fn save_result(
        &mut self,
        target: Option<PathBuf>,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        if let Some(result) = &self.current_result {
            tx.send(Action::SaveResult(result.clone(), target))?;
        } else {
            self.notice = Some("There is no result to save yet.".to_string());
        }

        return Ok(());
    }

    pub fn handle_result_saved(&mut self, res: Result<PathBuf, String>) {
        match res {
            Ok(path) => {
                self.notice = Some(format!("Saved result to {}", path.to_string_lossy()));
            }
            Err(err) => {
                self.notice = Some(format!("Failed to save result: {err}"));
            }
        }
    }

    /// Before/after comparison is only offered for single image edits.
    pub fn comparison_enabled(&self) -> bool {
        if let Some(result) = &self.current_result {
            return result.original_images().len() == 1;
        }

        return false;
    }

    /// The source preview and the result shown in the before/after view.
    pub fn comparison_pair(&self) -> Option<(&Preview, &GenerationResult)> {
        if !self.comparison_enabled() {
            return None;
        }

        let result = self.current_result.as_ref()?;
        return Some((result.original_images().first()?, result));
    }

    pub fn handle_mouse_down(&mut self, column: u16, row: u16) {
        if self.comparison_enabled() && rect_contains(self.result_rect, column, row) {
            self.slider.begin_drag();
            self.slider.drag_to(column, self.result_rect);
        }
    }

    pub fn handle_mouse_drag(&mut self, column: u16) {
        self.slider.drag_to(column, self.result_rect);
    }

    pub fn handle_mouse_up(&mut self) {
        self.slider.release();
    }
}
