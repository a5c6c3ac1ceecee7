use std::path::PathBuf;

use super::GenerationResult;
use super::UploadedImage;

pub enum Action {
    LoadImages(Vec<PathBuf>),
    GenerateEdit(String, Vec<UploadedImage>),
    SaveResult(GenerationResult, Option<PathBuf>),
}
