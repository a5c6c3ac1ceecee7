use std::path::PathBuf;

use tui_textarea::Input;

use super::EditError;
use super::GenerationResult;
use super::ImageFile;

pub enum Event {
    ImagesLoaded(Vec<ImageFile>, Vec<String>),
    EditCompleted(Result<GenerationResult, EditError>),
    ResultSaved(Result<PathBuf, String>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    MouseDown(u16, u16),
    MouseDrag(u16, u16),
    MouseUp(),
    SliderLeft(),
    SliderRight(),
    UIResize(),
    UITick(),
}
