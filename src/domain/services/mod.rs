pub mod actions;
mod app_state;
mod downloads;
pub mod events;
mod history;
mod image_canvas;
mod image_intake;
pub mod orchestrator;

pub use app_state::*;
pub use downloads::*;
pub use history::*;
pub use image_canvas::*;
pub use image_intake::*;
