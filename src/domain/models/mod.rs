mod action;
mod backend;
mod comparison;
mod error;
mod event;
mod generation;
mod loading;
mod slash_commands;
mod status;
mod textarea;
mod uploaded_image;

pub use action::*;
pub use backend::*;
pub use comparison::*;
pub use error::*;
pub use event::*;
pub use generation::*;
pub use loading::*;
pub use slash_commands::*;
pub use status::*;
pub use textarea::*;
pub use uploaded_image::*;
