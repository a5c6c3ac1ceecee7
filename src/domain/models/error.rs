use thiserror::Error;

/// Failures of a single edit attempt. None of them are fatal to the session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// Missing images or instruction, caught before any request is made.
    #[error("{0}")]
    Validation(String),
    #[error("The model did not return an image. It may have refused the request or returned only text.")]
    ModelRefusal,
    #[error("{0}")]
    RemoteService(String),
}

impl EditError {
    pub fn kind(&self) -> &'static str {
        match self {
            EditError::Validation(_) => return "validation",
            EditError::ModelRefusal => return "model_refusal",
            EditError::RemoteService(_) => return "remote_service",
        }
    }
}
