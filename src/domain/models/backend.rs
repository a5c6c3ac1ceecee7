#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    Gemini,
}

impl BackendName {
    pub fn parse(text: String) -> Option<BackendName> {
        return BackendName::iter().find(|e| return e.to_string() == text);
    }
}

/// One entry of a multimodal payload, in the order the model should read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentPart {
    InlineData {
        mime_type: Option<String>,
        /// Base64 encoded payload.
        data: String,
    },
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
    pub parts: Vec<ContentPart>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Parts of the first candidate, the only one ever read.
    pub fn first_candidate_parts(&self) -> &[ContentPart] {
        if let Some(candidate) = self.candidates.first() {
            return &candidate.parts;
        }

        return &[];
    }
}

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// Used at startup to verify the credential and model are usable.
    async fn health_check(&self) -> Result<()>;

    /// Issues a single content generation request. Transport failures and
    /// model side errors are returned as errors carrying the service's own
    /// message. No retries happen here.
    async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
