#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendName;
use crate::domain::models::Candidate;
use crate::domain::models::ContentPart;
use crate::domain::models::GenerateRequest;
use crate::domain::models::GenerateResponse;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetails {
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Part {
        match part {
            ContentPart::InlineData { mime_type, data } => {
                return Part {
                    text: None,
                    inline_data: Some(Blob {
                        mime_type: mime_type.clone(),
                        data: data.to_string(),
                    }),
                };
            }
            ContentPart::Text(text) => {
                return Part {
                    text: Some(text.to_string()),
                    inline_data: None,
                };
            }
        }
    }
}

impl Part {
    fn into_content_part(self) -> Option<ContentPart> {
        if let Some(blob) = self.inline_data {
            return Some(ContentPart::InlineData {
                mime_type: blob.mime_type,
                data: blob.data,
            });
        }

        return self.text.map(ContentPart::Text);
    }
}

impl From<GenerateContentResponse> for GenerateResponse {
    fn from(res: GenerateContentResponse) -> GenerateResponse {
        let candidates = res
            .candidates
            .into_iter()
            .map(|candidate| {
                let parts = candidate
                    .content
                    .map(|content| return content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(Part::into_content_part)
                    .collect();

                return Candidate { parts };
            })
            .collect();

        return GenerateResponse { candidates };
    }
}

/// Accepts both `gemini-2.5-flash-image` and `models/gemini-2.5-flash-image`.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        return model.to_string();
    }

    return format!("models/{model}");
}

pub struct Gemini {
    url: String,
    token: String,
    model: String,
    health_check_timeout: String,
    timeout: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiToken),
            model: Config::get(ConfigKey::Model),
            health_check_timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

impl Gemini {
    fn client(timeout: &str) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout.parse::<u64>()?))
            .build()?;

        return Ok(client);
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> BackendName {
        return BackendName::Gemini;
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Gemini URL is not defined");
        }
        if self.token.is_empty() {
            bail!("Gemini token is not defined");
        }

        let url = format!(
            "{url}/v1beta/{model}?key={key}",
            url = self.url,
            model = model_path(&self.model),
            key = self.token
        );

        let status = match Gemini::client(&self.health_check_timeout)?
            .get(&url)
            .send()
            .await
        {
            Ok(res) => res.status().as_u16(),
            Err(err) => {
                tracing::error!(error = ?err, "Gemini is not reachable");
                bail!("Gemini is not reachable");
            }
        };
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!("Gemini health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        if self.token.is_empty() {
            bail!("Gemini token is not defined");
        }

        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: request.parts.iter().map(Part::from).collect(),
            }],
        };

        let res = Gemini::client(&self.timeout)?
            .post(format!(
                "{url}/v1beta/{model}:generateContent?key={key}",
                url = self.url,
                model = model_path(&request.model),
                key = self.token,
            ))
            .json(&req)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to make generateContent request to Gemini");
                if err.is_timeout() {
                    bail!(
                        "The request to Gemini timed out after {}ms. Please try again.",
                        self.timeout
                    );
                }
                bail!("Failed to reach Gemini: {err}");
            }
        };

        let status = res.status().as_u16();
        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(status = status, "Gemini generateContent request failed");

            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                bail!(err.error.message);
            }
            bail!("Failed to make generateContent request to Gemini, {status}");
        }

        let body = res.json::<GenerateContentResponse>().await?;
        return Ok(GenerateResponse::from(body));
    }
}
