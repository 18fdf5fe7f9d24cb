use std::future::Future;
use std::time::Duration;

use base64::Engine as _;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llava";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Instruction sent with every image.
pub const DESCRIBE_PROMPT: &str = "Describe this image as a short file name label of 2 to 5 words \
in snake_case, for example red_sports_car or cat_sleeping_on_sofa. Reply with the label only: \
no punctuation, no quotes and no file extension.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    pub detail: String,
}

/// Image-to-text service used to suggest file names.
pub trait InferenceClient {
    /// One request, no retries.
    fn request_description(
        &self,
        image: &[u8],
        prompt: &str,
    ) -> impl Future<Output = Result<String, InferenceError>> + Send;

    /// Whether the configured model is served. Advisory, never fails.
    fn check_availability(&self) -> impl Future<Output = Availability> + Send;
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for an Ollama-compatible server (`/api/generate`, `/api/tags`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let url = format!("{}/api/tags", self.endpoint);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let tags: TagsResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Malformed(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl InferenceClient for OllamaClient {
    async fn request_description(&self, image: &[u8], prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            images: vec![base64::engine::general_purpose::STANDARD.encode(image)],
            stream: false,
        };

        debug!("POST {} ({} image bytes, model {})", url, image.len(), self.model);
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference request failed with {}: {}", status, body);
            return Err(InferenceError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Malformed(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(InferenceError::Malformed(error));
        }

        parsed
            .response
            .ok_or_else(|| InferenceError::Malformed("missing 'response' field".to_string()))
    }

    async fn check_availability(&self) -> Availability {
        match self.list_models().await {
            Ok(models) => {
                if models.iter().any(|name| name.contains(&self.model)) {
                    info!("Model {} is available at {}", self.model, self.endpoint);
                    Availability {
                        available: true,
                        detail: format!("{} ready", self.model),
                    }
                } else {
                    Availability {
                        available: false,
                        detail: format!(
                            "{} not installed (found: {})",
                            self.model,
                            if models.is_empty() { "none".to_string() } else { models.join(", ") }
                        ),
                    }
                }
            }
            Err(e) => {
                warn!("Availability check against {} failed: {}", self.endpoint, e);
                Availability {
                    available: false,
                    detail: format!("cannot reach {}: {}", self.endpoint, e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_shape() {
        let body = GenerateRequest {
            model: "llava",
            prompt: "describe",
            images: vec!["AAEC".to_string()],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llava",
                "prompt": "describe",
                "images": ["AAEC"],
                "stream": false
            })
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let config = InferenceConfig {
            endpoint: "http://127.0.0.1:11434/".to_string(),
            ..InferenceConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:11434");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }
}
