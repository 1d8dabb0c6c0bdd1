//! Google Cloud Vision text detection client.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextExtractor;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// REST client for the `images:annotate` endpoint.
pub struct VisionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionClient {
    /// Create a client with an explicit API key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rcpt/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client, reading the API key from the configured environment variable.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OcrError::MissingCredentials(config.api_key_env.clone()))?;

        Self::new(
            config.endpoint.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl TextExtractor for VisionClient {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        if image.is_empty() {
            return Err(OcrError::InvalidImage("image is empty".to_string()));
        }

        info!("Sending {} byte image to OCR provider", image.len());

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&AnnotateRequest::text_detection(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Provider(format!("HTTP {}: {}", status, body.trim())));
        }

        let annotated: AnnotateResponse = response.json().await?;
        let text = annotated.best_text()?;
        debug!("OCR provider returned {} characters", text.len());

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl AnnotateRequest {
    fn text_detection(image: &[u8]) -> Self {
        Self {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    full_text_annotation: Option<FullTextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct FullTextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl AnnotateResponse {
    /// The first annotation holds the whole recognized text block.
    fn best_text(self) -> Result<String, OcrError> {
        let Some(response) = self.responses.into_iter().next() else {
            return Ok(String::new());
        };

        if let Some(status) = response.error {
            return Err(OcrError::Provider(format!("{} (code {})", status.message, status.code)));
        }

        if let Some(first) = response.text_annotations.into_iter().next() {
            return Ok(first.description);
        }

        Ok(response
            .full_text_annotation
            .map(|a| a.text)
            .unwrap_or_default())
    }
}
