use async_trait::async_trait;
use base64::Engine;
use relief_common::{ReliefError, Result};
use serde::{Deserialize, Serialize};

use crate::client::{ImagePart, ReasoningClient, ReasoningReply};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiBlob>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GeminiBlob {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiReplyContent>,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    model: String,
    api_key: String,
    api_base: String,
    temperature: f32,
    max_output_tokens: u32,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            api_base: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            http_client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (OpenAI-compatible proxies, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_generation_limits(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request_body(&self, prompt: &str, image: Option<&ImagePart>) -> GeminiRequest {
        let mut parts = vec![GeminiPart {
            text: Some(prompt.to_string()),
            inline_data: None,
        }];

        if let Some(image) = image {
            parts.push(GeminiPart {
                text: None,
                inline_data: Some(GeminiBlob {
                    mime_type: image.mime_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                }),
            });
        }

        GeminiRequest {
            contents: vec![GeminiContent { parts }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }

    /// Reduce a wire response to the one reply shape the pipeline
    /// accepts. An empty or text-free reply is an error, not an empty
    /// string.
    fn extract_text(response: GeminiResponse) -> Result<String> {
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ReliefError::Reasoning(
                "Gemini reply contained no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ReasoningClient for GeminiClient {
    async fn generate(&self, prompt: &str, image: Option<&ImagePart>) -> Result<ReasoningReply> {
        let body = self.build_request_body(prompt, image);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReliefError::Reasoning(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ReliefError::Reasoning(format!(
                "Gemini API error {status}: {body_text}"
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ReliefError::Reasoning(format!("Failed to parse Gemini response: {e}")))?;

        let text = Self::extract_text(gemini_response)?;
        Ok(ReasoningReply::new(text))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
