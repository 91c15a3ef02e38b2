use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ModelCallError;
use crate::providers::ModelClient;

/// Gemini client for interacting with the Google Generative Language API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model identifier, e.g. "gemini-2.0-flash"
    model: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Generation parameters sent with every request
    generation_config: GenerationConfig,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// Generation parameters
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content block of a Gemini request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// The parts making up this content block
    pub parts: Vec<GeminiPart>,

    /// Role of the content producer (user, model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A single text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text content
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            max_output_tokens: Some(4096),
        }
    }
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// The generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// One generation candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The content of the candidate
    pub content: GeminiContent,
}

impl GeminiRequest {
    /// Create a new request for a single user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.into(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: None,
        }
    }

    /// Set the generation parameters
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
            generation_config: GenerationConfig::default(),
        }
    }

    /// Set the generation parameters used for every request
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    /// Complete a generateContent request
    pub async fn complete(&self, request: GeminiRequest) -> Result<GeminiResponse, ModelCallError> {
        let base = if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com".to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        };
        let api_url = format!("{}/v1beta/models/{}:generateContent", base, self.model);

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ModelCallError::RequestFailed(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => ModelCallError::AuthenticationError(error_text),
                429 => ModelCallError::RateLimitExceeded(error_text),
                code => ModelCallError::ApiError {
                    status_code: code,
                    message: error_text,
                },
            });
        }

        response.json::<GeminiResponse>().await.map_err(|e| {
            ModelCallError::RequestFailed(format!("Failed to parse Gemini API response: {}", e))
        })
    }

    /// Extract the generated text from a Gemini response
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelClient for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, ModelCallError> {
        let request =
            GeminiRequest::new(prompt).generation_config(self.generation_config.clone());

        let response = self.complete(request).await?;
        Ok(Self::extract_text_from_response(&response))
    }

    async fn test_connection(&self) -> Result<(), ModelCallError> {
        let request = GeminiRequest::new("Hello").generation_config(GenerationConfig {
            temperature: Some(0.0),
            max_output_tokens: Some(10),
        });

        self.complete(request).await?;
        Ok(())
    }
}
