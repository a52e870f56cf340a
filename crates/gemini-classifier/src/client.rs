//! HTTP client for the Gemini `generateContent` endpoint.

use intake_core::{with_retry, ServiceError};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, trace, warn};

use crate::api_types::{ApiError, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::GeminiConfig;

/// Gemini API client with model fallback and retries.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::Configuration("GEMINI_API_KEY not set".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "GeminiClient initialized with models: {}",
            config.models().join(", ")
        );

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Generate text for a prompt.
    ///
    /// Tries each configured model in turn, each with the retry policy.
    /// Returns the last error if every model fails.
    pub async fn generate(&self, prompt: &str, json_output: bool) -> Result<String, ServiceError> {
        let mut last_error = None;

        for model in self.config.models() {
            let result = with_retry(&self.config.retry, model, || {
                self.generate_once(model, prompt, json_output)
            })
            .await;

            match result {
                Ok(text) => {
                    debug!(model, chars = text.len(), "Gemini call succeeded");
                    return Ok(text);
                }
                Err(err @ ServiceError::Configuration(_)) => return Err(err),
                Err(err) => {
                    warn!(model, error = %err, "Gemini model failed, trying next model");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ServiceError::Configuration("no Gemini models configured".to_string())))
    }

    /// Single request against one model.
    async fn generate_once(
        &self,
        model: &str,
        prompt: &str,
        json_output: bool,
    ) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        );

        let request = GenerateContentRequest::user_text(
            prompt,
            GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: json_output.then(|| "application/json".to_string()),
            },
        );

        debug!(url = %url, model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(map_status_error(status, model, message));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = body.first_text().ok_or_else(|| {
            let reason = body
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            ServiceError::InvalidResponse(format!("empty response ({})", reason))
        })?;

        trace!(model, raw_response = %text, "GEMINI_RAW_RESPONSE");

        Ok(text)
    }
}

fn map_status_error(status: StatusCode, model: &str, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ServiceError::Configuration(format!("API rejected credentials ({}): {}", status.as_u16(), message))
        }
        StatusCode::NOT_FOUND => ServiceError::NotFound {
            entity: "model",
            id: model.to_string(),
        },
        _ if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
            ServiceError::Unavailable(format!("API error ({}): {}", status.as_u16(), message))
        }
        _ => ServiceError::ProcessingFailed(format!("API error ({}): {}", status.as_u16(), message)),
    }
}
