//! Configuration for the Gemini client.

use std::env;
use std::time::Duration;

use intake_core::{RetryPolicy, ServiceError};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Models tried, in order, after the configured model fails.
pub const DEFAULT_FALLBACK_MODELS: [&str; 3] =
    ["gemini-flash-latest", "gemini-2.5-flash", "gemini-2.5-flash-lite"];

/// Configuration for [`GeminiClient`](crate::GeminiClient).
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Preferred model name.
    pub model: String,

    /// Models tried after `model`, in order.
    pub fallback_models: Vec<String>,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_output_tokens: Option<u32>,

    /// Retry policy applied to each model.
    pub retry: RetryPolicy,

    /// Classification prompt template (see [`render_prompt`](crate::render_prompt)).
    pub prompt_template: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: Some(0.0),
            max_output_tokens: Some(512),
            retry: RetryPolicy::default(),
            prompt_template: None,
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Preferred model (default: gemini-2.0-flash)
    /// - `GEMINI_FALLBACK_MODELS` - Comma-separated fallback models
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 0.0)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max output tokens (default: 512)
    /// - `GEMINI_MAX_RETRIES` - Attempts per model (default: 3)
    /// - `GEMINI_TIMEOUT_SECS` - Per-attempt timeout (default: 20)
    /// - `GEMINI_INITIAL_BACKOFF_MS` - First retry delay (default: 1000)
    pub fn from_env() -> Result<Self, ServiceError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("GEMINI_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("GEMINI_MODEL").unwrap_or(defaults.model);

        let fallback_models = env::var("GEMINI_FALLBACK_MODELS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.fallback_models);

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_output_tokens);

        let max_attempts = env::var("GEMINI_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.retry.max_attempts);

        let per_attempt_timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry.per_attempt_timeout);

        let initial_backoff = env::var("GEMINI_INITIAL_BACKOFF_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry.initial_backoff);

        Ok(Self {
            api_url,
            api_key,
            model,
            fallback_models,
            temperature,
            max_output_tokens,
            retry: RetryPolicy::new(max_attempts, per_attempt_timeout, initial_backoff),
            prompt_template: Some(crate::prompt::load_classifier_prompt()),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// The configured model followed by the fallbacks, without duplicates.
    pub fn models(&self) -> Vec<&str> {
        let mut models = vec![self.model.as_str()];
        for model in &self.fallback_models {
            if !models.contains(&model.as_str()) {
                models.push(model.as_str());
            }
        }
        models
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn fallback_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fallback_models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = Some(tokens);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
