//! Gemini-backed [`Classifier`].

use intake_core::{
    async_trait, extract_json, hash_prompt, ClassificationResult, Classifier, ServiceError,
};
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::config::GeminiConfig;
use crate::prompt::{render_prompt, DEFAULT_CLASSIFIER_PROMPT};

/// Classifies complaint text with a Gemini model.
///
/// The model is asked for a JSON object; the response is extracted and
/// validated into a [`ClassificationResult`]. Any failure is returned as an
/// error so the caller can fall back.
pub struct GeminiClassifier {
    client: GeminiClient,
    template: String,
    prompt_hash: String,
}

impl GeminiClassifier {
    /// Create a classifier from configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        let template = config
            .prompt_template
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_PROMPT.to_string());
        let client = GeminiClient::new(config)?;
        Ok(Self::with_client(client, template))
    }

    /// Create a classifier sharing an existing client.
    pub fn with_client(client: GeminiClient, template: impl Into<String>) -> Self {
        let template = template.into();
        let prompt_hash = hash_prompt(&template);
        info!("Classifier prompt fingerprint: {}", prompt_hash);
        Self {
            client,
            template,
            prompt_hash,
        }
    }

    /// Create a classifier from environment variables.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the prompt template fingerprint.
    pub fn prompt_hash(&self) -> &str {
        &self.prompt_hash
    }

    /// Parse a raw model response into a classification.
    pub fn parse_response(raw: &str) -> Result<ClassificationResult, ServiceError> {
        let value = extract_json(raw)?;
        ClassificationResult::from_model_output(&value)
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ServiceError> {
        let prompt = render_prompt(&self.template, text);
        let raw = self.client.generate(&prompt, true).await?;

        match Self::parse_response(&raw) {
            Ok(result) => {
                debug!(
                    category = %result.category,
                    intent = %result.intent,
                    "Classified complaint text"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, raw_response = %raw, "CLASSIFIER_PARSE_FAILED");
                Err(err)
            }
        }
    }

    fn name(&self) -> &str {
        "GeminiClassifier"
    }
}
