//! Gemini-backed [`Translator`].

use intake_core::{async_trait, ServiceError, Translator};
use tracing::debug;

use crate::client::GeminiClient;

/// Translates text by prompting a Gemini model.
pub struct GeminiTranslator {
    client: GeminiClient,
}

impl GeminiTranslator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn build_prompt(text: &str, target_language: &str) -> String {
        format!(
            "Translate the following text into the language with ISO 639-1 code \"{}\". \
             Respond with only the translated text, no quotes and no explanation. \
             If it is already in that language, repeat it unchanged.\n\nText: {}",
            target_language, text
        )
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = Self::build_prompt(text, target_language);
        let translated = self.client.generate(&prompt, false).await?;
        debug!(target_language, chars = translated.len(), "Translated text");
        Ok(translated.trim().to_string())
    }
}
