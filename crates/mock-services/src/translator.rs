//! Translation and language detection stand-ins.

use intake_core::{async_trait, LanguageDetector, ServiceError, Translator};

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _target_language: &str) -> Result<String, ServiceError> {
        Ok(text.to_string())
    }
}

/// A translator whose backend is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target_language: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Unavailable("translation backend offline".to_string()))
    }
}

/// Reports the same language for every input, or fails if built with `failing()`.
#[derive(Debug, Clone)]
pub struct FixedLanguageDetector {
    language: Option<String>,
}

impl FixedLanguageDetector {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }

    pub fn failing() -> Self {
        Self { language: None }
    }
}

impl LanguageDetector for FixedLanguageDetector {
    fn detect(&self, _text: &str) -> Result<String, ServiceError> {
        self.language
            .clone()
            .ok_or_else(|| ServiceError::ProcessingFailed("detector unavailable".to_string()))
    }
}
