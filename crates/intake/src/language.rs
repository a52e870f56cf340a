//! Script-based language detection.

use intake_core::{LanguageDetector, ServiceError};
use tracing::debug;

/// Value reported when the language cannot be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const SCRIPTS: &[(char, char, &str)] = &[
    ('\u{0900}', '\u{097F}', "hi"),
    ('\u{0980}', '\u{09FF}', "bn"),
    ('\u{0A00}', '\u{0A7F}', "pa"),
    ('\u{0A80}', '\u{0AFF}', "gu"),
    ('\u{0B80}', '\u{0BFF}', "ta"),
    ('\u{0C00}', '\u{0C7F}', "te"),
    ('\u{0C80}', '\u{0CFF}', "kn"),
    ('\u{0D00}', '\u{0D7F}', "ml"),
    ('\u{0600}', '\u{06FF}', "ur"),
];

/// Detects the language from the dominant Unicode script.
///
/// Latin text is reported as English. Text without any letters is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLanguageDetector;

impl ScriptLanguageDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for ScriptLanguageDetector {
    fn detect(&self, text: &str) -> Result<String, ServiceError> {
        let mut counts = vec![0usize; SCRIPTS.len()];
        let mut latin = 0usize;

        for c in text.chars() {
            if c.is_ascii_alphabetic() {
                latin += 1;
            } else if let Some(index) = SCRIPTS
                .iter()
                .position(|(start, end, _)| (*start..=*end).contains(&c))
            {
                counts[index] += 1;
            }
        }

        let (index, native) = counts
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, count)| *count)
            .unwrap_or((0, 0));

        if native == 0 && latin == 0 {
            return Err(ServiceError::ProcessingFailed(
                "no alphabetic characters to detect".to_string(),
            ));
        }

        let language = if native >= latin { SCRIPTS[index].2 } else { "en" };
        Ok(language.to_string())
    }
}

/// Run a detector, reporting [`UNKNOWN_LANGUAGE`] on failure.
pub fn detect_or_unknown(detector: &dyn LanguageDetector, text: &str) -> String {
    match detector.detect(text) {
        Ok(language) if !language.trim().is_empty() => language,
        Ok(_) => UNKNOWN_LANGUAGE.to_string(),
        Err(err) => {
            debug!(error = %err, "Could not detect language; defaulting to unknown");
            UNKNOWN_LANGUAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts() {
        let detector = ScriptLanguageDetector::new();
        assert_eq!(detector.detect("Garbage on the road").unwrap(), "en");
        assert_eq!(detector.detect("सड़क पर कचरा").unwrap(), "hi");
        assert_eq!(detector.detect("ರಸ್ತೆಯಲ್ಲಿ ಕಸ").unwrap(), "kn");
        assert_eq!(detector.detect("குப்பை").unwrap(), "ta");
    }

    #[test]
    fn test_unknown_fallback() {
        let detector = ScriptLanguageDetector::new();
        assert!(detector.detect("12345 !!").is_err());
        assert_eq!(detect_or_unknown(&detector, "12345 !!"), "unknown");
        assert_eq!(detect_or_unknown(&detector, "hello there"), "en");
    }
}
