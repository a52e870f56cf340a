//! Classifiers with fixed or scripted answers.

use std::sync::atomic::{AtomicUsize, Ordering};

use intake_core::{async_trait, ClassificationResult, Classifier, ServiceError};

/// A classifier that always returns the same result.
pub struct StaticClassifier {
    result: ClassificationResult,
    calls: AtomicUsize,
}

impl StaticClassifier {
    pub fn new(result: ClassificationResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `classify` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }

    fn name(&self) -> &str {
        "StaticClassifier"
    }
}

/// A classifier that answers by case-insensitive substring rules.
///
/// Rules are checked in insertion order; the first whose needle appears in
/// the text wins. Text matching no rule fails with `InvalidResponse`, so the
/// caller's fallback chain is exercised.
#[derive(Default)]
pub struct ScriptedClassifier {
    rules: Vec<(String, ClassificationResult)>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule: text containing `needle` classifies as `result`.
    pub fn on(mut self, needle: impl Into<String>, result: ClassificationResult) -> Self {
        self.rules.push((needle.into().to_lowercase(), result));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(needle, _)| lowered.contains(needle.as_str()))
            .map(|(_, result)| result.clone())
            .ok_or_else(|| ServiceError::InvalidResponse(format!("no scripted answer for: {}", text)))
    }

    fn name(&self) -> &str {
        "ScriptedClassifier"
    }
}

/// How a [`FailingClassifier`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Network,
    Timeout,
    MalformedOutput,
}

/// A classifier that always fails.
pub struct FailingClassifier {
    mode: FailureMode,
    calls: AtomicUsize,
}

impl FailingClassifier {
    pub fn new() -> Self {
        Self::with_mode(FailureMode::Network)
    }

    pub fn with_mode(mode: FailureMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.mode {
            FailureMode::Network => ServiceError::Network("connection refused".to_string()),
            FailureMode::Timeout => ServiceError::Timeout,
            FailureMode::MalformedOutput => {
                ServiceError::InvalidResponse("no JSON object found".to_string())
            }
        })
    }

    fn name(&self) -> &str {
        "FailingClassifier"
    }
}
