//! Delayed classifier - wraps another classifier with artificial delay.

use std::time::Duration;

use intake_core::{async_trait, ClassificationResult, Classifier, ServiceError};
use tokio::time::sleep;

/// A classifier that wraps another classifier and adds artificial delay.
///
/// Useful for testing timeout handling and per-session serialization.
pub struct DelayedClassifier<C: Classifier> {
    inner: C,
    delay: Duration,
}

impl<C: Classifier> DelayedClassifier<C> {
    pub fn new(inner: C, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn with_millis(inner: C, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<C: Classifier> Classifier for DelayedClassifier<C> {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ServiceError> {
        sleep(self.delay).await;
        self.inner.classify(text).await
    }

    fn name(&self) -> &str {
        "DelayedClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticClassifier;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_classifier() {
        let classifier =
            DelayedClassifier::with_millis(StaticClassifier::new(ClassificationResult::default()), 50);

        let start = Instant::now();
        classifier.classify("test").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(classifier.name(), "DelayedClassifier");
    }
}
