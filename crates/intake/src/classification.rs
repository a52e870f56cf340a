//! Classification with a guaranteed answer.
//!
//! [`TextClassifier`] asks the configured model first, falls back to keyword
//! rules, and finally to the fixed default. A deterministic dead-animal rule
//! is applied to every result.

use std::sync::Arc;

use intake_core::{Category, ClassificationResult, Classifier, Intent};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

/// Keyword lexicon per category, checked in order; the first hit wins.
pub const KEYWORD_RULES: &[(Category, &[&str])] = &[
    (
        Category::Sanitation,
        &[
            "garbage", "trash", "waste", "kachra", "gandagi", "safai", "dustbin", "collection",
            "cleaning", "sweeping", "dead animal", "carcass", "dead dog", "dead cat", "rotting",
            "smell", "stench", "decomposing", "corpse", "dead",
        ],
    ),
    (
        Category::WaterSupply,
        &[
            "water", "pani", "supply", "tap", "pipeline", "leakage", "shortage", "quality",
            "contamination", "bore", "well",
        ],
    ),
    (
        Category::StreetLighting,
        &[
            "light", "lighting", "street", "lamp", "pole", "electricity", "dark", "bulb",
            "illumination", "batti",
        ],
    ),
    (
        Category::Roads,
        &[
            "road", "street", "path", "pothole", "repair", "construction", "footpath", "sidewalk",
            "sadak", "rasta",
        ],
    ),
    (
        Category::PublicSafety,
        &[
            "safety", "crime", "police", "security", "harassment", "accident", "emergency",
            "fire", "suraksha",
        ],
    ),
];

/// Subcategory recorded when the dead-animal rule changes the category.
pub const DEAD_ANIMAL_SUBCATEGORY: &str = "Dead Animal";

static CARCASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(carcass(es)?|corpses?)\b").expect("carcass pattern"));

static DECAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(dead|decompos\w*|rotting|rotten|died)\b").expect("decay pattern")
});

static ANIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(animals?|dogs?|cats?|cows?|rats?|birds?|pigs?|buffalo(es)?|monkeys?|goats?|horses?|pigeons?|crows?|snakes?|donkeys?)\b",
    )
    .expect("animal pattern")
});

/// Whether the text mentions a dead or decomposing animal.
pub fn mentions_dead_animal(text: &str) -> bool {
    CARCASS.is_match(text) || (DECAY.is_match(text) && ANIMAL.is_match(text))
}

/// First category whose keyword list has a substring hit.
pub fn classify_by_keywords(text: &str) -> Option<Category> {
    let lowered = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
}

/// Force dead-animal reports into Sanitation.
pub fn apply_domain_rules(text: &str, mut result: ClassificationResult) -> ClassificationResult {
    if result.category != Category::Sanitation && mentions_dead_animal(text) {
        info!(from = %result.category, "Dead animal mentioned; overriding category to Sanitation");
        result.category = Category::Sanitation;
        result.subcategory = DEAD_ANIMAL_SUBCATEGORY.to_string();
    }
    result
}

/// Classifier front end that always returns a valid classification.
#[derive(Clone, Default)]
pub struct TextClassifier {
    model: Option<Arc<dyn Classifier>>,
}

impl TextClassifier {
    /// Use a model, with keyword and default fallbacks.
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model: Some(model) }
    }

    /// Keyword rules and the default only.
    pub fn keyword_only() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Classify `text`. Model failures degrade to keywords, then the default.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let result = match self.classify_with_model(text).await {
            Some(result) => result,
            None => Self::fallback(text),
        };
        apply_domain_rules(text, result)
    }

    async fn classify_with_model(&self, text: &str) -> Option<ClassificationResult> {
        let model = self.model.as_ref()?;
        match model.classify(text).await {
            Ok(result) => {
                debug!(classifier = model.name(), category = %result.category, "Model classification");
                Some(result)
            }
            Err(err) => {
                warn!(classifier = model.name(), error = %err, "Model classification failed; using fallback");
                None
            }
        }
    }

    fn fallback(text: &str) -> ClassificationResult {
        match classify_by_keywords(text) {
            Some(category) => {
                info!(category = %category, "Using keyword fallback");
                ClassificationResult::for_category(category, Intent::Complaint)
            }
            None => {
                warn!("Using final fallback classification");
                ClassificationResult::default()
            }
        }
    }
}
