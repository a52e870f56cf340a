//! Classification prompt template.

use std::env;
use std::path::Path;

use intake_core::{Category, Intent};
use tracing::info;

/// Default path for the classifier prompt file.
pub const DEFAULT_PROMPT_FILE: &str = "CLASSIFIER_PROMPT.md";

/// Embedded classification prompt.
///
/// Placeholders: `{categories}`, `{intents}` and `{text}`.
pub const DEFAULT_CLASSIFIER_PROMPT: &str = r#"You are a complaint classification system. Analyze the following text and respond with ONLY a JSON object.

Text: "{text}"

Classify into:
1. category: One of [{categories}]
   - Sanitation: Garbage, waste, dead animals, cleaning issues, trash collection, animal carcasses
   - Water Supply: Water issues, tap water, supply problems, quality issues
   - Street Lighting: Street lights, lamps, electrical poles, illumination, bulbs
   - Roads: Road conditions, potholes, construction, footpaths, sidewalks
   - Public Safety: Crime, security, police-related issues, emergencies
   - Other: Anything that doesn't fit the above categories
2. subcategory: Specific subcategory or "General" if unclear
3. place: Location mentioned or "Unknown" if none
4. department: Government department involved or "Unknown" if none
5. intent: One of [{intents}]

IMPORTANT: Dead animals, carcasses, rotting organic matter, and disposal of deceased animals should ALWAYS be classified as "Sanitation" category.

Respond with ONLY this JSON structure, no markdown, no explanation:
{
    "category": "<category>",
    "subcategory": "<subcategory>",
    "place": "<place>",
    "department": "<department>",
    "intent": "<intent>"
}"#;

/// Load the classifier prompt template.
///
/// Priority:
/// 1. `CLASSIFIER_PROMPT` env var (if set)
/// 2. Contents of prompt file (`CLASSIFIER_PROMPT_FILE` or default `CLASSIFIER_PROMPT.md`)
/// 3. Embedded default prompt
pub fn load_classifier_prompt() -> String {
    if let Ok(prompt) = env::var("CLASSIFIER_PROMPT") {
        info!("Using classifier prompt from CLASSIFIER_PROMPT env var");
        return prompt;
    }

    let prompt_file =
        env::var("CLASSIFIER_PROMPT_FILE").unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());

    if let Some(prompt) = load_prompt_file(&prompt_file) {
        info!("Loaded classifier prompt from {}", prompt_file);
        return prompt;
    }

    info!("Using embedded default classifier prompt");
    DEFAULT_CLASSIFIER_PROMPT.to_string()
}

fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Fill a prompt template with the category set, intent set and text.
pub fn render_prompt(template: &str, text: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let intents = Intent::ALL
        .iter()
        .map(|i| format!("\"{}\"", i.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    // Text last, so user input can't inject the other placeholders.
    template
        .replace("{categories}", &categories)
        .replace("{intents}", &intents)
        .replace("{text}", text)
}
