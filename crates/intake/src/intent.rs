//! Rule-based intent detection for raw chat utterances.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a single utterance looks like before any model is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentTag {
    Greeting,
    Thanks,
    Query,
    Suggestion,
    Request,
    Incomplete,
    Complaint,
}

impl IntentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentTag::Greeting => "greeting",
            IntentTag::Thanks => "thanks",
            IntentTag::Query => "query",
            IntentTag::Suggestion => "suggestion",
            IntentTag::Request => "request",
            IntentTag::Incomplete => "incomplete",
            IntentTag::Complaint => "complaint",
        }
    }
}

impl std::fmt::Display for IntentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SHORT_GREETINGS: &[&str] = &["hi", "hu", "hii", "hai", "hlo", "hey", "ok"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "namaste", "hii", "hai", "hlo", "hu", "hjh"];
const THANKS_WORDS: &[&str] = &["thanks", "thank", "thnx", "thanku"];

static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(hi|hello|hey|greetings|namaste|good morning|good afternoon|good evening|hii|hai|hlo|hellow)\b",
    )
    .expect("greeting pattern")
});

static THANKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(thanks|thank you|thankyou|thnx|thank u|tysm|appreciate|grateful)\b")
        .expect("thanks pattern")
});

// Interrogatives only count when they open the utterance; "there is garbage"
// is a statement, "is there garbage collection" is a question.
static QUERY_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(what|how|when|where|who|why|can you|could you|is|are|do|does|will)\b")
        .expect("query opener pattern")
});

static QUERY_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(status|track|check|know|tell me|information|info)\b").expect("query pattern")
});

static TRAILING_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?\s*$").expect("question mark pattern"));

static SUGGESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(suggest|suggestion|recommend|improve|better|should|could|idea|proposal|feedback)\b")
        .expect("suggestion pattern")
});

static REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(request|need|want|require|apply|application|form|service|can i|may i|i would like|please provide)\b",
    )
    .expect("request pattern")
});

/// Classify an utterance with an ordered rule cascade; the first match wins.
///
/// Very short input that is not a known greeting is `Incomplete` so the
/// citizen is asked to clarify instead of a complaint being opened.
pub fn detect_intent(utterance: &str) -> IntentTag {
    let text = utterance.trim().to_lowercase();
    let length = text.chars().count();

    if length <= 3 {
        return if SHORT_GREETINGS.contains(&text.as_str()) {
            IntentTag::Greeting
        } else {
            IntentTag::Incomplete
        };
    }

    if GREETING.is_match(&text) {
        return IntentTag::Greeting;
    }

    if THANKS.is_match(&text) {
        return IntentTag::Thanks;
    }

    if length > 5
        && (QUERY_OPENER.is_match(&text)
            || QUERY_VOCABULARY.is_match(&text)
            || TRAILING_QUESTION.is_match(&text))
    {
        return IntentTag::Query;
    }

    if SUGGESTION.is_match(&text) {
        return IntentTag::Suggestion;
    }

    if REQUEST.is_match(&text) {
        return IntentTag::Request;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 3 {
        if words.iter().any(|w| GREETING_WORDS.contains(w)) {
            return IntentTag::Greeting;
        }
        if words.iter().any(|w| THANKS_WORDS.contains(w)) {
            return IntentTag::Thanks;
        }
    }

    IntentTag::Complaint
}
