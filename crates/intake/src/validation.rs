//! Validators for citizen-supplied fields.

use thiserror::Error;

/// Single words that are never a complaint description on their own.
const NON_DESCRIPTION_WORDS: &[&str] = &["hi", "hello", "hey", "hu", "hjh", "ok", "yes", "no", "y", "n"];

/// Minimum description length, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 5;

/// Minimum location length, in characters.
pub const MIN_LOCATION_CHARS: usize = 3;

/// Why a description was rejected. The `Display` text is the re-prompt shown
/// to the citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DescriptionError {
    #[error("Your description is too short. Please provide more details about your complaint (at least 5 characters).")]
    TooShort,

    #[error("That doesn't seem like a complaint description. Please describe the issue you're facing (e.g., 'There is garbage on my street' or 'Water supply is not working').")]
    NotADescription,

    #[error("Your description seems incomplete. Please provide more details about your complaint.")]
    Incomplete,
}

/// Check that free text plausibly describes a complaint.
pub fn validate_description(text: &str) -> Result<(), DescriptionError> {
    let text = text.trim();

    if text.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(DescriptionError::TooShort);
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    if words.len() == 1 && NON_DESCRIPTION_WORDS.contains(&words[0]) {
        return Err(DescriptionError::NotADescription);
    }

    if words.len() <= 3 && words.iter().all(|w| w.chars().count() <= 3) {
        return Err(DescriptionError::Incomplete);
    }

    Ok(())
}

/// Strip whitespace, hyphens and parentheses from a phone number.
pub fn clean_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Accept exactly ten decimal digits once formatting is stripped.
pub fn validate_phone(raw: &str) -> bool {
    let cleaned = clean_phone(raw);
    cleaned.len() == 10 && cleaned.chars().all(|c| c.is_ascii_digit())
}

/// Return the trimmed location if it is long enough to be useful.
pub fn validate_location(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= MIN_LOCATION_CHARS).then(|| trimmed.to_string())
}
