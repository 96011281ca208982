//! Small text-matching helpers shared by scans and flows.

use strsim::jaro_winkler;

/// Threshold above which two identifiers are considered the same word.
/// Tuned so `email` matches `email_field` evidence but not `phone_no`.
const FUZZY_THRESHOLD: f64 = 0.84;

/// Case-insensitive substring check.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Fuzzy similarity between a keyword and a piece of attribute evidence.
/// Evidence is normalized to lowercase words first; the best per-word
/// score wins, so `name="user_email"` still counts as `email` evidence.
pub fn fuzzy_score(evidence: &str, keyword: &str) -> f64 {
    let keyword = keyword.to_lowercase();
    evidence
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| jaro_winkler(w, &keyword))
        .fold(0.0, f64::max)
}

pub fn fuzzy_matches(evidence: &str, keyword: &str) -> bool {
    fuzzy_score(evidence, keyword) >= FUZZY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_ignores_case() {
        assert!(contains_ci("Item Added to Cart", "added to cart"));
        assert!(!contains_ci("Your Cart is Empty", "laptop"));
    }

    #[test]
    fn fuzzy_match_tokenizes_evidence() {
        assert!(fuzzy_matches("email_field", "email"));
        assert!(fuzzy_matches("user-email", "email"));
        assert!(!fuzzy_matches("phone_no_field", "email"));
    }
}
