//! Seams for the external intelligence collaborators: keyword extraction
//! and phrase-to-filter resolution. The real implementations live outside
//! this crate; the defaults here only keep the facade usable on its own.

use serde::Serialize;

use crate::query::FilterMap;

/// The outcome of resolving a natural-language phrase into filters.
#[derive(Debug, Clone, Serialize)]
pub struct Intent {
    pub filters: FilterMap,
    pub explanation: String,
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

impl Intent {
    /// An intent carrying no filters, which makes the facade fall back to
    /// keyword search.
    pub fn empty() -> Self {
        Self {
            filters: FilterMap::new(),
            explanation: String::new(),
            confidence: 0.0,
            suggestions: Vec::new(),
        }
    }
}

/// Maps a free-form phrase to a filter mapping plus explanation metadata.
pub trait IntentResolver: Send + Sync {
    fn resolve(&self, text: &str, table: &str) -> Intent;
}

/// Extracts search keywords from free text, most significant first.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Resolver that never produces filters; every intelligent query falls
/// back to keyword search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntent;

impl IntentResolver for NoIntent {
    fn resolve(&self, _text: &str, _table: &str) -> Intent {
        Intent::empty()
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "for", "from", "has", "have", "in", "is", "it", "of", "on", "or",
    "that", "the", "this", "to", "was", "were", "with",
];

/// Keyword extraction fallback: alphanumeric tokens of three or more
/// characters, stopwords removed, order preserved, de-duplicated
/// case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicKeywordExtractor;

impl KeywordExtractor for BasicKeywordExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut keywords = Vec::new();
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.len() < 3 {
                continue;
            }
            let lower = token.to_lowercase();
            if STOPWORDS.contains(&lower.as_str()) || seen.contains(&lower) {
                continue;
            }
            seen.push(lower);
            keywords.push(token.to_string());
        }
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_order_without_stopwords() {
        let extractor = BasicKeywordExtractor;
        assert_eq!(
            extractor.extract("the printer on floor 3 is broken"),
            vec!["printer", "floor", "broken"]
        );
    }

    #[test]
    fn deduplicates_case_insensitively() {
        let extractor = BasicKeywordExtractor;
        assert_eq!(
            extractor.extract("VPN vpn outage"),
            vec!["VPN", "outage"]
        );
    }

    #[test]
    fn short_tokens_are_dropped() {
        let extractor = BasicKeywordExtractor;
        assert_eq!(extractor.extract("db is up"), Vec::<String>::new());
    }

    #[test]
    fn no_intent_always_falls_back() {
        let intent = NoIntent.resolve("critical incidents", "incident");
        assert!(intent.filters.is_empty());
        assert_eq!(intent.confidence, 0.0);
    }
}
