//! Keyword matching: decides whether a single- or multi-word domain term
//! occurs in a learner response.
//!
//! Single words go through three tiers in strict order, each more permissive
//! and more expensive than the last: exact match after normalization, then
//! registered synonyms and generated word forms, then a Jaro-Winkler fuzzy
//! comparison for near-misses. Phrases are matched structurally as
//! whole-word-bounded substrings of the normalized response and never go
//! through synonym or fuzzy expansion.

use strsim::jaro_winkler;

use crate::normalize::normalize;
use crate::synonyms::SynonymTable;

const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Whether two single words are near-identical under Jaro-Winkler
/// (shared-prefix boost up to 4 chars, factor 0.1, cut at > 0.85).
///
/// Last-resort tier for minor misspellings. Not meaningful for phrases.
pub fn similar(a: &str, b: &str) -> bool {
    jaro_winkler(a, b) > SIMILARITY_THRESHOLD
}

/// A response tokenized on whitespace and normalized once per evaluation,
/// shared by every keyword test against it.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    tokens: Vec<String>,
    joined: String,
}

impl NormalizedResponse {
    pub fn new(text: &str) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(normalize).collect();
        let joined = tokens.join(" ");
        Self { tokens, joined }
    }

    /// The normalized tokens of the response.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn contains_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Whole-word-bounded substring test against the normalized text.
    fn contains_phrase(&self, phrase: &str) -> bool {
        if phrase.is_empty() {
            return false;
        }
        let haystack = self.joined.as_str();
        let mut from = 0;
        while let Some(offset) = haystack[from..].find(phrase) {
            let begin = from + offset;
            let end = begin + phrase.len();
            let head_clear = !haystack[..begin]
                .chars()
                .next_back()
                .is_some_and(is_word_char);
            let tail_clear = !haystack[end..].chars().next().is_some_and(is_word_char);
            if head_clear && tail_clear {
                return true;
            }
            from = begin
                + haystack[begin..]
                    .chars()
                    .next()
                    .map_or(1, |c| c.len_utf8());
        }
        false
    }
}

// Mirrors the \b notion of a word character.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `keyword` occurs in the response.
///
/// Phrases (keywords containing a space) match structurally; single words
/// fall through exact, related-form, and fuzzy tiers in that order.
pub fn keyword_matches(
    response: &NormalizedResponse,
    keyword: &str,
    synonyms: &SynonymTable,
) -> bool {
    let keyword = keyword.to_lowercase();

    if keyword.contains(' ') {
        let phrase = keyword
            .split_whitespace()
            .map(|word| normalize(word))
            .collect::<Vec<_>>()
            .join(" ");
        return response.contains_phrase(&phrase);
    }

    let normalized = normalize(&keyword);
    if response.contains_token(&normalized) {
        return true;
    }

    if synonyms
        .related_forms(&keyword)
        .iter()
        .any(|form| response.contains_token(&normalize(form)))
    {
        return true;
    }

    response
        .tokens
        .iter()
        .any(|token| similar(&normalized, token))
}

/// Convenience form of [`keyword_matches`] over raw response text.
pub fn matches(response_text: &str, keyword: &str, synonyms: &SynonymTable) -> bool {
    keyword_matches(&NormalizedResponse::new(response_text), keyword, synonyms)
}
