//! Evidence grounding verification.
//!
//! The engine may reformat whitespace or make minor transcription errors when
//! quoting the filing, so exact-match-only would reject honest answers. Each
//! quote gets three chances: exact substring, newline-normalized substring,
//! and a substring-aware fuzzy pass. A quote failing all three is a miss.

use crate::domain::models::ValidationConfig;

/// Checks that claimed quotations actually appear in the source section text.
#[derive(Debug, Clone)]
pub struct EvidenceVerifier {
    fuzzy_threshold: f64,
}

impl EvidenceVerifier {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            fuzzy_threshold: config.fuzzy_threshold,
        }
    }

    /// Number of non-empty quotes not found in `source_text`.
    pub fn count_misses(&self, quotes: &[String], source_text: &str) -> usize {
        let mut miss_count = 0;
        for quote in quotes {
            let clean = quote.trim();
            if clean.is_empty() {
                continue;
            }
            if !self.is_grounded(clean, source_text) {
                miss_count += 1;
                let preview: String = clean.chars().take(100).collect();
                tracing::warn!(quote = preview, "evidence quote not found in source");
            }
        }
        miss_count
    }

    fn is_grounded(&self, quote: &str, source_text: &str) -> bool {
        if source_text.contains(quote) {
            return true;
        }
        let flat_quote = quote.replace('\n', " ");
        let flat_source = source_text.replace('\n', " ");
        if flat_source.contains(&flat_quote) {
            return true;
        }
        partial_similarity(quote, source_text) >= self.fuzzy_threshold
    }
}

/// Substring-aware similarity: best normalized Levenshtein similarity of the
/// quote against same-length windows of the source, case folded. Handles "the
/// quote is a slightly-garbled part of the text" where whole-string similarity
/// would drown in the length difference.
fn partial_similarity(quote: &str, source_text: &str) -> f64 {
    let quote_lower = quote.to_lowercase();
    let source_lower = source_text.to_lowercase();

    let quote_chars: Vec<char> = quote_lower.chars().collect();
    let source_chars: Vec<char> = source_lower.chars().collect();

    if quote_chars.is_empty() || source_chars.is_empty() {
        return 0.0;
    }
    if quote_chars.len() >= source_chars.len() {
        return strsim::normalized_levenshtein(&quote_lower, &source_lower);
    }

    let window = quote_chars.len();
    let step = (window / 2).max(1);
    let mut best: f64 = 0.0;
    let mut start = 0;
    while start + window <= source_chars.len() {
        let slice: String = source_chars[start..start + window].iter().collect();
        best = best.max(strsim::normalized_levenshtein(&quote_lower, &slice));
        if best >= 0.999 {
            break;
        }
        start += step;
    }
    // Cover the tail window.
    let tail: String = source_chars[source_chars.len() - window..].iter().collect();
    best.max(strsim::normalized_levenshtein(&quote_lower, &tail))
}
