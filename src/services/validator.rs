//! Schema and grounding validation of raw engine output.
//!
//! Distinguishes truncation (required keys lost off the tail of a long
//! generation) from plain malformation, because the two drive different retry
//! strategies: truncation is fixed by demanding terser output, malformation
//! only by an independent re-sample.

use serde_json::Value;

use crate::domain::models::{RawAssessment, ValidationConfig};
use crate::services::evidence::EvidenceVerifier;
use crate::services::response_parser::parse_json_response;

const REQUIRED_KEYS: [&str; 3] = ["evidence", "reasoning", "score"];

/// Raw per-role sub-scale bounds; the 0-100 composite scale is a later
/// transformation (`DimensionResult::from_raw`).
const RAW_SCORE_MAX: f64 = 4.0;

/// Tagged validation outcome, so callers can branch on failure class without
/// re-inspecting raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(RawAssessment),
    /// Parse succeeded but required keys are missing; attributed to generation
    /// length limits.
    Truncated { missing: Vec<String> },
    /// Parse or schema failure, including ungrounded evidence.
    Malformed { reason: String },
}

/// Validates one role evaluation response against the result schema and the
/// source text it must quote from.
#[derive(Debug, Clone)]
pub struct OutputValidator {
    verifier: EvidenceVerifier,
    max_miss_ratio: f64,
}

impl OutputValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            verifier: EvidenceVerifier::new(config),
            max_miss_ratio: config.max_miss_ratio,
        }
    }

    pub fn validate(&self, raw_output: &str, source_text: &str) -> ValidationOutcome {
        let Some(data) = parse_json_response(raw_output) else {
            return ValidationOutcome::Malformed {
                reason: "JSON parse error".to_string(),
            };
        };
        let Some(object) = data.as_object() else {
            return ValidationOutcome::Malformed {
                reason: "response is not a JSON object".to_string(),
            };
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            tracing::warn!(?missing, "required keys absent, treating as truncated");
            return ValidationOutcome::Truncated { missing };
        }

        let Some(score) = object.get("score").and_then(Value::as_f64) else {
            return ValidationOutcome::Malformed {
                reason: format!("score is not numeric: {}", object["score"]),
            };
        };
        if !(0.0..=RAW_SCORE_MAX).contains(&score) {
            return ValidationOutcome::Malformed {
                reason: format!("score {score} outside [0, {RAW_SCORE_MAX}]"),
            };
        }

        let Some(items) = object.get("evidence").and_then(Value::as_array) else {
            return ValidationOutcome::Malformed {
                reason: "evidence is not an array".to_string(),
            };
        };
        let mut evidence = Vec::with_capacity(items.len());
        for item in items {
            let Some(text) = item.as_str() else {
                return ValidationOutcome::Malformed {
                    reason: "evidence item is not a string".to_string(),
                };
            };
            evidence.push(text.to_string());
        }

        let nonempty = evidence.iter().filter(|q| !q.trim().is_empty()).count();
        let miss_count = self.verifier.count_misses(&evidence, source_text);
        if nonempty > 0 && miss_count as f64 > nonempty as f64 * self.max_miss_ratio {
            tracing::warn!(miss_count, nonempty, "too many ungrounded evidence quotes");
            return ValidationOutcome::Malformed {
                reason: format!("{miss_count}/{nonempty} evidence quotes not grounded in source"),
            };
        }

        let Some(reasoning) = object.get("reasoning").and_then(Value::as_str) else {
            return ValidationOutcome::Malformed {
                reason: "reasoning is not a string".to_string(),
            };
        };

        // Confidence is optional in the output contract; invalid values fall
        // back to 0 rather than failing the whole response.
        let confidence = object
            .get("confidence")
            .and_then(Value::as_u64)
            .map_or(0, |c| c.min(2)) as u8;

        ValidationOutcome::Valid(RawAssessment {
            score,
            confidence,
            evidence,
            reasoning: reasoning.to_string(),
        })
    }
}
