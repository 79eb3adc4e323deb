//! Audit layer: one batched consistency check across all six role results.
//!
//! The auditor is advisory. It issues a single engine call (one round-trip,
//! not six), parses the response best-effort, and never blocks the composite
//! result: any failure yields an empty verdict map and the scores stand.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::domain::models::{CompositeResult, ReviewVerdict, Role, VerdictStatus};
use crate::domain::ports::{GenerationParams, InferenceEngine, PromptSource};
use crate::services::response_parser::parse_json_response;

/// Name under which the audit prompt template is loaded.
const AUDIT_PROMPT_NAME: &str = "auditor";

/// How many evidence quotes per role are forwarded to the auditor.
const EVIDENCE_SAMPLE: usize = 3;

/// Cross-checks the six dimension results in one batched engine call.
pub struct Auditor<'a> {
    engine: &'a dyn InferenceEngine,
    prompts: &'a dyn PromptSource,
}

impl<'a> Auditor<'a> {
    pub fn new(engine: &'a dyn InferenceEngine, prompts: &'a dyn PromptSource) -> Self {
        Self { engine, prompts }
    }

    /// Audit all six dimensions. Roles without a result are represented to
    /// the auditor by a sentinel (`score=0, reasoning="missing"`); the
    /// sentinel never surfaces as a real result.
    pub async fn audit(&self, composite: &CompositeResult) -> HashMap<Role, ReviewVerdict> {
        let template = self.prompts.load(AUDIT_PROMPT_NAME);
        if template.is_empty() {
            tracing::warn!("audit prompt template unavailable, skipping audit");
            return HashMap::new();
        }

        let prompt = self.build_audit_prompt(&template, composite);
        let params = GenerationParams {
            max_tokens: 2000,
            ..GenerationParams::default()
        };

        let response = match self.engine.generate(&prompt, &params).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(%err, "audit engine call failed, scores stand unaudited");
                return HashMap::new();
            }
        };

        // Best-effort single parse; no schema-retry loop for the batch call.
        let Some(parsed) = parse_json_response(&response) else {
            tracing::warn!("audit response unparseable, scores stand unaudited");
            return HashMap::new();
        };
        let Some(verdict_map) = parsed.as_object() else {
            tracing::warn!("audit response is not an object, scores stand unaudited");
            return HashMap::new();
        };

        let mut verdicts = HashMap::new();
        for role in Role::ALL {
            if let Some(entry) = verdict_map.get(role.as_str()) {
                verdicts.insert(role, parse_verdict(role, entry, composite));
            }
        }
        tracing::info!(count = verdicts.len(), "audit verdicts collected");
        verdicts
    }

    fn build_audit_prompt(&self, template: &str, composite: &CompositeResult) -> String {
        let mut dimensions = serde_json::Map::new();
        for role in Role::ALL {
            let entry = match composite.slot(role) {
                Some(dim) => json!({
                    "score": dim.score,
                    "confidence": dim.confidence,
                    "evidence_count": dim.evidence.len(),
                    "evidence": dim.evidence.iter().take(EVIDENCE_SAMPLE).collect::<Vec<_>>(),
                    "reasoning": dim.reasoning,
                }),
                // Sentinel for absent roles; internal to the audit request.
                None => json!({
                    "score": 0,
                    "confidence": 0,
                    "evidence_count": 0,
                    "evidence": [],
                    "reasoning": "missing",
                }),
            };
            dimensions.insert(role.as_str().to_string(), entry);
        }
        let payload = serde_json::to_string_pretty(&Value::Object(dimensions))
            .unwrap_or_else(|_| "{}".to_string());

        format!(
            "{template}\n\n\
             ## Subject: {} ({})\n\n\
             ## Dimension results:\n\
             {payload}\n\n\
             ---\n\n\
             Review all six dimensions and output JSON:",
            composite.subject_id, composite.period
        )
    }
}

/// Map one per-role entry of the audit response onto a verdict. Missing or
/// unrecognized fields degrade to `Unknown`/original values rather than
/// dropping the verdict.
fn parse_verdict(role: Role, entry: &Value, composite: &CompositeResult) -> ReviewVerdict {
    let original_score = composite.slot(role).map_or(0.0, |dim| dim.score);

    let status = entry
        .get("status")
        .and_then(Value::as_str)
        .map_or(VerdictStatus::Unknown, |s| match s.to_uppercase().as_str() {
            "APPROVED" => VerdictStatus::Approved,
            "CORRECTED" => VerdictStatus::Corrected,
            _ => VerdictStatus::Unknown,
        });

    let final_score = entry
        .get("final_score")
        .and_then(Value::as_f64)
        .unwrap_or(original_score)
        .clamp(0.0, 100.0);

    let final_reasoning = entry
        .get("final_reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let audit_note = entry
        .get("audit_note")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    ReviewVerdict { role, status, final_score, final_reasoning, audit_note }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DimensionResult;

    fn composite_with_absorb(score: f64) -> CompositeResult {
        let mut composite = CompositeResult::new("ACME", 2024);
        composite.set_slot(
            Role::Absorb,
            Some(DimensionResult {
                role: Role::Absorb,
                score,
                confidence: 2,
                evidence: vec!["q1".to_string(), "q2".to_string()],
                reasoning: "solid".to_string(),
                verdict: None,
            }),
        );
        composite
    }

    #[test]
    fn test_parse_verdict_full_entry() {
        let composite = composite_with_absorb(80.0);
        let entry = serde_json::json!({
            "status": "CORRECTED",
            "final_score": 55.0,
            "final_reasoning": "evidence too thin for 80",
            "audit_note": "score>70 with <3 evidence items",
        });
        let verdict = parse_verdict(Role::Absorb, &entry, &composite);
        assert_eq!(verdict.status, VerdictStatus::Corrected);
        assert!((verdict.final_score - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_verdict_defaults() {
        let composite = composite_with_absorb(80.0);
        let entry = serde_json::json!({});
        let verdict = parse_verdict(Role::Absorb, &entry, &composite);
        assert_eq!(verdict.status, VerdictStatus::Unknown);
        // Missing final_score falls back to the original score.
        assert!((verdict.final_score - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_verdict_clamps_score() {
        let composite = composite_with_absorb(80.0);
        let entry = serde_json::json!({"status": "approved", "final_score": 140.0});
        let verdict = parse_verdict(Role::Absorb, &entry, &composite);
        assert_eq!(verdict.status, VerdictStatus::Approved);
        assert!((verdict.final_score - 100.0).abs() < f64::EPSILON);
    }
}
