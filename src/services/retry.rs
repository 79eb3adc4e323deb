//! Adaptive retry controller for one role evaluation.
//!
//! Truncated output is a budget problem: the engine reasoned at length and
//! ran out of generation tokens, so the fix is to demand terser output.
//! Malformed output is not generally fixable by repeating the instruction
//! harder, but a second independent sample sometimes succeeds, so those
//! failures retry with the prompt unchanged. Engine call errors retry too.

use crate::domain::models::{RawAssessment, Role};
use crate::domain::ports::{GenerationParams, InferenceEngine};
use crate::services::validator::{OutputValidator, ValidationOutcome};

/// Outcome of a single attempt, as fed to the state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Valid(RawAssessment),
    Truncated,
    Malformed,
    EngineError,
}

/// Retry state machine. `Attempt` tracks both the attempt index and how many
/// truncations have been seen, which drives the tiered evidence cap.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Attempt { index: u32, truncations: u32 },
    Success(RawAssessment),
    Failure,
}

impl RunState {
    pub fn initial() -> Self {
        RunState::Attempt { index: 0, truncations: 0 }
    }

    /// Pure state transition; `max_retries` bounds total attempts at
    /// `max_retries + 1`.
    pub fn advance(self, outcome: AttemptOutcome, max_retries: u32) -> RunState {
        let RunState::Attempt { index, truncations } = self else {
            return self;
        };
        match outcome {
            AttemptOutcome::Valid(assessment) => RunState::Success(assessment),
            _ if index >= max_retries => RunState::Failure,
            AttemptOutcome::Truncated => RunState::Attempt {
                index: index + 1,
                truncations: truncations + 1,
            },
            AttemptOutcome::Malformed | AttemptOutcome::EngineError => {
                RunState::Attempt { index: index + 1, truncations }
            }
        }
    }
}

/// Evidence cap for the next attempt after `truncations` truncated ones:
/// cap 2 after the first, cap 1 after the second and beyond.
fn evidence_cap(truncations: u32) -> u32 {
    if truncations == 0 {
        2
    } else {
        1
    }
}

/// Pure prompt mutation applied after a truncated attempt. Appends the tiered
/// evidence-cap instruction, never duplicating an identical instruction
/// string.
pub fn tighten_prompt(prompt: &str, truncations: u32) -> String {
    let cap = evidence_cap(truncations);
    let instruction = format!(
        "\n\nIMPORTANT: Your previous output was truncated. \
         List AT MOST {cap} piece(s) of evidence so the JSON stays complete."
    );
    if prompt.contains(&instruction) {
        prompt.to_string()
    } else {
        format!("{prompt}{instruction}")
    }
}

/// Drives the retry state machine against a live engine.
pub struct RetryController<'a> {
    engine: &'a dyn InferenceEngine,
    validator: &'a OutputValidator,
    params: GenerationParams,
    max_retries: u32,
}

impl<'a> RetryController<'a> {
    pub fn new(
        engine: &'a dyn InferenceEngine,
        validator: &'a OutputValidator,
        params: GenerationParams,
        max_retries: u32,
    ) -> Self {
        Self { engine, validator, params, max_retries }
    }

    /// Run one role evaluation with bounded adaptive retries. At most
    /// `max_retries + 1` engine calls are issued. Evidence quotes are verified
    /// against `source_text`.
    pub async fn run_role(
        &self,
        role: Role,
        prompt: &str,
        source_text: &str,
    ) -> Option<RawAssessment> {
        let mut prompt = prompt.to_string();
        let mut state = RunState::initial();

        loop {
            let (index, truncations) = match &state {
                RunState::Attempt { index, truncations } => (*index, *truncations),
                _ => unreachable!("loop exits on terminal states"),
            };
            if index > 0 {
                tracing::info!(%role, attempt = index, max = self.max_retries, "retrying role evaluation");
            }

            let outcome = match self.engine.generate(&prompt, &self.params).await {
                Ok(raw_output) => match self.validator.validate(&raw_output, source_text) {
                    ValidationOutcome::Valid(assessment) => AttemptOutcome::Valid(assessment),
                    ValidationOutcome::Truncated { missing } => {
                        tracing::warn!(%role, ?missing, "truncated output detected");
                        AttemptOutcome::Truncated
                    }
                    ValidationOutcome::Malformed { reason } => {
                        let preview: String = raw_output.chars().take(500).collect();
                        tracing::warn!(%role, reason, preview, "validation failed");
                        AttemptOutcome::Malformed
                    }
                },
                Err(err) => {
                    tracing::error!(%role, %err, "engine call failed");
                    AttemptOutcome::EngineError
                }
            };

            let truncated = outcome == AttemptOutcome::Truncated;
            match state.advance(outcome, self.max_retries) {
                RunState::Success(assessment) => return Some(assessment),
                RunState::Failure => {
                    tracing::error!(
                        %role,
                        attempts = self.max_retries + 1,
                        "no valid output after exhausting retries"
                    );
                    return None;
                }
                next => {
                    if truncated {
                        prompt = tighten_prompt(&prompt, truncations);
                        tracing::info!(
                            %role,
                            cap = evidence_cap(truncations),
                            "tightened evidence cap for retry"
                        );
                    }
                    state = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment() -> RawAssessment {
        RawAssessment {
            score: 2.0,
            confidence: 1,
            evidence: vec![],
            reasoning: "r".to_string(),
        }
    }

    #[test]
    fn test_valid_outcome_is_terminal() {
        let state = RunState::initial().advance(AttemptOutcome::Valid(assessment()), 2);
        assert!(matches!(state, RunState::Success(_)));
    }

    #[test]
    fn test_truncation_increments_both_counters() {
        let state = RunState::initial().advance(AttemptOutcome::Truncated, 2);
        assert_eq!(state, RunState::Attempt { index: 1, truncations: 1 });
    }

    #[test]
    fn test_malformed_keeps_truncation_count() {
        let state = RunState::Attempt { index: 1, truncations: 1 }
            .advance(AttemptOutcome::Malformed, 2);
        assert_eq!(state, RunState::Attempt { index: 2, truncations: 1 });
    }

    #[test]
    fn test_exhaustion_is_failure() {
        let state = RunState::Attempt { index: 2, truncations: 0 }
            .advance(AttemptOutcome::EngineError, 2);
        assert_eq!(state, RunState::Failure);
    }

    #[test]
    fn test_terminal_states_absorb() {
        assert_eq!(RunState::Failure.advance(AttemptOutcome::Truncated, 2), RunState::Failure);
    }

    #[test]
    fn test_tighten_prompt_tiered_caps() {
        let first = tighten_prompt("base prompt", 0);
        assert!(first.contains("AT MOST 2"));
        let second = tighten_prompt(&first, 1);
        assert!(second.contains("AT MOST 1"));
        // The first instruction stays; the second is appended after it.
        assert!(second.contains("AT MOST 2"));
    }

    #[test]
    fn test_tighten_prompt_never_duplicates() {
        let once = tighten_prompt("base", 1);
        let twice = tighten_prompt(&once, 1);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("AT MOST 1").count(), 1);
    }

    #[test]
    fn test_prompt_differs_only_by_instruction() {
        let base = "evaluate the ABSORB capability";
        let tightened = tighten_prompt(base, 0);
        assert!(tightened.starts_with(base));
    }
}
