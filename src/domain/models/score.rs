//! Scoring results: per-role dimension results, audit verdicts, and the
//! composite resilience score for one (subject, period).

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Conversion factor from the raw 0-4 per-role sub-scale (what the prompt
/// contract asks the engine for) to the 0-100 composite scale.
pub const RAW_SCALE_FACTOR: f64 = 25.0;

/// Schema-validated engine output for one role, still on the raw 0-4 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAssessment {
    /// Raw score on the 0-4 sub-scale.
    pub score: f64,
    /// Self-reported confidence: 0 = none, 1 = moderate, 2 = strong.
    pub confidence: u8,
    /// Verbatim quotes from the source sections.
    pub evidence: Vec<String>,
    /// Why the evidence supports the score.
    pub reasoning: String,
}

/// Outcome of the audit pass for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// Original score stands.
    Approved,
    /// Auditor overrode the score; read `final_score`.
    Corrected,
    /// Auditor could not reach a verdict.
    Unknown,
}

/// Per-dimension verdict produced by the single batched audit call.
///
/// A verdict never retroactively changes `DimensionResult::score`; callers
/// wanting the corrected value must read `final_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub role: Role,
    pub status: VerdictStatus,
    /// Score after audit, on the 0-100 scale.
    pub final_score: f64,
    pub final_reasoning: String,
    pub audit_note: String,
}

/// Validated result of one role evaluation, on the 0-100 composite scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionResult {
    pub role: Role,
    /// Score on the 0-100 scale.
    pub score: f64,
    /// Self-reported confidence: 0 = none, 1 = moderate, 2 = strong.
    pub confidence: u8,
    pub evidence: Vec<String>,
    pub reasoning: String,
    /// Attached post-hoc by the auditor, at most one per result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ReviewVerdict>,
}

impl DimensionResult {
    /// Lift a validated raw assessment onto the composite scale.
    pub fn from_raw(role: Role, raw: RawAssessment) -> Self {
        Self {
            role,
            score: (raw.score * RAW_SCALE_FACTOR).clamp(0.0, 100.0),
            confidence: raw.confidence,
            evidence: raw.evidence,
            reasoning: raw.reasoning,
            verdict: None,
        }
    }
}

/// Composite resilience score for one (subject, period) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeResult {
    pub subject_id: String,
    pub period: i32,

    pub absorb: Option<DimensionResult>,
    pub adopt: Option<DimensionResult>,
    pub transform: Option<DimensionResult>,
    pub anticipate: Option<DimensionResult>,
    pub rebound: Option<DimensionResult>,
    pub learn: Option<DimensionResult>,

    /// Mean of present dimension scores; absent roles are excluded from both
    /// numerator and denominator, never treated as zero.
    pub overall_score: f64,
    /// Mean of present dimension confidences (0-2 scale).
    pub overall_confidence: f64,

    pub scorer_version: String,
    pub processing_time_secs: f64,
    pub timestamp: String,
}

impl CompositeResult {
    pub fn new(subject_id: impl Into<String>, period: i32) -> Self {
        Self {
            subject_id: subject_id.into(),
            period,
            absorb: None,
            adopt: None,
            transform: None,
            anticipate: None,
            rebound: None,
            learn: None,
            overall_score: 0.0,
            overall_confidence: 0.0,
            scorer_version: env!("CARGO_PKG_VERSION").to_string(),
            processing_time_secs: 0.0,
            timestamp: String::new(),
        }
    }

    pub fn slot(&self, role: Role) -> Option<&DimensionResult> {
        match role {
            Role::Absorb => self.absorb.as_ref(),
            Role::Adopt => self.adopt.as_ref(),
            Role::Transform => self.transform.as_ref(),
            Role::Anticipate => self.anticipate.as_ref(),
            Role::Rebound => self.rebound.as_ref(),
            Role::Learn => self.learn.as_ref(),
        }
    }

    pub fn set_slot(&mut self, role: Role, result: Option<DimensionResult>) {
        let slot = match role {
            Role::Absorb => &mut self.absorb,
            Role::Adopt => &mut self.adopt,
            Role::Transform => &mut self.transform,
            Role::Anticipate => &mut self.anticipate,
            Role::Rebound => &mut self.rebound,
            Role::Learn => &mut self.learn,
        };
        *slot = result;
    }

    /// Roles that produced a validated result, in canonical order.
    pub fn present(&self) -> Vec<(Role, &DimensionResult)> {
        Role::ALL
            .iter()
            .filter_map(|&role| self.slot(role).map(|dim| (role, dim)))
            .collect()
    }

    /// Recompute `overall_score` and `overall_confidence` from the current
    /// dimension slots. The overall values are never cached independently of
    /// the slots; call this after any slot change.
    pub fn recompute_overall(&mut self) {
        let present = self.present();
        if present.is_empty() {
            self.overall_score = 0.0;
            self.overall_confidence = 0.0;
            return;
        }
        let count = present.len() as f64;
        let score_sum: f64 = present.iter().map(|(_, d)| d.score).sum();
        let confidence_sum: f64 = present.iter().map(|(_, d)| f64::from(d.confidence)).sum();
        self.overall_score = score_sum / count;
        self.overall_confidence = confidence_sum / count;
    }

    /// Attach audit verdicts to their dimensions. Verdicts for roles without
    /// a result are dropped; absence stays visible.
    pub fn attach_verdicts(
        &mut self,
        mut verdicts: std::collections::HashMap<Role, ReviewVerdict>,
    ) {
        for role in Role::ALL {
            if let Some(verdict) = verdicts.remove(&role) {
                let slot = match role {
                    Role::Absorb => &mut self.absorb,
                    Role::Adopt => &mut self.adopt,
                    Role::Transform => &mut self.transform,
                    Role::Anticipate => &mut self.anticipate,
                    Role::Rebound => &mut self.rebound,
                    Role::Learn => &mut self.learn,
                };
                if let Some(dim) = slot.as_mut() {
                    dim.verdict = Some(verdict);
                }
            }
        }
    }
}
