//! Six-role orchestration: isolated evaluation passes, aggregation, audit.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::models::{CompositeResult, Role, SectionMap};
use crate::domain::ports::{InferenceEngine, PromptSource};
use crate::services::auditor::Auditor;
use crate::services::evaluator::RoleEvaluator;

use crate::domain::models::Config;

/// Runs all six role evaluators against one report, enforcing isolation
/// between roles, then aggregates and audits.
///
/// Evaluation is strictly sequential: one engine call in flight at a time,
/// with an engine reset between roles. The reset is the mechanism enforcing
/// the per-role isolation invariant (each role sees only its own bounded
/// context), not an optimization.
pub struct Orchestrator {
    engine: Arc<dyn InferenceEngine>,
    prompts: Arc<dyn PromptSource>,
    config: Config,
}

impl Orchestrator {
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        prompts: Arc<dyn PromptSource>,
        config: Config,
    ) -> Self {
        Self { engine, prompts, config }
    }

    /// Score one report. A role that fails to produce a validated result
    /// leaves its slot absent; it is never defaulted to zero and never aborts
    /// the run. The engine is disconnected on every exit path.
    pub async fn score(
        &self,
        sections: &SectionMap,
        subject_id: &str,
        period: i32,
    ) -> CompositeResult {
        let started = Instant::now();
        tracing::info!(subject_id, period, "scoring started");

        let mut composite = CompositeResult::new(subject_id, period);
        self.run_roles(sections, &mut composite).await;
        composite.recompute_overall();

        let auditor = Auditor::new(self.engine.as_ref(), self.prompts.as_ref());
        let verdicts = auditor.audit(&composite).await;
        composite.attach_verdicts(verdicts);

        composite.processing_time_secs = started.elapsed().as_secs_f64();
        composite.timestamp = chrono::Utc::now().to_rfc3339();

        if let Err(err) = self.engine.disconnect().await {
            tracing::warn!(%err, "engine disconnect failed");
        }

        tracing::info!(
            subject_id,
            overall = composite.overall_score,
            elapsed_secs = composite.processing_time_secs,
            "scoring finished"
        );
        composite
    }

    async fn run_roles(&self, sections: &SectionMap, composite: &mut CompositeResult) {
        let evaluator = RoleEvaluator::new(self.engine.as_ref(), self.prompts.as_ref(), &self.config);

        for role in Role::ALL {
            tracing::info!(%role, "running role evaluation");

            if !self.ensure_connected().await {
                tracing::error!(%role, "engine not ready, role marked absent");
                composite.set_slot(role, None);
                continue;
            }

            let result = evaluator
                .evaluate(role, sections, &composite.subject_id, composite.period)
                .await;
            composite.set_slot(role, result);

            // Clear conversation state so the next role's prompt cannot be
            // contaminated by this role's generation history.
            if let Err(err) = self.engine.reset().await {
                tracing::warn!(%role, %err, "engine reset failed");
            }
        }
    }

    /// Idempotent readiness check before each role.
    async fn ensure_connected(&self) -> bool {
        match self.engine.connect().await {
            Ok(ready) => ready,
            Err(err) => {
                tracing::error!(%err, "engine connect failed");
                false
            }
        }
    }
}
