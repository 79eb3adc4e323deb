//! Role evaluator: one isolated evaluation pass per capability role.

use crate::domain::models::{Config, DimensionResult, Role, SectionMap};
use crate::domain::ports::{GenerationParams, InferenceEngine, PromptSource};
use crate::services::context::ContextBudgeter;
use crate::services::retry::RetryController;
use crate::services::validator::OutputValidator;

/// Composes context budgeting, the role prompt template, and the adaptive
/// retry controller into one callable per role.
pub struct RoleEvaluator<'a> {
    engine: &'a dyn InferenceEngine,
    prompts: &'a dyn PromptSource,
    budgeter: ContextBudgeter,
    validator: OutputValidator,
    config: &'a Config,
}

impl<'a> RoleEvaluator<'a> {
    pub fn new(
        engine: &'a dyn InferenceEngine,
        prompts: &'a dyn PromptSource,
        config: &'a Config,
    ) -> Self {
        Self {
            engine,
            prompts,
            budgeter: ContextBudgeter::new(&config.scoring),
            validator: OutputValidator::new(&config.validation),
            config,
        }
    }

    /// Evaluate one role against the section map. Returns `None` when the
    /// role has no usable context or prompt template, or when every retry
    /// attempt failed validation.
    pub async fn evaluate(
        &self,
        role: Role,
        sections: &SectionMap,
        subject_id: &str,
        period: i32,
    ) -> Option<DimensionResult> {
        let Some(profile) = self.config.scoring.profile(role) else {
            tracing::warn!(%role, "no section profile configured, skipping");
            return None;
        };

        let context = self.budgeter.build_context(sections, profile);
        if context.is_empty() {
            // No evidence substrate; invoking generation would be pointless.
            tracing::warn!(%role, "no relevant sections available, skipping");
            return None;
        }

        let template = self.prompts.load(role.as_str());
        if template.is_empty() {
            tracing::warn!(%role, "prompt template unavailable, role unusable");
            return None;
        }

        let prompt = compose_prompt(&template, role, subject_id, period, &context);
        let controller = RetryController::new(
            self.engine,
            &self.validator,
            GenerationParams::default(),
            self.config.retry.max_retries,
        );

        let raw = controller.run_role(role, &prompt, &context).await?;
        tracing::info!(%role, raw_score = raw.score, "role evaluation succeeded");
        Some(DimensionResult::from_raw(role, raw))
    }
}

/// Role prompt layout: template, subject header, bounded context, then the
/// evaluation instruction.
fn compose_prompt(
    template: &str,
    role: Role,
    subject_id: &str,
    period: i32,
    context: &str,
) -> String {
    format!(
        "{template}\n\n\
         # Company: {subject_id} ({period})\n\n\
         ## 10-K Report Content (Relevant Sections):\n\
         {context}\n\n\
         ---\n\n\
         Now evaluate the {} capability and output JSON:",
        role.as_str().to_uppercase()
    )
}
