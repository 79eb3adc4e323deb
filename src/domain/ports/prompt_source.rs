//! Prompt template source port.

/// Source of opaque prompt templates, one per role plus the auditor.
///
/// A template that fails to load yields an empty string; callers treat an
/// empty template as "role unusable" and skip the evaluation.
pub trait PromptSource: Send + Sync {
    fn load(&self, name: &str) -> String;
}
