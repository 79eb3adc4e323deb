//! Resilens - Digital Resilience Scoring Pipeline
//!
//! Resilens evaluates a company's digital resilience from its 10-K narrative
//! disclosures by delegating six independent sub-assessments (absorb, adopt,
//! transform, anticipate, rebound, learn) to a text-generation engine, then
//! auditing the results for internal consistency.
//!
//! The pipeline turns an unreliable free-text engine into a component that
//! yields validated, schema-conformant, source-grounded judgments:
//!
//! - **Context budgeting** selects and truncates report sections per role
//!   under a token budget.
//! - **Parsing and validation** extract a structured result from raw output
//!   and classify failures as malformed vs. truncated.
//! - **Evidence verification** checks that quoted text actually appears in
//!   the source sections.
//! - **Adaptive retry** tightens instructions when output is truncated.
//! - **Orchestration** runs the six roles in isolation and aggregates them.
//! - **Auditing** cross-checks the six results in one batched engine call.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and port traits
//! - **Service Layer** (`services`): the scoring pipeline itself
//! - **Infrastructure Layer** (`infrastructure`): engine adapters, config,
//!   logging, prompt loading, result persistence
//! - **CLI Layer** (`cli`): command-line entry point

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CompositeResult, Config, DimensionResult, RawAssessment, ReviewVerdict, Role, SectionMap,
    VerdictStatus,
};
pub use domain::ports::{GenerationParams, InferenceEngine, PromptSource, ScoreStore};
pub use infrastructure::{ConfigLoader, FilePromptSource, JsonScoreStore, LlamaHttpEngine};
pub use services::{Orchestrator, OutputValidator, ValidationOutcome};
