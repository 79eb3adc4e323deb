//! Pipeline services: parsing, grounding, budgeting, retry, orchestration.

pub mod auditor;
pub mod context;
pub mod evaluator;
pub mod evidence;
pub mod orchestrator;
pub mod response_parser;
pub mod retry;
pub mod validator;

pub use auditor::Auditor;
pub use context::ContextBudgeter;
pub use evaluator::RoleEvaluator;
pub use evidence::EvidenceVerifier;
pub use orchestrator::Orchestrator;
pub use response_parser::parse_json_response;
pub use retry::{tighten_prompt, AttemptOutcome, RetryController, RunState};
pub use validator::{OutputValidator, ValidationOutcome};
