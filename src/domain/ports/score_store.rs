//! Result persistence port.

use std::path::PathBuf;

use crate::domain::errors::DomainResult;
use crate::domain::models::CompositeResult;

/// Persists one composite result per (subject_id, period). Re-running for the
/// same key overwrites the previous record.
pub trait ScoreStore: Send + Sync {
    fn save(&self, result: &CompositeResult) -> DomainResult<PathBuf>;
}
