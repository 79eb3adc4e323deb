//! JSON file result store.

use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CompositeResult;
use crate::domain::ports::ScoreStore;

/// Persists composite results as one pretty-printed JSON record per
/// (subject_id, period), overwriting on re-run.
pub struct JsonScoreStore {
    dir: PathBuf,
}

impl JsonScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, subject_id: &str, period: i32) -> PathBuf {
        self.dir.join(format!("{subject_id}_{period}_score.json"))
    }
}

impl ScoreStore for JsonScoreStore {
    fn save(&self, result: &CompositeResult) -> DomainResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| DomainError::StoreError(format!("create {}: {e}", self.dir.display())))?;
        let path = self.record_path(&result.subject_id, result.period);
        let json = serde_json::to_string_pretty(result)?;
        write_atomic(&path, &json)
            .map_err(|e| DomainError::StoreError(format!("write {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "composite result saved");
        Ok(path)
    }
}

/// Write via a temp file and rename so a crash never leaves a torn record.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DimensionResult, Role};

    #[test]
    fn test_save_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScoreStore::new(dir.path());

        let mut result = CompositeResult::new("ACME", 2024);
        result.set_slot(
            Role::Absorb,
            Some(DimensionResult {
                role: Role::Absorb,
                score: 75.0,
                confidence: 2,
                evidence: vec!["quote".to_string()],
                reasoning: "r".to_string(),
                verdict: None,
            }),
        );
        result.recompute_overall();

        let path = store.save(&result).unwrap();
        assert!(path.ends_with("ACME_2024_score.json"));

        // Re-running for the same key overwrites.
        result.set_slot(Role::Absorb, None);
        result.recompute_overall();
        let path2 = store.save(&result).unwrap();
        assert_eq!(path, path2);

        let loaded: CompositeResult =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(loaded.absorb.is_none());
    }
}
