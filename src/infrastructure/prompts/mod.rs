//! Prompt template loading.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::ports::PromptSource;

/// Loads `<dir>/<name>.txt` prompt templates from disk. Any failure yields an
/// empty string, which callers treat as "role unusable".
pub struct FilePromptSource {
    dir: PathBuf,
}

impl FilePromptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PromptSource for FilePromptSource {
    fn load(&self, name: &str) -> String {
        let path = self.dir.join(format!("{name}.txt"));
        match std::fs::read_to_string(&path) {
            Ok(content) => content.trim().to_string(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "prompt template load failed");
                String::new()
            }
        }
    }
}

/// In-memory prompt source for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct StaticPromptSource {
    templates: BTreeMap<String, String>,
}

impl StaticPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }
}

impl PromptSource for StaticPromptSource {
    fn load(&self, name: &str) -> String {
        self.templates.get(name).cloned().unwrap_or_default()
    }
}
