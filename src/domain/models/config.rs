//! Configuration model for the scoring pipeline.
//!
//! Loaded hierarchically by `infrastructure::config::ConfigLoader`
//! (defaults -> yaml -> environment).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::role::Role;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub scoring: ScoringConfig,
    pub validation: ValidationConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
    /// Directory holding one prompt template per role plus `auditor.txt`.
    pub prompts_dir: PathBuf,
    /// Directory where composite results are persisted.
    pub scores_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            scoring: ScoringConfig::default(),
            validation: ValidationConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            prompts_dir: PathBuf::from("prompts"),
            scores_dir: PathBuf::from("data/scores"),
        }
    }
}

/// Inference engine transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the llama.cpp-style completion server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 300,
        }
    }
}

/// Section selection and context budget for one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    /// Section identifiers in priority order; the first is most important and
    /// is never sacrificed for later ones.
    pub sections: Vec<String>,
    /// Context budget in tokens for this role.
    pub budget_tokens: usize,
}

/// Default per-role context budget in tokens.
const DEFAULT_BUDGET_TOKENS: usize = 45_000;

/// Context budgeting settings shared across roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Characters per token heuristic used to convert token budgets to
    /// character budgets.
    pub chars_per_token: usize,
    /// Minimum useful size for a truncated tail section; below this the
    /// section is dropped instead of truncated.
    pub min_keep_chars: usize,
    /// Per-role section priorities and budgets.
    pub roles: BTreeMap<Role, RoleProfile>,
}

impl ScoringConfig {
    pub fn profile(&self, role: Role) -> Option<&RoleProfile> {
        self.roles.get(&role)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let profile = |sections: &[&str]| RoleProfile {
            sections: sections.iter().map(ToString::to_string).collect(),
            budget_tokens: DEFAULT_BUDGET_TOKENS,
        };
        let mut roles = BTreeMap::new();
        roles.insert(
            Role::Absorb,
            profile(&["item_1a", "item_9a", "item_1c", "cybersecurity", "information_security"]),
        );
        roles.insert(Role::Adopt, profile(&["item_7", "item_1", "item_1a"]));
        roles.insert(Role::Transform, profile(&["item_7", "item_1", "esg_sustainability"]));
        roles.insert(
            Role::Anticipate,
            profile(&["item_1a", "item_1c", "cybersecurity", "item_9a"]),
        );
        roles.insert(
            Role::Rebound,
            profile(&["item_1c", "cybersecurity", "item_9a", "item_7"]),
        );
        roles.insert(Role::Learn, profile(&["esg_sustainability", "item_9a", "item_1a"]));
        Self {
            chars_per_token: 4,
            min_keep_chars: 1_000,
            roles,
        }
    }
}

/// Evidence grounding and schema validation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Normalized similarity at or above which a fuzzy evidence match counts
    /// as grounded (0.0-1.0).
    pub fuzzy_threshold: f64,
    /// Fraction of non-empty evidence quotes allowed to miss before the whole
    /// output is rejected as ungrounded (0.0-1.0).
    pub max_miss_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.5,
            max_miss_ratio: 0.5,
        }
    }
}

/// Adaptive retry settings for role evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; total engine calls per role are
    /// bounded by `max_retries + 1`.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level: trace, debug, info, warn, error.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
