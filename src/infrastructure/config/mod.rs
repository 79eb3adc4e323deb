//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::{Config, Role};

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid fuzzy_threshold: {0}. Must be in (0, 1]")]
    InvalidFuzzyThreshold(f64),

    #[error("Invalid max_miss_ratio: {0}. Must be in (0, 1]")]
    InvalidMissRatio(f64),

    #[error("Invalid chars_per_token: {0}. Must be at least 1")]
    InvalidCharsPerToken(usize),

    #[error("Invalid max_retries: {0}. Must be at most 10")]
    InvalidMaxRetries(u32),

    #[error("Role {0} has no sections configured")]
    EmptySectionList(Role),

    #[error("Role {0} has a zero token budget")]
    ZeroBudget(Role),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `resilens.yaml` in the working directory
    /// 3. Environment variables (`RESILENS_*` prefix, `__` nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("resilens.yaml"))
            .merge(Env::prefixed("RESILENS_").split("__"))
            .extract()
            .context("Failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let fuzzy = config.validation.fuzzy_threshold;
        if !(fuzzy > 0.0 && fuzzy <= 1.0) {
            return Err(ConfigError::InvalidFuzzyThreshold(fuzzy));
        }
        let miss = config.validation.max_miss_ratio;
        if !(miss > 0.0 && miss <= 1.0) {
            return Err(ConfigError::InvalidMissRatio(miss));
        }

        if config.scoring.chars_per_token == 0 {
            return Err(ConfigError::InvalidCharsPerToken(config.scoring.chars_per_token));
        }
        if config.retry.max_retries > 10 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        for (role, profile) in &config.scoring.roles {
            if profile.sections.is_empty() {
                return Err(ConfigError::EmptySectionList(*role));
            }
            if profile.budget_tokens == 0 {
                return Err(ConfigError::ZeroBudget(*role));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ValidationConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_fuzzy_threshold_rejected() {
        let config = Config {
            validation: ValidationConfig {
                fuzzy_threshold: 1.5,
                ..ValidationConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidFuzzyThreshold(_))
        ));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_load_from_yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resilens.yaml");
        std::fs::write(&path, "retry:\n  max_retries: 4\n").unwrap();
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.retry.max_retries, 4);
        // Untouched sections keep their defaults.
        assert_eq!(config.scoring.chars_per_token, 4);
    }
}
