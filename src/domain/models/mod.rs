//! Domain models.

pub mod config;
pub mod role;
pub mod score;
pub mod section;

pub use config::{
    Config, EngineConfig, LogFormat, LoggingConfig, RetryConfig, RoleProfile, ScoringConfig,
    ValidationConfig,
};
pub use role::Role;
pub use score::{
    CompositeResult, DimensionResult, RawAssessment, ReviewVerdict, VerdictStatus,
    RAW_SCALE_FACTOR,
};
pub use section::SectionMap;
