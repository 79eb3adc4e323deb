//! Shared test fixtures for the scoring pipeline.
#![allow(dead_code)]

use resilens::domain::models::{Config, Role, RoleProfile, SectionMap};
use resilens::infrastructure::StaticPromptSource;

pub const ITEM_1A: &str = "We face supply chain disruption risk across all operating segments.";
pub const ITEM_1C: &str = "Our incident response plan covers detection, escalation, and recovery.";
pub const ITEM_7: &str = "Management adapted pricing and logistics during the disruption.";

pub const ESG: &str = "Employees complete annual security awareness training programs.";

/// Section map covering every section the test config reads.
pub fn section_map_full() -> SectionMap {
    SectionMap::from([
        ("item_1a", ITEM_1A),
        ("item_1c", ITEM_1C),
        ("item_7", ITEM_7),
        ("item_9a", ""),
        ("esg_sustainability", ESG),
    ])
}

/// Section map where the learn role's only section is missing.
pub fn section_map_without_learn() -> SectionMap {
    SectionMap::from([
        ("item_1a", ITEM_1A),
        ("item_1c", ITEM_1C),
        ("item_7", ITEM_7),
        ("item_9a", ""),
    ])
}

/// Config with compact per-role profiles so tests control exactly which
/// sections each role reads.
pub fn test_config() -> Config {
    let mut config = Config::default();
    let profile = |sections: &[&str]| RoleProfile {
        sections: sections.iter().map(ToString::to_string).collect(),
        budget_tokens: 2_000,
    };
    config.scoring.roles.insert(Role::Absorb, profile(&["item_1a", "item_9a", "item_1c"]));
    config.scoring.roles.insert(Role::Adopt, profile(&["item_7", "item_1a"]));
    config.scoring.roles.insert(Role::Transform, profile(&["item_7"]));
    config.scoring.roles.insert(Role::Anticipate, profile(&["item_1a", "item_1c"]));
    config.scoring.roles.insert(Role::Rebound, profile(&["item_1c"]));
    config.scoring.roles.insert(Role::Learn, profile(&["esg_sustainability"]));
    config
}

/// Prompt source with a template for every role and the auditor.
pub fn prompt_source() -> StaticPromptSource {
    let mut source = StaticPromptSource::new();
    for role in Role::ALL {
        source = source.with(role.as_str(), format!("Evaluate {role} on a 0-4 scale."));
    }
    source.with("auditor", "Cross-check the six dimension results.")
}

/// A schema-valid engine reply quoting the given evidence.
pub fn valid_reply(score: f64, confidence: u8, evidence: &[&str]) -> String {
    serde_json::json!({
        "score": score,
        "confidence": confidence,
        "evidence": evidence,
        "reasoning": "supported by the quoted disclosures",
    })
    .to_string()
}
