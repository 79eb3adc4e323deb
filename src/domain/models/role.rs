//! The six resilience capability roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six evaluative capabilities applied to a filing.
///
/// Each role reads its own slice of the filing (see `RoleProfile`) and is
/// scored by an isolated evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Capacity to absorb shocks without structural change.
    Absorb,
    /// Capacity to adapt operations in response to shocks.
    Adopt,
    /// Capacity to transform the business model.
    Transform,
    /// Capacity to anticipate and monitor threats.
    Anticipate,
    /// Capacity to recover after an incident.
    Rebound,
    /// Capacity to learn from past incidents.
    Learn,
}

impl Role {
    /// All roles in canonical evaluation order.
    pub const ALL: [Role; 6] = [
        Role::Absorb,
        Role::Adopt,
        Role::Transform,
        Role::Anticipate,
        Role::Rebound,
        Role::Learn,
    ];

    /// Snake-case identifier, matching prompt template names and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Absorb => "absorb",
            Role::Adopt => "adopt",
            Role::Transform => "transform",
            Role::Anticipate => "anticipate",
            Role::Rebound => "rebound",
            Role::Learn => "learn",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absorb" => Ok(Role::Absorb),
            "adopt" => Ok(Role::Adopt),
            "transform" => Ok(Role::Transform),
            "anticipate" => Ok(Role::Anticipate),
            "rebound" => Ok(Role::Rebound),
            "learn" => Ok(Role::Learn),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
