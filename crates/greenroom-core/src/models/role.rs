//! Marketplace role identifiers.

use serde::{Deserialize, Serialize};

use crate::error::GreenroomError;

/// The fixed set of marketplace roles. Role-grant defaults are keyed by
/// these values; every authenticated principal holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Talent,
    Manager,
    Producer,
    Agent,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Talent,
        Role::Manager,
        Role::Producer,
        Role::Agent,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Talent => "talent",
            Role::Manager => "manager",
            Role::Producer => "producer",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = GreenroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "talent" => Ok(Role::Talent),
            "manager" => Ok(Role::Manager),
            "producer" => Ok(Role::Producer),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(GreenroomError::Validation {
                message: format!("unknown role: {other}"),
            }),
        }
    }
}
