//! Subject roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to a subject at issuance and carried in its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Terminal scoped to a single folder.
    #[default]
    Regular,
    /// Sync/management process: exempt from restriction, may use privileged operations.
    Management,
}

impl Role {
    /// String form used in configuration and tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Management => "management",
        }
    }

    /// Whether this role may call privileged sync operations.
    pub fn is_management(&self) -> bool {
        matches!(self, Role::Management)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(Role::Regular),
            "management" => Ok(Role::Management),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}
