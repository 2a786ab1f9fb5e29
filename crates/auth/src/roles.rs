//! Account roles.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role, as granted by the backend.
///
/// This is the closed set of roles the client understands. Wire strings
/// outside this set are a parse error surfaced at the session boundary,
/// never a silent default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, for exhaustive table checks.
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    /// Case-insensitive parse.
    ///
    /// The backend returns `patient` on the login path and `PATIENT` on the
    /// validate path; both must map to the same variant.
    pub fn parse(raw: &str) -> Result<Self, UnknownRole> {
        let normalized = raw.trim();
        for role in Self::ALL {
            if normalized.eq_ignore_ascii_case(role.as_str()) {
                return Ok(role);
            }
        }
        Err(UnknownRole(raw.to_string()))
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
