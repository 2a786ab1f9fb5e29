//! In-memory session model and lifecycle phases.

use chrono::{DateTime, Utc};
use medvault_core::{EmailAddress, UserId};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Role-specific profile attributes carried by an authenticated session.
///
/// The variant *is* the role: a doctor session cannot exist without its
/// doctor fields, and the role can never disagree with the attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleAttributes {
    Doctor {
        specialization: Option<String>,
        license_number: Option<String>,
    },
    Patient {
        blood_group: Option<String>,
        emergency_contact: Option<String>,
    },
    Admin,
}

impl RoleAttributes {
    pub fn role(&self) -> Role {
        match self {
            RoleAttributes::Doctor { .. } => Role::Doctor,
            RoleAttributes::Patient { .. } => Role::Patient,
            RoleAttributes::Admin => Role::Admin,
        }
    }
}

/// The authenticated user as the client sees it.
///
/// Constructed only by the session store from a backend-confirmed identity;
/// everything else holds it immutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub display_name: String,
    pub email: EmailAddress,
    pub attributes: RoleAttributes,
    /// When this session was established on this client.
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.attributes.role()
    }
}

/// Session lifecycle.
///
/// Transitions are one-directional per operation:
/// `Uninitialized → Validating → {Authenticated, Anonymous}`, with
/// `Authenticated → Anonymous` on logout or a later validation failure.
/// `InvalidRole` is terminal until logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Process start; the stored credential has not been examined yet.
    Uninitialized,

    /// A stored credential is being confirmed with the backend.
    Validating,

    /// No usable session.
    Anonymous,

    /// Backend-confirmed identity.
    Authenticated(Session),

    /// Backend-confirmed identity whose role is outside the supported set.
    /// Rendered explicitly, never mapped to a dashboard.
    InvalidRole { email: String, role: String },
}

impl SessionPhase {
    /// Consumers must not trust session fields while this is true.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionPhase::Uninitialized | SessionPhase::Validating)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}
