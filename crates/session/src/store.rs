//! Session store: the state machine behind "who is logged in".

use std::sync::{Arc, Mutex};

use chrono::Utc;
use medvault_auth::{
    Role, RoleAttributes, Session, SessionPhase, UnknownRole, check_credential,
};
use medvault_core::{EmailAddress, UserId};

use crate::client::{ApiClient, UserPayload};
use crate::error::{AuthError, AuthResult};
use crate::register::RegisterRequest;
use crate::storage::CredentialStore;

/// Message returned when a confirmed account carries an unsupported role.
pub const UNSUPPORTED_ROLE_MESSAGE: &str = "This account's role is not supported.";

/// Single source of truth for the current session.
///
/// Only this type mutates the persisted credential. All operations return
/// structured results; the phase is always observable and never half-built.
pub struct SessionStore {
    client: ApiClient,
    credentials: Arc<dyn CredentialStore>,
    phase: Mutex<SessionPhase>,
    /// Serializes credential validation and login so two in-flight
    /// operations cannot interleave their writes. Completion order, not
    /// issue order, decides the final phase.
    flight: tokio::sync::Mutex<()>,
}

impl SessionStore {
    pub fn new(client: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            credentials,
            phase: Mutex::new(SessionPhase::Uninitialized),
            flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Current phase snapshot.
    pub fn phase(&self) -> SessionPhase {
        self.phase.lock().unwrap().clone()
    }

    /// True until the stored credential has been settled one way or the
    /// other. Consumers must not trust session fields while this holds.
    pub fn is_loading(&self) -> bool {
        self.phase().is_loading()
    }

    /// Establish the starting phase from any persisted credential.
    ///
    /// Malformed or expired credentials are purged locally without a
    /// network call. A credential that looks usable is confirmed with the
    /// backend; rejection and transport failure both read as "cannot trust
    /// this credential". Concurrent callers coalesce: whoever loses the
    /// race observes the already-settled phase and issues no request.
    pub async fn initialize(&self) -> SessionPhase {
        let _flight = self.flight.lock().await;

        if !matches!(self.phase(), SessionPhase::Uninitialized) {
            return self.phase();
        }

        let stored = match self.credentials.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored credential; starting anonymous");
                None
            }
        };

        let Some(token) = stored else {
            return self.enter(SessionPhase::Anonymous);
        };

        if let Err(reason) = check_credential(&token, Utc::now()) {
            tracing::info!(%reason, "discarding stored credential");
            self.purge_credential();
            return self.enter(SessionPhase::Anonymous);
        }

        self.set_phase(SessionPhase::Validating);

        match self.client.validate(&token).await {
            Ok(user) => self.adopt_confirmed_user(user),
            Err(err) => {
                tracing::warn!(kind = ?err.kind, "stored credential failed remote validation");
                self.purge_credential();
                self.enter(SessionPhase::Anonymous)
            }
        }
    }

    /// Authenticate with the backend.
    ///
    /// On failure nothing is mutated: the phase and any persisted
    /// credential are exactly as they were, so a retry is safe. On success
    /// the session role comes from the response body, not from `role`.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> AuthResult<Session> {
        let _flight = self.flight.lock().await;

        let response = self.client.login(email, password, role).await?;

        if let Err(e) = self.credentials.save(&response.token) {
            tracing::warn!(error = %e, "failed to persist credential; session will not survive restart");
        }

        match self.adopt_confirmed_user(response.user) {
            SessionPhase::Authenticated(session) => {
                tracing::info!(role = %session.role(), "login succeeded");
                Ok(session)
            }
            _ => Err(AuthError::rejected(UNSUPPORTED_ROLE_MESSAGE)),
        }
    }

    /// Create an account. Never authenticates the caller and never touches
    /// the phase or the persisted credential.
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<UserPayload> {
        request.validate()?;
        self.client.register(&request.to_payload()).await
    }

    /// Drop the session and the persisted credential. Idempotent.
    pub fn logout(&self) {
        self.set_phase(SessionPhase::Anonymous);
        self.purge_credential();
        tracing::info!("logged out");
    }

    /// Map a backend-confirmed user into a phase.
    ///
    /// An unsupported role is terminal: the credential is purged so the
    /// state cannot resurrect on restart, and the guard renders it
    /// explicitly instead of picking a dashboard.
    fn adopt_confirmed_user(&self, user: UserPayload) -> SessionPhase {
        match session_from_payload(user) {
            Ok(session) => self.enter(SessionPhase::Authenticated(session)),
            Err(ProfileError::UnknownRole { email, role }) => {
                tracing::error!(%role, "backend returned a role outside the supported set");
                self.purge_credential();
                self.enter(SessionPhase::InvalidRole { email, role })
            }
            Err(ProfileError::Invalid(reason)) => {
                tracing::warn!(%reason, "backend user profile was unusable");
                self.purge_credential();
                self.enter(SessionPhase::Anonymous)
            }
        }
    }

    fn enter(&self, phase: SessionPhase) -> SessionPhase {
        self.set_phase(phase.clone());
        phase
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self.phase.lock().unwrap() = phase;
    }

    fn purge_credential(&self) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "failed to purge stored credential");
        }
    }
}

#[derive(Debug)]
enum ProfileError {
    UnknownRole { email: String, role: String },
    Invalid(String),
}

fn session_from_payload(user: UserPayload) -> Result<Session, ProfileError> {
    let role = match Role::parse(&user.role) {
        Ok(role) => role,
        Err(UnknownRole(role)) => {
            return Err(ProfileError::UnknownRole {
                email: user.email,
                role,
            });
        }
    };

    let email = EmailAddress::parse(&user.email)
        .map_err(|e| ProfileError::Invalid(e.to_string()))?;

    let attributes = match role {
        Role::Doctor => RoleAttributes::Doctor {
            specialization: user.specialization,
            license_number: user.license_number,
        },
        Role::Patient => RoleAttributes::Patient {
            blood_group: user.blood_group,
            emergency_contact: user.emergency_contact,
        },
        Role::Admin => RoleAttributes::Admin,
    };

    Ok(Session {
        user_id: UserId::from_raw(user.id),
        display_name: user.name,
        email,
        attributes,
        established_at: Utc::now(),
    })
}
