//! `medvault-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! roles, sessions, and bearer-token claims, and validates claims
//! deterministically against a clock reading supplied by the caller.

pub mod claims;
pub mod roles;
pub mod session;

pub use claims::{BearerClaims, CredentialError, check_credential, decode_claims, validate_claims};
pub use roles::{Role, UnknownRole};
pub use session::{RoleAttributes, Session, SessionPhase};
