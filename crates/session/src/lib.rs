//! `medvault-session`
//!
//! **Responsibility:** single source of truth for "who is logged in".
//!
//! This crate provides:
//! - The HTTP client for the auth contract (login/register/validate)
//! - Credential persistence (a single named slot)
//! - The session store state machine
//!
//! The backend stays authoritative for every trust decision; when it cannot
//! be reached, this crate fails safe (anonymous), never open.

pub mod client;
pub mod error;
pub mod register;
pub mod storage;
pub mod store;

pub use client::{ApiClient, ClientBuildError, ClientConfig, LoginResponse, UserPayload};
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use register::{
    AccountDetails, DoctorRegistration, PatientRegistration, RegisterPayload, RegisterRequest,
};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError};
pub use store::SessionStore;
