//! Structured results for session operations.

use thiserror::Error;

/// Failure kind, for branching without string inspection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The backend processed the request and refused it.
    Rejected,

    /// The request never completed (connect, timeout, transport).
    Network,

    /// The request was never sent, or its response was unusable.
    Invalid,
}

/// Structured failure returned by every session-store operation.
///
/// `message` is ready to render on a form; callers branch on `kind` when
/// they need to. Nothing escapes the store as a raw transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Invalid,
            message: message.into(),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
