//! `medvault-core` — client-domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no network or storage
//! concerns): strongly-typed identifiers, the domain error model, and
//! validated value objects shared by the rest of the workspace.

pub mod email;
pub mod error;
pub mod id;

pub use email::EmailAddress;
pub use error::{DomainError, DomainResult};
pub use id::{RequestId, UserId};
