//! `medvault-shell`
//!
//! **Responsibility:** thin view-composition shell.
//!
//! This crate provides:
//! - The application shell composing the session store and the guard
//! - Common chrome (per-role navigation, theme preference)
//! - Environment-driven configuration
//!
//! Every screen decision is delegated to `medvault-routing`; the shell
//! never second-guesses the guard.

pub mod app;
pub mod chrome;
pub mod config;

pub use app::{AppShell, View};
pub use chrome::{Chrome, NavItem, Theme, nav_items};
pub use config::ShellConfig;
