//! `medvault-routing` — role router / navigation guard.
//!
//! Pure policy: given the session phase and a requested location, decide
//! what to show. No IO, no panics, no network; the caller queries the
//! session store and passes its phase in.

pub mod guard;
pub mod route;
pub mod state;

pub use guard::{Resolution, Screen, resolve};
pub use route::{Route, RouteRequest, SubRoute, allowed_roles};
pub use state::NavigationState;
