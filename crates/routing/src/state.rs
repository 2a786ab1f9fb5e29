//! Derived navigation state.

use crate::route::{Route, RouteRequest, SubRoute};

/// Where the user currently is (or is asking to be).
///
/// Derived state only: never persisted, and reset to the default whenever
/// the session's role changes or the user logs out. The guard decides
/// whether the requested location actually renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: RouteRequest,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current: RouteRequest::login(),
        }
    }

    pub fn current(&self) -> &RouteRequest {
        &self.current
    }

    /// Jump to a top-level route, dropping any sub-route.
    pub fn navigate_to(&mut self, route: Route) {
        self.current = RouteRequest::top(route);
    }

    /// Open a dashboard sub-page.
    pub fn navigate_to_sub(&mut self, sub: SubRoute) {
        self.current = RouteRequest::sub_page(sub);
    }

    /// Leave the current sub-page for its dashboard.
    pub fn back_to_dashboard(&mut self) {
        self.current = RouteRequest::dashboard();
    }

    /// Accept a guard redirect.
    pub fn follow(&mut self, target: RouteRequest) {
        self.current = target;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}
