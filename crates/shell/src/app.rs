//! Application shell: composes the session store, the guard, and chrome.

use std::sync::Arc;

use medvault_auth::{Role, Session};
use medvault_routing::{NavigationState, Resolution, Route, Screen, SubRoute, resolve};
use medvault_session::{AuthResult, RegisterRequest, SessionStore, UserPayload};

use crate::chrome::{Chrome, Theme, nav_items};

/// What the shell presents right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Session state is still settling; show the splash.
    Loading,
    Screen(Screen),
}

/// Thin composition shell around the gated screens.
///
/// Owns navigation state and theme preference; every screen decision is
/// delegated to the guard. Navigation resets whenever the session role
/// changes, so a freshly signed-in user always lands on their dashboard.
pub struct AppShell {
    store: Arc<SessionStore>,
    nav: NavigationState,
    theme: Theme,
    last_role: Option<Role>,
}

impl AppShell {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            nav: NavigationState::new(),
            theme: Theme::default(),
            last_role: None,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    /// Settle the session from any persisted credential, then resolve.
    pub async fn start(&mut self) -> View {
        self.store.initialize().await;
        self.view()
    }

    /// Resolve the current view, following guard redirects.
    ///
    /// Terminates because redirect targets (login, dashboard) both render
    /// under the phase that produced them.
    pub fn view(&mut self) -> View {
        let phase = self.store.phase();

        let role = phase.session().map(Session::role);
        if role != self.last_role {
            self.nav.reset();
            self.last_role = role;
        }

        loop {
            match resolve(&phase, self.nav.current()) {
                Resolution::Loading => return View::Loading,
                Resolution::Render(screen) => return View::Screen(screen),
                Resolution::Redirect(target) => self.nav.follow(target),
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str, role: Role) -> AuthResult<Session> {
        self.store.login(email, password, role).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<UserPayload> {
        self.store.register(request).await
    }

    pub fn logout(&mut self) {
        self.store.logout();
    }

    pub fn open(&mut self, route: Route) {
        self.nav.navigate_to(route);
    }

    pub fn open_page(&mut self, page: SubRoute) {
        self.nav.navigate_to_sub(page);
    }

    pub fn back(&mut self) {
        self.nav.back_to_dashboard();
    }

    /// Chrome for the current session, absent while anonymous or loading.
    pub fn chrome(&self) -> Option<Chrome> {
        self.store.phase().session().map(|session| Chrome {
            title: format!("MedVault · {}", session.display_name),
            items: nav_items(session.role()),
            theme: self.theme,
        })
    }
}
