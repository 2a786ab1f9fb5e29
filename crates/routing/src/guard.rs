//! Screen resolution for the current session phase.

use medvault_auth::{Role, SessionPhase};

use crate::route::{Route, RouteRequest, SubRoute, allowed_roles};

/// A concrete screen the shell can present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    PatientDashboard,
    DoctorDashboard,
    AdminDashboard,
    /// A dashboard sub-page, presented with the chrome of `role`.
    SubPage { role: Role, page: SubRoute },
    /// Terminal: the backend confirmed an identity this client cannot map
    /// to a dashboard.
    InvalidRole { role: String },
}

/// Outcome of a guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Session state is still being established; suspend, decide nothing.
    Loading,
    Render(Screen),
    Redirect(RouteRequest),
}

/// Decide what to show for `request` under `phase`.
///
/// Redirect targets are always `login()` or `dashboard()`, both of which
/// render under the phase that produced them, so a redirect chain settles
/// in one hop.
pub fn resolve(phase: &SessionPhase, request: &RouteRequest) -> Resolution {
    match phase {
        SessionPhase::Uninitialized | SessionPhase::Validating => Resolution::Loading,

        SessionPhase::Anonymous => match request.route {
            Route::Login => Resolution::Render(Screen::Login),
            Route::Register => Resolution::Render(Screen::Register),
            Route::Dashboard => Resolution::Redirect(RouteRequest::login()),
        },

        SessionPhase::InvalidRole { role, .. } => {
            Resolution::Render(Screen::InvalidRole { role: role.clone() })
        }

        SessionPhase::Authenticated(session) => {
            let role = session.role();
            match request.route {
                // An authenticated user never sees the auth forms.
                Route::Login | Route::Register => {
                    Resolution::Redirect(RouteRequest::dashboard())
                }
                Route::Dashboard => match request.sub {
                    None => Resolution::Render(dashboard_for(role)),
                    Some(page) => {
                        let permitted = allowed_roles(page)
                            .map_or(true, |roles| roles.contains(&role));
                        if permitted {
                            Resolution::Render(Screen::SubPage { role, page })
                        } else {
                            Resolution::Redirect(RouteRequest::dashboard())
                        }
                    }
                },
            }
        }
    }
}

fn dashboard_for(role: Role) -> Screen {
    match role {
        Role::Patient => Screen::PatientDashboard,
        Role::Doctor => Screen::DoctorDashboard,
        Role::Admin => Screen::AdminDashboard,
    }
}
