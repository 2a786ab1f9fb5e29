//! Route model and the role allow-list table.

use core::str::FromStr;

use medvault_auth::Role;
use serde::{Deserialize, Serialize};

/// Top-level routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Register,
    Dashboard,
}

/// Sub-routes under the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubRoute {
    BookAppointment,
    Appointments,
    Patients,
    MedicalRecords,
    Chat,
    Reports,
    Settings,
}

impl SubRoute {
    /// Every sub-route, for exhaustive table checks.
    pub const ALL: [SubRoute; 7] = [
        SubRoute::BookAppointment,
        SubRoute::Appointments,
        SubRoute::Patients,
        SubRoute::MedicalRecords,
        SubRoute::Chat,
        SubRoute::Reports,
        SubRoute::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubRoute::BookAppointment => "book-appointment",
            SubRoute::Appointments => "appointments",
            SubRoute::Patients => "patients",
            SubRoute::MedicalRecords => "medical-records",
            SubRoute::Chat => "chat",
            SubRoute::Reports => "reports",
            SubRoute::Settings => "settings",
        }
    }
}

impl FromStr for SubRoute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str() == s)
            .ok_or(())
    }
}

impl core::fmt::Display for SubRoute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles allowed to open a sub-route.
///
/// `None` means any authenticated role. This table is the only authority on
/// sub-route access; the guard consults it, nothing else does.
pub fn allowed_roles(sub: SubRoute) -> Option<&'static [Role]> {
    match sub {
        SubRoute::BookAppointment | SubRoute::Chat => Some(&[Role::Patient]),
        SubRoute::Patients => Some(&[Role::Doctor]),
        SubRoute::Appointments | SubRoute::MedicalRecords | SubRoute::Reports => {
            Some(&[Role::Patient, Role::Doctor])
        }
        SubRoute::Settings => None,
    }
}

/// A requested location: a top-level route plus an optional sub-route.
///
/// Sub-routes only exist under `Dashboard`; the constructors keep that
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub route: Route,
    pub sub: Option<SubRoute>,
}

impl RouteRequest {
    pub fn top(route: Route) -> Self {
        Self { route, sub: None }
    }

    pub fn login() -> Self {
        Self::top(Route::Login)
    }

    pub fn register() -> Self {
        Self::top(Route::Register)
    }

    pub fn dashboard() -> Self {
        Self::top(Route::Dashboard)
    }

    pub fn sub_page(sub: SubRoute) -> Self {
        Self {
            route: Route::Dashboard,
            sub: Some(sub),
        }
    }
}
