//! Common chrome around gated screens: navigation and theme.

use medvault_auth::Role;
use medvault_routing::SubRoute;
use serde::{Deserialize, Serialize};

/// Color theme preference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// `None` returns to the role's dashboard.
    pub target: Option<SubRoute>,
}

impl NavItem {
    const fn new(label: &'static str, target: Option<SubRoute>) -> Self {
        Self { label, target }
    }
}

/// Sidebar items for a role.
///
/// Every target here must be permitted for the role by the routing table;
/// the guard would bounce anything else straight back to the dashboard.
pub fn nav_items(role: Role) -> Vec<NavItem> {
    match role {
        Role::Doctor => vec![
            NavItem::new("Dashboard", None),
            NavItem::new("Appointments", Some(SubRoute::Appointments)),
            NavItem::new("Patients", Some(SubRoute::Patients)),
            NavItem::new("Medical Records", Some(SubRoute::MedicalRecords)),
            NavItem::new("Reports", Some(SubRoute::Reports)),
            NavItem::new("Profile", Some(SubRoute::Settings)),
        ],
        Role::Patient => vec![
            NavItem::new("Home", None),
            NavItem::new("Book Appointment", Some(SubRoute::BookAppointment)),
            NavItem::new("Appointments", Some(SubRoute::Appointments)),
            NavItem::new("My Records", Some(SubRoute::MedicalRecords)),
            NavItem::new("Messages", Some(SubRoute::Chat)),
            NavItem::new("Profile", Some(SubRoute::Settings)),
        ],
        Role::Admin => vec![
            NavItem::new("Dashboard", None),
            NavItem::new("Settings", Some(SubRoute::Settings)),
        ],
    }
}

/// Chrome wrapped around a gated screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub title: String,
    pub items: Vec<NavItem>,
    pub theme: Theme,
}
