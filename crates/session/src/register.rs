//! Role-tagged registration requests.

use chrono::NaiveDate;
use medvault_auth::Role;
use medvault_core::EmailAddress;
use serde::Serialize;

use crate::error::{AuthError, AuthResult};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Fields shared by every registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Patient registration: emergency contact and blood group are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRegistration {
    pub account: AccountDetails,
    pub emergency_contact: String,
    pub blood_group: String,
}

/// Doctor registration: specialization and license number are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorRegistration {
    pub account: AccountDetails,
    pub specialization: String,
    pub license_number: String,
}

/// A registration request, tagged by role.
///
/// The variant carries exactly the extra fields its role requires, so an
/// under-specified payload is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterRequest {
    Patient(PatientRegistration),
    Doctor(DoctorRegistration),
}

impl RegisterRequest {
    pub fn role(&self) -> Role {
        match self {
            RegisterRequest::Patient(_) => Role::Patient,
            RegisterRequest::Doctor(_) => Role::Doctor,
        }
    }

    fn account(&self) -> &AccountDetails {
        match self {
            RegisterRequest::Patient(p) => &p.account,
            RegisterRequest::Doctor(d) => &d.account,
        }
    }

    /// Local validation, run before anything goes on the wire.
    pub fn validate(&self) -> AuthResult<()> {
        let account = self.account();

        if account.name.trim().is_empty()
            || account.email.trim().is_empty()
            || account.password.is_empty()
        {
            return Err(AuthError::invalid("Please fill in all required fields"));
        }

        if EmailAddress::parse(&account.email).is_err() {
            return Err(AuthError::invalid("Please enter a valid email address"));
        }

        if account.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::invalid(
                "Password must be at least 6 characters long",
            ));
        }

        match self {
            RegisterRequest::Doctor(d) => {
                if d.specialization.trim().is_empty() || d.license_number.trim().is_empty() {
                    return Err(AuthError::invalid(
                        "Please fill in specialization and license number for doctors",
                    ));
                }
            }
            RegisterRequest::Patient(p) => {
                if p.emergency_contact.trim().is_empty() || p.blood_group.trim().is_empty() {
                    return Err(AuthError::invalid(
                        "Please fill in emergency contact and blood group for patients",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Flatten into the wire shape the backend expects.
    pub fn to_payload(&self) -> RegisterPayload {
        let account = self.account().clone();
        let mut payload = RegisterPayload {
            name: account.name,
            email: account.email,
            password: account.password,
            role: self.role(),
            phone: account.phone,
            address: account.address,
            date_of_birth: account.date_of_birth,
            specialization: None,
            license_number: None,
            emergency_contact: None,
            blood_group: None,
        };

        match self {
            RegisterRequest::Doctor(d) => {
                payload.specialization = Some(d.specialization.clone());
                payload.license_number = Some(d.license_number.clone());
            }
            RegisterRequest::Patient(p) => {
                payload.emergency_contact = Some(p.emergency_contact.clone());
                payload.blood_group = Some(p.blood_group.clone());
            }
        }

        payload
    }
}

/// Wire shape of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
}
