//! Email address value object.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated, normalized email address.
///
/// Normalization: surrounding whitespace stripped, lowercased. The shape
/// check is intentionally shallow (the backend owns real verification); it
/// only rejects input that cannot possibly be an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("email address cannot be empty"));
        }

        // Must have a non-empty local part and domain around an '@'.
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::validation("invalid email format"));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = EmailAddress::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn parse_rejects_missing_at_sign() {
        assert!(EmailAddress::parse("alice.example.com").is_err());
    }

    #[test]
    fn parse_rejects_empty_local_or_domain() {
        assert!(EmailAddress::parse("@example.com").is_err());
        assert!(EmailAddress::parse("alice@").is_err());
        assert!(EmailAddress::parse("   ").is_err());
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let ok: Result<EmailAddress, _> = serde_json::from_str(r#""bob@clinic.org""#);
        assert_eq!(ok.unwrap().as_str(), "bob@clinic.org");

        let bad: Result<EmailAddress, _> = serde_json::from_str(r#""not-an-email""#);
        assert!(bad.is_err());
    }
}
