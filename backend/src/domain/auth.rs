//! Authentication primitives: the session identity and login payload.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

/// Domain error returned when an email value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Email has no `@` separator.
    #[error("email must contain '@'")]
    MissingAt,
}

/// Email address used as the session identity and ownership key.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - Contains an `@`.
///
/// Comparison is exact; the store keeps emails as submitted.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::new("  ada@example.com ").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(email.matches("ada@example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise a raw email string.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !trimmed.contains('@') {
            return Err(EmailValidationError::MissingAt);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a caller-named email refers to this identity.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other.trim()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Validated login payload.
///
/// Users are looked up by email only; the marketplace delegates password
/// handling to the client-side identity provider.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_email("ada@example.com").unwrap();
/// assert_eq!(creds.email().as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
}

impl LoginCredentials {
    /// Construct credentials from the raw email field.
    pub fn try_from_email(email: &str) -> Result<Self, EmailValidationError> {
        Ok(Self {
            email: Email::new(email)?,
        })
    }

    /// Email used for the user lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("ada.example.com", EmailValidationError::MissingAt)]
    fn invalid_emails(#[case] raw: &str, #[case] expected: EmailValidationError) {
        let err = Email::new(raw).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ")]
    #[case("grace@navy.mil")]
    fn valid_emails_are_trimmed(#[case] raw: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_str(), raw.trim());
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case(" ada@example.com ", true)]
    #[case("ADA@example.com", false)]
    #[case("bob@example.com", false)]
    fn matches_compares_trimmed_values(#[case] other: &str, #[case] expected: bool) {
        let email = Email::new("ada@example.com").expect("valid email");
        assert_eq!(email.matches(other), expected);
    }

    #[test]
    fn login_credentials_reject_blank_email() {
        let err = LoginCredentials::try_from_email(" ").expect_err("blank email");
        assert_eq!(err, EmailValidationError::Empty);
    }
}
