//! Driving port for login use-cases.
//!
//! Inbound adapters call it to resolve a session identity without knowing
//! how users are stored, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Email, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve credentials to the identity stored in the session.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Email, Error>;
}

/// Authenticator accepting a fixed set of emails.
///
/// Used by handler tests that do not exercise the user directory.
#[derive(Debug, Default, Clone)]
pub struct FixtureLoginService {
    known: Vec<String>,
}

impl FixtureLoginService {
    /// Accept exactly the given emails.
    pub fn accepting<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: emails.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Email, Error> {
        let email = credentials.email();
        if self.known.iter().any(|known| email.matches(known)) {
            Ok(email.clone())
        } else {
            Err(Error::unauthorized("unknown user"))
        }
    }
}
