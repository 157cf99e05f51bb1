//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the session
//! identity (the caller's email).

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Email, Error};

pub(crate) const IDENTITY_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie is never reused.
    pub fn persist_identity(&self, email: &Email) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, email.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// Malformed values are treated as absent.
    pub fn identity(&self) -> Result<Option<Email>, Error> {
        let raw = match self.0.get::<String>(IDENTITY_KEY) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "unreadable identity in session cookie");
                return Ok(None);
            }
        };
        match raw.map(Email::new).transpose() {
            Ok(email) => Ok(email),
            Err(error) => {
                warn!(%error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Email, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("unauthorized access"))
    }

    /// Drop the session so the client's cookie is cleared.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
