//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use backend::domain::ports::{DocumentRepository, PaymentGateway};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) documents: Option<Arc<dyn DocumentRepository>>,
    pub(crate) payments: Option<Arc<dyn PaymentGateway>>,
}

impl ServerConfig {
    /// Construct a server configuration from the session cookie settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            allowed_origins: Vec::new(),
            documents: None,
            payments: None,
        }
    }

    /// Attach the document store. Without one the in-memory store is used.
    #[must_use]
    pub fn with_documents(mut self, documents: Arc<dyn DocumentRepository>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Attach the payment provider. Without one the fixture gateway is used.
    #[must_use]
    pub fn with_payments(mut self, payments: Arc<dyn PaymentGateway>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Origins allowed to call the API with credentials.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
