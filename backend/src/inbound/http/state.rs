//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DocumentRepository, LoginService, PaymentGateway};
use crate::domain::{AccessPolicy, Collection, RecordService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resolves login requests to session identities.
    pub login: Arc<dyn LoginService>,
    /// Document store shared by every collection.
    pub documents: Arc<dyn DocumentRepository>,
    /// Card payment provider.
    pub payments: Arc<dyn PaymentGateway>,
}

impl HttpState {
    /// Construct state from its ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{FixtureLoginService, FixturePaymentGateway};
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryDocumentRepository;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureLoginService::accepting(["ada@example.com"])),
    ///     Arc::new(InMemoryDocumentRepository::new()),
    ///     Arc::new(FixturePaymentGateway),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        documents: Arc<dyn DocumentRepository>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            login,
            documents,
            payments,
        }
    }

    /// Record operations bound to `collection`.
    pub fn records(&self, collection: Collection) -> RecordService {
        RecordService::new(self.documents.clone(), collection)
    }

    /// User directory.
    pub fn users(&self) -> UserService {
        UserService::new(self.documents.clone())
    }

    /// Authorization checks backed by the user directory.
    pub fn access(&self) -> AccessPolicy {
        AccessPolicy::new(self.users())
    }
}
