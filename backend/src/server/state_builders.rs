//! Builders for the HTTP state from configured adapters and local fallbacks.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use backend::domain::ports::{DocumentRepository, FixturePaymentGateway, PaymentGateway};
use backend::domain::{DirectoryLoginService, UserService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryDocumentRepository;

use super::ServerConfig;

fn select_adapter<T: ?Sized>(
    configured: Option<Arc<T>>,
    fallback: impl FnOnce() -> Arc<T>,
    label: &str,
) -> Arc<T> {
    configured.unwrap_or_else(|| {
        warn!(adapter = label, "no adapter configured; using local fallback");
        fallback()
    })
}

/// Build the shared HTTP state. Login looks users up in the same store the
/// handlers write to.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let documents: Arc<dyn DocumentRepository> = select_adapter(
        config.documents.clone(),
        || Arc::new(InMemoryDocumentRepository::new()),
        "documents",
    );
    let payments: Arc<dyn PaymentGateway> = select_adapter(
        config.payments.clone(),
        || Arc::new(FixturePaymentGateway),
        "payments",
    );
    let login = Arc::new(DirectoryLoginService::new(UserService::new(
        documents.clone(),
    )));

    web::Data::new(HttpState::new(login, documents, payments))
}
