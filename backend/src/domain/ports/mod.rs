//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_repository;
mod login_service;
mod payment_gateway;

#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{
    DeleteOutcome, DocumentRepository, DocumentRepositoryError, InsertOutcome, Selector,
    UpdateOutcome,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    FixturePaymentGateway, PaymentGateway, PaymentGatewayError, PaymentIntent,
};
