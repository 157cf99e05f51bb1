//! Domain primitives, services and ports.
//!
//! Purpose: keep the marketplace rules (listing predicates, ownership checks,
//! user registration) independent of actix and of the document store.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Email: validated session identity.
//! - Collection, Document, DocumentId: store addressing primitives.
//! - ListingQuery: store-agnostic filter, sort and page description.
//! - RecordService, UserService, AccessPolicy: use-case services.

pub mod access;
pub mod auth;
pub mod collection;
pub mod document;
pub mod error;
pub mod filters;
pub mod listing;
pub mod login;
pub mod payments;
pub mod ports;
pub mod records;
pub mod trace_id;
pub mod users;

pub use self::access::AccessPolicy;
pub use self::auth::{Email, EmailValidationError, LoginCredentials};
pub use self::collection::Collection;
pub use self::document::{Document, DocumentId, DocumentIdError, ID_FIELD};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::filters::{
    AdoptionFilters, CampaignFilters, DonationFilters, NoFilters, PaymentFilters, PetFilters,
    RecordFilters,
};
pub use self::listing::{
    Condition, ListingError, ListingOptions, ListingQuery, SortDirection, SortSpec,
};
pub use self::login::DirectoryLoginService;
pub use self::payments::{Currency, PaymentIntentRequest, PaymentValidationError};
pub use self::records::RecordService;
pub use self::trace_id::TraceId;
pub use self::users::{ADMIN_ROLE, DEFAULT_ROLE, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
