//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "pet 65f1c0ffee0ddba11ca7f00d not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Document`]: a free-form JSON object
/// whose `_id` is always a string.
#[derive(ToSchema)]
#[schema(
    as = crate::domain::Document,
    example = json!({
        "_id": "65f1c0ffee0ddba11ca7f00d",
        "name": "Rex",
        "category": "Dog",
        "age": 3,
        "adopted": false,
        "email": "ada@example.com"
    })
)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DocumentSchema {
    /// Store identifier.
    #[schema(rename = "_id")]
    id: String,
}

/// OpenAPI schema for [`crate::domain::ports::InsertOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::InsertOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct InsertOutcomeSchema {
    /// Whether the store acknowledged the write.
    acknowledged: bool,
    /// Identifier assigned to the new document.
    #[schema(example = "65f1c0ffee0ddba11ca7f00d")]
    inserted_id: String,
}

/// OpenAPI schema for [`crate::domain::ports::UpdateOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::UpdateOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateOutcomeSchema {
    /// Whether the store acknowledged the write.
    acknowledged: bool,
    /// Documents matched by the selector.
    matched_count: u64,
    /// Documents whose values changed.
    modified_count: u64,
    /// Identifier of a document created by an upsert.
    upserted_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ports::DeleteOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::DeleteOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteOutcomeSchema {
    /// Whether the store acknowledged the write.
    acknowledged: bool,
    /// Documents removed.
    deleted_count: u64,
}
