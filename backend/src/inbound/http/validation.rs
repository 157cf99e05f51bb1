//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{DocumentId, Email, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyId,
    InvalidEmail,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyId => "empty_id",
            ErrorCode::InvalidEmail => "invalid_email",
        }
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Parse the `{id}` path segment.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentId, Error> {
    parse_key("id", raw)
}

/// Parse an identifier named `field`, such as a path `{petId}`.
pub(crate) fn parse_key(field: &str, raw: &str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|err| field_error(field, err.to_string(), ErrorCode::EmptyId))
}

/// Parse an email supplied in a path or body.
pub(crate) fn parse_email(field: &str, raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| field_error(field, err.to_string(), ErrorCode::InvalidEmail))
}
