//! Free-form documents and their identifiers.
//!
//! The marketplace stores schemaless JSON objects. Only a handful of fields
//! carry meaning for the server (`_id`, `email`, `role`, `petId`); everything
//! else is passed through untouched.

use std::fmt;

use serde_json::{Map, Value};

/// A JSON object as stored in a collection.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Errors raised when parsing a path identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentIdError {
    /// Identifier was blank once trimmed.
    #[error("document identifier must not be empty")]
    Empty,
}

/// Identifier of a stored document as supplied in a request path.
///
/// Adapters decide how to match it: the MongoDB adapter treats 24 hex digits
/// as an ObjectId and anything else as a string `_id`.
///
/// # Examples
/// ```
/// use backend::domain::DocumentId;
///
/// let id = DocumentId::new("64b7f0c2a1b2c3d4e5f60718").unwrap();
/// assert!(id.looks_like_object_id());
/// assert!(!DocumentId::new("pet-1").unwrap().looks_like_object_id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate a raw identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DocumentIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True when the identifier has the shape of a 12-byte ObjectId.
    pub fn looks_like_object_id(&self) -> bool {
        self.0.len() == 24 && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remove any client-supplied `_id` so the store stays authoritative.
pub fn without_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document
}

/// Read a string field, ignoring other JSON types.
pub fn string_field<'a>(document: &'a Document, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}
