//! Driven port for document persistence.
//!
//! Every route performs exactly one call on this port. Adapters translate
//! [`ListingQuery`] and [`Selector`] into their own query language and report
//! results in the store-neutral outcome types below, which serialise to the
//! JSON shapes clients already consume.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{Collection, Document, DocumentId, Error, ListingQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "document store query failed: {message}",
    }
}

impl From<DocumentRepositoryError> for Error {
    fn from(err: DocumentRepositoryError) -> Self {
        match err {
            DocumentRepositoryError::Connection { message }
            | DocumentRepositoryError::Query { message } => Error::internal(message),
        }
    }
}

/// Addresses the single document an update or delete applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Match on the `_id` field.
    Id(DocumentId),
    /// Match on an arbitrary field value.
    Field {
        /// Document field name.
        field: String,
        /// Expected JSON value.
        value: Value,
    },
}

impl Selector {
    /// Select by a field value.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Field {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result of inserting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    /// Whether the store acknowledged the write.
    pub acknowledged: bool,
    /// Identifier assigned to the new document.
    pub inserted_id: String,
}

/// Result of updating (or upserting) one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Whether the store acknowledged the write.
    pub acknowledged: bool,
    /// Documents matched by the selector.
    pub matched_count: u64,
    /// Documents whose content changed.
    pub modified_count: u64,
    /// Identifier of the inserted document when the update upserted.
    pub upserted_id: Option<String>,
}

/// Result of deleting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// Whether the store acknowledged the write.
    pub acknowledged: bool,
    /// Documents removed; zero or one.
    pub deleted_count: u64,
}

/// Port for reading and writing schemaless documents.
///
/// Returned documents always carry `_id` as a string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a document, letting the store assign `_id`.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, DocumentRepositoryError>;

    /// Return the documents matching `query`, sorted and paged.
    async fn find(
        &self,
        collection: Collection,
        query: &ListingQuery,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    /// Return the first document matching `selector`.
    async fn find_one(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Apply `changes` as a field-level set on the selected document.
    ///
    /// With `upsert`, a document is created from the selector and the changes
    /// when nothing matches.
    async fn update(
        &self,
        collection: Collection,
        selector: &Selector,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, DocumentRepositoryError>;

    /// Delete the selected document.
    async fn delete(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<DeleteOutcome, DocumentRepositoryError>;
}
