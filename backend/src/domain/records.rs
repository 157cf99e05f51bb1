//! Single-collection record operations.
//!
//! [`RecordService`] binds a [`DocumentRepository`] to one [`Collection`]
//! and applies the rules every route shares: client `_id` values are
//! discarded, missing documents are `404`, and updates follow the
//! collection's upsert policy.

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use super::document::without_id;
use super::ports::{
    DeleteOutcome, DocumentRepository, DocumentRepositoryError, InsertOutcome, Selector,
    UpdateOutcome,
};
use super::{Collection, Document, DocumentId, Error, ListingQuery};

/// CRUD operations over one collection.
#[derive(Clone)]
pub struct RecordService {
    repository: Arc<dyn DocumentRepository>,
    collection: Collection,
}

impl RecordService {
    /// Bind `repository` to `collection`.
    pub fn new(repository: Arc<dyn DocumentRepository>, collection: Collection) -> Self {
        Self {
            repository,
            collection,
        }
    }

    /// Collection this service operates on.
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Insert a new document.
    pub async fn create(&self, document: Document) -> Result<InsertOutcome, Error> {
        self.repository
            .insert(self.collection, without_id(document))
            .await
            .map_err(|err| self.store_error("insert", err))
    }

    /// Documents matching `query`.
    pub async fn list(&self, query: &ListingQuery) -> Result<Vec<Document>, Error> {
        self.repository
            .find(self.collection, query)
            .await
            .map_err(|err| self.store_error("find", err))
    }

    /// Document with the given identifier, or `404`.
    pub async fn find(&self, id: &DocumentId) -> Result<Document, Error> {
        self.find_optional(id).await?.ok_or_else(|| {
            Error::not_found(format!("{} {id} not found", self.collection.noun()))
        })
    }

    /// Document with the given identifier, if any.
    pub async fn find_optional(&self, id: &DocumentId) -> Result<Option<Document>, Error> {
        self.find_one(&Selector::Id(id.clone())).await
    }

    /// First document whose `field` equals `value`.
    pub async fn find_by(
        &self,
        field: &str,
        value: impl Into<Value> + Send,
    ) -> Result<Option<Document>, Error> {
        self.find_one(&Selector::field(field, value)).await
    }

    /// Update the identified document using the collection's upsert policy.
    pub async fn update(&self, id: &DocumentId, changes: Document) -> Result<UpdateOutcome, Error> {
        self.update_where(
            &Selector::Id(id.clone()),
            changes,
            self.collection.upserts_on_update(),
        )
        .await
    }

    /// Update the document whose `field` equals `value`, inserting one when
    /// nothing matches.
    pub async fn upsert_by(
        &self,
        field: &str,
        value: impl Into<Value> + Send,
        changes: Document,
    ) -> Result<UpdateOutcome, Error> {
        self.update_where(&Selector::field(field, value), changes, true)
            .await
    }

    /// Update the identified document without ever inserting.
    pub async fn update_existing(
        &self,
        id: &DocumentId,
        changes: Document,
    ) -> Result<UpdateOutcome, Error> {
        self.update_where(&Selector::Id(id.clone()), changes, false)
            .await
    }

    /// Delete the identified document.
    pub async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, Error> {
        self.repository
            .delete(self.collection, &Selector::Id(id.clone()))
            .await
            .map_err(|err| self.store_error("delete", err))
    }

    async fn find_one(&self, selector: &Selector) -> Result<Option<Document>, Error> {
        self.repository
            .find_one(self.collection, selector)
            .await
            .map_err(|err| self.store_error("find_one", err))
    }

    async fn update_where(
        &self,
        selector: &Selector,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, Error> {
        let changes = without_id(changes);
        if changes.is_empty() {
            return Err(Error::invalid_request("update body must contain at least one field"));
        }
        self.repository
            .update(self.collection, selector, changes, upsert)
            .await
            .map_err(|err| self.store_error("update", err))
    }

    fn store_error(&self, operation: &'static str, err: DocumentRepositoryError) -> Error {
        error!(
            collection = %self.collection,
            operation,
            error = %err,
            "document store operation failed"
        );
        Error::from(err)
    }
}
