//! [`DocumentRepository`] over a MongoDB database.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Document as BsonDocument, doc};
use mongodb::error::{Error as MongoError, ErrorKind};

use super::convert::{
    from_bson_document, id_to_string, listing_filter, selector_filter, sort_document,
    to_bson_document,
};
use crate::domain::ports::{
    DeleteOutcome, DocumentRepository, DocumentRepositoryError, InsertOutcome, Selector,
    UpdateOutcome,
};
use crate::domain::{Collection, Document, ListingQuery};

/// MongoDB-backed document repository.
#[derive(Clone, Debug)]
pub struct MongoDocumentRepository {
    database: Database,
}

impl MongoDocumentRepository {
    /// Wrap a connected database.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<BsonDocument> {
        self.database.collection::<BsonDocument>(collection.name())
    }
}

fn map_mongo_error(err: MongoError) -> DocumentRepositoryError {
    match *err.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
            DocumentRepositoryError::connection(err.to_string())
        }
        _ => DocumentRepositoryError::query(err.to_string()),
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, DocumentRepositoryError> {
        let document = to_bson_document(&document)?;
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(map_mongo_error)?;
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        })
    }

    async fn find(
        &self,
        collection: Collection,
        query: &ListingQuery,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let filter = listing_filter(query)?;
        let page = query.page();

        let handle = self.collection(collection);
        let mut action = handle.find(filter).skip(page.skip());
        if let Some(sort) = query.sort() {
            action = action.sort(sort_document(sort));
        }
        if let Some(limit) = page.limit() {
            action = action.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<BsonDocument> = action
            .await
            .map_err(map_mongo_error)?
            .try_collect()
            .await
            .map_err(map_mongo_error)?;
        Ok(documents.into_iter().map(from_bson_document).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let filter = selector_filter(selector)?;
        let found = self
            .collection(collection)
            .find_one(filter)
            .await
            .map_err(map_mongo_error)?;
        Ok(found.map(from_bson_document))
    }

    async fn update(
        &self,
        collection: Collection,
        selector: &Selector,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, DocumentRepositoryError> {
        let filter = selector_filter(selector)?;
        let changes = to_bson_document(&changes)?;
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": changes })
            .upsert(upsert)
            .await
            .map_err(map_mongo_error)?;
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(id_to_string),
        })
    }

    async fn delete(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<DeleteOutcome, DocumentRepositoryError> {
        let filter = selector_filter(selector)?;
        let result = self
            .collection(collection)
            .delete_one(filter)
            .await
            .map_err(map_mongo_error)?;
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
