//! In-process document repository.
//!
//! Evaluates [`ListingQuery`] directly over JSON documents. Debug builds use
//! it when no `MONGODB_URI` is configured, and the HTTP tests run against it.
//!
//! Sorting follows the document-store convention of ordering values by type
//! first (missing and null, numbers, strings, objects, arrays, booleans),
//! then by value; ties keep insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{
    DeleteOutcome, DocumentRepository, DocumentRepositoryError, InsertOutcome, Selector,
    UpdateOutcome,
};
use crate::domain::{Collection, Document, ID_FIELD, ListingQuery, SortDirection};

/// Document repository held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `document` verbatim, assigning an `_id` only when it has none.
    ///
    /// Returns the document's identifier.
    pub async fn seed(&self, collection: Collection, mut document: Document) -> String {
        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            _ => new_id(),
        };
        document.insert(ID_FIELD.to_owned(), Value::String(id.clone()));
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(document);
        id
    }

    /// Number of documents currently stored in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn selector_matches(selector: &Selector, document: &Document) -> bool {
    match selector {
        Selector::Id(id) => document.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()),
        Selector::Field { field, value } => document.get(field) == Some(value),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn apply_changes(document: &mut Document, changes: Document) -> bool {
    let mut modified = false;
    for (field, value) in changes {
        if document.get(&field) != Some(&value) {
            document.insert(field, value);
            modified = true;
        }
    }
    modified
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOutcome, DocumentRepositoryError> {
        let id = new_id();
        document.insert(ID_FIELD.to_owned(), Value::String(id.clone()));
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(document);
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn find(
        &self,
        collection: Collection,
        query: &ListingQuery,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let guard = self.collections.read().await;
        let mut matches: Vec<Document> = guard
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|document| query.matches(document))
            .cloned()
            .collect();
        drop(guard);

        if let Some(sort) = query.sort() {
            let field = sort.field();
            matches.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                match sort.direction() {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let page = query.page();
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = page
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matches.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .and_then(|documents| {
                documents
                    .iter()
                    .find(|document| selector_matches(selector, document))
                    .cloned()
            }))
    }

    async fn update(
        &self,
        collection: Collection,
        selector: &Selector,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, DocumentRepositoryError> {
        let mut guard = self.collections.write().await;
        let documents = guard.entry(collection).or_default();

        if let Some(existing) = documents
            .iter_mut()
            .find(|document| selector_matches(selector, document))
        {
            let modified = apply_changes(existing, changes);
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        }

        let mut document = Document::new();
        match selector {
            Selector::Id(id) => {
                document.insert(ID_FIELD.to_owned(), Value::String(id.as_str().to_owned()));
            }
            Selector::Field { field, value } => {
                document.insert(ID_FIELD.to_owned(), Value::String(new_id()));
                document.insert(field.clone(), value.clone());
            }
        }
        apply_changes(&mut document, changes);
        let id = document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(str::to_owned);
        documents.push(document);

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: id,
        })
    }

    async fn delete(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<DeleteOutcome, DocumentRepositoryError> {
        let mut guard = self.collections.write().await;
        let deleted = guard.get_mut(&collection).is_some_and(|documents| {
            documents
                .iter()
                .position(|document| selector_matches(selector, document))
                .map(|index| documents.remove(index))
                .is_some()
        });
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: u64::from(deleted),
        })
    }
}
