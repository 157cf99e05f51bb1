//! JSON and BSON translation for the MongoDB adapter.
//!
//! Documents cross the port boundary as JSON objects. Incoming values are
//! serialised to BSON as-is; outgoing documents are rendered as relaxed
//! extended JSON with `_id` flattened to a string.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document as BsonDocument, doc};
use serde_json::Value;

use crate::domain::ports::{DocumentRepositoryError, Selector};
use crate::domain::{Condition, Document, DocumentId, ID_FIELD, ListingQuery, SortSpec};

/// Serialise a JSON object into a BSON document.
pub(super) fn to_bson_document(
    document: &Document,
) -> Result<BsonDocument, DocumentRepositoryError> {
    bson::to_document(document)
        .map_err(|err| DocumentRepositoryError::query(format!("invalid document: {err}")))
}

fn to_bson_value(value: &Value) -> Result<Bson, DocumentRepositoryError> {
    bson::to_bson(value)
        .map_err(|err| DocumentRepositoryError::query(format!("invalid filter value: {err}")))
}

/// Render a stored document as JSON with a string `_id`.
pub(super) fn from_bson_document(mut document: BsonDocument) -> Document {
    if let Some(id) = document.get(ID_FIELD).map(id_to_string) {
        document.insert(ID_FIELD, id);
    }
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// String form of a store-assigned identifier.
pub(super) fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(text) => text.clone(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

/// Filter matching `_id`: an ObjectId when the identifier has that shape,
/// otherwise the raw string.
pub(super) fn id_filter(id: &DocumentId) -> BsonDocument {
    if id.looks_like_object_id() {
        if let Ok(oid) = ObjectId::parse_str(id.as_str()) {
            return doc! { ID_FIELD: oid };
        }
    }
    doc! { ID_FIELD: id.as_str() }
}

/// Filter for a single-document selector.
pub(super) fn selector_filter(
    selector: &Selector,
) -> Result<BsonDocument, DocumentRepositoryError> {
    match selector {
        Selector::Id(id) => Ok(id_filter(id)),
        Selector::Field { field, value } => {
            let mut filter = BsonDocument::new();
            filter.insert(field.as_str(), to_bson_value(value)?);
            Ok(filter)
        }
    }
}

/// Filter document for a listing query.
///
/// Conditions on distinct fields merge into one document; repeated fields
/// fall back to `$and`.
pub(super) fn listing_filter(
    query: &ListingQuery,
) -> Result<BsonDocument, DocumentRepositoryError> {
    let clauses = query
        .conditions()
        .iter()
        .map(condition_clause)
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = BsonDocument::new();
    let mut repeated = false;
    for clause in &clauses {
        for (field, value) in clause {
            if merged.contains_key(field) {
                repeated = true;
            } else {
                merged.insert(field.clone(), value.clone());
            }
        }
    }
    if repeated {
        Ok(doc! { "$and": clauses })
    } else {
        Ok(merged)
    }
}

fn condition_clause(condition: &Condition) -> Result<BsonDocument, DocumentRepositoryError> {
    let mut clause = BsonDocument::new();
    match condition {
        Condition::Equals { field, value } => {
            clause.insert(field.as_str(), to_bson_value(value)?);
        }
        Condition::ContainsIgnoreCase { field, needle } => {
            clause.insert(
                field.as_str(),
                doc! { "$regex": regex::escape(needle), "$options": "i" },
            );
        }
    }
    Ok(clause)
}

/// Sort document for a single-field sort.
pub(super) fn sort_document(sort: &SortSpec) -> BsonDocument {
    let mut document = BsonDocument::new();
    document.insert(sort.field(), sort.direction().as_i32());
    document
}
