//! Route helpers shared by the record collections.
//!
//! Each helper performs one store operation behind the matching access
//! check, so the per-collection handler modules only declare routes.

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{
    Collection, Document, Email, ListingOptions, ListingQuery, RecordFilters,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// Who may list a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListingAccess {
    /// Anyone; naming an email requires the matching session.
    Public,
    /// A session naming itself; unfiltered listings are admin-only.
    Scoped,
}

/// Filter, sort and page `collection`.
pub(crate) async fn list(
    state: &HttpState,
    session: &SessionContext,
    collection: Collection,
    filters: &impl RecordFilters,
    options: &ListingOptions,
    access: ListingAccess,
) -> ApiResult<Vec<Document>> {
    let query = ListingQuery::build(filters, options)?;
    let named = filters.named_emails();
    match access {
        ListingAccess::Public if named.is_empty() => {}
        ListingAccess::Public => {
            let identity = session.require_identity()?;
            state.access().ensure_named(&identity, &named).await?;
        }
        ListingAccess::Scoped => {
            let identity = session.require_identity()?;
            state
                .access()
                .ensure_scoped_listing(&identity, &named)
                .await?;
        }
    }
    state.records(collection).list(&query).await
}

/// Insert `body`, stamping or checking its owner against `identity`.
pub(crate) async fn create_owned(
    state: &HttpState,
    identity: &Email,
    collection: Collection,
    body: Document,
) -> ApiResult<InsertOutcome> {
    let document = state.access().claim(identity, body).await?;
    state.records(collection).create(document).await
}

/// Fetch one document by its raw path identifier.
pub(crate) async fn find(
    state: &HttpState,
    collection: Collection,
    raw_id: &str,
) -> ApiResult<Document> {
    let id = parse_document_id(raw_id)?;
    state.records(collection).find(&id).await
}

/// Update a document the identity owns, following the collection's upsert
/// policy. A document created by the upsert is claimed like an insert.
pub(crate) async fn update_owned(
    state: &HttpState,
    identity: &Email,
    collection: Collection,
    raw_id: &str,
    changes: Document,
) -> ApiResult<UpdateOutcome> {
    let id = parse_document_id(raw_id)?;
    let records = state.records(collection);
    let access = state.access();

    let existing = records.find_optional(&id).await?;
    access.ensure_owner(identity, existing.as_ref()).await?;
    let changes = match existing {
        Some(_) => {
            access.ensure_owner_change(identity, &changes).await?;
            changes
        }
        None if collection.upserts_on_update() => access.claim(identity, changes).await?,
        None => changes,
    };
    records.update(&id, changes).await
}

/// Delete a document the identity owns.
pub(crate) async fn delete_owned(
    state: &HttpState,
    identity: &Email,
    collection: Collection,
    raw_id: &str,
) -> ApiResult<DeleteOutcome> {
    let id = parse_document_id(raw_id)?;
    let records = state.records(collection);
    let existing = records.find_optional(&id).await?;
    state
        .access()
        .ensure_owner(identity, existing.as_ref())
        .await?;
    records.delete(&id).await
}
