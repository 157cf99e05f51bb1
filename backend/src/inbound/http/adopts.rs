//! Adoption request handlers.
//!
//! Requests are keyed by the pet they ask for: `PUT /adopts/{petId}` updates
//! the request for that pet, creating it when none exists yet.

use actix_web::{delete, get, post, put, web};
use serde_json::Value;

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{AdoptionFilters, Collection, Document, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{AdoptionQuery, ListingParams};
use crate::inbound::http::records::{self, ListingAccess};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema, UpdateOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_key;

const PET_FIELD: &str = "petId";

/// File an adoption request.
#[utoipa::path(
    post,
    path = "/api/v1/adopts",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Request stored", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["adopts"],
    operation_id = "createAdoption"
)]
#[post("/adopts")]
pub async fn create_adoption(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let identity = session.require_identity()?;
    records::create_owned(&state, &identity, Collection::Adopts, payload.into_inner())
        .await
        .map(web::Json)
}

/// List adoption requests. Requesters filter by `email`, pet owners by
/// `ownerEmail`; unfiltered listings are admin-only.
#[utoipa::path(
    get,
    path = "/api/v1/adopts",
    params(AdoptionQuery, ListingParams),
    responses(
        (status = 200, description = "Matching requests", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["adopts"],
    operation_id = "listAdoptions"
)]
#[get("/adopts")]
pub async fn list_adoptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    filters: web::Query<AdoptionQuery>,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    records::list(
        &state,
        &session,
        Collection::Adopts,
        &AdoptionFilters::from(filters.into_inner()),
        &listing.into_inner().into(),
        ListingAccess::Scoped,
    )
    .await
    .map(web::Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/adopts/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Adoption request", body = DocumentSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["adopts"],
    operation_id = "getAdoption"
)]
#[get("/adopts/{id}")]
pub async fn get_adoption(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    session.require_identity()?;
    records::find(&state, Collection::Adopts, &path.into_inner())
        .await
        .map(web::Json)
}

/// Upsert the adoption request for a pet.
#[utoipa::path(
    put,
    path = "/api/v1/adopts/{petId}",
    params(("petId" = String, Path, description = "Requested pet identifier")),
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["adopts"],
    operation_id = "upsertAdoption"
)]
#[put("/adopts/{petId}")]
pub async fn upsert_adoption(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    let pet_id = parse_key(PET_FIELD, &path.into_inner())?;
    let mut changes = payload.into_inner();
    match changes.get(PET_FIELD) {
        None => {}
        Some(Value::String(named)) if named == pet_id.as_str() => {}
        Some(_) => {
            return Err(Error::invalid_request("petId in body must match the path"));
        }
    }

    let records = state.records(Collection::Adopts);
    let access = state.access();
    let existing = records.find_by(PET_FIELD, pet_id.as_str()).await?;
    access.ensure_owner(&identity, existing.as_ref()).await?;
    changes = match existing {
        Some(_) => {
            access.ensure_owner_change(&identity, &changes).await?;
            changes
        }
        None => access.claim(&identity, changes).await?,
    };
    records
        .upsert_by(PET_FIELD, pet_id.as_str(), changes)
        .await
        .map(web::Json)
}

/// Withdraw an adoption request.
#[utoipa::path(
    delete,
    path = "/api/v1/adopts/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["adopts"],
    operation_id = "deleteAdoption"
)]
#[delete("/adopts/{id}")]
pub async fn delete_adoption(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    records::delete_owned(&state, &identity, Collection::Adopts, &path.into_inner())
        .await
        .map(web::Json)
}
