//! Pet listing handlers.
//!
//! ```text
//! POST /api/v1/pets
//! GET /api/v1/pets?category=Dog&name=re&sort=age&order=desc&page=1&limit=10
//! GET|PUT|DELETE /api/v1/pets/{id}
//! ```

use actix_web::{delete, get, post, put, web};

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{Collection, Document, PetFilters};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{ListingParams, PetQuery};
use crate::inbound::http::records::{self, ListingAccess};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema, UpdateOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Add a pet. A body without `email` is stamped with the caller.
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Pet stored", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "createPet"
)]
#[post("/pets")]
pub async fn create_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let identity = session.require_identity()?;
    records::create_owned(&state, &identity, Collection::Pets, payload.into_inner())
        .await
        .map(web::Json)
}

/// List pets. Naming an owner `email` requires that owner's session.
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    params(PetQuery, ListingParams),
    responses(
        (status = 200, description = "Matching pets", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "listPets",
    security([], ("SessionCookie" = []))
)]
#[get("/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    session: SessionContext,
    filters: web::Query<PetQuery>,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let filters = PetFilters::from(filters.into_inner());
    records::list(
        &state,
        &session,
        Collection::Pets,
        &filters,
        &listing.into_inner().into(),
        ListingAccess::Public,
    )
    .await
    .map(web::Json)
}

/// Fetch one pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet", body = DocumentSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "getPet",
    security([])
)]
#[get("/pets/{id}")]
pub async fn get_pet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    records::find(&state, Collection::Pets, &path.into_inner())
        .await
        .map(web::Json)
}

/// Update a pet, creating it when the identifier is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet identifier")),
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "updatePet"
)]
#[put("/pets/{id}")]
pub async fn update_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    records::update_owned(
        &state,
        &identity,
        Collection::Pets,
        &path.into_inner(),
        payload.into_inner(),
    )
    .await
    .map(web::Json)
}

/// Remove a pet.
#[utoipa::path(
    delete,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pets"],
    operation_id = "deletePet"
)]
#[delete("/pets/{id}")]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    records::delete_owned(&state, &identity, Collection::Pets, &path.into_inner())
        .await
        .map(web::Json)
}
