//! Donation campaign handlers.
//!
//! ```text
//! POST /api/v1/donationCampaigns
//! GET /api/v1/donationCampaigns?email=ada%40example.com&name=rex
//! GET|PUT|DELETE /api/v1/donationCampaigns/{id}
//! ```

use actix_web::{delete, get, post, put, web};

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{CampaignFilters, Collection, Document};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{CampaignQuery, ListingParams};
use crate::inbound::http::records::{self, ListingAccess};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema, UpdateOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Open a donation campaign. A body without `email` is stamped with the caller.
#[utoipa::path(
    post,
    path = "/api/v1/donationCampaigns",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Campaign stored", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "createCampaign"
)]
#[post("/donationCampaigns")]
pub async fn create_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let identity = session.require_identity()?;
    records::create_owned(&state, &identity, Collection::DonationCampaigns, payload.into_inner())
        .await
        .map(web::Json)
}

/// List donation campaigns. Naming an owner `email` requires that owner's session.
#[utoipa::path(
    get,
    path = "/api/v1/donationCampaigns",
    params(CampaignQuery, ListingParams),
    responses(
        (status = 200, description = "Matching campaigns", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "listCampaigns",
    security([], ("SessionCookie" = []))
)]
#[get("/donationCampaigns")]
pub async fn list_campaigns(
    state: web::Data<HttpState>,
    session: SessionContext,
    filters: web::Query<CampaignQuery>,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let filters = CampaignFilters::from(filters.into_inner());
    records::list(
        &state,
        &session,
        Collection::DonationCampaigns,
        &filters,
        &listing.into_inner().into(),
        ListingAccess::Public,
    )
    .await
    .map(web::Json)
}

/// Fetch one campaign.
#[utoipa::path(
    get,
    path = "/api/v1/donationCampaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    responses(
        (status = 200, description = "Campaign", body = DocumentSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "getCampaign",
    security([])
)]
#[get("/donationCampaigns/{id}")]
pub async fn get_campaign(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    records::find(&state, Collection::DonationCampaigns, &path.into_inner())
        .await
        .map(web::Json)
}

/// Update a campaign, creating it when the identifier is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/donationCampaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "updateCampaign"
)]
#[put("/donationCampaigns/{id}")]
pub async fn update_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    records::update_owned(
        &state,
        &identity,
        Collection::DonationCampaigns,
        &path.into_inner(),
        payload.into_inner(),
    )
    .await
    .map(web::Json)
}

/// Close a campaign.
#[utoipa::path(
    delete,
    path = "/api/v1/donationCampaigns/{id}",
    params(("id" = String, Path, description = "Campaign identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "deleteCampaign"
)]
#[delete("/donationCampaigns/{id}")]
pub async fn delete_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    records::delete_owned(&state, &identity, Collection::DonationCampaigns, &path.into_inner())
        .await
        .map(web::Json)
}
