//! Donation handlers. Every route needs a session.

use actix_web::{delete, get, post, put, web};

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{Collection, Document, DonationFilters};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{DonationQuery, ListingParams};
use crate::inbound::http::records::{self, ListingAccess};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema, UpdateOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Record a donation.
#[utoipa::path(
    post,
    path = "/api/v1/donations",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Donation stored", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "createDonation"
)]
#[post("/donations")]
pub async fn create_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let identity = session.require_identity()?;
    records::create_owned(&state, &identity, Collection::Donations, payload.into_inner())
        .await
        .map(web::Json)
}

/// List donations. Non-admins must filter by their own `email`.
#[utoipa::path(
    get,
    path = "/api/v1/donations",
    params(DonationQuery, ListingParams),
    responses(
        (status = 200, description = "Matching donations", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonations"
)]
#[get("/donations")]
pub async fn list_donations(
    state: web::Data<HttpState>,
    session: SessionContext,
    filters: web::Query<DonationQuery>,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    records::list(
        &state,
        &session,
        Collection::Donations,
        &DonationFilters::from(filters.into_inner()),
        &listing.into_inner().into(),
        ListingAccess::Scoped,
    )
    .await
    .map(web::Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Donation", body = DocumentSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "getDonation"
)]
#[get("/donations/{id}")]
pub async fn get_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    session.require_identity()?;
    records::find(&state, Collection::Donations, &path.into_inner())
        .await
        .map(web::Json)
}

/// Amend a donation. Unknown identifiers match nothing.
#[utoipa::path(
    put,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "updateDonation"
)]
#[put("/donations/{id}")]
pub async fn update_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    records::update_owned(
        &state,
        &identity,
        Collection::Donations,
        &path.into_inner(),
        payload.into_inner(),
    )
    .await
    .map(web::Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "deleteDonation"
)]
#[delete("/donations/{id}")]
pub async fn delete_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    records::delete_owned(&state, &identity, Collection::Donations, &path.into_inner())
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::{ADMIN_ROLE, Collection, DEFAULT_ROLE};
    use crate::inbound::http::test_utils::{doc, login_cookie, memory_state, seed_user, test_app};
    use crate::outbound::memory::InMemoryDocumentRepository;

    const ADA: &str = "ada@example.com";
    const GRACE: &str = "grace@example.com";

    async fn seed_donations(store: &InMemoryDocumentRepository) {
        for (campaign, donor, amount) in [("c1", ADA, 10), ("c1", GRACE, 20), ("c2", ADA, 30)] {
            store
                .seed(
                    Collection::Donations,
                    doc(json!({ "campaignId": campaign, "email": donor, "amount": amount })),
                )
                .await;
        }
    }

    fn amounts(body: &Value) -> Vec<i64> {
        let mut amounts: Vec<i64> = body
            .as_array()
            .map(|items| items.iter().filter_map(|d| d["amount"].as_i64()).collect())
            .unwrap_or_default();
        amounts.sort_unstable();
        amounts
    }

    #[rstest]
    #[case(DEFAULT_ROLE, "/api/v1/donations", StatusCode::FORBIDDEN, Vec::new())]
    #[case(DEFAULT_ROLE, "/api/v1/donations?campaignId=c1", StatusCode::FORBIDDEN, Vec::new())]
    #[case(DEFAULT_ROLE, "/api/v1/donations?email=ada@example.com", StatusCode::OK, vec![10, 30])]
    #[case(
        DEFAULT_ROLE,
        "/api/v1/donations?campaignId=c1&email=ada@example.com",
        StatusCode::OK,
        vec![10]
    )]
    #[case(ADMIN_ROLE, "/api/v1/donations", StatusCode::OK, vec![10, 20, 30])]
    #[case(ADMIN_ROLE, "/api/v1/donations?campaignId=c1", StatusCode::OK, vec![10, 20])]
    #[actix_web::test]
    async fn listing_is_scoped_to_the_caller_unless_admin(
        #[case] ada_role: &str,
        #[case] uri: &str,
        #[case] expected: StatusCode,
        #[case] expected_amounts: Vec<i64>,
    ) {
        let (state, store) = memory_state();
        seed_user(&store, ADA, ada_role).await;
        seed_donations(&store).await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, ADA).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
        if expected == StatusCode::OK {
            let body: Value = actix_test::read_body_json(response).await;
            assert_eq!(amounts(&body), expected_amounts);
        }
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let (state, store) = memory_state();
        seed_donations(&store).await;
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/donations?campaignId=c1")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn update_of_unknown_donation_creates_nothing() {
        let (state, store) = memory_state();
        seed_user(&store, ADA, DEFAULT_ROLE).await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, ADA).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/donations/65f1c0ffee0ddba11ca7f00d")
                .cookie(cookie)
                .set_json(json!({ "amount": 25 }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let outcome: Value = actix_test::read_body_json(response).await;
        assert_eq!(outcome["matchedCount"], 0);
        assert!(outcome["upsertedId"].is_null());
        assert_eq!(store.count(Collection::Donations).await, 0);
    }
}
