//! Payment record and payment intent handlers.
//!
//! ```text
//! POST /api/v1/create-payment-intent {"price":12.5}
//! POST /api/v1/payments
//! GET /api/v1/payments?email=ada%40example.com
//! GET|DELETE /api/v1/payments/{id}
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{DeleteOutcome, InsertOutcome};
use crate::domain::{
    Collection, Document, Error, PaymentFilters, PaymentIntentRequest, PaymentValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{ListingParams, PaymentQuery};
use crate::inbound::http::records::{self, ListingAccess};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// Body of `POST /api/v1/create-payment-intent`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PaymentIntentBody {
    /// Amount in major units, for example `12.5` for 12.50.
    #[schema(example = 12.5)]
    pub price: f64,
    /// Three-letter ISO currency code. Defaults to `usd`.
    #[schema(example = "usd")]
    pub currency: Option<String>,
}

/// Secret handed to the browser to confirm the card payment.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    /// Provider client secret.
    pub client_secret: String,
}

fn map_payment_validation_error(err: &PaymentValidationError) -> Error {
    let field = match err {
        PaymentValidationError::InvalidCurrency { .. } => "currency",
        _ => "price",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create a card payment intent with the payment provider.
#[utoipa::path(
    post,
    path = "/api/v1/create-payment-intent",
    request_body = PaymentIntentBody,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Payment provider unavailable", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPaymentIntent"
)]
#[post("/create-payment-intent")]
pub async fn create_payment_intent(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PaymentIntentBody>,
) -> ApiResult<web::Json<PaymentIntentResponse>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let request = PaymentIntentRequest::from_price(body.price, body.currency.as_deref())
        .map_err(|err| map_payment_validation_error(&err))?;
    let intent = state
        .payments
        .create_intent(&request)
        .await
        .map_err(Error::from)?;
    info!(
        identity = %identity,
        amount = request.amount_minor(),
        currency = %request.currency(),
        "payment intent created"
    );
    Ok(web::Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Store a completed payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Payment stored", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let identity = session.require_identity()?;
    records::create_owned(&state, &identity, Collection::Payments, payload.into_inner())
        .await
        .map(web::Json)
}

/// List payments. Non-admins must filter by their own `email`.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(PaymentQuery, ListingParams),
    responses(
        (status = 200, description = "Matching payments", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    session: SessionContext,
    filters: web::Query<PaymentQuery>,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    records::list(
        &state,
        &session,
        Collection::Payments,
        &PaymentFilters::from(filters.into_inner()),
        &listing.into_inner().into(),
        ListingAccess::Scoped,
    )
    .await
    .map(web::Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment", body = DocumentSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{id}")]
pub async fn get_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    session.require_identity()?;
    records::find(&state, Collection::Payments, &path.into_inner())
        .await
        .map(web::Json)
}

/// Delete a payment record. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "deletePayment"
)]
#[delete("/payments/{id}")]
pub async fn delete_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    let id = parse_document_id(&path.into_inner())?;
    state.access().require_admin(&identity).await?;
    let outcome = state.records(Collection::Payments).delete(&id).await?;
    info!(payment_id = %id, deleted_by = %identity, "payment record deleted");
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockPaymentGateway, PaymentGatewayError, PaymentIntent};
    use crate::domain::{ADMIN_ROLE, DEFAULT_ROLE};
    use crate::inbound::http::test_utils::{login_cookie, memory_state, seed_user, test_app};

    const ADA: &str = "ada@example.com";

    async fn intent(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, ADA).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/create-payment-intent")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[actix_web::test]
    async fn intent_amount_is_in_minor_units() {
        let (state, store) = memory_state();
        seed_user(&store, ADA, DEFAULT_ROLE).await;

        let (status, body) = intent(state, json!({ "price": 19.99, "currency": "EUR" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "clientSecret": "pi_fixture_1999_eur_secret" }));
    }

    #[rstest]
    #[case(json!({ "price": 0 }), "price")]
    #[case(json!({ "price": 10, "currency": "euro" }), "currency")]
    #[actix_web::test]
    async fn invalid_prices_are_rejected(#[case] body: Value, #[case] field: &str) {
        let (state, store) = memory_state();
        seed_user(&store, ADA, DEFAULT_ROLE).await;

        let (status, body) = intent(state, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[case(PaymentGatewayError::timeout("10s elapsed"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(PaymentGatewayError::rejected("amount too small"), StatusCode::BAD_REQUEST)]
    #[case(PaymentGatewayError::transport("reset"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[actix_web::test]
    async fn provider_failures_map_to_statuses(
        #[case] failure: PaymentGatewayError,
        #[case] expected: StatusCode,
    ) {
        let (state, store) = memory_state();
        seed_user(&store, ADA, DEFAULT_ROLE).await;
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_intent()
            .times(1)
            .return_once(move |_| Err::<PaymentIntent, _>(failure));
        let state = HttpState::new(state.login, state.documents, Arc::new(gateway));

        let (status, _) = intent(state, json!({ "price": 5 })).await;

        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn intent_requires_a_session() {
        let (state, _) = memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/create-payment-intent")
                .set_json(json!({ "price": 5 }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(DEFAULT_ROLE, StatusCode::FORBIDDEN)]
    #[case(ADMIN_ROLE, StatusCode::OK)]
    #[actix_web::test]
    async fn deleting_payments_is_admin_only(#[case] role: &str, #[case] expected: StatusCode) {
        let (state, store) = memory_state();
        seed_user(&store, ADA, role).await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, ADA).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/payments")
                .cookie(cookie.clone())
                .set_json(json!({ "price": 5, "transactionId": "pi_1" }))
                .to_request(),
        )
        .await;
        let outcome: Value = actix_test::read_body_json(created).await;
        let id = outcome["insertedId"].as_str().expect("inserted id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/payments/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
    }
}
