//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1` together with the
//! probes, the schema wrappers from [`crate::inbound::http::schemas`] and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! the `openapi-dump` binary prints it.

use crate::inbound::http::health::WelcomeResponse;
use crate::inbound::http::payments::{PaymentIntentBody, PaymentIntentResponse};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorCodeSchema, ErrorSchema, InsertOutcomeSchema,
    UpdateOutcomeSchema,
};
use crate::inbound::http::users::{
    AdminStatusResponse, LoginRequest, LoginResponse, LogoutResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PetMatch backend API",
        description = "Pet listings, adoption requests, donation campaigns and payments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::health::welcome,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::admin_status,
        crate::inbound::http::users::make_admin,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::pets::create_pet,
        crate::inbound::http::pets::list_pets,
        crate::inbound::http::pets::get_pet,
        crate::inbound::http::pets::update_pet,
        crate::inbound::http::pets::delete_pet,
        crate::inbound::http::adopts::create_adoption,
        crate::inbound::http::adopts::list_adoptions,
        crate::inbound::http::adopts::get_adoption,
        crate::inbound::http::adopts::upsert_adoption,
        crate::inbound::http::adopts::delete_adoption,
        crate::inbound::http::campaigns::create_campaign,
        crate::inbound::http::campaigns::list_campaigns,
        crate::inbound::http::campaigns::get_campaign,
        crate::inbound::http::campaigns::update_campaign,
        crate::inbound::http::campaigns::delete_campaign,
        crate::inbound::http::donations::create_donation,
        crate::inbound::http::donations::list_donations,
        crate::inbound::http::donations::get_donation,
        crate::inbound::http::donations::update_donation,
        crate::inbound::http::donations::delete_donation,
        crate::inbound::http::payments::create_payment_intent,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::get_payment,
        crate::inbound::http::payments::delete_payment,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DocumentSchema,
        InsertOutcomeSchema,
        UpdateOutcomeSchema,
        DeleteOutcomeSchema,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        AdminStatusResponse,
        PaymentIntentBody,
        PaymentIntentResponse,
        WelcomeResponse,
    )),
    tags(
        (name = "users", description = "Registration, sessions and roles"),
        (name = "pets", description = "Pets listed for adoption"),
        (name = "adopts", description = "Adoption requests"),
        (name = "campaigns", description = "Donation campaigns"),
        (name = "donations", description = "Donations to campaigns"),
        (name = "payments", description = "Payment records and intents"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/users/admin/{email}")]
    #[case("/api/v1/pets/{id}")]
    #[case("/api/v1/adopts/{petId}")]
    #[case("/api/v1/donationCampaigns")]
    #[case("/api/v1/donations/{id}")]
    #[case("/api/v1/create-payment-intent")]
    #[case("/health/ready")]
    fn routes_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
