//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::test as actix_test;
use actix_web::{App, web};
use serde_json::{Value, json};

use crate::domain::ports::FixturePaymentGateway;
use crate::domain::{Collection, Document, DirectoryLoginService, UserService};
use crate::Trace;
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::routes::api_routes;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDocumentRepository;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Convert a JSON object literal into a [`Document`].
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// HTTP state over a fresh in-memory store with the directory login
/// service and the fixture payment gateway.
pub fn memory_state() -> (HttpState, Arc<InMemoryDocumentRepository>) {
    let store = Arc::new(InMemoryDocumentRepository::new());
    let state = HttpState::new(
        Arc::new(DirectoryLoginService::new(UserService::new(store.clone()))),
        store.clone(),
        Arc::new(FixturePaymentGateway),
    );
    (state, store)
}

/// Register `email` directly in the store with the given role.
pub async fn seed_user(store: &InMemoryDocumentRepository, email: &str, role: &str) -> String {
    store
        .seed(
            Collection::Users,
            doc(json!({ "email": email, "name": email, "role": role })),
        )
        .await
}

/// Application wiring every API route the way the server does, with a
/// throwaway session key.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(api_routes),
        )
}

/// Log `email` in and return the issued session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login failed for {email}");
    session_cookie(&response)
}
