//! Tests for users API handlers.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{ADMIN_ROLE, DEFAULT_ROLE};
use crate::inbound::http::test_utils::{
    login_cookie, memory_state, seed_user, session_cookie, test_app,
};

const ADA: &str = "ada@example.com";
const GRACE: &str = "grace@example.com";

fn get(uri: &str, cookie: &Cookie<'static>) -> actix_http::Request {
    actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

#[rstest]
#[case("", "empty_email")]
#[case("ada.example.com", "invalid_email")]
#[actix_web::test]
async fn login_rejects_malformed_emails(#[case] email: &str, #[case] code: &str) {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "email");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn login_rejects_unknown_users() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": ADA }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "unknown user");
}

#[actix_web::test]
async fn registered_user_logs_in_as_plain_user() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let registered = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": ADA, "name": "Ada", "role": ADMIN_ROLE }))
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::OK);
    let outcome: Value = actix_test::read_body_json(registered).await;
    assert!(outcome["insertedId"].is_string());

    let login = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": ADA }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login);
    let body: Value = actix_test::read_body_json(login).await;
    assert_eq!(body, json!({ "email": ADA }));

    let status = actix_test::call_service(&app, get(&format!("/api/v1/users/admin/{ADA}"), &cookie))
        .await;
    let status: Value = actix_test::read_body_json(status).await;
    assert_eq!(status, json!({ "admin": false }));
}

#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let (state, store) = memory_state();
    seed_user(&store, ADA, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": ADA }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case(DEFAULT_ROLE, StatusCode::FORBIDDEN)]
#[case(ADMIN_ROLE, StatusCode::OK)]
#[actix_web::test]
async fn listing_users_requires_admin(#[case] role: &str, #[case] expected: StatusCode) {
    let (state, store) = memory_state();
    seed_user(&store, ADA, role).await;
    seed_user(&store, GRACE, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, ADA).await;

    let response =
        actix_test::call_service(&app, get("/api/v1/users?sort=email&order=desc", &cookie)).await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::OK {
        let users: Vec<Value> = actix_test::read_body_json(response).await;
        let emails: Vec<&str> = users.iter().filter_map(|u| u["email"].as_str()).collect();
        assert_eq!(emails, vec![GRACE, ADA]);
    }
}

#[actix_web::test]
async fn listing_users_without_session_is_unauthorized() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_status_of_someone_else_is_forbidden() {
    let (state, store) = memory_state();
    seed_user(&store, ADA, DEFAULT_ROLE).await;
    seed_user(&store, GRACE, ADMIN_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, ADA).await;

    let response =
        actix_test::call_service(&app, get(&format!("/api/v1/users/admin/{GRACE}"), &cookie)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_promotes_another_user() {
    let (state, store) = memory_state();
    seed_user(&store, ADA, ADMIN_ROLE).await;
    let grace_id = seed_user(&store, GRACE, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let admin = login_cookie(&app, ADA).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/users/admin/{grace_id}"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = actix_test::read_body_json(response).await;
    assert_eq!(outcome["modifiedCount"], 1);

    let grace = login_cookie(&app, GRACE).await;
    let status =
        actix_test::call_service(&app, get(&format!("/api/v1/users/admin/{GRACE}"), &grace)).await;
    let status: Value = actix_test::read_body_json(status).await;
    assert_eq!(status, json!({ "admin": true }));
}

#[rstest]
#[case(ADA, StatusCode::OK)]
#[case(GRACE, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn users_read_only_their_own_record(#[case] caller: &str, #[case] expected: StatusCode) {
    let (state, store) = memory_state();
    let ada_id = seed_user(&store, ADA, DEFAULT_ROLE).await;
    seed_user(&store, GRACE, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, caller).await;

    let response =
        actix_test::call_service(&app, get(&format!("/api/v1/users/{ada_id}"), &cookie)).await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn non_admins_cannot_change_their_role() {
    let (state, store) = memory_state();
    let ada_id = seed_user(&store, ADA, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, ADA).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{ada_id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "role": ADMIN_ROLE }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let renamed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{ada_id}"))
            .cookie(cookie)
            .set_json(json!({ "name": "Ada Lovelace" }))
            .to_request(),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let outcome: Value = actix_test::read_body_json(renamed).await;
    assert_eq!(outcome["matchedCount"], 1);
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let (state, store) = memory_state();
    seed_user(&store, ADA, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, ADA).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = session_cookie(&response);
    assert!(cleared.value().is_empty());
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": true }));

    let after = actix_test::call_service(
        &app,
        get(&format!("/api/v1/users/admin/{ADA}"), &cleared),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(json!({ "email": GRACE }), StatusCode::FORBIDDEN)]
#[case(json!({ "email": 5 }), StatusCode::BAD_REQUEST)]
#[case(json!({ "email": ADA, "name": "Ada" }), StatusCode::OK)]
#[actix_web::test]
async fn users_keep_their_own_email(#[case] body: Value, #[case] expected: StatusCode) {
    let (state, store) = memory_state();
    let ada_id = seed_user(&store, ADA, DEFAULT_ROLE).await;
    seed_user(&store, GRACE, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, ADA).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{ada_id}"))
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn admin_cannot_move_a_user_onto_a_taken_email() {
    let (state, store) = memory_state();
    seed_user(&store, ADA, ADMIN_ROLE).await;
    let grace_id = seed_user(&store, GRACE, DEFAULT_ROLE).await;
    let app = actix_test::init_service(test_app(state)).await;
    let admin = login_cookie(&app, ADA).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{grace_id}"))
            .cookie(admin)
            .set_json(json!({ "email": ADA }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let grace = login_cookie(&app, GRACE).await;
    let status =
        actix_test::call_service(&app, get(&format!("/api/v1/users/admin/{GRACE}"), &grace)).await;
    assert_eq!(status.status(), StatusCode::OK);
}
