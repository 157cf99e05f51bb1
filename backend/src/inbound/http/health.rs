//! Health endpoints: liveness and readiness probes for orchestration, plus the
//! public welcome route served at the root.
use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Body of the welcome route.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    /// Greeting text.
    #[schema(example = "Welcome to PetMatch Server!")]
    pub message: &'static str,
}

/// Public welcome message.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Server greeting", body = WelcomeResponse))
)]
#[get("/")]
pub async fn welcome() -> web::Json<WelcomeResponse> {
    web::Json(WelcomeResponse {
        message: "Welcome to PetMatch Server!",
    })
}

/// Readiness probe. Return 200 once the store connection is established.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case::not_ready(false, StatusCode::SERVICE_UNAVAILABLE)]
    #[case::ready(true, StatusCode::OK)]
    #[actix_web::test]
    async fn readiness_follows_state(#[case] mark: bool, #[case] expected: StatusCode) {
        let state = web::Data::new(HealthState::new());
        if mark {
            state.mark_ready();
        }
        let app = actix_test::init_service(App::new().app_data(state).service(ready)).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request())
                .await;

        assert_eq!(res.status(), expected);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }

    #[actix_web::test]
    async fn liveness_fails_once_unhealthy() {
        let state = web::Data::new(HealthState::new());
        state.mark_unhealthy();
        let app = actix_test::init_service(App::new().app_data(state).service(live)).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/live").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn root_greets_clients() {
        let app = actix_test::init_service(App::new().service(welcome)).await;

        let body: Value =
            actix_test::call_and_read_body_json(&app, actix_test::TestRequest::get().uri("/").to_request())
                .await;

        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Welcome to PetMatch Server!")
        );
    }
}
