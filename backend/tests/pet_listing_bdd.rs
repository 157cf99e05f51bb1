//! Behaviour tests for the public pet listing.
//!
//! Each scenario seeds an in-memory store, wires the API routes the way the
//! server does and issues one anonymous request.

use std::cell::RefCell;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use backend::Trace;
use backend::domain::ports::FixturePaymentGateway;
use backend::domain::{Collection, DirectoryLoginService, UserService};
use backend::inbound::http::error::{json_config, path_config, query_config};
use backend::inbound::http::routes::api_routes;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryDocumentRepository;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

struct PetListingWorld {
    runtime: Runtime,
    local: LocalSet,
    store: Arc<InMemoryDocumentRepository>,
    status: RefCell<Option<StatusCode>>,
    body: RefCell<Value>,
}

impl PetListingWorld {
    fn new() -> Self {
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime"),
            local: LocalSet::new(),
            store: Arc::new(InMemoryDocumentRepository::new()),
            status: RefCell::new(None),
            body: RefCell::new(Value::Null),
        }
    }

    fn state(&self) -> HttpState {
        HttpState::new(
            Arc::new(DirectoryLoginService::new(UserService::new(self.store.clone()))),
            self.store.clone(),
            Arc::new(FixturePaymentGateway),
        )
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }

    fn ages(&self) -> Vec<i64> {
        self.body
            .borrow()
            .as_array()
            .expect("listing body is an array")
            .iter()
            .filter_map(|pet| pet["age"].as_i64())
            .collect()
    }
}

#[fixture]
fn world() -> PetListingWorld {
    PetListingWorld::new()
}

#[given("{count} pets listed by {email}")]
fn pets_listed_by(world: &PetListingWorld, count: u32, email: String) {
    world.block_on(async {
        for age in 1..=count {
            let category = if age % 2 == 0 { "Dog" } else { "Cat" };
            let pet = json!({
                "name": format!("Pet {age}"),
                "category": category,
                "age": age,
                "adopted": false,
                "email": email,
            });
            let Value::Object(document) = pet else {
                panic!("pet literal is an object");
            };
            world.store.seed(Collection::Pets, document).await;
        }
    });
}

#[when("a visitor requests \"{uri}\"")]
fn a_visitor_requests(world: &PetListingWorld, uri: String) {
    let state = world.state();
    let (status, body) = world.block_on(async move {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(json_config())
                .app_data(query_config())
                .app_data(path_config())
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_secure(false)
                            .build(),
                        )
                        .configure(api_routes),
                ),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request()).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    });
    *world.status.borrow_mut() = Some(status);
    *world.body.borrow_mut() = body;
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &PetListingWorld, status: u16) {
    assert_eq!(
        world.status.borrow().map(|code| code.as_u16()),
        Some(status)
    );
}

#[then("the returned ages run from {first} to {last}")]
fn the_returned_ages_run(world: &PetListingWorld, first: i64, last: i64) {
    let expected: Vec<i64> = (first..=last).collect();
    assert_eq!(world.ages(), expected);
}

#[then("the returned ages are {ages}")]
fn the_returned_ages_are(world: &PetListingWorld, ages: String) {
    let expected: Vec<i64> = ages
        .split(',')
        .map(|age| age.trim().parse().expect("numeric age"))
        .collect();
    assert_eq!(world.ages(), expected);
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &PetListingWorld, code: String) {
    assert_eq!(world.body.borrow()["code"], code.as_str());
}

#[scenario(path = "tests/features/pet_listing.feature")]
fn pet_listing_scenarios(world: PetListingWorld) {
    drop(world);
}
