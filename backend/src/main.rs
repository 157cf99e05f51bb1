//! Backend entry-point: loads settings, connects adapters and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::fingerprint::key_fingerprint;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::mongo::MongoStore;
use backend::outbound::stripe::{DEFAULT_STRIPE_TIMEOUT, StripePaymentGateway};
use backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&env, mode).map_err(std::io::Error::other)?;
    info!(
        key_source = %session.key_source,
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );
    let settings = AppSettings::from_env(&env, mode).map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr,
    )
    .with_allowed_origins(settings.allowed_origins);

    if let Some(store) = settings.store {
        let mongo = MongoStore::connect(&store.uri, &store.database)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_documents(Arc::new(mongo.repository()));
    }
    if let Some(payments) = settings.payments {
        let gateway = StripePaymentGateway::new(
            &payments.api_base,
            payments.secret_key.as_str(),
            DEFAULT_STRIPE_TIMEOUT,
        )
        .map_err(std::io::Error::other)?;
        config = config.with_payments(Arc::new(gateway));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
