//! Environment-driven application settings.
//!
//! Store, payment provider, CORS and listener settings are read through
//! [`mockable::Env`] so tests can inject values. Session settings live in
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use mockable::Env;
use tracing::warn;
use url::Url;
use zeroize::Zeroizing;

use crate::inbound::http::session_config::BuildMode;
use crate::outbound::stripe::DEFAULT_STRIPE_API_BASE;

const MONGODB_URI_ENV: &str = "MONGODB_URI";
const MONGODB_DATABASE_ENV: &str = "MONGODB_DATABASE";
const STRIPE_SECRET_KEY_ENV: &str = "STRIPE_SECRET_KEY";
const STRIPE_API_BASE_ENV: &str = "STRIPE_API_BASE";
const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
const BIND_ADDR_ENV: &str = "BIND_ADDR";

/// Database used when `MONGODB_DATABASE` is unset.
pub const DEFAULT_DATABASE: &str = "petmatch";
/// CORS origin used when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
/// Listener address used when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Errors raised while reading application settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A variable required in release builds is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but unusable.
    #[error("invalid value for {name}='{value}': {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Document store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// `mongodb://` or `mongodb+srv://` connection string.
    pub uri: String,
    /// Database holding every collection.
    pub database: String,
}

/// Payment provider settings.
pub struct PaymentSettings {
    /// Provider secret key.
    pub secret_key: Zeroizing<String>,
    /// Provider base URL.
    pub api_base: Url,
}

impl std::fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

/// Settings for everything outside the session cookie.
#[derive(Debug)]
pub struct AppSettings {
    /// `None` selects the in-memory store (debug builds only).
    pub store: Option<StoreSettings>,
    /// `None` selects the fixture gateway (debug builds only).
    pub payments: Option<PaymentSettings>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Listener address.
    pub bind_addr: SocketAddr,
}

impl AppSettings {
    /// Read settings from `env`.
    ///
    /// # Errors
    ///
    /// Release builds fail with [`SettingsError::MissingEnv`] when the store
    /// or provider is not configured. Any build fails on unparsable values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
    /// use backend::settings::AppSettings;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "BIND_ADDR" => Some("127.0.0.1:8080".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = AppSettings::from_env(&env, BuildMode::Debug).unwrap();
    /// assert!(settings.store.is_none());
    /// assert_eq!(settings.bind_addr.port(), 8080);
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, SettingsError> {
        Ok(Self {
            store: store_from_env(env, mode)?,
            payments: payments_from_env(env, mode)?,
            allowed_origins: origins_from_env(env),
            bind_addr: bind_addr_from_env(env)?,
        })
    }
}

fn non_empty<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn required_in_release<T>(
    mode: BuildMode,
    name: &'static str,
    fallback: &str,
) -> Result<Option<T>, SettingsError> {
    match mode {
        BuildMode::Debug => {
            warn!("{name} not set; using {fallback}");
            Ok(None)
        }
        BuildMode::Release => Err(SettingsError::MissingEnv { name }),
    }
}

fn store_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<StoreSettings>, SettingsError> {
    let Some(uri) = non_empty(env, MONGODB_URI_ENV) else {
        return required_in_release(mode, MONGODB_URI_ENV, "the in-memory store");
    };
    let database =
        non_empty(env, MONGODB_DATABASE_ENV).unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
    Ok(Some(StoreSettings { uri, database }))
}

fn payments_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<PaymentSettings>, SettingsError> {
    let Some(secret_key) = non_empty(env, STRIPE_SECRET_KEY_ENV) else {
        return required_in_release(mode, STRIPE_SECRET_KEY_ENV, "the fixture payment gateway");
    };
    let raw_base =
        non_empty(env, STRIPE_API_BASE_ENV).unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_owned());
    let api_base = Url::parse(&raw_base).map_err(|err| SettingsError::InvalidEnv {
        name: STRIPE_API_BASE_ENV,
        value: raw_base.clone(),
        reason: err.to_string(),
    })?;
    Ok(Some(PaymentSettings {
        secret_key: Zeroizing::new(secret_key),
        api_base,
    }))
}

fn origins_from_env<E: Env>(env: &E) -> Vec<String> {
    let origins: Vec<String> = non_empty(env, ALLOWED_ORIGINS_ENV)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_owned()]
    } else {
        origins
    }
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, SettingsError> {
    let raw = non_empty(env, BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value: raw.clone(),
        reason: err.to_string(),
    })
}
