//! Session configuration parsing and validation.
//!
//! The cookie signing key comes from `SESSION_SECRET` when set, otherwise
//! from the file named by `SESSION_KEY_FILE`. Debug builds tolerate missing
//! toggles with a warning; release builds require every toggle explicitly.

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;
mod parsing;

use parsing::{BoolEnvConfig, debug_warn_or_error, parse_bool_env, parse_same_site_value};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Minimum key length accepted by cookie key derivation.
pub const SESSION_KEY_FLOOR_LEN: usize = 32;
/// Raw session secret; takes precedence over the key file.
pub const SECRET_ENV: &str = "SESSION_SECRET";
/// Whether the session cookie carries `Secure`.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// `SameSite` policy for the session cookie.
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
/// Permit a generated key when no key material is found.
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
/// Path to the session key file.
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Where the signing key came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeySource {
    /// The `SESSION_SECRET` variable.
    Secret,
    /// A key file.
    File(PathBuf),
    /// Generated at startup; sessions do not survive a restart.
    Ephemeral,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret => f.write_str(SECRET_ENV),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Origin of [`Self::key`].
    pub key_source: KeySource,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key material is shorter than the build mode allows.
    #[error("session key from {source_name} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        source_name: String,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode, KeySource,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_SECRET" => Some("s".repeat(64)),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     "SESSION_SAMESITE" => Some("Strict".to_owned()),
///     "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release).unwrap();
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.key_source, KeySource::Secret);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(COOKIE_SECURE_ENV, true),
        |flag, _| Ok(flag),
    )?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(ALLOW_EPHEMERAL_ENV, false),
        |flag, mode| {
            if flag && !mode.is_debug() {
                Err(SessionConfigError::EphemeralNotAllowed)
            } else {
                Ok(flag)
            }
        },
    )?;
    let (key, key_source) = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        key_source,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    match env.string(SAMESITE_ENV) {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("SESSION_SAMESITE not set; using default"),
        ),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(Key, KeySource), SessionConfigError> {
    if let Some(secret) = env.string(SECRET_ENV) {
        let key = derive_key(secret.into_bytes(), mode, &KeySource::Secret)?;
        return Ok((key, KeySource::Secret));
    }

    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(bytes) => {
            let source = KeySource::File(path);
            let key = derive_key(bytes, mode, &source)?;
            Ok((key, source))
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok((Key::generate(), KeySource::Ephemeral))
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn derive_key(
    mut bytes: Vec<u8>,
    mode: BuildMode,
    source: &KeySource,
) -> Result<Key, SessionConfigError> {
    let min_len = if mode.is_debug() {
        SESSION_KEY_FLOOR_LEN
    } else {
        SESSION_KEY_MIN_LEN
    };
    let length = bytes.len();
    if length < min_len {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            source_name: source.to_string(),
            length,
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}
