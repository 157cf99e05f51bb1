//! Toggle parsing shared by the session settings.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and the value debug builds fall back to.
pub(super) struct BoolEnvConfig {
    name: &'static str,
    default_value: bool,
}

impl BoolEnvConfig {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }

    fn default_label(&self) -> &'static str {
        if self.default_value {
            "enabled"
        } else {
            "disabled"
        }
    }
}

/// Read a boolean toggle; `validate` vets parsed values per build mode.
pub(super) fn parse_bool_env<E, F>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
    validate: F,
) -> Result<bool, SessionConfigError>
where
    E: Env,
    F: FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
{
    let Some(value) = env.string(config.name) else {
        return debug_warn_or_error(
            mode,
            config.default_value,
            SessionConfigError::MissingEnv { name: config.name },
            || warn!("{} not set; defaulting to {}", config.name, config.default_label()),
        );
    };
    if let Some(flag) = parse_bool(&value) {
        return validate(flag, mode);
    }
    debug_warn_or_error(
        mode,
        config.default_value,
        SessionConfigError::InvalidEnv {
            name: config.name,
            value: value.clone(),
            expected: BOOL_EXPECTED,
        },
        || {
            warn!(
                value = %value,
                "invalid {}; defaulting to {}",
                config.name,
                config.default_label()
            );
        },
    )
}

/// Fall back with a warning in debug builds, fail in release builds.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => debug_warn_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || {
                warn!(
                    "SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; \
                     browsers may reject the cookie"
                );
            },
        ),
        _ => {
            warn_invalid_same_site(mode, &value);
            debug_warn_or_error(
                mode,
                default_same_site,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
                || {},
            )
        }
    }
}

fn warn_invalid_same_site(mode: BuildMode, value: &str) {
    if mode.is_debug() {
        warn!(value = %value, "invalid SESSION_SAMESITE, using default");
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
