use std::str::FromStr;

use crate::app_config::{AgentPolicyKind, AppConfig, Environment};
use crate::ConfigError;

/// Read [`AppConfig`] from the process environment, after loading `.env` if
/// one is present.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] when `DATABASE_URL` is unset and
/// [`ConfigError::InvalidEnvVar`] when a value does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Typed accessors over an env-style lookup.
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    fn required(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_owned()))
    }

    fn text(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_owned())
    }

    /// Blank counts as unset, so `.env` templates can leave keys empty.
    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn parsed<T>(&self, var: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.lookup)(var) {
            Ok(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(var, e)),
            Err(_) => Ok(default),
        }
    }

    fn positive<T>(&self, var: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Default + PartialEq,
        T::Err: std::fmt::Display,
    {
        let value = self.parsed(var, default)?;
        if value == T::default() {
            return Err(invalid(var, "must be greater than zero"));
        }
        Ok(value)
    }

    fn flag(&self, var: &str) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(var) else {
            return Ok(false);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got '{raw}'"))),
        }
    }
}

fn invalid(var: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason: reason.to_string(),
    }
}

/// Assemble [`AppConfig`] from `lookup`, which tests back with a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let vars = Vars { lookup };

    Ok(AppConfig {
        database_url: vars.required("DATABASE_URL")?,
        env: parse_environment(&vars.text("FLOWGENT_ENV", "development")),
        log_level: vars.text("FLOWGENT_LOG_LEVEL", "info"),

        db_max_connections: vars.parsed("FLOWGENT_DB_MAX_CONNECTIONS", 10)?,
        db_min_connections: vars.parsed("FLOWGENT_DB_MIN_CONNECTIONS", 1)?,
        db_acquire_timeout_secs: vars.parsed("FLOWGENT_DB_ACQUIRE_TIMEOUT_SECS", 10)?,

        genai_api_key: vars.optional("GENAI_API_KEY"),
        genai_base_url: vars.text("GENAI_BASE_URL", "https://generativelanguage.googleapis.com"),
        genai_model: vars.text("GENAI_MODEL", "gemini-2.5-flash"),
        genai_request_timeout_secs: vars.parsed("GENAI_REQUEST_TIMEOUT_SECS", 30)?,
        genai_max_retries: vars.parsed("GENAI_MAX_RETRIES", 2)?,
        genai_retry_backoff_base_ms: vars.parsed("GENAI_RETRY_BACKOFF_BASE_MS", 1_000)?,

        webhook_url: vars.optional("WEBHOOK_URL"),

        agent_poll_interval_secs: vars.positive("FLOWGENT_AGENT_POLL_INTERVAL_SECS", 60)?,
        agent_batch_size: vars.positive("FLOWGENT_AGENT_BATCH_SIZE", 10)?,
        agent_policy: vars.parsed("FLOWGENT_AGENT_POLICY", AgentPolicyKind::Readiness)?,
        agent_run_once: vars.flag("FLOWGENT_AGENT_RUN_ONCE")?,
    })
}

/// `production` and `test` are recognised; anything else is development.
fn parse_environment(s: &str) -> Environment {
    match s.trim() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
