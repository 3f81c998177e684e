use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.is_empty());
    let log_level = or_default("CXA_LOG_LEVEL", "info");
    let banks_path = PathBuf::from(or_default("CXA_BANKS_PATH", "./config/banks.yaml"));
    let data_dir = PathBuf::from(or_default("CXA_DATA_DIR", "./data"));

    let review_count = parse_number::<u32, _>(&lookup, "CXA_REVIEW_COUNT", 400)?;
    if review_count == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CXA_REVIEW_COUNT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let review_lang = or_default("CXA_REVIEW_LANG", "en");
    let review_country = or_default("CXA_REVIEW_COUNTRY", "et");

    let play_base_url = or_default("CXA_PLAY_BASE_URL", "https://play.google.com");
    let translate_url = or_default("CXA_TRANSLATE_URL", "https://translate.googleapis.com");
    let sentiment_model_url = or_default("CXA_SENTIMENT_MODEL_URL", "http://localhost:8080");

    let http_timeout_secs = parse_number(&lookup, "CXA_HTTP_TIMEOUT_SECS", 30)?;
    let user_agent = or_default("CXA_USER_AGENT", "cxa/0.1 (review-analytics)");
    let db_acquire_timeout_secs = parse_number(&lookup, "CXA_DB_ACQUIRE_TIMEOUT_SECS", 10)?;

    Ok(AppConfig {
        database_url,
        log_level,
        banks_path,
        data_dir,
        review_count,
        review_lang,
        review_country,
        play_base_url,
        translate_url,
        sentiment_model_url,
        http_timeout_secs,
        user_agent,
        db_acquire_timeout_secs,
    })
}

/// Parse `var` as a number, or return `default` when it is unset.
fn parse_number<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let Ok(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{raw}': {e}"),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
