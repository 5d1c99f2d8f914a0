use std::path::PathBuf;

use crate::app_config::{AppConfig, CoercionPolicy, Environment, SheetsConfig};
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://fashion-studio.dicoding.dev/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";
const DEFAULT_SPREADSHEET_ID: &str = "1MDLjCAZ2eMy-FxvBpDSJfNEkTOKOVoHORcrlyT8Vu-s";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("FSTUDIO_ENV", "development"))?;
    let log_level = or_default("FSTUDIO_LOG_LEVEL", "info");

    let base_url = or_default("FSTUDIO_BASE_URL", DEFAULT_BASE_URL);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FSTUDIO_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" is not an http(s) URL"),
        });
    }
    let total_pages = parse_u32("FSTUDIO_TOTAL_PAGES", "50")?;
    let page_delay_secs = parse_u64("FSTUDIO_PAGE_DELAY_SECS", "2")?;

    let scraper_request_timeout_secs = parse_u64("FSTUDIO_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("FSTUDIO_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let coercion_policy =
        parse_coercion_policy(&or_default("FSTUDIO_COERCION_POLICY", "abort-batch"))?;

    let csv_path = PathBuf::from(or_default("FSTUDIO_CSV_PATH", "fashion_data.csv"));

    let database_url = lookup("DATABASE_URL").ok().filter(|v| !v.is_empty());
    let db_table = or_default("FSTUDIO_DB_TABLE", "fashion_products");
    let db_max_connections = parse_u32("FSTUDIO_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("FSTUDIO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FSTUDIO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "FSTUDIO_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let sheets = SheetsConfig {
        credentials_path: PathBuf::from(or_default(
            "FSTUDIO_SHEETS_CREDENTIALS_PATH",
            "client_secret.json",
        )),
        spreadsheet_id: or_default("FSTUDIO_SHEETS_SPREADSHEET_ID", DEFAULT_SPREADSHEET_ID),
        range: or_default("FSTUDIO_SHEETS_RANGE", "Sheet1!A1"),
        api_base: or_default("FSTUDIO_SHEETS_API_BASE", "https://sheets.googleapis.com"),
    };

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        total_pages,
        page_delay_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        coercion_policy,
        csv_path,
        database_url,
        db_table,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        sheets,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FSTUDIO_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_coercion_policy(s: &str) -> Result<CoercionPolicy, ConfigError> {
    match s {
        "abort-batch" => Ok(CoercionPolicy::AbortBatch),
        "drop-row" => Ok(CoercionPolicy::DropRow),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FSTUDIO_COERCION_POLICY".to_string(),
            reason: format!("expected \"abort-batch\" or \"drop-row\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
