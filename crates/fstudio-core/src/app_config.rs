use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the normalizer reacts when a column coercion fails on some row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionPolicy {
    /// Discard the whole batch and yield an empty table.
    #[default]
    AbortBatch,
    /// Exclude only the rows whose values could not be coerced.
    DropRow,
}

impl std::fmt::Display for CoercionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoercionPolicy::AbortBatch => write!(f, "abort-batch"),
            CoercionPolicy::DropRow => write!(f, "drop-row"),
        }
    }
}

/// Google Sheets sink settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub credentials_path: PathBuf,
    pub spreadsheet_id: String,
    pub range: String,
    /// API origin, e.g. `https://sheets.googleapis.com`.
    pub api_base: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub base_url: String,
    pub total_pages: u32,
    pub page_delay_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub coercion_policy: CoercionPolicy,
    pub csv_path: PathBuf,
    pub database_url: Option<String>,
    pub db_table: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub sheets: SheetsConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("total_pages", &self.total_pages)
            .field("page_delay_secs", &self.page_delay_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("coercion_policy", &self.coercion_policy)
            .field("csv_path", &self.csv_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_table", &self.db_table)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("sheets", &self.sheets)
            .finish()
    }
}
