pub mod app_config;
pub mod config;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, CoercionPolicy, Environment, SheetsConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    FetchedAt, NormalizedProductRecord, RawProductRecord, COLUMNS, INVALID_RATING, NO_COLORS,
    PRICE_NOT_AVAILABLE, UNKNOWN, UNKNOWN_TITLE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
