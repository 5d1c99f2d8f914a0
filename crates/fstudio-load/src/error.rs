use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Db(#[from] fstudio_db::DbError),

    #[error("unusable service-account credentials at {path}: {reason}")]
    Credentials { path: String, reason: String },

    #[error("failed to sign service-account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint {url} returned {status}: {body}")]
    TokenExchange {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Sheets API returned {status}: {body}")]
    SheetsApi { status: u16, body: String },

    #[error("sink not configured: {0}")]
    NotConfigured(String),
}
