//! Google Sheets sink.
//!
//! Authenticates as a service account: the key file's private key signs an
//! RS256 assertion, which is exchanged at the key's `token_uri` for a bearer
//! token. The configured range is then cleared and rewritten with the header
//! row followed by every data row.

use std::path::Path;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use fstudio_core::{NormalizedProductRecord, SheetsConfig, COLUMNS};

use crate::error::LoadError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account key file that the sink needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Reads and parses a service-account JSON key file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Credentials`] if the file is missing, unreadable,
    /// or lacks one of the required fields.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let credentials_error = |reason: String| LoadError::Credentials {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| credentials_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| credentials_error(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Writes product tables into one spreadsheet range.
pub struct SheetsSink<'a> {
    client: &'a Client,
    config: &'a SheetsConfig,
}

impl<'a> SheetsSink<'a> {
    #[must_use]
    pub fn new(client: &'a Client, config: &'a SheetsConfig) -> Self {
        Self { client, config }
    }

    /// Authenticates, clears the range and writes header plus `rows`.
    /// Returns the number of data rows written.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Credentials`] / [`LoadError::Jwt`] for unusable keys.
    /// - [`LoadError::TokenExchange`] when the token endpoint rejects the
    ///   assertion.
    /// - [`LoadError::SheetsApi`] when the Sheets API answers with a non-2xx
    ///   status.
    /// - [`LoadError::Http`] on network failure.
    /// - [`LoadError::NotConfigured`] when the API base is not a usable URL.
    pub async fn write(&self, rows: &[NormalizedProductRecord]) -> Result<usize, LoadError> {
        let key = ServiceAccountKey::from_file(&self.config.credentials_path)?;
        let token = self.fetch_token(&key).await?;

        let clear_url = self.values_url(&format!("{}:clear", self.config.range))?;
        let response = self
            .client
            .post(clear_url)
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await?;
        check_status(response).await?;

        let mut update_url = self.values_url(&self.config.range)?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": self.config.range,
            "majorDimension": "ROWS",
            "values": sheet_values(rows),
        });
        let response = self
            .client
            .put(update_url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        Ok(rows.len())
    }

    async fn fetch_token(&self, key: &ServiceAccountKey) -> Result<String, LoadError> {
        let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;
        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::TokenExchange {
                url: key.token_uri.clone(),
                status: status.as_u16(),
                body,
            });
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// `{api_base}/v4/spreadsheets/{id}/values/{tail}` with each segment
    /// percent-encoded.
    fn values_url(&self, tail: &str) -> Result<Url, LoadError> {
        let mut url = Url::parse(&self.config.api_base).map_err(|e| {
            LoadError::NotConfigured(format!(
                "Sheets API base \"{}\" is not a URL: {e}",
                self.config.api_base
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                LoadError::NotConfigured(format!(
                    "Sheets API base \"{}\" cannot carry a path",
                    self.config.api_base
                ))
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                tail,
            ]);
        Ok(url)
    }
}

fn sign_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, LoadError> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LoadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LoadError::SheetsApi {
        status: status.as_u16(),
        body,
    })
}

/// Header row followed by one row per record. Missing values are empty
/// strings so every row has the same width.
fn sheet_values(rows: &[NormalizedProductRecord]) -> Vec<Vec<Value>> {
    let mut values = Vec::with_capacity(rows.len() + 1);
    values.push(COLUMNS.iter().map(|c| json!(c)).collect());
    for row in rows {
        values.push(vec![
            json!(row.title),
            json!(row.price),
            row.rating.map_or_else(|| json!(""), |r| json!(r)),
            json!(row.colors),
            json!(row.size),
            json!(row.gender),
            json!(row.timestamp.as_deref().unwrap_or("")),
        ]);
    }
    values
}
