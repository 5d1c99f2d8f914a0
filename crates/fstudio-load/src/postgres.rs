//! Relational sink: fully replaces the configured Postgres table.

use fstudio_core::{AppConfig, NormalizedProductRecord};
use fstudio_db::{connect_pool_from_config, replace_products, DbError};

use crate::error::LoadError;

/// Connects with the configured pool settings, replaces the product table,
/// and closes the pool. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`LoadError::NotConfigured`] when no database URL is set, and
/// [`LoadError::Db`] for connection or write failures.
pub async fn load_postgres(
    config: &AppConfig,
    rows: &[NormalizedProductRecord],
) -> Result<u64, LoadError> {
    let pool = connect_pool_from_config(config)
        .await
        .map_err(|e| match e {
            DbError::MissingDatabaseUrl => LoadError::NotConfigured(e.to_string()),
            other => LoadError::Db(other),
        })?;

    let result = replace_products(&pool, &config.db_table, rows).await;
    pool.close().await;
    Ok(result?)
}
