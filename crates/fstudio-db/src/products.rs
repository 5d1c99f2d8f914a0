//! Full-replace writes of the normalized product table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use fstudio_core::NormalizedProductRecord;

use crate::DbError;

/// Rows per `INSERT`. Seven binds per row keeps each statement well under
/// Postgres' 65535 parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

const MAX_IDENTIFIER_LEN: usize = 63;

/// Checks that `name` is a plain, unquoted-safe Postgres identifier.
///
/// # Errors
///
/// Returns [`DbError::InvalidTableName`] if `name` is empty, longer than 63
/// bytes, or contains anything besides ASCII letters, digits and underscores
/// (and does not start with a digit).
pub fn validate_table_name(name: &str) -> Result<&str, DbError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(name)
    } else {
        Err(DbError::InvalidTableName(name.to_owned()))
    }
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE \"{table}\" (\
         \"Title\" TEXT NOT NULL, \
         \"Price\" DOUBLE PRECISION NOT NULL, \
         \"Rating\" DOUBLE PRECISION, \
         \"Colors\" INTEGER NOT NULL, \
         \"Size\" TEXT NOT NULL, \
         \"Gender\" TEXT NOT NULL, \
         \"Timestamp\" TEXT)"
    )
}

fn insert_prefix(table: &str) -> String {
    format!(
        "INSERT INTO \"{table}\" \
         (\"Title\", \"Price\", \"Rating\", \"Colors\", \"Size\", \"Gender\", \"Timestamp\") "
    )
}

/// Replaces the contents of `table` with `rows`.
///
/// The table is dropped and recreated inside a single transaction, so readers
/// see either the previous contents or the complete new set. Returns the
/// number of rows written.
///
/// # Errors
///
/// Returns [`DbError::InvalidTableName`] if `table` is not a plain identifier,
/// or [`DbError::Sqlx`] if any statement fails (the transaction is rolled back).
pub async fn replace_products(
    pool: &PgPool,
    table: &str,
    rows: &[NormalizedProductRecord],
) -> Result<u64, DbError> {
    let table = validate_table_name(table)?;
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create_table_sql(table))
        .execute(&mut *tx)
        .await?;

    let mut written = 0u64;
    for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(insert_prefix(table));
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(&row.title)
                .push_bind(row.price)
                .push_bind(row.rating)
                .push_bind(row.colors)
                .push_bind(&row.size)
                .push_bind(&row.gender)
                .push_bind(row.timestamp.as_deref());
        });
        written += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    tracing::debug!(table, rows = written, "replaced product table");
    Ok(written)
}
