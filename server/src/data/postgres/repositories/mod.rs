//! Repositories for users, reservations and properties
//!
//! Every function issues exactly one statement through a [`QueryExecutor`].
//! Statements are logged at debug level with their parameters; failures are
//! logged at error level and returned to the caller.

pub mod property;
pub mod reservation;
pub mod user;

use serde::de::DeserializeOwned;

use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, Row, SqlValue};

/// Execute one statement, logging it and any failure under `operation`
async fn run(
    executor: &dyn QueryExecutor,
    operation: &'static str,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<Row>, DataError> {
    tracing::debug!(operation, %sql, params = ?params, "Executing statement");

    match executor.query(sql, params).await {
        Ok(rows) => {
            tracing::trace!(operation, rows = rows.len(), "Statement completed");
            Ok(rows)
        }
        Err(e) => {
            tracing::error!(operation, error = %e, transient = e.is_transient(), "Statement failed");
            Err(e)
        }
    }
}

fn decode<T: DeserializeOwned>(row: Row) -> Result<T, DataError> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

fn decode_first<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Option<T>, DataError> {
    rows.into_iter().next().map(decode).transpose()
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataError> {
    rows.into_iter().map(decode).collect()
}

/// Decode the row an `INSERT ... RETURNING *` produced
fn decode_returning<T: DeserializeOwned>(
    operation: &'static str,
    rows: Vec<Row>,
) -> Result<T, DataError> {
    decode_first(rows)?.ok_or_else(|| {
        tracing::error!(operation, "Insert returned no row");
        DataError::Postgres(sqlx::Error::RowNotFound)
    })
}
