//! `QueryExecutor` implementation for a PostgreSQL pool
//!
//! Statements run exactly as given. Each returned `PgRow` is turned into a
//! column-name keyed object by decoding every column according to its
//! Postgres type, so SELECTs and `INSERT ... RETURNING` statements come back
//! in the same shape and in the order the statement produced them.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row as _, TypeInfo};

use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, Row, SqlValue};

/// How a result column is decoded into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Date,
    Timestamp,
    TimestampTz,
    Json,
    Text,
}

impl ColumnKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "BOOL" => Self::Bool,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            "NUMERIC" => Self::Numeric,
            "DATE" => Self::Date,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            "JSON" | "JSONB" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn decode_column(row: &PgRow, index: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        ColumnKind::Bool => Value::from(row.try_get::<Option<bool>, _>(index)?),
        ColumnKind::Int2 => Value::from(row.try_get::<Option<i16>, _>(index)?),
        ColumnKind::Int4 => Value::from(row.try_get::<Option<i32>, _>(index)?),
        ColumnKind::Int8 => Value::from(row.try_get::<Option<i64>, _>(index)?),
        ColumnKind::Float4 => Value::from(row.try_get::<Option<f32>, _>(index)?.map(f64::from)),
        ColumnKind::Float8 => Value::from(row.try_get::<Option<f64>, _>(index)?),
        ColumnKind::Numeric => Value::from(
            row.try_get::<Option<Decimal>, _>(index)?
                .and_then(|d| d.to_f64()),
        ),
        ColumnKind::Date => Value::from(
            row.try_get::<Option<NaiveDate>, _>(index)?
                .map(|d| d.to_string()),
        ),
        ColumnKind::Timestamp => Value::from(
            row.try_get::<Option<NaiveDateTime>, _>(index)?
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        ),
        ColumnKind::TimestampTz => Value::from(
            row.try_get::<Option<DateTime<Utc>>, _>(index)?
                .map(|t| t.to_rfc3339()),
        ),
        ColumnKind::Json => row.try_get::<Option<Value>, _>(index)?.unwrap_or(Value::Null),
        ColumnKind::Text => Value::from(row.try_get::<Option<String>, _>(index)?),
    };
    Ok(value)
}

fn row_to_object(row: &PgRow) -> Result<Row, sqlx::Error> {
    row.columns()
        .iter()
        .map(|column| {
            let kind = ColumnKind::from_type_name(column.type_info().name());
            let value = decode_column(row, column.ordinal(), kind)?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}

#[async_trait]
impl QueryExecutor for PgPool {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlValue::Text(s) => query.bind(s.as_str()),
                SqlValue::Int(i) => query.bind(*i),
                SqlValue::Float(v) => query.bind(*v),
                SqlValue::Null => query.bind(None::<String>),
            };
        }

        let rows = query.fetch_all(self).await?;
        let objects = rows
            .iter()
            .map(row_to_object)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(objects)
    }
}
