//! Query-execution interface
//!
//! Repositories never talk to a pool directly. They hand a statement and its
//! positional parameters to a [`QueryExecutor`], which binds `$1`, `$2`, ...
//! strictly by position and returns the result rows. The PostgreSQL pool is
//! one implementation; tests use an in-memory double.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::data::error::DataError;

/// A result row: column name to value, in column order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Null,
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Int(i)
    }
}

impl From<i32> for SqlValue {
    fn from(i: i32) -> Self {
        SqlValue::Int(i64::from(i))
    }
}

impl From<u32> for SqlValue {
    fn from(i: u32) -> Self {
        SqlValue::Int(i64::from(i))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Executes one parameterized statement and returns its rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory executor that records every call and replays a canned reply.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{QueryExecutor, Row, SqlValue};
    use crate::data::error::DataError;

    enum Reply {
        Rows(Vec<Row>),
        Fail,
    }

    pub struct RecordingExecutor {
        reply: Reply,
        calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
    }

    impl RecordingExecutor {
        pub fn returning(rows: Vec<Value>) -> Self {
            let rows = rows
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => map,
                    other => panic!("test row must be a JSON object, got {other}"),
                })
                .collect();
            Self {
                reply: Reply::Rows(rows),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn empty() -> Self {
            Self::returning(Vec::new())
        }

        pub fn failing() -> Self {
            Self {
                reply: Reply::Fail,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<(String, Vec<SqlValue>)> {
            self.calls.lock().unwrap().clone()
        }

        /// The single recorded call; panics unless exactly one was made
        pub fn only_call(&self) -> (String, Vec<SqlValue>) {
            let calls = self.calls();
            assert_eq!(calls.len(), 1, "expected exactly one query");
            calls.into_iter().next().unwrap()
        }
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError> {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            match &self.reply {
                Reply::Rows(rows) => Ok(rows.clone()),
                Reply::Fail => Err(DataError::Postgres(sqlx::Error::PoolClosed)),
            }
        }
    }
}
