//! Unified error type for the data layer

use thiserror::Error;

/// Error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// PostgreSQL execution error (connectivity, malformed statement, constraint violation)
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A returned row did not match the expected record shape
    #[error("Row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Postgres(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            Self::Decode(_) | Self::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DataError::Config("missing URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing URL");
    }

    #[test]
    fn test_postgres_error_display() {
        let err = DataError::from(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("PostgreSQL error:"));
    }

    #[test]
    fn test_decode_error_from_serde() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = DataError::from(source);
        assert!(matches!(err, DataError::Decode(_)));
        assert!(err.to_string().starts_with("Row decode error:"));
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::from(sqlx::Error::PoolTimedOut).is_transient());
        assert!(DataError::from(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::from(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
    }
}
