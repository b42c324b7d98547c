//! Data storage layer
//!
//! - `executor` - Query-execution interface every repository runs through
//! - `filters` - Property search options and statement builder
//! - `postgres` - PostgreSQL pool service and repositories
//! - `types` - Record types for users, properties and reservations
//! - `error` - Error type for the data layer

pub mod error;
pub mod executor;
pub mod filters;
pub mod postgres;
pub mod types;

pub use error::DataError;
pub use executor::{QueryExecutor, Row, SqlValue};
pub use postgres::PostgresService;
pub use postgres::repositories::{property, reservation, user};
