//! Property search filters
//!
//! Provides the search option type and SQL generation for the property
//! search statement.
//!
//! ## Usage
//!
//! ```
//! use lightbnb_server::data::filters::{PropertyFilter, build_property_search};
//!
//! let filter = PropertyFilter {
//!     city: Some("Vancouver".to_string()),
//!     ..Default::default()
//! };
//! let query = build_property_search(&filter, None);
//! assert!(query.sql.contains("WHERE city LIKE $1"));
//! assert_eq!(query.params.values.len(), 2);
//! ```

mod builder;
mod types;

pub use builder::{PropertySearchQuery, build_property_search};
pub use types::{ClauseSeparator, PropertyFilter, SqlParams};
