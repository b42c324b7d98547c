//! Property search statement builder
//!
//! Assembles the aggregate search query from a sparse [`PropertyFilter`].
//! Predicates are emitted in a fixed order (city, owner, minimum price,
//! maximum price) and chained with one [`ClauseSeparator`]; the rating
//! filter runs after grouping as a single `HAVING` clause.

use super::types::{ClauseSeparator, PropertyFilter, SqlParams};
use crate::core::constants::{CENTS_PER_UNIT, DEFAULT_SEARCH_LIMIT};
use crate::utils::sql::contains_pattern;

const SEARCH_BASE: &str = "SELECT properties.*, avg(rating) AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_id";

/// A complete search statement and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySearchQuery {
    pub sql: String,
    pub params: SqlParams,
}

/// Build the property search statement.
///
/// `limit` falls back to [`DEFAULT_SEARCH_LIMIT`] and is always the last
/// bound parameter.
pub fn build_property_search(filter: &PropertyFilter, limit: Option<u32>) -> PropertySearchQuery {
    let mut sql = String::from(SEARCH_BASE);
    let mut params = SqlParams::default();
    let mut separator = ClauseSeparator::new();

    let mut predicate = |sql: &mut String, condition: String| {
        // The cursor is infinite, so `next` always yields a keyword
        let keyword = separator.next().unwrap_or("AND");
        sql.push_str(&format!("\n{} {}", keyword, condition));
    };

    if let Some(city) = &filter.city {
        let p = params.push(contains_pattern(city));
        predicate(&mut sql, format!("city LIKE {}", p));
    }

    if let Some(owner_id) = filter.owner_id {
        let p = params.push(owner_id);
        predicate(&mut sql, format!("owner_id = {}", p));
    }

    if let Some(min) = filter.minimum_price_per_night {
        let p = params.push(to_cents(min));
        predicate(&mut sql, format!("cost_per_night >= {}", p));
    }

    if let Some(max) = filter.maximum_price_per_night {
        let p = params.push(to_cents(max));
        predicate(&mut sql, format!("cost_per_night <= {}", p));
    }

    sql.push_str("\nGROUP BY properties.id");

    if let Some(rating) = filter.minimum_rating {
        let p = params.push(rating);
        sql.push_str(&format!("\nHAVING avg(rating) >= {}", p));
    }

    let p = params.push(limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
    sql.push_str(&format!("\nORDER BY cost_per_night\nLIMIT {}", p));

    PropertySearchQuery { sql, params }
}

/// Whole currency units to stored cents. `u32 * 100` always fits in `i64`.
fn to_cents(units: u32) -> i64 {
    i64::from(units) * CENTS_PER_UNIT
}
