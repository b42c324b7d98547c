//! Filter type definitions
//!
//! Defines the property search options, the positional parameter collector
//! and the clause-separator cursor used while assembling a statement.

use serde::Deserialize;

use crate::data::executor::SqlValue;

/// Optional constraints for a property search.
///
/// Every field is independent; `None` means "no constraint for this
/// dimension". A present zero is a real constraint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    /// Case-sensitive substring of the city
    pub city: Option<String>,
    /// Exact owner id
    pub owner_id: Option<i64>,
    /// Lowest nightly price, whole currency units
    pub minimum_price_per_night: Option<u32>,
    /// Highest nightly price, whole currency units
    pub maximum_price_per_night: Option<u32>,
    /// Lowest average review rating
    pub minimum_rating: Option<f64>,
}

impl PropertyFilter {
    /// Number of constraints applied before grouping
    pub fn predicate_count(&self) -> usize {
        [
            self.city.is_some(),
            self.owner_id.is_some(),
            self.minimum_price_per_night.is_some(),
            self.maximum_price_per_night.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    /// Append a value and return its `$n` placeholder
    pub fn push(&mut self, value: impl Into<SqlValue>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }
}

/// Yields `WHERE` once, then `AND` forever.
///
/// One cursor is shared by every predicate of a single statement. It never
/// rewinds; build a new one for the next statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClauseSeparator {
    #[default]
    NotYetEmitted,
    Emitted,
}

impl ClauseSeparator {
    pub fn new() -> Self {
        Self::NotYetEmitted
    }
}

impl Iterator for ClauseSeparator {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::NotYetEmitted => {
                *self = Self::Emitted;
                Some("WHERE")
            }
            Self::Emitted => Some("AND"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_leads_with_where_then_and() {
        let mut sep = ClauseSeparator::new();
        assert_eq!(sep.next(), Some("WHERE"));
        assert_eq!(sep.next(), Some("AND"));
        assert_eq!(sep.next(), Some("AND"));
        assert_eq!(sep, ClauseSeparator::Emitted);
    }

    #[test]
    fn separator_never_restarts() {
        let tokens: Vec<_> = ClauseSeparator::new().take(50).collect();
        assert_eq!(tokens[0], "WHERE");
        assert!(tokens[1..].iter().all(|t| *t == "AND"));
    }

    #[test]
    fn separators_are_independent() {
        let mut first = ClauseSeparator::new();
        first.next();
        let mut second = ClauseSeparator::default();
        assert_eq!(second.next(), Some("WHERE"));
        assert_eq!(first.next(), Some("AND"));
    }

    #[test]
    fn params_push_returns_one_based_placeholders() {
        let mut params = SqlParams::default();
        assert!(params.values.is_empty());
        assert_eq!(params.push("a"), "$1");
        assert_eq!(params.push(2_i64), "$2");
        assert_eq!(params.values.len(), 2);
        assert_eq!(
            params.values,
            vec![SqlValue::Text("a".into()), SqlValue::Int(2)]
        );
    }

    #[test]
    fn filter_deserializes_sparse_json() {
        let filter: PropertyFilter =
            serde_json::from_str(r#"{ "city": "Vancouver", "minimum_rating": 4 }"#).unwrap();
        assert_eq!(filter.city.as_deref(), Some("Vancouver"));
        assert_eq!(filter.minimum_rating, Some(4.0));
        assert!(filter.owner_id.is_none());
        assert_eq!(filter.predicate_count(), 1);
    }

    #[test]
    fn filter_zero_is_present() {
        let filter: PropertyFilter =
            serde_json::from_str(r#"{ "minimum_price_per_night": 0 }"#).unwrap();
        assert_eq!(filter.minimum_price_per_night, Some(0));
        assert_eq!(filter.predicate_count(), 1);
    }

    #[test]
    fn filter_empty_json_has_no_predicates() {
        let filter: PropertyFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, PropertyFilter::default());
        assert_eq!(filter.predicate_count(), 0);
    }
}
