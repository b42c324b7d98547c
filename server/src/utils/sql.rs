//! SQL utility functions

/// Build a LIKE pattern matching `s` anywhere in a column.
///
/// The input is wrapped in `%…%` as is. Any `%` or `_` it contains keeps
/// its wildcard meaning. The result is meant to be bound as a parameter,
/// never spliced into SQL.
///
/// # Example
///
/// ```
/// use lightbnb_server::utils::sql::contains_pattern;
///
/// assert_eq!(contains_pattern("Van"), "%Van%");
/// assert_eq!(contains_pattern("St_John"), "%St_John%");
/// ```
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", s)
}
