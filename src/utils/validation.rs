//! Centralized validation and helper functions.

use std::collections::HashSet;

/// Maximum number of data rows accepted from a single table (DOS protection)
pub const MAX_ROWS: usize = 1_000_000;

/// Check if adding another row would exceed `limit` (normally [`MAX_ROWS`]).
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_row_limit(count: usize, limit: usize) -> Option<String> {
    if count >= limit {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {limit}"
        ))
    } else {
        None
    }
}

/// Return the first header name that appears more than once.
#[must_use]
pub fn find_duplicate<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

/// Parse a numeric cell, rejecting NaN and infinities.
///
/// # Examples
///
/// ```
/// use ideal_match::utils::validation::parse_finite;
///
/// assert_eq!(parse_finite(" -1.5 "), Some(-1.5));
/// assert_eq!(parse_finite("NaN"), None);
/// assert_eq!(parse_finite("abc"), None);
/// ```
#[must_use]
pub fn parse_finite(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
