//! Data access. Every function takes the connection explicitly so callers
//! decide whether it runs standalone or inside a transaction.

use chrono::NaiveDate;

pub mod attendance;
pub mod budget;
pub mod clubs;
pub mod events;
pub mod expenses;
pub mod members;
pub mod officers;
pub mod roles;
pub mod sponsors;
pub mod students;

/// `ILIKE` pattern matching `needle` anywhere, with wildcards in the input escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Half-open date range `[Jan 1 of year, Jan 1 of year + 1)` covered by a fiscal year.
pub fn fiscal_year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("smith"), "%smith%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn fiscal_year_is_the_calendar_year() {
        let (start, end) = fiscal_year_bounds(2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let last_day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(start <= last_day && last_day < end);
    }

    #[test]
    fn fiscal_year_out_of_range() {
        assert_eq!(fiscal_year_bounds(i32::MAX), None);
    }
}
