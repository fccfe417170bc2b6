//! Time-period extraction from free-text questions.
//!
//! Two extractors with deliberately different strictness:
//!
//! - [`extract_time_period`] finds a month name anywhere (even inside another
//!   word) and, independently, a standalone `20xx` year. Used by the revenue
//!   rule of the answer composer.
//! - [`extract_year_month`] only fires on a whole-word month name followed by
//!   a single whitespace character and a four-digit year. Used by the
//!   retriever's `year_month` filter.

use std::sync::LazyLock;

use regex::Regex;

use hotelqa_types::period::{Month, TimePeriod, year_month_key};

const MONTH_ALTERNATION: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

static MONTH_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)({MONTH_ALTERNATION})")).expect("static pattern compiles")
});

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("static pattern compiles"));

static MONTH_THEN_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTH_ALTERNATION})\b\s(\d{{4}})"))
        .expect("static pattern compiles")
});

/// Extract an optional month and an optional year from `query`.
///
/// The earliest month name in the string wins, as does the earliest year.
pub fn extract_time_period(query: &str) -> TimePeriod {
    let month = MONTH_ANYWHERE
        .captures(query)
        .and_then(|c| Month::from_name(&c[1]));

    let year = YEAR_TOKEN
        .captures(query)
        .and_then(|c| c[1].parse::<u16>().ok());

    TimePeriod { month, year }
}

/// Extract an adjacent "Month YYYY" pair as a `YYYY-MM` key.
pub fn extract_year_month(query: &str) -> Option<String> {
    let caps = MONTH_THEN_YEAR.captures(query)?;
    let month = Month::from_name(&caps[1])?;
    let year = caps[2].parse::<u16>().ok()?;
    Some(year_month_key(year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_month_and_year() {
        let period = extract_time_period("What was the revenue in March 2023?");
        assert_eq!(period.month.map(|m| m.code()), Some("03".to_string()));
        assert_eq!(period.year, Some(2023));
    }

    #[test]
    fn test_general_year_only() {
        let period = extract_time_period("Show 2022 revenue");
        assert_eq!(period.month, None);
        assert_eq!(period.year, Some(2022));
    }

    #[test]
    fn test_general_is_case_insensitive_and_non_adjacent() {
        let period = extract_time_period("revenue for JULY in the year 2017");
        assert_eq!(period.month, Some(Month::July));
        assert_eq!(period.year, Some(2017));
    }

    #[test]
    fn test_general_earliest_month_wins() {
        let period = extract_time_period("compare december with january 2020");
        assert_eq!(period.month, Some(Month::December));
    }

    #[test]
    fn test_general_month_inside_word() {
        // No word boundary on month names: "mayor" contains "may".
        let period = extract_time_period("what did the mayor book");
        assert_eq!(period.month, Some(Month::May));
        assert_eq!(period.year, None);
    }

    #[test]
    fn test_general_year_requires_whole_token_in_range() {
        assert_eq!(extract_time_period("booking 120231").year, None);
        assert_eq!(extract_time_period("in 1999").year, None);
        assert_eq!(extract_time_period("nothing here"), TimePeriod::default());
    }

    #[test]
    fn test_adjacent_month_year() {
        assert_eq!(extract_year_month("march 2023"), Some("2023-03".to_string()));
        assert_eq!(
            extract_year_month("Bookings in July 2021 please"),
            Some("2021-07".to_string())
        );
    }

    #[test]
    fn test_adjacent_requires_adjacency() {
        assert_eq!(extract_year_month("revenue march in 2023"), None);
        assert_eq!(extract_year_month("march  2023"), None);
        assert_eq!(extract_year_month("2023 march"), None);
    }

    #[test]
    fn test_adjacent_requires_whole_word_month() {
        assert_eq!(extract_year_month("summarch 2023"), None);
        assert_eq!(extract_year_month("marches 2023"), None);
    }
}
