//! Calendar period types used for time-aware filtering.
//!
//! Booking records carry a `year_month` key of the form `YYYY-MM`. Questions
//! name periods in prose ("March 2023"); `Month` and `TimePeriod` bridge the
//! two representations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number.
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    /// Two-digit month code (`"01"` through `"12"`).
    pub fn code(&self) -> String {
        format!("{:02}", self.number())
    }

    /// Capitalized English name.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Look up a month by its full English name, ignoring case.
    pub fn from_name(name: &str) -> Option<Month> {
        let needle = name.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::from_name(s).ok_or_else(|| format!("invalid month name: '{s}'"))
    }
}

/// Format a `YYYY-MM` key.
pub fn year_month_key(year: u16, month: Month) -> String {
    format!("{year:04}-{}", month.code())
}

/// A possibly partial period mentioned in a question.
///
/// Month and year are extracted independently, so any combination of the two
/// may be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub month: Option<Month>,
    pub year: Option<u16>,
}

impl TimePeriod {
    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    /// Human-readable label for answers ("March 2023", "2023", "the given period").
    pub fn label(&self) -> String {
        match (self.month, self.year) {
            (Some(m), Some(y)) => format!("{m} {y}"),
            (None, Some(y)) => y.to_string(),
            (Some(m), None) => m.to_string(),
            (None, None) => "the given period".to_string(),
        }
    }

    /// Whether a `YYYY-MM` key falls inside this period.
    ///
    /// Only month+year (exact key) and year-only (prefix) periods narrow
    /// anything; a bare month or an empty period matches every key.
    pub fn matches(&self, year_month: &str) -> bool {
        match (self.month, self.year) {
            (Some(m), Some(y)) => year_month == year_month_key(y, m),
            (None, Some(y)) => year_month.starts_with(&format!("{y:04}")),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_codes() {
        assert_eq!(Month::January.code(), "01");
        assert_eq!(Month::March.code(), "03");
        assert_eq!(Month::December.code(), "12");
    }

    #[test]
    fn test_month_name_roundtrip() {
        for month in Month::ALL {
            let parsed: Month = month.to_string().parse().unwrap();
            assert_eq!(parsed, month);
        }
        assert_eq!(Month::from_name("sEpTeMbEr"), Some(Month::September));
        assert_eq!(Month::from_name("Sept"), None);
    }

    #[test]
    fn test_year_month_key() {
        assert_eq!(year_month_key(2023, Month::March), "2023-03");
    }

    #[test]
    fn test_period_labels() {
        let full = TimePeriod {
            month: Some(Month::July),
            year: Some(2021),
        };
        assert_eq!(full.label(), "July 2021");
        let year_only = TimePeriod {
            month: None,
            year: Some(2021),
        };
        assert_eq!(year_only.label(), "2021");
        assert_eq!(TimePeriod::default().label(), "the given period");
    }

    #[test]
    fn test_period_matches() {
        let full = TimePeriod {
            month: Some(Month::July),
            year: Some(2016),
        };
        assert!(full.matches("2016-07"));
        assert!(!full.matches("2016-08"));

        let year_only = TimePeriod {
            month: None,
            year: Some(2016),
        };
        assert!(year_only.matches("2016-11"));
        assert!(!year_only.matches("2017-01"));

        let month_only = TimePeriod {
            month: Some(Month::July),
            year: None,
        };
        assert!(month_only.matches("2015-01"));
    }
}
