//! Booking record domain types.
//!
//! A `BookingRecord` is one row of the hotel bookings dataset. Records are
//! fully typed, so a column missing from the source file still produces a
//! defaulted field; the `ColumnSet` travelling with the corpus records which
//! columns were actually present so that downstream consumers can refuse to
//! answer from data they never had.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A named column of the bookings dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Hotel,
    ArrivalDateYear,
    ArrivalDateMonth,
    ArrivalDateDayOfMonth,
    LeadTime,
    ReservedRoomType,
    Country,
    Adr,
    Revenue,
    IsCanceled,
    IsRepeatedGuest,
    ReservationStatusDate,
    YearMonth,
    Text,
}

impl Column {
    /// Every recognized column, in dataset header order.
    pub const ALL: [Column; 14] = [
        Column::Hotel,
        Column::ArrivalDateYear,
        Column::ArrivalDateMonth,
        Column::ArrivalDateDayOfMonth,
        Column::LeadTime,
        Column::ReservedRoomType,
        Column::Country,
        Column::Adr,
        Column::Revenue,
        Column::IsCanceled,
        Column::IsRepeatedGuest,
        Column::ReservationStatusDate,
        Column::YearMonth,
        Column::Text,
    ];

    /// The header name used in the CSV source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Hotel => "hotel",
            Column::ArrivalDateYear => "arrival_date_year",
            Column::ArrivalDateMonth => "arrival_date_month",
            Column::ArrivalDateDayOfMonth => "arrival_date_day_of_month",
            Column::LeadTime => "lead_time",
            Column::ReservedRoomType => "reserved_room_type",
            Column::Country => "country",
            Column::Adr => "adr",
            Column::Revenue => "revenue",
            Column::IsCanceled => "is_canceled",
            Column::IsRepeatedGuest => "is_repeated_guest",
            Column::ReservationStatusDate => "reservation_status_date",
            Column::YearMonth => "year_month",
            Column::Text => "text",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown column: '{s}'"))
    }
}

/// The set of columns present in a dataset source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    /// A set containing every recognized column.
    pub fn all() -> Self {
        Self(Column::ALL.into_iter().collect())
    }

    /// Build a set from CSV header names, ignoring unrecognized headers.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(headers.into_iter().filter_map(|h| h.parse().ok()).collect())
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn insert(&mut self, column: Column) {
        self.0.insert(column);
    }

    pub fn remove(&mut self, column: Column) {
        self.0.remove(&column);
    }

    /// The first column of `required` that is not present, if any.
    pub fn first_missing(&self, required: &[Column]) -> Option<Column> {
        required.iter().copied().find(|c| !self.contains(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One booking row.
///
/// Field names match the dataset headers so the record deserializes straight
/// from CSV. Numeric and flag fields accept empty cells as their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRecord {
    pub hotel: String,
    #[serde(deserialize_with = "lenient")]
    pub arrival_date_year: i32,
    pub arrival_date_month: String,
    #[serde(deserialize_with = "lenient")]
    pub arrival_date_day_of_month: u32,
    #[serde(deserialize_with = "lenient")]
    pub lead_time: u32,
    pub reserved_room_type: String,
    pub country: String,
    #[serde(deserialize_with = "lenient")]
    pub adr: f64,
    #[serde(deserialize_with = "lenient")]
    pub revenue: f64,
    #[serde(deserialize_with = "flag")]
    pub is_canceled: bool,
    #[serde(deserialize_with = "flag")]
    pub is_repeated_guest: bool,
    pub reservation_status_date: String,
    pub year_month: String,
    pub text: String,
}

impl BookingRecord {
    /// Canonical text summary used for embedding and as generation context.
    pub fn summary_text(&self) -> String {
        format!(
            "Hotel: {}, Date: {}, Revenue: {}",
            self.hotel, self.year_month, self.adr
        )
    }
}

/// A raw dataset cell as reported by a self-describing deserializer.
///
/// CSV cells arrive as inferred scalars, JSON cells as typed values.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Parse a numeric cell, treating an empty cell as the type's default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let text = match Option::<Cell>::deserialize(deserializer)? {
        None => return Ok(T::default()),
        Some(Cell::Int(i)) => i.to_string(),
        Some(Cell::Float(f)) => f.to_string(),
        Some(Cell::Text(s)) => s,
        Some(Cell::Bool(b)) => {
            return Err(serde::de::Error::custom(format!(
                "expected a number, found '{b}'"
            )));
        }
    };
    match text.trim() {
        "" | "NA" => Ok(T::default()),
        s => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Parse a 0/1 (or true/false) flag cell.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Cell>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Cell::Bool(b)) => Ok(b),
        Some(Cell::Int(0)) => Ok(false),
        Some(Cell::Int(1)) => Ok(true),
        Some(Cell::Float(f)) if f == 0.0 => Ok(false),
        Some(Cell::Float(f)) if f == 1.0 => Ok(true),
        Some(Cell::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "invalid flag value: '{other}'"
            ))),
        },
        Some(_) => Err(serde::de::Error::custom("invalid flag value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_roundtrip() {
        for column in Column::ALL {
            let parsed: Column = column.as_str().parse().unwrap();
            assert_eq!(parsed, column);
        }
    }

    #[test]
    fn test_column_parse_is_case_insensitive() {
        assert_eq!("Year_Month".parse::<Column>().unwrap(), Column::YearMonth);
        assert!("stays_in_week_nights".parse::<Column>().is_err());
    }

    #[test]
    fn test_column_set_from_headers_skips_unknown() {
        let set = ColumnSet::from_headers(["hotel", "adr", "babies", "text"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(Column::Hotel));
        assert!(!set.contains(Column::Revenue));
    }

    #[test]
    fn test_first_missing_follows_required_order() {
        let set: ColumnSet = [Column::Hotel, Column::Text].into_iter().collect();
        let missing = set.first_missing(&[Column::Revenue, Column::Hotel, Column::YearMonth]);
        assert_eq!(missing, Some(Column::Revenue));
        assert_eq!(set.first_missing(&[Column::Hotel]), None);
    }

    #[test]
    fn test_summary_text_format() {
        let record = BookingRecord {
            hotel: "City Hotel".to_string(),
            year_month: "2016-08".to_string(),
            adr: 98.5,
            ..Default::default()
        };
        assert_eq!(
            record.summary_text(),
            "Hotel: City Hotel, Date: 2016-08, Revenue: 98.5"
        );
    }

    #[test]
    fn test_record_serde_json_roundtrip() {
        let record = BookingRecord {
            hotel: "Resort Hotel".to_string(),
            reserved_room_type: "A".to_string(),
            is_repeated_guest: true,
            revenue: 320.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"is_repeated_guest\":true"));
        let parsed: BookingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
