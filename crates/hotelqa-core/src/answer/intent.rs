//! Keyword-driven question intents.

use std::fmt;

use serde::{Deserialize, Serialize};

use hotelqa_types::booking::Column;

/// A question category answered directly from retrieved records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RoomType,
    GuestCountry,
    RepeatCustomers,
    Revenue,
}

/// Ordered rule table. The first intent with a matching phrase wins.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::RoomType, &["room type"]),
    (Intent::GuestCountry, &["most guests", "top country"]),
    (Intent::RepeatCustomers, &["repeat customers"]),
    (Intent::Revenue, &["revenue"]),
];

impl Intent {
    /// Match `question` against the rule table, ignoring case.
    pub fn detect(question: &str) -> Option<Intent> {
        let lowered = question.to_lowercase();
        RULES
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| lowered.contains(p)))
            .map(|(intent, _)| *intent)
    }

    /// Trigger phrases for this intent.
    #[cfg(test)]
    fn phrases(&self) -> &'static [&'static str] {
        RULES
            .iter()
            .find(|(intent, _)| intent == self)
            .map(|(_, phrases)| *phrases)
            .unwrap_or(&[])
    }

    /// Columns the intent reads. Checked in order before answering.
    pub fn required_columns(&self) -> &'static [Column] {
        match self {
            Intent::RoomType => &[Column::ReservedRoomType],
            Intent::GuestCountry => &[Column::Country],
            Intent::RepeatCustomers => &[Column::IsRepeatedGuest],
            Intent::Revenue => &[Column::Revenue, Column::Hotel, Column::YearMonth],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::RoomType => "room_type",
            Intent::GuestCountry => "guest_country",
            Intent::RepeatCustomers => "repeat_customers",
            Intent::Revenue => "revenue",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
