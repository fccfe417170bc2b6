//! Precomputed analytics types.
//!
//! Analytics values are opaque, already-formatted strings ("$1,234.56",
//! "104.01 days") produced outside the service and stored by key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known analytics keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsKey {
    TotalRevenue,
    AverageLeadTime,
    MostCommonCancelDate,
    HighestRevenueMonth,
    HighestRevenueValue,
    MostPopularHotel,
    MostPopularRoomType,
    MostCommonCountry,
    MostCommonMonth,
    TopCancellationLocations,
    AverageBookingPrice,
}

impl AnalyticsKey {
    pub const ALL: [AnalyticsKey; 11] = [
        AnalyticsKey::TotalRevenue,
        AnalyticsKey::AverageLeadTime,
        AnalyticsKey::MostCommonCancelDate,
        AnalyticsKey::HighestRevenueMonth,
        AnalyticsKey::HighestRevenueValue,
        AnalyticsKey::MostPopularHotel,
        AnalyticsKey::MostPopularRoomType,
        AnalyticsKey::MostCommonCountry,
        AnalyticsKey::MostCommonMonth,
        AnalyticsKey::TopCancellationLocations,
        AnalyticsKey::AverageBookingPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsKey::TotalRevenue => "total_revenue",
            AnalyticsKey::AverageLeadTime => "average_lead_time",
            AnalyticsKey::MostCommonCancelDate => "most_common_cancel_date",
            AnalyticsKey::HighestRevenueMonth => "highest_revenue_month",
            AnalyticsKey::HighestRevenueValue => "highest_revenue_value",
            AnalyticsKey::MostPopularHotel => "most_popular_hotel",
            AnalyticsKey::MostPopularRoomType => "most_popular_room_type",
            AnalyticsKey::MostCommonCountry => "most_common_country",
            AnalyticsKey::MostCommonMonth => "most_common_month",
            AnalyticsKey::TopCancellationLocations => "top_cancellation_locations",
            AnalyticsKey::AverageBookingPrice => "average_booking_price",
        }
    }
}

impl fmt::Display for AnalyticsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticsKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("invalid analytics key: '{s}'"))
    }
}

/// A stored analytics value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_key_roundtrip() {
        for key in AnalyticsKey::ALL {
            let parsed: AnalyticsKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_analytics_key_serde_matches_as_str() {
        let json = serde_json::to_string(&AnalyticsKey::MostPopularRoomType).unwrap();
        assert_eq!(json, "\"most_popular_room_type\"");
    }

    #[test]
    fn test_invalid_analytics_key() {
        assert!("median_revenue".parse::<AnalyticsKey>().is_err());
    }
}
