//! Phrase-to-key routing for analytics questions.

use hotelqa_types::analytics::AnalyticsKey;

/// Ordered phrase table. Earlier rows take precedence.
pub const KEYWORDS: &[(&str, AnalyticsKey)] = &[
    ("total revenue", AnalyticsKey::TotalRevenue),
    ("average lead time", AnalyticsKey::AverageLeadTime),
    ("most common cancellation date", AnalyticsKey::MostCommonCancelDate),
    ("highest revenue month", AnalyticsKey::HighestRevenueMonth),
    ("highest revenue value", AnalyticsKey::HighestRevenueValue),
    ("most popular hotel", AnalyticsKey::MostPopularHotel),
    ("most popular room type", AnalyticsKey::MostPopularRoomType),
    ("most common country", AnalyticsKey::MostCommonCountry),
    ("most common month", AnalyticsKey::MostCommonMonth),
    ("highest booking cancellations", AnalyticsKey::TopCancellationLocations),
    ("average price of a hotel booking", AnalyticsKey::AverageBookingPrice),
];

/// Map a question to the first analytics key whose phrase it contains.
pub fn match_keyword(question: &str) -> Option<AnalyticsKey> {
    let lowered = question.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, key)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_reachable() {
        for key in AnalyticsKey::ALL {
            assert!(KEYWORDS.iter().any(|(_, k)| *k == key), "{key} has no phrase");
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(
            match_keyword("What is the AVERAGE LEAD TIME?"),
            Some(AnalyticsKey::AverageLeadTime)
        );
        assert_eq!(
            match_keyword("Which places have the highest booking cancellations?"),
            Some(AnalyticsKey::TopCancellationLocations)
        );
    }

    #[test]
    fn test_first_table_match_wins() {
        // Contains both "total revenue" and "highest revenue month".
        assert_eq!(
            match_keyword("total revenue in the highest revenue month"),
            Some(AnalyticsKey::TotalRevenue)
        );
        // "most popular hotel" precedes "most popular room type" in the table,
        // but only the latter phrase occurs here.
        assert_eq!(
            match_keyword("most popular room type"),
            Some(AnalyticsKey::MostPopularRoomType)
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(match_keyword("how is the weather"), None);
    }
}
