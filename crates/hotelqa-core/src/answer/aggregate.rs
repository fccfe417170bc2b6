//! Small aggregates over retrieved records.

use std::collections::BTreeMap;

/// Most frequent value. Ties resolve to the smallest value.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    // BTreeMap iterates in ascending key order, so keeping only strictly
    // greater counts leaves the smallest key among ties.
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Sum `amount` per group and return the group with the largest total.
/// Ties resolve to the smallest group key.
pub fn argmax_group_sum<'a, I>(rows: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (group, amount) in rows {
        *sums.entry(group).or_default() += amount;
    }

    let mut best: Option<(&str, f64)> = None;
    for (group, total) in sums {
        if best.is_none_or(|(_, t)| total > t) {
            best = Some((group, total));
        }
    }
    best
}

/// Format an amount as `$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        assert_eq!(mode(["A", "D", "A", "E"]), Some("A"));
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_mode_tie_takes_smallest() {
        assert_eq!(mode(["PRT", "GBR", "PRT", "GBR", "FRA"]), Some("GBR"));
    }

    #[test]
    fn test_argmax_group_sum() {
        let rows = [
            ("City Hotel", 100.0),
            ("Resort Hotel", 150.0),
            ("City Hotel", 75.5),
        ];
        assert_eq!(argmax_group_sum(rows), Some(("City Hotel", 175.5)));
        assert_eq!(argmax_group_sum(Vec::<(&str, f64)>::new()), None);
    }

    #[test]
    fn test_argmax_tie_takes_smallest_group() {
        let rows = [("Resort Hotel", 50.0), ("City Hotel", 50.0)];
        assert_eq!(argmax_group_sum(rows), Some(("City Hotel", 50.0)));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-4321.0), "$-4,321.00");
    }
}
