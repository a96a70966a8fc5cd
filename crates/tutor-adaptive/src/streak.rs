//! Consecutive-day practice streaks.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

/// The streak walk never looks further back than this many days.
pub const MAX_STREAK_LOOKBACK_DAYS: i64 = 365;

/// First day of the lookback window that ends on `today`.
pub fn lookback_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(MAX_STREAK_LOOKBACK_DAYS - 1)
}

/// Count consecutive practice days ending today or yesterday.
///
/// Walks backward from `today` one day at a time. A day without practice at
/// offset 0 does not break the streak (today may still be practiced); the
/// first gap at offset 1 or later ends it.
pub fn current_streak(today: NaiveDate, active_days: &BTreeSet<NaiveDate>) -> u32 {
    let mut streak = 0;

    for offset in 0..MAX_STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn days_ago(offsets: &[i64]) -> BTreeSet<NaiveDate> {
        offsets
            .iter()
            .map(|o| today() - Duration::days(*o))
            .collect()
    }

    #[test]
    fn test_no_sessions() {
        assert_eq!(current_streak(today(), &BTreeSet::new()), 0);
    }

    #[test]
    fn test_open_today_does_not_break_streak() {
        assert_eq!(current_streak(today(), &days_ago(&[1, 2])), 2);
        assert_eq!(current_streak(today(), &days_ago(&[1])), 1);
    }

    #[test]
    fn test_today_counts() {
        assert_eq!(current_streak(today(), &days_ago(&[0, 1, 2, 3])), 4);
        assert_eq!(current_streak(today(), &days_ago(&[0])), 1);
    }

    #[test]
    fn test_gap_ends_streak() {
        assert_eq!(current_streak(today(), &days_ago(&[0, 1, 3, 4, 5])), 2);
        // Nothing today or yesterday
        assert_eq!(current_streak(today(), &days_ago(&[2, 3])), 0);
    }

    #[test]
    fn test_streak_is_bounded() {
        let all: Vec<i64> = (0..500).collect();
        assert_eq!(current_streak(today(), &days_ago(&all)), 365);
    }

    #[test]
    fn test_lookback_start_covers_walk() {
        assert_eq!(today() - lookback_start(today()), Duration::days(364));
    }
}
