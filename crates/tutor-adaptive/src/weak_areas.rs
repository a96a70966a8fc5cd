//! Ranking of error categories from recent corrections.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Corrections from sessions started within this many days are considered.
pub const WEAK_AREA_LOOKBACK_DAYS: i64 = 30;

/// Maximum number of weak areas reported.
pub const MAX_WEAK_AREAS: usize = 5;

/// Number of occurrences of an error-type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTypeCount {
    pub error_type: String,
    pub count: i64,
}

/// Start of the weak-area lookback window relative to `now`.
pub fn lookback_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WEAK_AREA_LOOKBACK_DAYS)
}

/// Count occurrences of each label.
pub fn count_error_types<'a, I>(labels: I) -> Vec<ErrorTypeCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    rank_error_types(
        counts
            .into_iter()
            .map(|(error_type, count)| ErrorTypeCount {
                error_type: error_type.to_string(),
                count,
            })
            .collect(),
    )
}

/// Sort counts by descending count, breaking ties by label so the order is
/// deterministic for a fixed input.
pub fn rank_error_types(mut counts: Vec<ErrorTypeCount>) -> Vec<ErrorTypeCount> {
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.error_type.cmp(&b.error_type))
    });
    counts
}

/// The labels of the [`MAX_WEAK_AREAS`] most frequent error types.
pub fn top_weak_areas(counts: Vec<ErrorTypeCount>) -> Vec<String> {
    rank_error_types(counts)
        .into_iter()
        .take(MAX_WEAK_AREAS)
        .map(|c| c.error_type)
        .collect()
}
