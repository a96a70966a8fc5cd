//! Proficiency tier adaptation from recent session performance.

use crate::tier::Tier;

/// How many of the most recent sessions are considered when adapting the tier.
pub const RECENT_SESSIONS_WINDOW: i64 = 5;

/// Mean accuracy must be strictly above this to promote.
pub const PROMOTE_MIN_ACCURACY: f64 = 85.0;
/// Mean corrections per session must be strictly below this to promote.
pub const PROMOTE_MAX_CORRECTIONS: f64 = 3.0;
/// Mean accuracy strictly below this demotes.
pub const DEMOTE_MAX_ACCURACY: f64 = 60.0;
/// Mean corrections per session strictly above this demotes.
pub const DEMOTE_MIN_CORRECTIONS: f64 = 8.0;

/// The two numbers of a session that drive tier adaptation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionPerformance {
    /// Accuracy score of the session (0-100, 0 until the session ends)
    pub accuracy_score: f64,
    /// Number of corrections given during the session
    pub corrections: i32,
}

/// Adapt a learner's tier from their most recent sessions.
///
/// # Arguments
///
/// * `current` - The tier currently stored on the learner's profile
/// * `recent` - Performance of the most recent sessions (at most
///   [`RECENT_SESSIONS_WINDOW`] are expected, newest first)
///
/// # Algorithm
///
/// With no sessions the current tier is returned unchanged. Otherwise the mean
/// accuracy and mean correction count are computed and checked in order:
///
/// * accuracy > 85 and corrections < 3: promote one tier
/// * accuracy < 60 or corrections > 8: demote one tier
/// * otherwise: unchanged
///
/// The function is pure, so repeated calls on the same input agree.
pub fn adapt_tier(current: Tier, recent: &[SessionPerformance]) -> Tier {
    if recent.is_empty() {
        return current;
    }

    let n = recent.len() as f64;
    let mean_accuracy = recent.iter().map(|s| s.accuracy_score).sum::<f64>() / n;
    let mean_corrections = recent.iter().map(|s| f64::from(s.corrections)).sum::<f64>() / n;

    if mean_accuracy > PROMOTE_MIN_ACCURACY && mean_corrections < PROMOTE_MAX_CORRECTIONS {
        current.promote()
    } else if mean_accuracy < DEMOTE_MAX_ACCURACY || mean_corrections > DEMOTE_MIN_CORRECTIONS {
        current.demote()
    } else {
        current
    }
}
