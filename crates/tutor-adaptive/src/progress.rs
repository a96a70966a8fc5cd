//! Folding a completed session into daily and lifetime progress.

use serde::{Deserialize, Serialize};

/// Skills scored from correction labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Grammar,
    Vocabulary,
    Pronunciation,
}

impl Skill {
    /// Lowercase label fragment that marks a correction as belonging to this skill.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Vocabulary => "vocabulary",
            Self::Pronunciation => "pronunciation",
        }
    }

    /// Whether an error-type label belongs to this skill (case-insensitive
    /// substring match, so "Grammar - Tense" counts as grammar).
    pub fn matches(self, error_type: &str) -> bool {
        error_type.to_lowercase().contains(self.keyword())
    }

    pub fn count_errors<S: AsRef<str>>(self, error_types: &[S]) -> usize {
        error_types
            .iter()
            .filter(|e| self.matches(e.as_ref()))
            .count()
    }
}

/// Incremental mean after adding one sample.
///
/// `new_count` is the number of samples *including* the new one. Each sample
/// has equal weight, so the result equals `(old_avg * (n - 1) + sample) / n`.
/// A non-positive `new_count` yields the sample itself.
pub fn incremental_mean(old_avg: f64, new_count: i32, sample: f64) -> f64 {
    if new_count <= 1 {
        return sample;
    }
    let n = f64::from(new_count);
    (old_avg * (n - 1.0) + sample) / n
}

/// Skill score for a number of errors relative to the messages spoken that day.
///
/// `max(0, 100 - errors * 100 / messages * 10)`, with `messages` floored at 1.
pub fn skill_score(error_count: usize, messages_spoken: i32) -> f64 {
    let messages = f64::from(messages_spoken.max(1));
    (100.0 - error_count as f64 * 100.0 / messages * 10.0).max(0.0)
}

/// What a single ended session contributes to progress.
#[derive(Debug, Clone, Copy)]
pub struct SessionOutcome<'a> {
    pub duration_minutes: i32,
    pub accuracy_score: f64,
    /// Messages authored by the learner (tutor messages excluded)
    pub user_messages: i32,
    /// Error-type label of every correction in the session
    pub error_types: &'a [String],
}

impl SessionOutcome<'_> {
    pub fn corrections(&self) -> i32 {
        i32::try_from(self.error_types.len()).unwrap_or(i32::MAX)
    }
}

/// Counters and scores of one daily progress record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub sessions_completed: i32,
    pub minutes_learned: i32,
    pub messages_spoken: i32,
    pub corrections_received: i32,
    pub average_accuracy: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
}

impl DailyTotals {
    /// Add one ended session to the day.
    ///
    /// Counters accumulate and the accuracy is a running mean with one sample
    /// per session. Skill scores are recomputed from this session's
    /// corrections alone and replace whatever the day held before; fluency
    /// mirrors the day's running accuracy.
    pub fn record_session(&mut self, outcome: &SessionOutcome<'_>) {
        self.sessions_completed += 1;
        self.minutes_learned += outcome.duration_minutes;
        self.messages_spoken += outcome.user_messages;
        self.corrections_received += outcome.corrections();
        self.average_accuracy = incremental_mean(
            self.average_accuracy,
            self.sessions_completed,
            outcome.accuracy_score,
        );

        let messages_spoken = self.messages_spoken;
        let score =
            |skill: Skill| skill_score(skill.count_errors(outcome.error_types), messages_spoken);
        self.grammar_score = score(Skill::Grammar);
        self.vocabulary_score = score(Skill::Vocabulary);
        self.pronunciation_score = score(Skill::Pronunciation);
        self.fluency_score = self.average_accuracy;
    }
}

/// Lifetime statistics kept on the learner's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeTotals {
    pub total_sessions: i32,
    pub total_minutes: i32,
    pub total_corrections: i32,
    pub average_accuracy: f64,
}

impl LifetimeTotals {
    /// Add one ended session; the average becomes `(A * N + S) / (N + 1)`.
    pub fn record_session(&mut self, outcome: &SessionOutcome<'_>) {
        self.total_sessions += 1;
        self.total_minutes += outcome.duration_minutes;
        self.total_corrections += outcome.corrections();
        self.average_accuracy = incremental_mean(
            self.average_accuracy,
            self.total_sessions,
            outcome.accuracy_score,
        );
    }
}
