use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tutor_adaptive::ErrorTypeCount;
use tutor_db::models::{Correction, CorrectionExample, DailyProgress, SessionVocabulary};
use uuid::Uuid;

/// The dashboard's progress strip starts this many days before today, so it
/// spans eight calendar days with today included
pub const WEEKLY_PROGRESS_LOOKBACK_DAYS: i64 = 7;
/// Corrections listed on the dashboard
pub const RECENT_CORRECTIONS: i64 = 5;
/// Examples attached to each weak area
pub const EXAMPLES_PER_WEAK_AREA: i64 = 3;
/// Sessions listed by the vocabulary view
pub const VOCABULARY_SESSIONS: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    #[serde(default = "default_progress_days")]
    pub days: i64,
    pub language: Option<String>,
}

fn default_progress_days() -> i64 {
    30
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Overview {
    /// Sessions across every language
    pub total_sessions: i64,
    pub total_minutes: i64,
    /// Mean accuracy of ended sessions, rounded to 2 decimals
    pub average_accuracy: f64,
    pub current_streak: u32,
    pub proficiency_level: String,
    pub current_level: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Dashboard {
    pub target_language: String,
    pub overview: Overview,
    /// Daily rows of the last week, every language
    pub weekly_progress: Vec<DailyProgress>,
    pub weak_areas: Vec<String>,
    pub recent_corrections: Vec<Correction>,
}

/// One day of the progress chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgressPoint {
    pub date: NaiveDate,
    pub minutes_learned: i32,
    pub sessions_completed: i32,
    pub messages_spoken: i32,
    pub corrections_received: i32,
    pub average_accuracy: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
}

impl DailyProgressPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            minutes_learned: 0,
            sessions_completed: 0,
            messages_spoken: 0,
            corrections_received: 0,
            average_accuracy: 0.0,
            grammar_score: 0.0,
            vocabulary_score: 0.0,
            pronunciation_score: 0.0,
            fluency_score: 0.0,
        }
    }
}

impl From<&DailyProgress> for DailyProgressPoint {
    fn from(row: &DailyProgress) -> Self {
        Self {
            date: row.progress_date,
            minutes_learned: row.minutes_learned,
            sessions_completed: row.sessions_completed,
            messages_spoken: row.messages_spoken,
            corrections_received: row.corrections_received,
            average_accuracy: row.average_accuracy,
            grammar_score: row.grammar_score,
            vocabulary_score: row.vocabulary_score,
            pronunciation_score: row.pronunciation_score,
            fluency_score: row.fluency_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakAreaExample {
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakAreaDetail {
    pub error_type: String,
    pub count: i64,
    pub examples: Vec<WeakAreaExample>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub session_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub topic: String,
    pub vocabulary_list: String,
}

impl From<SessionVocabulary> for VocabularyEntry {
    fn from(v: SessionVocabulary) -> Self {
        Self {
            session_id: v.id,
            start_time: v.start_time,
            topic: v.topic,
            vocabulary_list: v.vocabulary_list,
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First day of the dashboard's progress strip
pub fn weekly_progress_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WEEKLY_PROGRESS_LOOKBACK_DAYS)
}

/// First day of a `days`-long window ending on `today`
pub fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days - 1)
}

/// One point per day for the `days` days ending on `today`, oldest first.
/// Days without a stored row are zero-filled.
pub fn fill_daily_series(
    today: NaiveDate,
    days: i64,
    rows: &[DailyProgress],
) -> Vec<DailyProgressPoint> {
    let by_date: HashMap<NaiveDate, &DailyProgress> =
        rows.iter().map(|row| (row.progress_date, row)).collect();

    let start = window_start(today, days);
    (0..days)
        .map(|offset| start + Duration::days(offset))
        .map(|date| {
            by_date
                .get(&date)
                .map_or_else(|| DailyProgressPoint::empty(date), |row| (*row).into())
        })
        .collect()
}

/// Attach the examples of each label to the ranked counts, keeping the
/// ranking order.
pub fn assemble_weak_area_details(
    ranking: Vec<ErrorTypeCount>,
    examples: Vec<CorrectionExample>,
) -> Vec<WeakAreaDetail> {
    let mut by_type: HashMap<String, Vec<WeakAreaExample>> = HashMap::new();
    for example in examples {
        by_type
            .entry(example.error_type)
            .or_default()
            .push(WeakAreaExample {
                original_text: example.original_text,
                corrected_text: example.corrected_text,
                explanation: example.explanation,
                created_at: example.created_at,
            });
    }

    ranking
        .into_iter()
        .map(|entry| WeakAreaDetail {
            examples: by_type.remove(&entry.error_type).unwrap_or_default(),
            error_type: entry.error_type,
            count: entry.count,
        })
        .collect()
}
