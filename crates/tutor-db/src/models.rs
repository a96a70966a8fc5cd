use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Learner account, provisioned by the auth service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub native_language: String,
    pub created_at: DateTime<Utc>,
}

/// Learning preferences and lifetime statistics of a user (one per user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Language tag being learned (e.g. "es-ES")
    pub target_language: String,
    /// Beginner, Intermediate or Advanced
    pub proficiency_level: String,
    /// Numeric level on a 1-10 scale
    pub current_level: i32,
    /// Comma-separated focus areas
    pub focus_areas: String,
    pub learning_goals: String,
    pub total_sessions: i32,
    pub total_minutes_learned: i32,
    pub total_corrections: i32,
    /// Running mean of the accuracy of every ended session
    pub average_accuracy: f64,
    /// Weak areas as of the last ended session
    pub weak_areas: Vec<String>,
    pub last_session_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Preferences a user may edit on their profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePreferences {
    pub target_language: String,
    pub focus_areas: String,
    pub learning_goals: String,
}

/// One tutoring conversation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_language: String,
    pub topic: String,
    /// Casual, Lesson or Practice
    pub mode: String,
    pub start_time: DateTime<Utc>,
    /// `None` while the session is active
    pub end_time: Option<DateTime<Utc>>,
    /// Whole minutes, 0 until the session ends
    pub duration_minutes: i32,
    pub total_messages: i32,
    pub corrections_given: i32,
    /// 0-100, 0 until the session ends
    pub accuracy_score: f64,
    /// Tier snapshot taken when the session started
    pub difficulty_level: String,
    pub conversation_summary: String,
    pub vocabulary_list: String,
    pub common_mistakes: String,
}

impl LearningSession {
    pub const fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Insert struct for `learning_sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub user_id: Uuid,
    pub target_language: String,
    pub topic: String,
    pub mode: String,
    pub start_time: DateTime<Utc>,
    pub difficulty_level: String,
}

/// Values written when a session ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnd {
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub accuracy_score: f64,
    pub conversation_summary: String,
    pub vocabulary_list: String,
    pub common_mistakes: String,
}

/// Vocabulary collected during one session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionVocabulary {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub topic: String,
    pub vocabulary_list: String,
}

/// Accuracy and corrections of one session, used for tier adaptation
#[derive(Debug, Clone, Copy, FromRow)]
pub struct SessionPerformanceRow {
    pub accuracy_score: f64,
    pub corrections_given: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sent_at: DateTime<Utc>,
    /// `true` when spoken by the learner, `false` for the tutor
    pub is_user: bool,
    pub text: String,
    pub language: String,
    pub transcription_confidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub session_id: Uuid,
    pub sent_at: DateTime<Utc>,
    pub is_user: bool,
    pub text: String,
    pub language: String,
    pub transcription_confidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Correction {
    pub id: Uuid,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub original_text: String,
    pub corrected_text: String,
    /// Grammar, Vocabulary, Pronunciation, Spelling, ...
    pub error_type: String,
    pub explanation: String,
    /// Low, Medium or High
    pub severity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCorrection {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub original_text: String,
    pub corrected_text: String,
    pub error_type: String,
    pub explanation: String,
    pub severity: String,
}

/// Number of corrections per error type
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ErrorTypeCountRow {
    pub error_type: String,
    pub count: i64,
}

/// A correction flattened with its label, used for weak-area examples
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CorrectionExample {
    pub error_type: String,
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user, per-day, per-language rollup of session activity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub progress_date: NaiveDate,
    pub target_language: String,
    pub sessions_completed: i32,
    pub minutes_learned: i32,
    /// Learner-authored messages only
    pub messages_spoken: i32,
    pub corrections_received: i32,
    pub average_accuracy: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Totals across all of a user's sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionOverview {
    pub total_sessions: i64,
    pub total_minutes: i64,
    /// Mean accuracy of ended sessions, `None` when nothing has ended yet
    pub average_accuracy: Option<f64>,
}
