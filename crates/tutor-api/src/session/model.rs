use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tutor_adaptive::{ErrorTypeCount, Tier};
use tutor_db::models::{Correction, ConversationMessage, LearningSession};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    /// Defaults to the profile's target language, then `en-US`
    pub target_language: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub topic: Option<String>,
    /// Casual, Lesson or Practice (default Casual)
    pub mode: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub target_language: String,
    pub topic: String,
    pub mode: String,
    pub difficulty_level: Tier,
    pub system_prompt: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMessageRequest {
    pub is_user: bool,
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
    /// Defaults to the session's target language
    pub language: Option<String>,
    #[validate(length(max = 32))]
    pub transcription_confidence: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCorrectionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub original_text: String,
    #[validate(length(min = 1, max = 4000))]
    pub corrected_text: String,
    /// Grouping label for weak areas; stored trimmed
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub error_type: String,
    #[serde(default)]
    #[validate(length(max = 4000))]
    pub explanation: String,
    /// Low, Medium or High (default Medium)
    pub severity: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EndSessionRequest {
    /// Defaults to 75 when the client has no score
    #[validate(range(min = 0.0, max = 100.0))]
    pub accuracy_score: Option<f64>,
    #[validate(length(max = 10000))]
    pub summary: Option<String>,
    #[validate(length(max = 10000))]
    pub vocabulary_list: Option<String>,
    #[validate(length(max = 10000))]
    pub common_mistakes: Option<String>,
}

/// Returned when a session ends
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub duration_minutes: i32,
    pub total_messages: i32,
    pub corrections_given: i32,
    pub accuracy_score: f64,
    pub difficulty_level: String,
    pub message_count: usize,
    pub correction_count: usize,
    /// The three most frequent error types of the session
    pub top_mistakes: Vec<ErrorTypeCount>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionHistoryEntry {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: i32,
    pub target_language: String,
    pub topic: String,
    pub total_messages: i32,
    pub corrections_given: i32,
    pub accuracy_score: f64,
    pub difficulty_level: String,
}

impl From<LearningSession> for SessionHistoryEntry {
    fn from(s: LearningSession) -> Self {
        Self {
            id: s.id,
            start_time: s.start_time,
            end_time: s.end_time,
            duration_minutes: s.duration_minutes,
            target_language: s.target_language,
            topic: s.topic,
            total_messages: s.total_messages,
            corrections_given: s.corrections_given,
            accuracy_score: s.accuracy_score,
            difficulty_level: s.difficulty_level,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: LearningSession,
    pub messages: Vec<ConversationMessage>,
    pub corrections: Vec<Correction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_request_accuracy_range() {
        let ok = EndSessionRequest {
            accuracy_score: Some(100.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_high = EndSessionRequest {
            accuracy_score: Some(100.5),
            ..Default::default()
        };
        assert!(too_high.validate().is_err());

        let negative = EndSessionRequest {
            accuracy_score: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        assert!(EndSessionRequest::default().validate().is_ok());
    }

    #[test]
    fn test_message_text_must_not_be_empty() {
        let request: AddMessageRequest =
            serde_json::from_str(r#"{"is_user": true, "text": ""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: AddMessageRequest =
            serde_json::from_str(r#"{"is_user": false, "text": "Hola"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_error_type_must_not_be_blank() {
        let correction = |error_type: &str| AddCorrectionRequest {
            original_text: "yo es".to_string(),
            corrected_text: "yo soy".to_string(),
            error_type: error_type.to_string(),
            explanation: String::new(),
            severity: None,
        };

        assert!(correction("").validate().is_err());
        assert!(correction("   ").validate().is_err());
        assert!(correction("\t\n").validate().is_err());
        assert!(correction(" Grammar ").validate().is_ok());
    }

    #[test]
    fn test_history_limit_defaults_to_ten() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
    }
}
