use serde::{Deserialize, Serialize};
use tutor_db::models::ProfilePreferences;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub target_language: String,
    /// Comma-separated, e.g. "Grammar,Vocabulary"
    #[validate(length(max = 500))]
    pub focus_areas: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub learning_goals: String,
}

impl From<UpdateProfileRequest> for ProfilePreferences {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            target_language: req.target_language,
            focus_areas: normalize_focus_areas(&req.focus_areas),
            learning_goals: req.learning_goals.trim().to_string(),
        }
    }
}

/// Trim each comma-separated entry and drop empty ones
fn normalize_focus_areas(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
