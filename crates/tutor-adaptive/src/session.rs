//! Session lifecycle vocabulary.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "General Conversation";

/// Accuracy recorded when a session is ended without a score.
pub const DEFAULT_ACCURACY_SCORE: f64 = 75.0;

/// Number of mistake types listed in an end-of-session summary.
pub const SUMMARY_TOP_MISTAKES: usize = 3;

/// Whole minutes between start and end, truncated.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let minutes = (end - start).num_minutes().max(0);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    #[default]
    Casual,
    Lesson,
    Practice,
}

impl SessionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "Casual",
            Self::Lesson => "Lesson",
            Self::Practice => "Practice",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Casual, Self::Lesson, Self::Practice]
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown session mode: '{s}'"))
    }
}

/// How serious a correction is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown severity: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_truncates_to_whole_minutes() {
        let start = Utc::now();
        assert_eq!(duration_minutes(start, start), 0);
        assert_eq!(duration_minutes(start, start + Duration::seconds(59)), 0);
        assert_eq!(duration_minutes(start, start + Duration::seconds(10 * 60 + 59)), 10);
        // Clock skew never produces a negative duration
        assert_eq!(duration_minutes(start, start - Duration::minutes(3)), 0);
    }

    #[test]
    fn test_parse_mode_and_severity() {
        assert_eq!("lesson".parse::<SessionMode>(), Ok(SessionMode::Lesson));
        assert!("Exam".parse::<SessionMode>().is_err());
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(Severity::default(), Severity::Medium);
        assert!("Critical".parse::<Severity>().is_err());
    }
}
