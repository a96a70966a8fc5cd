use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

/// Language tag fallback when neither the request nor the profile names one
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Column width of language tags in the store
pub const MAX_LANGUAGE_TAG_LEN: usize = 16;

pub const MAX_HISTORY_LIMIT: i64 = 100;
pub const MAX_PROGRESS_DAYS: i64 = 365;

/// Primary language subtag, optionally followed by region/script subtags
static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid language tag regex")
});

/// Validate a BCP 47 style language tag such as `en`, `es-ES` or `zh-Hant-TW`
///
/// # Examples
/// ```
/// use tutor_api::validation::validate_language_tag;
///
/// assert!(validate_language_tag("es-ES").is_ok());
/// assert!(validate_language_tag("spanish please").is_err());
/// ```
pub fn validate_language_tag(tag: &str) -> Result<(), ApiError> {
    if tag.is_empty() {
        return Err(ApiError::Validation(
            "Language tag cannot be empty".to_string(),
        ));
    }

    if tag.len() > MAX_LANGUAGE_TAG_LEN || !LANGUAGE_TAG.is_match(tag) {
        return Err(ApiError::Validation(format!(
            "Invalid language tag: '{tag}'. Expected a tag such as 'en-US' or 'es'"
        )));
    }

    Ok(())
}

/// Validate an optional `language` query parameter
pub fn validate_optional_language(tag: Option<&str>) -> Result<(), ApiError> {
    tag.map_or(Ok(()), validate_language_tag)
}

pub fn validate_history_limit(limit: i64) -> Result<(), ApiError> {
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    Ok(())
}

pub fn validate_progress_days(days: i64) -> Result<(), ApiError> {
    if !(1..=MAX_PROGRESS_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!(
            "days must be between 1 and {MAX_PROGRESS_DAYS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_tag() {
        assert!(validate_language_tag("en").is_ok());
        assert!(validate_language_tag("en-US").is_ok());
        assert!(validate_language_tag("es-es").is_ok());
        assert!(validate_language_tag("zh-Hant-TW").is_ok());
        assert!(validate_language_tag(DEFAULT_LANGUAGE).is_ok());

        assert!(validate_language_tag("").is_err());
        assert!(validate_language_tag("e").is_err());
        assert!(validate_language_tag("english").is_err());
        assert!(validate_language_tag("en_US").is_err());
        assert!(validate_language_tag("en-").is_err());
        assert!(validate_language_tag("<script>").is_err());
        assert!(validate_language_tag("en-abcdefgh-ijklmnop").is_err());
    }

    #[test]
    fn test_validate_optional_language() {
        assert!(validate_optional_language(None).is_ok());
        assert!(validate_optional_language(Some("fr-FR")).is_ok());
        assert!(validate_optional_language(Some("??")).is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(validate_history_limit(1).is_ok());
        assert!(validate_history_limit(100).is_ok());
        assert!(validate_history_limit(0).is_err());
        assert!(validate_history_limit(101).is_err());

        assert!(validate_progress_days(30).is_ok());
        assert!(validate_progress_days(365).is_ok());
        assert!(validate_progress_days(0).is_err());
        assert!(validate_progress_days(366).is_err());
    }
}
