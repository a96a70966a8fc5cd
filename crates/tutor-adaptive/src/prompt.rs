//! Personalized system prompt for the tutoring dialogue engine.

use crate::tier::Tier;

/// Focus areas used when the learner has none on file.
pub const DEFAULT_FOCUS_AREAS: &str = "General";
/// Shown in place of the weak-area list when nothing has been identified.
pub const NO_WEAK_AREAS: &str = "None identified yet";
/// Attention target used when no weak area has been identified.
pub const DEFAULT_ATTENTION: &str = "overall improvement";

/// Everything the prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub target_language: &'a str,
    pub tier: Tier,
    pub topic: &'a str,
    pub weak_areas: &'a [String],
    /// Comma-separated focus areas from the learner's profile, if any
    pub focus_areas: Option<&'a str>,
}

/// Interpolate the context into the fixed tutoring template.
pub fn compose_prompt(ctx: &PromptContext<'_>) -> String {
    let focus_areas = ctx
        .focus_areas
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOCUS_AREAS);

    let (weak_areas, attention) = if ctx.weak_areas.is_empty() {
        (NO_WEAK_AREAS.to_string(), DEFAULT_ATTENTION.to_string())
    } else {
        let joined = ctx.weak_areas.join(", ");
        (joined.clone(), joined)
    };

    let PromptContext {
        target_language,
        tier,
        topic,
        ..
    } = *ctx;

    format!(
        "You are an AI language tutor teaching {target_language} to a {tier} level student.

Current Topic: {topic}
Student's Weak Areas: {weak_areas}
Focus Areas: {focus_areas}

Guidelines:
- Adapt your language complexity to {tier} level
- Provide extra attention to: {attention}
- Be encouraging and supportive
- Correct mistakes gently but clearly
- Ask follow-up questions to encourage conversation
- Use natural, conversational language"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_all_inputs() {
        let weak_areas = vec!["Grammar".to_string(), "Vocabulary".to_string()];
        let prompt = compose_prompt(&PromptContext {
            target_language: "es-ES",
            tier: Tier::Intermediate,
            topic: "Ordering food",
            weak_areas: &weak_areas,
            focus_areas: Some("Grammar,Pronunciation"),
        });

        assert!(prompt.starts_with(
            "You are an AI language tutor teaching es-ES to a Intermediate level student."
        ));
        assert!(prompt.contains("Current Topic: Ordering food"));
        assert!(prompt.contains("Student's Weak Areas: Grammar, Vocabulary"));
        assert!(prompt.contains("Focus Areas: Grammar,Pronunciation"));
        assert!(prompt.contains("- Adapt your language complexity to Intermediate level"));
        assert!(prompt.contains("- Provide extra attention to: Grammar, Vocabulary"));
        assert!(prompt.contains("follow-up questions"));
    }

    #[test]
    fn test_prompt_placeholders_when_nothing_is_known() {
        let prompt = compose_prompt(&PromptContext {
            target_language: "fr-FR",
            tier: Tier::Beginner,
            topic: "General Conversation",
            weak_areas: &[],
            focus_areas: None,
        });

        assert!(prompt.contains("Student's Weak Areas: None identified yet"));
        assert!(prompt.contains("Provide extra attention to: overall improvement"));
        assert!(prompt.contains("Focus Areas: General"));
    }

    #[test]
    fn test_blank_focus_areas_fall_back_to_default() {
        let prompt = compose_prompt(&PromptContext {
            target_language: "de-DE",
            tier: Tier::Advanced,
            topic: "Travel",
            weak_areas: &[],
            focus_areas: Some("   "),
        });

        assert!(prompt.contains("Focus Areas: General"));
    }
}
