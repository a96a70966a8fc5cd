use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tutor_adaptive::{PromptContext, Tier, compose_prompt};
use tutor_db::repositories::profile;
use uuid::Uuid;

use super::{difficulty::get_adapted_difficulty, weak_areas::identify_weak_areas};

/// System prompt for a new conversation, tailored to the learner's adapted
/// tier, weak areas and focus areas. Reads only.
pub async fn generate_personalized_prompt(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    topic: &str,
    now: DateTime<Utc>,
) -> Result<String, sqlx::Error> {
    let tier = get_adapted_difficulty(&mut *conn, user_id, target_language).await?;
    prompt_for_tier(conn, user_id, target_language, topic, tier, now).await
}

/// Same as [`generate_personalized_prompt`] with an already adapted tier.
pub(crate) async fn prompt_for_tier(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    topic: &str,
    tier: Tier,
    now: DateTime<Utc>,
) -> Result<String, sqlx::Error> {
    let weak_areas = identify_weak_areas(&mut *conn, user_id, target_language, now).await?;
    let profile = profile::find_by_user_id(&mut *conn, user_id).await?;

    Ok(compose_prompt(&PromptContext {
        target_language,
        tier,
        topic,
        weak_areas: &weak_areas,
        focus_areas: profile.as_ref().map(|p| p.focus_areas.as_str()),
    }))
}
