use sqlx::PgConnection;
use tutor_adaptive::{SessionPerformance, Tier, adapt_tier, difficulty::RECENT_SESSIONS_WINDOW};
use tutor_db::{
    models::UserProfile,
    repositories::{profile, session},
};
use uuid::Uuid;

/// Tier stored on a profile; an absent profile starts at Beginner.
pub fn stored_tier(profile: Option<&UserProfile>) -> Tier {
    let Some(profile) = profile else {
        return Tier::default();
    };

    profile.proficiency_level.parse().unwrap_or_else(|_| {
        tracing::warn!(
            user_id = %profile.user_id,
            proficiency_level = %profile.proficiency_level,
            "unknown proficiency level on profile, treating as Beginner"
        );
        Tier::default()
    })
}

/// Tier the learner should practice `target_language` at, from the stored
/// tier and the last five sessions in that language.
pub async fn get_adapted_difficulty(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
) -> Result<Tier, sqlx::Error> {
    let profile = profile::find_by_user_id(&mut *conn, user_id).await?;
    adapted_from(conn, user_id, target_language, stored_tier(profile.as_ref())).await
}

/// Adapt `current` using the recent sessions in `target_language`.
pub(crate) async fn adapted_from(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    current: Tier,
) -> Result<Tier, sqlx::Error> {
    let recent: Vec<SessionPerformance> =
        session::recent_performance(&mut *conn, user_id, target_language, RECENT_SESSIONS_WINDOW)
            .await?
            .into_iter()
            .map(|row| SessionPerformance {
                accuracy_score: row.accuracy_score,
                corrections: row.corrections_given,
            })
            .collect();

    Ok(adapt_tier(current, &recent))
}
