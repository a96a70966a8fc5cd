use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ProfilePreferences, UserProfile};

pub async fn find_by_user_id<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, target_language, proficiency_level, current_level,
                   focus_areas, learning_goals, total_sessions, total_minutes_learned,
                   total_corrections, average_accuracy, weak_areas, last_session_at,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Create a default profile for the user unless one already exists.
pub async fn ensure_profile<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_profiles (user_id, target_language)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .execute(executor)
    .await?;
    Ok(())
}

/// Load the profile and lock its row until the surrounding transaction ends.
///
/// Fails with `RowNotFound` when the user has no profile; call
/// [`ensure_profile`] first.
pub async fn lock_by_user_id<'e, E>(executor: E, user_id: Uuid) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, target_language, proficiency_level, current_level,
                   focus_areas, learning_goals, total_sessions, total_minutes_learned,
                   total_corrections, average_accuracy, weak_areas, last_session_at,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Upsert the user-editable preferences. Statistics are left untouched.
pub async fn upsert_preferences<'e, E>(
    executor: E,
    user_id: Uuid,
    preferences: &ProfilePreferences,
) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_profiles (user_id, target_language, focus_areas, learning_goals)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET target_language = EXCLUDED.target_language,
                focus_areas = EXCLUDED.focus_areas,
                learning_goals = EXCLUDED.learning_goals,
                updated_at = NOW()
            RETURNING id, user_id, target_language, proficiency_level, current_level,
                   focus_areas, learning_goals, total_sessions, total_minutes_learned,
                   total_corrections, average_accuracy, weak_areas, last_session_at,
                   created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&preferences.target_language)
    .bind(&preferences.focus_areas)
    .bind(&preferences.learning_goals)
    .fetch_one(executor)
    .await
}

/// Persist the statistics maintained by progress aggregation.
pub async fn save_statistics<'e, E>(executor: E, profile: &UserProfile) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE user_profiles
            SET proficiency_level = $2,
                total_sessions = $3,
                total_minutes_learned = $4,
                total_corrections = $5,
                average_accuracy = $6,
                weak_areas = $7,
                last_session_at = $8,
                updated_at = NOW()
            WHERE id = $1
        "#,
    )
    .bind(profile.id)
    .bind(&profile.proficiency_level)
    .bind(profile.total_sessions)
    .bind(profile.total_minutes_learned)
    .bind(profile.total_corrections)
    .bind(profile.average_accuracy)
    .bind(&profile.weak_areas)
    .bind(profile.last_session_at)
    .execute(executor)
    .await?;
    Ok(())
}
