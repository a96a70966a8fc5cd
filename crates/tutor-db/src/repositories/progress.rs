use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::DailyProgress;

/// Create the zeroed row for (user, day, language) unless it already exists.
///
/// Relies on `uq_daily_progress`, so concurrent callers never produce two rows.
pub async fn ensure_daily<'e, E>(
    executor: E,
    user_id: Uuid,
    progress_date: NaiveDate,
    target_language: &str,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO daily_progress (user_id, progress_date, target_language)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, progress_date, target_language) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(progress_date)
    .bind(target_language)
    .execute(executor)
    .await?;
    Ok(())
}

/// Load the row for (user, day, language) and lock it until the surrounding
/// transaction ends, serializing concurrent session-end updates.
pub async fn find_daily_for_update<'e, E>(
    executor: E,
    user_id: Uuid,
    progress_date: NaiveDate,
    target_language: &str,
) -> Result<DailyProgress, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, progress_date, target_language, sessions_completed,
                   minutes_learned, messages_spoken, corrections_received, average_accuracy,
                   grammar_score, vocabulary_score, pronunciation_score, fluency_score,
                   created_at, updated_at
            FROM daily_progress
            WHERE user_id = $1 AND progress_date = $2 AND target_language = $3
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(progress_date)
    .bind(target_language)
    .fetch_one(executor)
    .await
}

pub async fn save_daily<'e, E>(executor: E, progress: &DailyProgress) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE daily_progress
            SET sessions_completed = $2,
                minutes_learned = $3,
                messages_spoken = $4,
                corrections_received = $5,
                average_accuracy = $6,
                grammar_score = $7,
                vocabulary_score = $8,
                pronunciation_score = $9,
                fluency_score = $10,
                updated_at = NOW()
            WHERE id = $1
        "#,
    )
    .bind(progress.id)
    .bind(progress.sessions_completed)
    .bind(progress.minutes_learned)
    .bind(progress.messages_spoken)
    .bind(progress.corrections_received)
    .bind(progress.average_accuracy)
    .bind(progress.grammar_score)
    .bind(progress.vocabulary_score)
    .bind(progress.pronunciation_score)
    .bind(progress.fluency_score)
    .execute(executor)
    .await?;
    Ok(())
}

/// Daily rows from `since` onward, oldest first. `target_language = None`
/// returns every language.
pub async fn list_since<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: Option<&str>,
    since: NaiveDate,
) -> Result<Vec<DailyProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, progress_date, target_language, sessions_completed,
                   minutes_learned, messages_spoken, corrections_received, average_accuracy,
                   grammar_score, vocabulary_score, pronunciation_score, fluency_score,
                   created_at, updated_at
            FROM daily_progress
            WHERE user_id = $1
                AND ($2::varchar IS NULL OR target_language = $2)
                AND progress_date >= $3
            ORDER BY progress_date, target_language
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(since)
    .fetch_all(executor)
    .await
}
