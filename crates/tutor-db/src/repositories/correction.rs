use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Correction, CorrectionExample, ErrorTypeCountRow, NewCorrection};

/// Append a correction and bump the session's correction count in one statement.
pub async fn insert_correction<'e, E>(
    executor: E,
    correction: &NewCorrection,
) -> Result<Correction, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH inserted AS (
                INSERT INTO corrections
                    (session_id, created_at, original_text, corrected_text, error_type, explanation, severity)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, session_id, created_at, original_text, corrected_text, error_type, explanation, severity
            ), bumped AS (
                UPDATE learning_sessions
                SET corrections_given = corrections_given + 1
                WHERE id = $1
            )
            SELECT id, session_id, created_at, original_text, corrected_text, error_type, explanation, severity
            FROM inserted
        "#,
    )
    .bind(correction.session_id)
    .bind(correction.created_at)
    .bind(&correction.original_text)
    .bind(&correction.corrected_text)
    .bind(&correction.error_type)
    .bind(&correction.explanation)
    .bind(&correction.severity)
    .fetch_one(executor)
    .await
}

pub async fn list_for_session<'e, E>(
    executor: E,
    session_id: Uuid,
) -> Result<Vec<Correction>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, session_id, created_at, original_text, corrected_text, error_type, explanation, severity
            FROM corrections
            WHERE session_id = $1
            ORDER BY created_at, id
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await
}

/// Count corrections per error type for the user's sessions in
/// `target_language` that started after `since`.
pub async fn error_type_counts<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    since: DateTime<Utc>,
) -> Result<Vec<ErrorTypeCountRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT c.error_type, COUNT(*)::bigint AS count
            FROM corrections c
            JOIN learning_sessions s ON s.id = c.session_id
            WHERE s.user_id = $1
                AND s.target_language = $2
                AND s.start_time > $3
            GROUP BY c.error_type
            ORDER BY count DESC, c.error_type
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(since)
    .fetch_all(executor)
    .await
}

/// Up to `per_type` most recent corrections for each error type, same window
/// as [`error_type_counts`].
pub async fn recent_examples_by_type<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    since: DateTime<Utc>,
    per_type: i64,
) -> Result<Vec<CorrectionExample>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT error_type, original_text, corrected_text, explanation, created_at
            FROM (
                SELECT
                    c.error_type,
                    c.original_text,
                    c.corrected_text,
                    c.explanation,
                    c.created_at,
                    ROW_NUMBER() OVER (
                        PARTITION BY c.error_type
                        ORDER BY c.created_at DESC, c.id
                    ) AS example_rank
                FROM corrections c
                JOIN learning_sessions s ON s.id = c.session_id
                WHERE s.user_id = $1
                    AND s.target_language = $2
                    AND s.start_time > $3
            ) ranked
            WHERE example_rank <= $4
            ORDER BY error_type, created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(since)
    .bind(per_type)
    .fetch_all(executor)
    .await
}

/// Most recent corrections of the user in `target_language`, any age.
pub async fn list_recent<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    limit: i64,
) -> Result<Vec<Correction>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT c.id, c.session_id, c.created_at, c.original_text, c.corrected_text,
                   c.error_type, c.explanation, c.severity
            FROM corrections c
            JOIN learning_sessions s ON s.id = c.session_id
            WHERE s.user_id = $1 AND s.target_language = $2
            ORDER BY c.created_at DESC, c.id
            LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(limit)
    .fetch_all(executor)
    .await
}
