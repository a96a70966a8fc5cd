use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{
    LearningSession, NewSession, SessionEnd, SessionOverview, SessionPerformanceRow,
    SessionVocabulary,
};

pub async fn create_session<'e, E>(
    executor: E,
    session: &NewSession,
) -> Result<LearningSession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO learning_sessions
                (user_id, target_language, topic, mode, start_time, difficulty_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, target_language, topic, mode, start_time, end_time,
                   duration_minutes, total_messages, corrections_given, accuracy_score,
                   difficulty_level, conversation_summary, vocabulary_list, common_mistakes
        "#,
    )
    .bind(session.user_id)
    .bind(&session.target_language)
    .bind(&session.topic)
    .bind(&session.mode)
    .bind(session.start_time)
    .bind(&session.difficulty_level)
    .fetch_one(executor)
    .await
}

/// Find a session only if it belongs to `user_id`.
pub async fn find_owned<'e, E>(
    executor: E,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<Option<LearningSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, target_language, topic, mode, start_time, end_time,
                   duration_minutes, total_messages, corrections_given, accuracy_score,
                   difficulty_level, conversation_summary, vocabulary_list, common_mistakes
            FROM learning_sessions
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Same as [`find_owned`], locking the row until the transaction ends.
pub async fn find_owned_for_update<'e, E>(
    executor: E,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<Option<LearningSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, target_language, topic, mode, start_time, end_time,
                   duration_minutes, total_messages, corrections_given, accuracy_score,
                   difficulty_level, conversation_summary, vocabulary_list, common_mistakes
            FROM learning_sessions
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Accuracy and correction count of the most recent sessions, newest first.
/// Active and ended sessions are both included.
pub async fn recent_performance<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    limit: i64,
) -> Result<Vec<SessionPerformanceRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT accuracy_score, corrections_given
            FROM learning_sessions
            WHERE user_id = $1 AND target_language = $2
            ORDER BY start_time DESC, id
            LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn end_session<'e, E>(
    executor: E,
    session_id: Uuid,
    end: &SessionEnd,
) -> Result<LearningSession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE learning_sessions
            SET end_time = $2,
                duration_minutes = $3,
                accuracy_score = $4,
                conversation_summary = $5,
                vocabulary_list = $6,
                common_mistakes = $7
            WHERE id = $1
            RETURNING id, user_id, target_language, topic, mode, start_time, end_time,
                   duration_minutes, total_messages, corrections_given, accuracy_score,
                   difficulty_level, conversation_summary, vocabulary_list, common_mistakes
        "#,
    )
    .bind(session_id)
    .bind(end.end_time)
    .bind(end.duration_minutes)
    .bind(end.accuracy_score)
    .bind(&end.conversation_summary)
    .bind(&end.vocabulary_list)
    .bind(&end.common_mistakes)
    .fetch_one(executor)
    .await
}

/// Ended sessions of a user across all languages, newest first.
pub async fn list_ended<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<LearningSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, target_language, topic, mode, start_time, end_time,
                   duration_minutes, total_messages, corrections_given, accuracy_score,
                   difficulty_level, conversation_summary, vocabulary_list, common_mistakes
            FROM learning_sessions
            WHERE user_id = $1 AND end_time IS NOT NULL
            ORDER BY start_time DESC
            LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Sessions in `target_language` with a non-empty vocabulary list, newest first.
pub async fn list_with_vocabulary<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    limit: i64,
) -> Result<Vec<SessionVocabulary>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, start_time, topic, vocabulary_list
            FROM learning_sessions
            WHERE user_id = $1
                AND target_language = $2
                AND vocabulary_list <> ''
            ORDER BY start_time DESC
            LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Distinct UTC calendar days on which a session in `target_language` was
/// started at or after `since`.
pub async fn distinct_start_dates<'e, E>(
    executor: E,
    user_id: Uuid,
    target_language: &str,
    since: DateTime<Utc>,
) -> Result<Vec<NaiveDate>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT DISTINCT (start_time AT TIME ZONE 'UTC')::date AS day
            FROM learning_sessions
            WHERE user_id = $1
                AND target_language = $2
                AND start_time >= $3
            ORDER BY day DESC
        "#,
    )
    .bind(user_id)
    .bind(target_language)
    .bind(since)
    .fetch_all(executor)
    .await
}

/// Totals over every session of the user, regardless of language.
pub async fn overview<'e, E>(executor: E, user_id: Uuid) -> Result<SessionOverview, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                COUNT(*)::bigint AS total_sessions,
                COALESCE(SUM(duration_minutes), 0)::bigint AS total_minutes,
                AVG(accuracy_score) FILTER (WHERE end_time IS NOT NULL)::float8 AS average_accuracy
            FROM learning_sessions
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}
