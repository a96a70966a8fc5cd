use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ConversationMessage, NewMessage};

/// Append a message and bump the session's message count in one statement.
pub async fn insert_message<'e, E>(
    executor: E,
    message: &NewMessage,
) -> Result<ConversationMessage, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH inserted AS (
                INSERT INTO conversation_messages
                    (session_id, sent_at, is_user, text, language, transcription_confidence)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, session_id, sent_at, is_user, text, language, transcription_confidence
            ), bumped AS (
                UPDATE learning_sessions
                SET total_messages = total_messages + 1
                WHERE id = $1
            )
            SELECT id, session_id, sent_at, is_user, text, language, transcription_confidence
            FROM inserted
        "#,
    )
    .bind(message.session_id)
    .bind(message.sent_at)
    .bind(message.is_user)
    .bind(&message.text)
    .bind(&message.language)
    .bind(&message.transcription_confidence)
    .fetch_one(executor)
    .await
}

/// Messages of a session in the order they were sent.
pub async fn list_for_session<'e, E>(
    executor: E,
    session_id: Uuid,
) -> Result<Vec<ConversationMessage>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, session_id, sent_at, is_user, text, language, transcription_confidence
            FROM conversation_messages
            WHERE session_id = $1
            ORDER BY sent_at, id
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await
}
