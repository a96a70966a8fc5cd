use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::User;

pub async fn create_user<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    native_language: &str,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (username, email, native_language)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, native_language, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(native_language)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, user_id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, username, email, native_language, created_at
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Delete a user. Profile, sessions (with their messages and corrections) and
/// daily progress go with it through `ON DELETE CASCADE`.
pub async fn delete_user<'e, E>(executor: E, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM users WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
