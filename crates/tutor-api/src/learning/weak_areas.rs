use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tutor_adaptive::{
    ErrorTypeCount, rank_error_types, top_weak_areas,
    weak_areas::lookback_start,
};
use tutor_db::repositories::correction;
use uuid::Uuid;

/// Every error type seen in the lookback window, most frequent first.
pub async fn error_type_ranking(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ErrorTypeCount>, sqlx::Error> {
    let counts = correction::error_type_counts(conn, user_id, target_language, lookback_start(now))
        .await?
        .into_iter()
        .map(|row| ErrorTypeCount {
            error_type: row.error_type,
            count: row.count,
        })
        .collect();

    Ok(rank_error_types(counts))
}

/// Up to five error-type labels from the last 30 days, most frequent first.
pub async fn identify_weak_areas(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    now: DateTime<Utc>,
) -> Result<Vec<String>, sqlx::Error> {
    let ranking = error_type_ranking(conn, user_id, target_language, now).await?;
    Ok(top_weak_areas(ranking))
}
