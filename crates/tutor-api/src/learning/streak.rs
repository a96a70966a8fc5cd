use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgConnection;
use tutor_adaptive::{current_streak, streak::lookback_start};
use tutor_db::repositories::session;
use uuid::Uuid;

/// Consecutive UTC days, ending today or yesterday, with a session started
/// in `target_language`.
pub async fn calculate_streak(
    conn: &mut PgConnection,
    user_id: Uuid,
    target_language: &str,
    now: DateTime<Utc>,
) -> Result<u32, sqlx::Error> {
    let today = now.date_naive();
    let since = lookback_start(today).and_time(NaiveTime::MIN).and_utc();

    let active_days: BTreeSet<NaiveDate> =
        session::distinct_start_dates(conn, user_id, target_language, since)
            .await?
            .into_iter()
            .collect();

    Ok(current_streak(today, &active_days))
}
