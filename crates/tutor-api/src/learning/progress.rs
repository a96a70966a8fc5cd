use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tutor_adaptive::{DailyTotals, LifetimeTotals, SessionOutcome, Tier};
use tutor_db::{
    models::{DailyProgress, UserProfile},
    repositories::{correction, message, profile, progress, session},
};
use uuid::Uuid;

use super::{
    difficulty::{adapted_from, stored_tier},
    weak_areas::identify_weak_areas,
};
use crate::metrics;

/// Tier movement caused by one progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierChange {
    pub from: Tier,
    pub to: Tier,
}

/// Fold an ended session into the learner's daily and lifetime progress.
///
/// Call once per session, after its end time and accuracy are persisted. The
/// session is looked up by owner and id; an unknown session is a no-op.
///
/// Runs [`fold_session`] in a transaction of its own. Callers that persist
/// the end of the session themselves should call [`fold_session`] inside
/// that same transaction instead, so the end and the progress update commit
/// together.
#[tracing::instrument(skip_all, fields(%user_id, %session_id))]
pub async fn update_user_progress(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let start = Instant::now();
    let result = aggregate(pool, user_id, session_id, now).await;

    match result {
        Ok(change) => {
            record_success(change, start.elapsed());
            Ok(())
        }
        Err(e) => {
            record_failure(&e, start.elapsed());
            Err(e)
        }
    }
}

async fn aggregate(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<TierChange>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let change = fold_session(&mut tx, user_id, session_id, now).await?;
    tx.commit().await?;
    Ok(change)
}

/// Log and count a committed progress update
pub(crate) fn record_success(change: Option<TierChange>, elapsed: Duration) {
    metrics::record_progress_update(true, elapsed.as_secs_f64());
    if let Some(change) = change {
        tracing::info!(from = %change.from, to = %change.to, "proficiency tier changed");
        metrics::record_tier_change(change.from, change.to);
    }
}

pub(crate) fn record_failure(error: &sqlx::Error, elapsed: Duration) {
    metrics::record_progress_update(false, elapsed.as_secs_f64());
    tracing::error!(error = %error, "failed to update progress");
}

/// The work of [`update_user_progress`], on a connection that must already
/// be inside a transaction.
///
/// The daily row for (user, `now`'s UTC date, session language) is created
/// if needed and locked, then the profile row is created if needed and
/// locked, so concurrent updates for the same day serialize instead of
/// overwriting each other. Nothing is committed here.
pub async fn fold_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<TierChange>, sqlx::Error> {
    let Some(ended) = session::find_owned(&mut *conn, user_id, session_id).await? else {
        tracing::debug!("session not found, nothing to aggregate");
        return Ok(None);
    };

    let messages = message::list_for_session(&mut *conn, ended.id).await?;
    let error_types: Vec<String> = correction::list_for_session(&mut *conn, ended.id)
        .await?
        .into_iter()
        .map(|c| c.error_type)
        .collect();
    let user_messages = messages.iter().filter(|m| m.is_user).count();

    let outcome = SessionOutcome {
        duration_minutes: ended.duration_minutes,
        accuracy_score: ended.accuracy_score,
        user_messages: i32::try_from(user_messages).unwrap_or(i32::MAX),
        error_types: &error_types,
    };
    let language = ended.target_language.as_str();

    // Daily row is always locked before the profile row
    let today = now.date_naive();
    progress::ensure_daily(&mut *conn, user_id, today, language).await?;
    let mut daily = progress::find_daily_for_update(&mut *conn, user_id, today, language).await?;
    let mut day = daily_totals(&daily);
    day.record_session(&outcome);
    apply_daily_totals(&mut daily, &day);
    progress::save_daily(&mut *conn, &daily).await?;

    profile::ensure_profile(&mut *conn, user_id, language).await?;
    let mut learner = profile::lock_by_user_id(&mut *conn, user_id).await?;
    let mut lifetime = lifetime_totals(&learner);
    lifetime.record_session(&outcome);
    apply_lifetime_totals(&mut learner, &lifetime);
    learner.last_session_at = Some(now);

    let previous = stored_tier(Some(&learner));
    let tier = adapted_from(&mut *conn, user_id, language, previous).await?;
    learner.proficiency_level = tier.as_str().to_string();
    learner.weak_areas = identify_weak_areas(&mut *conn, user_id, language, now).await?;
    profile::save_statistics(&mut *conn, &learner).await?;

    tracing::debug!(
        sessions_today = daily.sessions_completed,
        total_sessions = learner.total_sessions,
        "progress updated"
    );

    Ok((tier != previous).then_some(TierChange {
        from: previous,
        to: tier,
    }))
}

fn daily_totals(row: &DailyProgress) -> DailyTotals {
    DailyTotals {
        sessions_completed: row.sessions_completed,
        minutes_learned: row.minutes_learned,
        messages_spoken: row.messages_spoken,
        corrections_received: row.corrections_received,
        average_accuracy: row.average_accuracy,
        grammar_score: row.grammar_score,
        vocabulary_score: row.vocabulary_score,
        pronunciation_score: row.pronunciation_score,
        fluency_score: row.fluency_score,
    }
}

fn apply_daily_totals(row: &mut DailyProgress, totals: &DailyTotals) {
    row.sessions_completed = totals.sessions_completed;
    row.minutes_learned = totals.minutes_learned;
    row.messages_spoken = totals.messages_spoken;
    row.corrections_received = totals.corrections_received;
    row.average_accuracy = totals.average_accuracy;
    row.grammar_score = totals.grammar_score;
    row.vocabulary_score = totals.vocabulary_score;
    row.pronunciation_score = totals.pronunciation_score;
    row.fluency_score = totals.fluency_score;
}

fn lifetime_totals(profile: &UserProfile) -> LifetimeTotals {
    LifetimeTotals {
        total_sessions: profile.total_sessions,
        total_minutes: profile.total_minutes_learned,
        total_corrections: profile.total_corrections,
        average_accuracy: profile.average_accuracy,
    }
}

fn apply_lifetime_totals(profile: &mut UserProfile, totals: &LifetimeTotals) {
    profile.total_sessions = totals.total_sessions;
    profile.total_minutes_learned = totals.total_minutes;
    profile.total_corrections = totals.total_corrections;
    profile.average_accuracy = totals.average_accuracy;
}
