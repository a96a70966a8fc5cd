use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use tutor_adaptive::Tier;
use tutor_db::repositories::{correction, profile, progress, session};

use super::model::{
    Dashboard, DailyProgressPoint, EXAMPLES_PER_WEAK_AREA, LanguageQuery, Overview,
    ProgressQuery, RECENT_CORRECTIONS, VOCABULARY_SESSIONS, VocabularyEntry,
    WeakAreaDetail, assemble_weak_area_details, fill_daily_series, round2,
    weekly_progress_start, window_start,
};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    learning::{self, weak_areas::error_type_ranking},
    profile::preferred_language,
    validation::validate_progress_days,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/analytics/dashboard", get(dashboard))
        .route("/analytics/progress", get(progress_series))
        .route("/analytics/weak-areas", get(weak_areas))
        .route("/analytics/vocabulary", get(vocabulary))
}

async fn dashboard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let user_id = auth_user.user_id;
    let now = state.clock.now();
    let mut conn = state.pool.acquire().await?;

    let target_language = preferred_language(&mut conn, user_id, query.language).await?;
    let learner = profile::find_by_user_id(&mut *conn, user_id).await?;
    let totals = session::overview(&mut *conn, user_id).await?;
    let current_streak =
        learning::calculate_streak(&mut conn, user_id, &target_language, now).await?;
    let weak_areas =
        learning::identify_weak_areas(&mut conn, user_id, &target_language, now).await?;
    let weekly_progress = progress::list_since(
        &mut *conn,
        user_id,
        None,
        weekly_progress_start(now.date_naive()),
    )
    .await?;
    let recent_corrections =
        correction::list_recent(&mut *conn, user_id, &target_language, RECENT_CORRECTIONS)
            .await?;

    tracing::debug!(
        %user_id,
        %target_language,
        total_sessions = totals.total_sessions,
        current_streak,
        "dashboard assembled"
    );

    Ok(Json(Dashboard {
        target_language,
        overview: Overview {
            total_sessions: totals.total_sessions,
            total_minutes: totals.total_minutes,
            average_accuracy: round2(totals.average_accuracy.unwrap_or(0.0)),
            current_streak,
            proficiency_level: learner
                .as_ref()
                .map(|p| p.proficiency_level.clone())
                .unwrap_or_else(|| Tier::default().to_string()),
            current_level: learner.as_ref().map_or(1, |p| p.current_level),
        },
        weekly_progress,
        weak_areas,
        recent_corrections,
    }))
}

async fn progress_series(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<Vec<DailyProgressPoint>>, ApiError> {
    validate_progress_days(query.days)?;
    let today = state.clock.today();
    let mut conn = state.pool.acquire().await?;

    let target_language = preferred_language(&mut conn, auth_user.user_id, query.language).await?;
    let rows = progress::list_since(
        &mut *conn,
        auth_user.user_id,
        Some(&target_language),
        window_start(today, query.days),
    )
    .await?;

    Ok(Json(fill_daily_series(today, query.days, &rows)))
}

async fn weak_areas(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Vec<WeakAreaDetail>>, ApiError> {
    let now = state.clock.now();
    let mut conn = state.pool.acquire().await?;

    let target_language = preferred_language(&mut conn, auth_user.user_id, query.language).await?;
    let ranking = error_type_ranking(&mut conn, auth_user.user_id, &target_language, now).await?;
    let examples = correction::recent_examples_by_type(
        &mut *conn,
        auth_user.user_id,
        &target_language,
        tutor_adaptive::weak_areas::lookback_start(now),
        EXAMPLES_PER_WEAK_AREA,
    )
    .await?;

    Ok(Json(assemble_weak_area_details(ranking, examples)))
}

async fn vocabulary(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Vec<VocabularyEntry>>, ApiError> {
    let mut conn = state.pool.acquire().await?;

    let target_language = preferred_language(&mut conn, auth_user.user_id, query.language).await?;
    let sessions = session::list_with_vocabulary(
        &mut *conn,
        auth_user.user_id,
        &target_language,
        VOCABULARY_SESSIONS,
    )
    .await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}
