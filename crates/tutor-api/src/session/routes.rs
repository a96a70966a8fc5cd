use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tutor_adaptive::{
    session::{
        DEFAULT_ACCURACY_SCORE, DEFAULT_TOPIC, SUMMARY_TOP_MISTAKES, SessionMode, Severity,
        duration_minutes,
    },
    weak_areas::count_error_types,
};
use tutor_db::{
    models::{LearningSession, NewCorrection, NewMessage, NewSession, SessionEnd},
    repositories::{correction, message, session, user},
};
use uuid::Uuid;
use validator::Validate;

use super::model::{
    AddCorrectionRequest, AddMessageRequest, CreatedResponse, EndSessionRequest, HistoryQuery,
    SessionDetails, SessionHistoryEntry, SessionSummary, StartSessionRequest,
    StartSessionResponse,
};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    learning::{self, progress, prompt::prompt_for_tier},
    metrics,
    profile::preferred_language,
    validation::{validate_history_limit, validate_language_tag},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/sessions/start", post(start_session))
        .route("/sessions/history", get(session_history))
        .route("/sessions/{id}", get(session_details))
        .route("/sessions/{id}/messages", post(add_message))
        .route("/sessions/{id}/corrections", post(add_correction))
        .route("/sessions/{id}/end", post(end_session))
}

/// Lock an active session owned by the caller for the rest of the transaction.
async fn lock_active_session(
    conn: &mut sqlx::PgConnection,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<LearningSession, ApiError> {
    let session = session::find_owned_for_update(conn, user_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session".to_string()))?;

    if !session.is_active() {
        return Err(ApiError::Conflict("Session has already ended".to_string()));
    }

    Ok(session)
}

/// Adapt the difficulty, snapshot it on a new session and compose the tutor prompt
#[tracing::instrument(skip_all, fields(user_id = %auth_user.user_id))]
async fn start_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    payload.validate()?;
    let mode: SessionMode = match payload.mode.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::Validation)?,
        None => SessionMode::default(),
    };
    let topic = payload
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TOPIC)
        .to_string();
    let now = state.clock.now();

    let mut tx = state.pool.begin().await?;

    if user::find_by_id(&mut *tx, auth_user.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User".to_string()));
    }

    let target_language =
        preferred_language(&mut tx, auth_user.user_id, payload.target_language).await?;

    // Prompt and snapshot are derived before the new session exists
    let tier =
        learning::get_adapted_difficulty(&mut tx, auth_user.user_id, &target_language).await?;
    let system_prompt = prompt_for_tier(
        &mut tx,
        auth_user.user_id,
        &target_language,
        &topic,
        tier,
        now,
    )
    .await?;

    let created = session::create_session(
        &mut *tx,
        &NewSession {
            user_id: auth_user.user_id,
            target_language,
            topic,
            mode: mode.as_str().to_string(),
            start_time: now,
            difficulty_level: tier.as_str().to_string(),
        },
    )
    .await?;

    tx.commit().await?;

    metrics::record_session_started(&created.target_language, tier);
    tracing::info!(
        session_id = %created.id,
        target_language = %created.target_language,
        %tier,
        "session started"
    );

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: created.id,
            target_language: created.target_language,
            topic: created.topic,
            mode: created.mode,
            difficulty_level: tier,
            system_prompt,
            start_time: created.start_time,
        }),
    ))
}

async fn add_message(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload.validate()?;
    if let Some(language) = payload.language.as_deref() {
        validate_language_tag(language)?;
    }

    let mut tx = state.pool.begin().await?;
    let active = lock_active_session(&mut tx, auth_user.user_id, session_id).await?;

    let inserted = message::insert_message(
        &mut *tx,
        &NewMessage {
            session_id: active.id,
            sent_at: state.clock.now(),
            is_user: payload.is_user,
            text: payload.text,
            language: payload.language.unwrap_or(active.target_language),
            transcription_confidence: payload.transcription_confidence,
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: inserted.id })))
}

async fn add_correction(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AddCorrectionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload.validate()?;
    let severity: Severity = match payload.severity.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::Validation)?,
        None => Severity::default(),
    };

    let mut tx = state.pool.begin().await?;
    let active = lock_active_session(&mut tx, auth_user.user_id, session_id).await?;

    let inserted = correction::insert_correction(
        &mut *tx,
        &NewCorrection {
            session_id: active.id,
            created_at: state.clock.now(),
            original_text: payload.original_text,
            corrected_text: payload.corrected_text,
            error_type: payload.error_type.trim().to_string(),
            explanation: payload.explanation,
            severity: severity.as_str().to_string(),
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: inserted.id })))
}

/// End the session, fold it into the learner's progress and summarize it
#[tracing::instrument(skip_all, fields(user_id = %auth_user.user_id, %session_id))]
async fn end_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<EndSessionRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    payload.validate()?;
    let now = state.clock.now();

    let mut tx = state.pool.begin().await?;
    let active = lock_active_session(&mut tx, auth_user.user_id, session_id).await?;

    let ended = session::end_session(
        &mut *tx,
        active.id,
        &SessionEnd {
            end_time: now,
            duration_minutes: duration_minutes(active.start_time, now),
            accuracy_score: payload.accuracy_score.unwrap_or(DEFAULT_ACCURACY_SCORE),
            conversation_summary: payload.summary.unwrap_or_default(),
            vocabulary_list: payload.vocabulary_list.unwrap_or_default(),
            common_mistakes: payload.common_mistakes.unwrap_or_default(),
        },
    )
    .await?;
    let messages = message::list_for_session(&mut *tx, ended.id).await?;
    let corrections = correction::list_for_session(&mut *tx, ended.id).await?;

    // Progress is folded in before commit so a failed update leaves the session active
    let started = Instant::now();
    let change = match progress::fold_session(&mut tx, auth_user.user_id, ended.id, now).await {
        Ok(change) => change,
        Err(e) => {
            progress::record_failure(&e, started.elapsed());
            return Err(e.into());
        }
    };

    tx.commit().await?;

    progress::record_success(change, started.elapsed());
    metrics::record_session_ended(&ended.target_language);

    let top_mistakes = count_error_types(corrections.iter().map(|c| c.error_type.as_str()))
        .into_iter()
        .take(SUMMARY_TOP_MISTAKES)
        .collect();

    tracing::info!(
        duration_minutes = ended.duration_minutes,
        accuracy_score = ended.accuracy_score,
        "session ended"
    );

    Ok(Json(SessionSummary {
        session_id: ended.id,
        duration_minutes: ended.duration_minutes,
        total_messages: ended.total_messages,
        corrections_given: ended.corrections_given,
        accuracy_score: ended.accuracy_score,
        difficulty_level: ended.difficulty_level,
        message_count: messages.len(),
        correction_count: corrections.len(),
        top_mistakes,
    }))
}

async fn session_history(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SessionHistoryEntry>>, ApiError> {
    validate_history_limit(query.limit)?;

    let sessions = session::list_ended(&state.pool, auth_user.user_id, query.limit).await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

async fn session_details(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetails>, ApiError> {
    let mut conn = state.pool.acquire().await?;

    let found = session::find_owned(&mut *conn, auth_user.user_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session".to_string()))?;
    let messages = message::list_for_session(&mut *conn, found.id).await?;
    let corrections = correction::list_for_session(&mut *conn, found.id).await?;

    Ok(Json(SessionDetails {
        session: found,
        messages,
        corrections,
    }))
}
