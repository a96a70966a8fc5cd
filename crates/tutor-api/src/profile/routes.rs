use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use sqlx::PgConnection;
use tutor_db::{
    models::{ProfilePreferences, UserProfile},
    repositories::{profile, user},
};
use uuid::Uuid;
use validator::Validate;

use super::model::UpdateProfileRequest;
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    validation::{DEFAULT_LANGUAGE, validate_language_tag, validate_optional_language},
};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Language a request operates on: the explicit one, else the profile's
/// target language, else `en-US`.
pub async fn preferred_language(
    conn: &mut PgConnection,
    user_id: Uuid,
    requested: Option<String>,
) -> Result<String, ApiError> {
    validate_optional_language(requested.as_deref())?;
    if let Some(language) = requested {
        return Ok(language);
    }

    let language = profile::find_by_user_id(conn, user_id)
        .await?
        .map(|p| p.target_language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    Ok(language)
}

async fn get_profile(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = profile::find_by_user_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile".to_string()))?;

    Ok(Json(profile))
}

async fn update_profile(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    payload.validate()?;
    validate_language_tag(&payload.target_language)?;

    if user::find_by_id(&state.pool, auth_user.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User".to_string()));
    }

    let preferences = ProfilePreferences::from(payload);
    let profile = profile::upsert_preferences(&state.pool, auth_user.user_id, &preferences).await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        target_language = %profile.target_language,
        "profile preferences updated"
    );

    Ok(Json(profile))
}
