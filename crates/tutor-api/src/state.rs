use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;
use tutor_adaptive::{Clock, SystemClock};

use crate::ApiConfig;

/// Secrets needed by the bearer token extractor
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub auth: AuthConfig,
    /// Source of "now" for sessions, streaks and lookback windows
    pub clock: Arc<dyn Clock>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self::with_clock(config, pool, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ApiConfig, pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
            },
            clock,
        }
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
