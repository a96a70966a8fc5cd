pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod learning;
pub mod metrics;
pub mod middleware;
pub mod profile;
pub mod router;
pub mod session;
pub mod state;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
