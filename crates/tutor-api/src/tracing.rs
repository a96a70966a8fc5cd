//! Log output for the tutor API: pretty in development, JSON in production.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(env: &Environment) -> &'static str {
    if env.is_development() {
        "debug,tower_http=debug,sqlx=warn"
    } else {
        "info,tower_http=info,sqlx=warn"
    }
}

/// Install the global subscriber.
///
/// Development logs are pretty-printed with file and line numbers. Production
/// logs are flattened JSON carrying the current span and its parents, so the
/// request id set by the request id middleware appears on every event.
///
/// `RUST_LOG` overrides the default filter (e.g. `RUST_LOG=debug,sqlx=info`).
pub fn init_tracing(env: &Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = if env.is_development() {
        fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .pretty()
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .with_target(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();

    tracing::info!(environment = ?env, "Tracing initialized");
}
