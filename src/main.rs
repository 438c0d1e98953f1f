//! Community Moderation Service — Binary Entrypoint
//! Wires the shared state, the moderation routes and the metrics endpoint
//! into one Axum app served by Shuttle.
//!
//! See `README.md` for quickstart and endpoint reference.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use community_moderation::api;
use community_moderation::metrics::Metrics;

/// Compact tracing output, gated to development runs. Needs both a dev
/// environment (debug build, or SHUTTLE_ENV in {local, development, dev})
/// and MODERATION_DEV_LOG=1.
fn enable_dev_tracing() {
    let dev_flag = matches!(
        std::env::var("MODERATION_DEV_LOG").as_deref(),
        Ok("1")
    );

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moderation=info,audit=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Pick up .env for local runs (API tokens, lexicon path); a missing
    // file is fine.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let state = api::AppState::from_env();
    let metrics = Metrics::init(&state.lexicon);

    // One-off classifier smoke test; logs only, never blocks startup.
    if let Err(e) = community_moderation::run_ai_quick_probe().await {
        tracing::warn!(error = ?e, "AI quick probe didn't run");
    }

    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
