// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod audit;
pub mod classify;
pub mod config;
pub mod error;
pub mod identity;
pub mod lexicon;
pub mod metrics;
pub mod moderation;
pub mod verdict;

pub mod ai_bootstrap;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::error::ModerationError;
pub use crate::lexicon::Lexicon;
pub use crate::verdict::{
    CheckType, ModerationRequest, ModerationResult, Severity, Violation, ViolationKind,
};

/// One-off classifier smoke test for the service entrypoint. Config problems
/// come back as an error; probe outcomes are only logged.
pub async fn run_ai_quick_probe() -> anyhow::Result<()> {
    // Path is relative to the runtime working dir (repo root under `cargo shuttle run`).
    ai_bootstrap::quick_probe("config/ai.json").await
}
