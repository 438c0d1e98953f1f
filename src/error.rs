//! Errors surfaced to the caller of the moderation pipeline.
//!
//! Only input-validation failures ever reach the caller. Collaborator
//! failures (classifier, audit sink) are recovered where they happen:
//! escalation is fail-open and audit logging is best-effort, so neither
//! has a variant here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModerationError {
    /// No caller identity could be resolved; the pipeline did not run.
    #[error("unauthorized: no caller identity")]
    Unauthorized,

    /// Missing or empty content; the pipeline did not run.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ModerationError {
    /// Stable machine-readable tag for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ModerationError::Unauthorized => "unauthorized",
            ModerationError::InvalidInput(_) => "invalid_input",
        }
    }
}
