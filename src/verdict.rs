//! verdict.rs — Structures for the moderation verdict: violations, warnings,
//! scores and the final result shape returned by the API.
//!
//! The wire shape is consumed by the community app's publish flow, so field
//! names and enum spellings here are a stable contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How thorough a moderation pass the caller wants.
/// `Basic` runs only the lexicon rules; `Deep` adds the AI escalation pass
/// when the rule pass approves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    #[default]
    Basic,
    Deep,
}

/// Incoming moderation request. `content` is required but modeled with a
/// default so that a missing field surfaces as our own `InvalidInput`
/// instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub check_type: CheckType,
}

impl ModerationRequest {
    pub fn basic(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            check_type: CheckType::Basic,
        }
    }

    pub fn deep(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            check_type: CheckType::Deep,
        }
    }
}

/// Violation severity. Order matters for the UI (critical > high > medium).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

/// Category tag of a violation or warning record.
/// `PositiveContent` only ever appears in `warnings`, never in `violations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Offensive,
    Controversial,
    Hate,
    AiEscalation,
    PositiveContent,
}

impl ViolationKind {
    /// Stable lower-case name matching the wire spelling; used in logs and
    /// audit details.
    pub fn name(&self) -> &'static str {
        match self {
            ViolationKind::Offensive => "offensive",
            ViolationKind::Controversial => "controversial",
            ViolationKind::Hate => "hate",
            ViolationKind::AiEscalation => "ai_escalation",
            ViolationKind::PositiveContent => "positive_content",
        }
    }
}

/// A single policy finding with severity and a remediation suggestion.
///
/// `details` carries the evidence: the matched lexicon terms joined with
/// ", " for lexical categories, or the classifier's reason for
/// `ai_escalation`. `matched_terms` keeps the ordered list for callers in
/// this crate; it is not part of the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
    pub details: String,
    pub suggestion: String,
    #[serde(skip)]
    pub matched_terms: Vec<String>,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            details: String::new(),
            suggestion: suggestion.into(),
            matched_terms: Vec::new(),
        }
    }

    /// Attach matched lexicon terms (builder style). Also fills `details`.
    pub fn with_terms(mut self, terms: Vec<String>) -> Self {
        self.details = terms.join(", ");
        self.matched_terms = terms;
        self
    }

    /// Attach free-form evidence (builder style), e.g. a classifier reason.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// Complete moderation verdict.
///
/// Invariant: `is_approved == violations.is_empty()`. `final_score` is
/// informational only — a positive score never overrides a violation, and
/// the result can carry a positive `final_score` while rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub is_approved: bool,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
    pub positive_score: i32,
    pub negative_score: i32,
    pub final_score: i32,
    pub checked_at: DateTime<Utc>,
    pub user_email: String,
}

impl ModerationResult {
    /// Fresh approved result with the given scores and no findings yet.
    pub fn approved(positive_score: i32, negative_score: i32) -> Self {
        Self {
            is_approved: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            positive_score,
            negative_score,
            final_score: positive_score - negative_score,
            checked_at: Utc::now(),
            user_email: String::new(),
        }
    }

    /// Append a violation; any violation forces rejection.
    pub fn push_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
        self.is_approved = false;
    }

    /// Append an informational warning; never affects approval.
    pub fn push_warning(&mut self, warning: Violation) {
        self.warnings.push(warning);
    }

    /// Stamp the caller identity and refresh `checked_at` once the pipeline
    /// (including any escalation) has finished.
    pub fn stamp(mut self, user_email: impl Into<String>) -> Self {
        self.user_email = user_email.into();
        self.checked_at = Utc::now();
        self
    }
}
