//! The moderation pipeline: scan, score, decide, then (for deep checks)
//! escalate.
//!
//! Every stage up to escalation is a pure function, so the pipeline is
//! deterministic for a given lexicon and input. Only the escalator talks
//! to the network, and only the orchestrator here wires the stages
//! together.

pub mod engine;
pub mod escalator;
pub mod policy;
pub mod scanner;
pub mod scorer;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::ModerationError;
use crate::identity::CallerIdentity;
use crate::lexicon::Lexicon;
use crate::verdict::{ModerationRequest, ModerationResult};
use escalator::Escalator;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("moderation_requests_total", "Moderation requests processed.");
        describe_counter!(
            "moderation_rejections_total",
            "Requests rejected by the pipeline."
        );
        describe_counter!(
            "moderation_violations_total",
            "Violations raised, labeled by category."
        );
        describe_counter!(
            "moderation_escalations_total",
            "Deep checks escalated to the external classifier."
        );
        describe_counter!(
            "moderation_escalation_failures_total",
            "Escalations that failed or timed out (fail-open)."
        );
        describe_counter!(
            "moderation_escalation_downgrades_total",
            "Approvals downgraded to rejection by the classifier."
        );
    });
}

/// Short stable id for logging content without logging the content.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Run one piece of content through the whole pipeline.
///
/// Validates the input, runs the rule-based stages, gates the escalation
/// pass, and stamps the verdict with the caller identity and timestamp.
/// The only error a caller can see is `InvalidInput`; collaborator
/// failures never surface here.
pub async fn moderate(
    request: &ModerationRequest,
    caller: &CallerIdentity,
    lexicon: &Lexicon,
    escalator: &Escalator,
) -> Result<ModerationResult, ModerationError> {
    ensure_metrics_described();
    counter!("moderation_requests_total").increment(1);

    if request.content.trim().is_empty() {
        return Err(ModerationError::InvalidInput(
            "content must not be empty".to_string(),
        ));
    }

    let matches = scanner::scan(&request.content, lexicon);
    let scores = scorer::score(&matches);
    let mut result = engine::decide(&matches, scores);

    if Escalator::should_run(request.check_type, &result) {
        escalator.escalate(&request.content, &mut result).await;
    }

    let result = result.stamp(caller.email.as_str());

    if !result.is_approved {
        counter!("moderation_rejections_total").increment(1);
    }
    for violation in &result.violations {
        counter!("moderation_violations_total", "category" => violation.kind.name()).increment(1);
    }

    // Never log raw content. Only the hashed id + counts.
    let id = anon_hash(&request.content);
    info!(
        target: "moderation",
        %id,
        check_type = ?request.check_type,
        approved = result.is_approved,
        violations = result.violations.len(),
        warnings = result.warnings.len(),
        final_score = result.final_score,
        "moderation finished"
    );

    Ok(result)
}
