//! Deep-check escalation pass.
//!
//! Runs the external classifier over content the rule-based pass already
//! approved, and only for deep checks. The pass is strictly one-way: it can
//! downgrade an approval into a rejection, never the reverse. Every failure
//! mode (transport error, timeout, malformed verdict) is fail-open — the
//! rule-based outcome stands and the failure is logged and counted.

use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use super::policy::{ESCALATION_FALLBACK_SUGGESTION, ESCALATION_MESSAGE};
use crate::classify::DynClassifier;
use crate::verdict::{CheckType, ModerationResult, Severity, Violation, ViolationKind};

pub struct Escalator {
    classifier: DynClassifier,
    timeout: Duration,
}

impl Escalator {
    pub fn new(classifier: DynClassifier, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// The gate: escalation runs only for a deep check whose rule-based
    /// pass approved the content. Rejected content is never escalated —
    /// the rules already decided.
    pub fn should_run(check: CheckType, preliminary: &ModerationResult) -> bool {
        check == CheckType::Deep && preliminary.is_approved
    }

    /// Run the classifier and fold its verdict into `result`.
    pub async fn escalate(&self, content: &str, result: &mut ModerationResult) {
        counter!("moderation_escalations_total").increment(1);

        let verdict =
            match tokio::time::timeout(self.timeout, self.classifier.classify(content)).await {
                Ok(Ok(verdict)) => verdict,
                Ok(Err(err)) => {
                    counter!("moderation_escalation_failures_total").increment(1);
                    warn!(
                        provider = self.classifier.name(),
                        error = ?err,
                        "escalation failed, keeping rule-based verdict"
                    );
                    return;
                }
                Err(_) => {
                    counter!("moderation_escalation_failures_total").increment(1);
                    warn!(
                        provider = self.classifier.name(),
                        timeout_secs = self.timeout.as_secs(),
                        "escalation timed out, keeping rule-based verdict"
                    );
                    return;
                }
            };

        if verdict.is_appropriate {
            debug!(
                provider = self.classifier.name(),
                "classifier confirmed the rule-based approval"
            );
            return;
        }

        counter!("moderation_escalation_downgrades_total").increment(1);
        let suggestion = verdict
            .suggestion
            .unwrap_or_else(|| ESCALATION_FALLBACK_SUGGESTION.to_string());
        result.push_violation(
            Violation::new(
                ViolationKind::AiEscalation,
                Severity::Medium,
                ESCALATION_MESSAGE,
                suggestion,
            )
            .with_details(verdict.reason),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, ClassifierVerdict, FailingClassifier, MockClassifier};
    use anyhow::Result;
    use std::sync::Arc;

    struct SlowClassifier;

    #[async_trait::async_trait]
    impl Classifier for SlowClassifier {
        async fn classify(&self, _content: &str) -> Result<ClassifierVerdict> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(MockClassifier::approving().fixed)
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn approved() -> ModerationResult {
        ModerationResult::approved(0, 0)
    }

    fn rejected() -> ModerationResult {
        let mut r = approved();
        r.push_violation(Violation::new(
            ViolationKind::Offensive,
            Severity::High,
            "ofensivo",
            "",
        ));
        r
    }

    #[test]
    fn gate_requires_deep_check_and_preliminary_approval() {
        assert!(Escalator::should_run(CheckType::Deep, &approved()));
        assert!(!Escalator::should_run(CheckType::Deep, &rejected()));
        assert!(!Escalator::should_run(CheckType::Basic, &approved()));
        assert!(!Escalator::should_run(CheckType::Basic, &rejected()));
    }

    #[tokio::test]
    async fn appropriate_verdict_leaves_result_untouched() {
        let esc = Escalator::new(
            Arc::new(MockClassifier::approving()),
            Duration::from_secs(1),
        );
        let mut result = approved();
        esc.escalate("gracias por todo", &mut result).await;
        assert!(result.is_approved);
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn inappropriate_verdict_downgrades_with_classifier_evidence() {
        let esc = Escalator::new(
            Arc::new(MockClassifier::rejecting()),
            Duration::from_secs(1),
        );
        let mut result = approved();
        esc.escalate("texto dudoso", &mut result).await;

        assert!(!result.is_approved);
        assert_eq!(result.violations.len(), 1);
        let v = &result.violations[0];
        assert_eq!(v.kind, ViolationKind::AiEscalation);
        assert_eq!(v.severity, Severity::Medium);
        assert_eq!(v.message, ESCALATION_MESSAGE);
        assert_eq!(v.details, "El mensaje contiene contenido inapropiado (mock)");
        assert_eq!(v.suggestion, "Reformula tu mensaje con un tono más amable.");
    }

    #[tokio::test]
    async fn missing_suggestion_falls_back_to_default() {
        let mut mock = MockClassifier::rejecting();
        mock.fixed.suggestion = None;
        let esc = Escalator::new(Arc::new(mock), Duration::from_secs(1));
        let mut result = approved();
        esc.escalate("texto dudoso", &mut result).await;
        assert_eq!(result.violations[0].suggestion, ESCALATION_FALLBACK_SUGGESTION);
    }

    #[tokio::test]
    async fn classifier_error_is_fail_open() {
        let esc = Escalator::new(Arc::new(FailingClassifier), Duration::from_secs(1));
        let mut result = approved();
        esc.escalate("texto dudoso", &mut result).await;
        assert!(result.is_approved, "failure must keep the rule-based verdict");
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn classifier_timeout_is_fail_open() {
        let esc = Escalator::new(Arc::new(SlowClassifier), Duration::from_millis(20));
        let mut result = approved();
        esc.escalate("texto dudoso", &mut result).await;
        assert!(result.is_approved);
        assert!(result.violations.is_empty());
    }
}
