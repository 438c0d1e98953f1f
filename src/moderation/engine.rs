//! Rule-based decision engine.
//!
//! Turns a scan plus its scores into a preliminary verdict. Evaluation
//! order is fixed by the policy table (offensive, controversial, hate) so
//! the violations list is deterministic for a given input. Approval is
//! decided solely by the presence of violations: a strongly positive
//! final score never rescues content that matched a negative category.

use super::policy::{NEGATIVE_POLICIES, POSITIVE_MESSAGE, POSITIVE_SUGGESTION};
use super::scanner::CategoryMatches;
use super::scorer::Scores;
use crate::verdict::{ModerationResult, Severity, Violation, ViolationKind};

/// Decide the preliminary verdict for one scanned piece of content.
///
/// Pure: no I/O, no clock beyond the result's creation timestamp, and the
/// same matches and scores always yield the same findings.
pub fn decide(matches: &CategoryMatches, scores: Scores) -> ModerationResult {
    let mut result = ModerationResult::approved(scores.positive, scores.negative);

    for policy in &NEGATIVE_POLICIES {
        let matched = matches.for_category(policy.category);
        if matched.is_empty() {
            continue;
        }
        result.push_violation(
            Violation::new(policy.kind, policy.severity, policy.message, policy.suggestion)
                .with_terms(matched.to_vec()),
        );
    }

    if !matches.positive.is_empty() {
        result.push_warning(
            Violation::new(
                ViolationKind::PositiveContent,
                Severity::Medium,
                POSITIVE_MESSAGE,
                POSITIVE_SUGGESTION,
            )
            .with_terms(matches.positive.clone()),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    fn verdict(matches: &CategoryMatches) -> ModerationResult {
        decide(matches, super::super::scorer::score(matches))
    }

    #[test]
    fn clean_content_is_approved_without_findings() {
        let r = verdict(&CategoryMatches::default());
        assert!(r.is_approved);
        assert!(r.violations.is_empty());
        assert!(r.warnings.is_empty());
        assert_eq!(r.final_score, 0);
    }

    #[test]
    fn any_negative_match_rejects() {
        let m = CategoryMatches {
            controversial: owned(&["guerra"]),
            ..CategoryMatches::default()
        };
        let r = verdict(&m);
        assert!(!r.is_approved);
        assert_eq!(r.violations.len(), 1);
        assert_eq!(r.violations[0].kind, ViolationKind::Controversial);
        assert_eq!(r.violations[0].severity, Severity::Medium);
        assert_eq!(r.violations[0].details, "guerra");
    }

    #[test]
    fn violations_follow_policy_order_not_match_order() {
        let m = CategoryMatches {
            offensive: owned(&["idiota"]),
            controversial: owned(&["guerra", "violencia"]),
            hate: owned(&["odio"]),
            positive: Vec::new(),
        };
        let r = verdict(&m);
        let kinds: Vec<ViolationKind> = r.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            [
                ViolationKind::Offensive,
                ViolationKind::Controversial,
                ViolationKind::Hate
            ]
        );
        assert_eq!(r.violations[1].details, "guerra, violencia");
        assert_eq!(r.negative_score, 10 + 2 * 5 + 15);
    }

    #[test]
    fn positive_matches_warn_but_never_gate() {
        let m = CategoryMatches {
            positive: owned(&["gracias", "bendición"]),
            ..CategoryMatches::default()
        };
        let r = verdict(&m);
        assert!(r.is_approved);
        assert!(r.violations.is_empty());
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.warnings[0].kind, ViolationKind::PositiveContent);
        assert_eq!(r.positive_score, 10);
        assert_eq!(r.final_score, 10);
    }

    #[test]
    fn positive_score_never_overrides_a_violation() {
        // Net-positive final score, still rejected.
        let m = CategoryMatches {
            controversial: owned(&["guerra"]),
            positive: owned(&["gracias", "fe", "paz"]),
            ..CategoryMatches::default()
        };
        let r = verdict(&m);
        assert_eq!(r.final_score, 15 - 5);
        assert!(r.final_score > 0);
        assert!(!r.is_approved, "approval must ignore the final score");
        assert_eq!(r.warnings.len(), 1, "positive warning still reported");
    }
}
