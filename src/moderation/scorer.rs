//! Weighted scoring over scan results.
//!
//! Every matched negative term contributes its category weight to the
//! negative total; every matched positive term contributes
//! [`POSITIVE_WEIGHT`] to the positive total. The final score is derived
//! on demand and never stored — the two totals are the source of truth.

use super::policy::{policy_for, POSITIVE_WEIGHT};
use super::scanner::CategoryMatches;
use crate::lexicon::Category;

/// Positive and negative score totals for one piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub positive: i32,
    pub negative: i32,
}

impl Scores {
    /// Positive minus negative. Informational only: the decision engine
    /// ignores it when deciding approval.
    pub fn final_score(&self) -> i32 {
        self.positive - self.negative
    }
}

/// Score a scan result against the policy table.
pub fn score(matches: &CategoryMatches) -> Scores {
    let negative = Category::ALL
        .iter()
        .map(|&cat| matches.for_category(cat).len() as i32 * policy_for(cat).weight)
        .sum();
    let positive = matches.positive.len() as i32 * POSITIVE_WEIGHT;
    Scores { positive, negative }
}
