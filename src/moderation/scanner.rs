//! Case-insensitive substring scan of input text against the lexicon.
//!
//! Matching is plain substring containment, not word-bounded: "idiota"
//! also hits inside "idiotax". That coarseness is the shipped policy —
//! do not "fix" it to word-boundary matching without a policy decision.

use crate::lexicon::{Category, Lexicon};

/// Matched terms per category, each in lexicon order, each term at most
/// once per scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMatches {
    pub offensive: Vec<String>,
    pub controversial: Vec<String>,
    pub hate: Vec<String>,
    pub positive: Vec<String>,
}

impl CategoryMatches {
    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::Offensive => &self.offensive,
            Category::Controversial => &self.controversial,
            Category::Hate => &self.hate,
        }
    }
}

/// Scan `text` against every lexicon category.
///
/// Pure and deterministic: the same text and lexicon always produce the
/// same matches. No I/O, no side effects.
pub fn scan(text: &str, lexicon: &Lexicon) -> CategoryMatches {
    let normalized = text.to_lowercase();
    CategoryMatches {
        offensive: matched_terms(&normalized, lexicon.terms(Category::Offensive)),
        controversial: matched_terms(&normalized, lexicon.terms(Category::Controversial)),
        hate: matched_terms(&normalized, lexicon.terms(Category::Hate)),
        positive: matched_terms(&normalized, lexicon.positive_terms()),
    }
}

fn matched_terms(normalized: &str, terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .filter(|t| normalized.contains(t.as_str()))
        .cloned()
        .collect()
}
