//! Immutable categorized term lists driving the rule-based pass.
//!
//! The lexicon is built once at process start (embedded default, optionally
//! overridden by a TOML file) and shared by read-only reference. It is never
//! mutated afterwards, which is what makes the pipeline lock-free under
//! concurrent requests.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LEXICON_PATH: &str = "config/lexicon.toml";
pub const ENV_LEXICON_PATH: &str = "MODERATION_LEXICON_PATH";

/// Negative lexicon categories, in the fixed order the decision engine
/// evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Offensive,
    Controversial,
    Hate,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Offensive, Category::Controversial, Category::Hate];

    /// Stable lower-case name used in logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Offensive => "offensive",
            Category::Controversial => "controversial",
            Category::Hate => "hate",
        }
    }
}

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../config/lexicon.toml");
    Lexicon::from_toml_str(raw).expect("valid embedded lexicon")
});

/// Categorized term lists. Terms are lower-case, unique, and keep their
/// file order — matched-term lists downstream inherit that order.
#[derive(Debug, Clone)]
pub struct Lexicon {
    offensive: Vec<String>,
    controversial: Vec<String>,
    hate: Vec<String>,
    positive: Vec<String>,
}

/* ----------------------------
TOML schema
---------------------------- */

#[derive(Debug, Deserialize)]
struct LexiconFile {
    categories: NegativeSections,
    positive: TermSection,
}

#[derive(Debug, Deserialize)]
struct NegativeSections {
    offensive: TermSection,
    controversial: TermSection,
    hate: TermSection,
}

#[derive(Debug, Deserialize)]
struct TermSection {
    terms: Vec<String>,
}

impl Lexicon {
    /// The embedded default lexicon, parsed once per process.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Load the lexicon for this process: `MODERATION_LEXICON_PATH` if set,
    /// else the shipped file at [`DEFAULT_LEXICON_PATH`] when present, else
    /// a copy of the embedded default.
    ///
    /// The shipped file and the embedded default are the same TOML at build
    /// time; reading the file lets a deployment edit terms without a
    /// rebuild.
    pub fn load() -> anyhow::Result<Lexicon> {
        if let Ok(path) = std::env::var(ENV_LEXICON_PATH) {
            return Self::load_from_file(&PathBuf::from(path));
        }
        let shipped = Path::new(DEFAULT_LEXICON_PATH);
        if shipped.exists() {
            return Self::load_from_file(shipped);
        }
        Ok(Self::builtin().clone())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Lexicon> {
        let raw = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read lexicon at {}: {}", path.display(), e))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Lexicon> {
        let file: LexiconFile = toml::from_str(raw)?;
        Ok(Lexicon {
            offensive: normalize_terms(file.categories.offensive.terms),
            controversial: normalize_terms(file.categories.controversial.terms),
            hate: normalize_terms(file.categories.hate.terms),
            positive: normalize_terms(file.positive.terms),
        })
    }

    pub fn terms(&self, category: Category) -> &[String] {
        match category {
            Category::Offensive => &self.offensive,
            Category::Controversial => &self.controversial,
            Category::Hate => &self.hate,
        }
    }

    pub fn positive_terms(&self) -> &[String] {
        &self.positive
    }
}

/// Lower-case, trim, drop empties, dedup while preserving first-seen order.
fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for t in terms {
        let t = t.trim().to_lowercase();
        if t.is_empty() || out.contains(&t) {
            continue;
        }
        out.push(t);
    }
    out
}
