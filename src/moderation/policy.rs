//! Declarative moderation policy.
//!
//! One table maps each negative lexicon category to its score weight,
//! violation severity and user-facing messaging. The scorer and the
//! decision engine both read this table, so the whole policy is auditable
//! (and testable) in one place instead of being scattered across branches.

use crate::lexicon::Category;
use crate::verdict::{Severity, ViolationKind};

pub struct CategoryPolicy {
    pub category: Category,
    pub kind: ViolationKind,
    pub weight: i32,
    pub severity: Severity,
    pub message: &'static str,
    pub suggestion: &'static str,
}

/// Evaluated in array order by the decision engine: offensive, then
/// controversial, then hate.
pub const NEGATIVE_POLICIES: [CategoryPolicy; 3] = [
    CategoryPolicy {
        category: Category::Offensive,
        kind: ViolationKind::Offensive,
        weight: 10,
        severity: Severity::High,
        message: "El contenido contiene lenguaje ofensivo",
        suggestion: "Por favor, expresa tu opinión sin usar lenguaje ofensivo.",
    },
    CategoryPolicy {
        category: Category::Controversial,
        kind: ViolationKind::Controversial,
        weight: 5,
        severity: Severity::Medium,
        message: "El contenido menciona temas controversiales",
        suggestion: "Considera evitar temas que puedan causar división en la comunidad.",
    },
    CategoryPolicy {
        category: Category::Hate,
        kind: ViolationKind::Hate,
        weight: 15,
        severity: Severity::Critical,
        message: "El contenido contiene lenguaje de odio",
        suggestion: "Este tipo de lenguaje no está permitido. Por favor, reformula tu mensaje.",
    },
];

/// Weight applied per matched positive term.
pub const POSITIVE_WEIGHT: i32 = 5;

/// Messaging for the informational positive-content warning.
pub const POSITIVE_MESSAGE: &str = "El contenido contiene lenguaje positivo y edificante";
pub const POSITIVE_SUGGESTION: &str = "¡Gracias por aportar un mensaje que edifica a la comunidad!";

/// Messaging for a violation raised by the AI escalation pass. The
/// classifier's own reason lands in `details`.
pub const ESCALATION_MESSAGE: &str = "La revisión adicional detectó contenido inapropiado";
pub const ESCALATION_FALLBACK_SUGGESTION: &str =
    "Por favor, revisa tu mensaje antes de publicarlo de nuevo.";

pub fn policy_for(category: Category) -> &'static CategoryPolicy {
    match category {
        Category::Offensive => &NEGATIVE_POLICIES[0],
        Category::Controversial => &NEGATIVE_POLICIES[1],
        Category::Hate => &NEGATIVE_POLICIES[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_table_order() {
        for cat in Category::ALL {
            assert_eq!(policy_for(cat).category, cat);
        }
    }

    #[test]
    fn weights_and_severities_are_fixed_policy() {
        assert_eq!(policy_for(Category::Offensive).weight, 10);
        assert_eq!(policy_for(Category::Controversial).weight, 5);
        assert_eq!(policy_for(Category::Hate).weight, 15);
        assert_eq!(POSITIVE_WEIGHT, 5);

        assert_eq!(policy_for(Category::Offensive).severity, Severity::High);
        assert_eq!(
            policy_for(Category::Controversial).severity,
            Severity::Medium
        );
        assert_eq!(policy_for(Category::Hate).severity, Severity::Critical);
    }
}
