//! The fixed catalog of trend shapes.
//!
//! Entries are static and ordered; the order is the one shown in model pickers and
//! used to break ties when ranking. Every model has at most three terms, which
//! keeps `XᵀX` within the sizes `math::matrix` can invert.

use crate::math::Term;
use crate::models::Model;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "y=b1+b2x";

static CATALOG: [Model; 19] = [
    Model {
        key: "y=b1",
        label: "y = β₁",
        terms: &[Term::One],
    },
    Model {
        key: "y=b1x",
        label: "y = β₁·x",
        terms: &[Term::X],
    },
    Model {
        key: "y=b1+b2x",
        label: "y = β₁ + β₂·x",
        terms: &[Term::One, Term::X],
    },
    Model {
        key: "y=b1x^2",
        label: "y = β₁·x²",
        terms: &[Term::Square],
    },
    Model {
        key: "y=b1+b2x^2",
        label: "y = β₁ + β₂·x²",
        terms: &[Term::One, Term::Square],
    },
    Model {
        key: "y=b1+b2x+b3x^2",
        label: "y = β₁ + β₂·x + β₃·x²",
        terms: &[Term::One, Term::X, Term::Square],
    },
    Model {
        key: "y=b1x^0.5",
        label: "y = β₁·√x",
        terms: &[Term::Sqrt],
    },
    Model {
        key: "y=b1+b2x^0.5",
        label: "y = β₁ + β₂·√x",
        terms: &[Term::One, Term::Sqrt],
    },
    Model {
        key: "y=b1/x",
        label: "y = β₁/x",
        terms: &[Term::Reciprocal],
    },
    Model {
        key: "y=b1+b2sinx",
        label: "y = β₁ + β₂·sin x",
        terms: &[Term::One, Term::Sin(1.0)],
    },
    Model {
        key: "y=b1+b2cosx",
        label: "y = β₁ + β₂·cos x",
        terms: &[Term::One, Term::Cos],
    },
    Model {
        key: "y=b1+b2sin2x",
        label: "y = β₁ + β₂·sin 2x",
        terms: &[Term::One, Term::Sin(2.0)],
    },
    Model {
        key: "y=b1+b2sin0.5x",
        label: "y = β₁ + β₂·sin(x/2)",
        terms: &[Term::One, Term::Sin(0.5)],
    },
    Model {
        key: "y=b1+b2sin0.25x",
        label: "y = β₁ + β₂·sin(x/4)",
        terms: &[Term::One, Term::Sin(0.25)],
    },
    Model {
        key: "y=b1+b2sinx^2",
        label: "y = β₁ + β₂·sin(x²)",
        terms: &[Term::One, Term::SinOfSquare],
    },
    Model {
        key: "y=b1e^x",
        label: "y = β₁·eˣ",
        terms: &[Term::Exp],
    },
    Model {
        key: "y=b1+b2e^x",
        label: "y = β₁ + β₂·eˣ",
        terms: &[Term::One, Term::Exp],
    },
    Model {
        key: "y=b1lgx",
        label: "y = β₁·log₁₀ x",
        terms: &[Term::Log10],
    },
    Model {
        key: "y=b1+b2lgx",
        label: "y = β₁ + β₂·log₁₀ x",
        terms: &[Term::One, Term::Log10],
    },
];

/// Every model, in catalog order.
pub fn all() -> &'static [Model] {
    &CATALOG
}

/// Find a model by key (surrounding whitespace is ignored).
pub fn lookup(key: &str) -> Option<&'static Model> {
    let key = key.trim();
    CATALOG.iter().find(|m| m.key == key)
}

/// Model keys in catalog order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|m| m.key)
}

/// Position of `key` in the catalog.
pub fn position(key: &str) -> Option<usize> {
    let key = key.trim();
    CATALOG.iter().position(|m| m.key == key)
}
