//! CSS specificity calculation.

use std::fmt;
use std::ops::Add;

use super::{Selector, SimpleKind, SimpleSelector};

/// CSS specificity as (a, b, c) tuple.
///
/// - a: ID selectors
/// - b: Class selectors, attributes, pseudo-classes
/// - c: Type selectors, pseudo-elements
///
/// Compared lexicographically: (1,0,0) > (0,99,99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Zero specificity (universal selector, parent reference).
    pub const ZERO: Self = Self(0, 0, 0);

    /// Calculate specificity of a selector, summing component-wise over
    /// compound and complex structure.
    pub fn of_selector(selector: &Selector) -> Self {
        match selector {
            Selector::Simple(simple) => Self::of_simple(simple),
            Selector::Compound(parts) => parts
                .iter()
                .map(Self::of_simple)
                .fold(Self::ZERO, |acc, s| acc + s),
            Selector::Complex { left, right, .. } => {
                Self::of_selector(left) + Self::of_selector(right)
            }
        }
    }

    /// Calculate specificity of a single simple selector.
    pub fn of_simple(simple: &SimpleSelector) -> Self {
        match simple.kind {
            SimpleKind::Id => Self(1, 0, 0),
            SimpleKind::Class | SimpleKind::Attribute | SimpleKind::PseudoClass => Self(0, 1, 0),
            SimpleKind::Type if simple.is_universal() => Self::ZERO, // * has no specificity
            SimpleKind::Type | SimpleKind::PseudoElement => Self(0, 0, 1),
        }
    }

    /// Get the ID selector count.
    pub fn ids(&self) -> u32 {
        self.0
    }

    /// Get the class/attribute/pseudo-class count.
    pub fn classes(&self) -> u32 {
        self.1
    }

    /// Get the type/pseudo-element count.
    pub fn types(&self) -> u32 {
        self.2
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}
