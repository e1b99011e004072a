//! Selector type definitions.

use std::fmt;

use super::{Span, Specificity};

/// What a simple selector matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleKind {
    /// Element name (`div`) or the universal selector (`*`).
    Type,
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// `[name]`, `[name=value]`
    Attribute,
    /// `:name`, `:name(args)`
    PseudoClass,
    /// `::name`
    PseudoElement,
}

/// A single selector atom such as `.primary` or `:hover`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleSelector {
    pub kind: SimpleKind,
    /// Name without its prefix punctuation. Attribute selectors keep the
    /// whole bracket contents; functional pseudo-classes keep their
    /// parenthesized arguments.
    pub name: String,
    pub span: Span,
}

impl SimpleSelector {
    /// Create a simple selector.
    pub fn new(kind: SimpleKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            span: Span::synthetic(),
        }
    }

    /// Create a type selector.
    pub fn type_selector(name: impl Into<String>) -> Self {
        Self::new(SimpleKind::Type, name)
    }

    /// Create a class selector.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(SimpleKind::Class, name)
    }

    /// Create an ID selector.
    pub fn id(name: impl Into<String>) -> Self {
        Self::new(SimpleKind::Id, name)
    }

    /// Create a pseudo-class selector.
    pub fn pseudo_class(name: impl Into<String>) -> Self {
        Self::new(SimpleKind::PseudoClass, name)
    }

    /// Set the source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Check if this is the universal selector.
    pub fn is_universal(&self) -> bool {
        self.kind == SimpleKind::Type && self.name == "*"
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SimpleKind::Type => write!(f, "{}", self.name),
            SimpleKind::Class => write!(f, ".{}", self.name),
            SimpleKind::Id => write!(f, "#{}", self.name),
            SimpleKind::Attribute => write!(f, "[{}]", self.name),
            SimpleKind::PseudoClass => write!(f, ":{}", self.name),
            SimpleKind::PseudoElement => write!(f, "::{}", self.name),
        }
    }
}

/// Combinator between two selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (space): matches any descendant.
    Descendant,
    /// Child combinator (>): matches direct child only.
    Child,
    /// Adjacent sibling (+): matches immediately following sibling.
    AdjacentSibling,
    /// General sibling (~): matches any following sibling.
    GeneralSibling,
    /// Parent reference (&): glues the right side onto the enclosing
    /// rule's selector.
    Parent,
}

impl Combinator {
    /// Text placed between the two sides when printing.
    pub fn separator(&self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::AdjacentSibling => " + ",
            Combinator::GeneralSibling => " ~ ",
            Combinator::Parent => "&",
        }
    }
}

/// A complete selector (e.g., "nav > a.active:hover").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// One simple selector.
    Simple(SimpleSelector),
    /// Simple selectors written without separators (`div.card#main`).
    Compound(Vec<SimpleSelector>),
    /// Two selectors joined by a combinator.
    Complex {
        left: Box<Selector>,
        combinator: Combinator,
        right: Box<Selector>,
    },
}

impl Selector {
    /// Create a type selector.
    pub fn type_selector(name: impl Into<String>) -> Self {
        Self::Simple(SimpleSelector::type_selector(name))
    }

    /// Create a class selector.
    pub fn class(name: impl Into<String>) -> Self {
        Self::Simple(SimpleSelector::class(name))
    }

    /// Create an ID selector.
    pub fn id(name: impl Into<String>) -> Self {
        Self::Simple(SimpleSelector::id(name))
    }

    /// Create a compound selector. A single part collapses to `Simple`.
    pub fn compound(mut parts: Vec<SimpleSelector>) -> Self {
        if parts.len() == 1 {
            if let Some(part) = parts.pop() {
                return Self::Simple(part);
            }
        }
        Self::Compound(parts)
    }

    /// Join two selectors with a combinator.
    pub fn combine(self, combinator: Combinator, right: Selector) -> Self {
        Self::Complex {
            left: Box::new(self),
            combinator,
            right: Box::new(right),
        }
    }

    /// Add a descendant selector.
    pub fn descendant(self, right: Selector) -> Self {
        self.combine(Combinator::Descendant, right)
    }

    /// Add a child selector.
    pub fn child(self, right: Selector) -> Self {
        self.combine(Combinator::Child, right)
    }

    /// A parent-reference selector: `&` followed by `right`.
    pub fn parent_ref(right: Selector) -> Self {
        Self::Compound(Vec::new()).combine(Combinator::Parent, right)
    }

    /// Whether this selector starts with `&`.
    pub fn is_parent_reference(&self) -> bool {
        match self {
            Selector::Complex {
                left, combinator, ..
            } => *combinator == Combinator::Parent || left.is_parent_reference(),
            _ => false,
        }
    }

    /// The part after the leading `&`, printed. `None` if this selector does
    /// not start with `&`.
    pub fn parent_suffix(&self) -> Option<String> {
        if !self.is_parent_reference() {
            return None;
        }
        let full = self.to_string();
        full.strip_prefix('&').map(str::to_string)
    }

    /// All simple selectors in source order.
    pub fn simples(&self) -> Vec<&SimpleSelector> {
        let mut out = Vec::new();
        self.collect_simples(&mut out);
        out
    }

    fn collect_simples<'a>(&'a self, out: &mut Vec<&'a SimpleSelector>) {
        match self {
            Selector::Simple(simple) => out.push(simple),
            Selector::Compound(parts) => out.extend(parts.iter()),
            Selector::Complex { left, right, .. } => {
                left.collect_simples(out);
                right.collect_simples(out);
            }
        }
    }

    /// Get the rightmost (subject) compound as a list of simple selectors.
    pub fn subject(&self) -> Vec<&SimpleSelector> {
        match self {
            Selector::Simple(simple) => vec![simple],
            Selector::Compound(parts) => parts.iter().collect(),
            Selector::Complex { right, .. } => right.subject(),
        }
    }

    /// Compound selectors in this tree, including single simple selectors.
    pub fn compounds(&self) -> Vec<Vec<&SimpleSelector>> {
        match self {
            Selector::Simple(simple) => vec![vec![simple]],
            Selector::Compound(parts) => vec![parts.iter().collect()],
            Selector::Complex { left, right, .. } => {
                let mut out = left.compounds();
                out.extend(right.compounds());
                out
            }
        }
    }

    /// Calculate the specificity of this selector.
    pub fn specificity(&self) -> Specificity {
        Specificity::of_selector(self)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Simple(simple) => write!(f, "{simple}"),
            Selector::Compound(parts) => {
                for part in parts {
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            Selector::Complex {
                left,
                combinator,
                right,
            } => write!(f, "{}{}{}", left, combinator.separator(), right),
        }
    }
}
