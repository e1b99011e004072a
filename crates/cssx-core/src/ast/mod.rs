//! Syntax tree for CSSX documents.
//!
//! The parser produces a [`Stylesheet`]; the semantic passes rewrite it in
//! place (template expansion) or produce a resolved copy (variable
//! resolution). Every node that can be the subject of a diagnostic carries
//! a [`Span`].

mod nodes;
mod selector;
mod span;
mod specificity;
mod value;

pub use nodes::{
    Argument, BodyItem, Declaration, Item, Param, RuleSet, Stylesheet, TemplateDef,
    TemplateItem, TemplateUse, VariableDecl,
};
pub use selector::{Combinator, Selector, SimpleKind, SimpleSelector};
pub use span::Span;
pub use specificity::Specificity;
pub use value::{Value, ValueKind, format_number};
