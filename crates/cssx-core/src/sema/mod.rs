//! Semantic passes over a parsed stylesheet.
//!
//! The passes run in a fixed order:
//!
//! 1. [`collect_templates`] registers every top-level template definition.
//! 2. [`expand_templates`] replaces each `usar` invocation with the
//!    declarations it produces.
//! 3. [`SemanticAnalyzer`] validates the expanded tree and tracks variables
//!    in a [`ScopeTable`].
//! 4. [`VariableResolver`] builds a copy of the tree with every variable
//!    reference replaced by its value.
//!
//! [`check`] runs the first three; the resolver is run by the caller once
//! it knows no errors were reported.

mod analyzer;
mod expander;
mod resolver;
mod scope;
mod templates;

pub use analyzer::SemanticAnalyzer;
pub use expander::{MAX_EXPANSION_DEPTH, TEMPLATE_DOC_URL, TemplateExpander, expand_templates};
pub use resolver::VariableResolver;
pub use scope::{ScopeTable, Symbol};
pub use templates::{DuplicateTemplate, TemplateTable, collect_templates};

use crate::ast::Stylesheet;
use crate::diagnostics::Diagnostics;

/// Collect and expand templates, then analyze the expanded tree.
///
/// The stylesheet is modified in place: after this call it holds no
/// template invocations. Returns the analyzer's final scope table.
pub fn check(
    sheet: &mut Stylesheet,
    max_expansion_depth: usize,
    diagnostics: &mut Diagnostics,
) -> ScopeTable {
    let table = collect_templates(sheet, diagnostics);
    let expansions = expand_templates(sheet, &table, max_expansion_depth, diagnostics);
    tracing::debug!(
        templates = table.len(),
        expansions,
        "template expansion finished"
    );
    SemanticAnalyzer::new(diagnostics).analyze(sheet)
}
