//! Tree model and semantic passes for the CSSX style language.
//!
//! CSSX is a small preprocessor language that compiles to CSS and a
//! skeleton HTML document. This crate holds everything that does not
//! touch text directly:
//!
//! - **AST**: stylesheets, rule sets, selectors, values and templates
//! - **Diagnostics**: coded errors and warnings with documentation links
//! - **Lexicon**: the Spanish property, color and element vocabulary
//! - **Properties**: the CSS property database used for type checking
//! - **Semantic passes**: template expansion, scoped variable analysis
//!   and variable resolution
//!
//! # Example
//!
//! ```ignore
//! use cssx_core::prelude::*;
//!
//! let mut diagnostics = Diagnostics::new("main.cssx");
//! sema::check(&mut stylesheet, MAX_EXPANSION_DEPTH, &mut diagnostics);
//! if !diagnostics.has_errors() {
//!     let resolved = VariableResolver::new().resolve(&stylesheet);
//! }
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexicon;
pub mod properties;
pub mod sema;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::ast::{
        Argument, BodyItem, Combinator, Declaration, Item, Param, RuleSet, Selector,
        SimpleKind, SimpleSelector, Span, Specificity, Stylesheet, TemplateDef, TemplateItem,
        TemplateUse, Value, ValueKind, VariableDecl,
    };
    pub use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
    pub use crate::sema::{
        self, DuplicateTemplate, MAX_EXPANSION_DEPTH, ScopeTable, SemanticAnalyzer, Symbol,
        TemplateExpander, TemplateTable, VariableResolver,
    };
}
