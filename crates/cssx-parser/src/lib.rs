//! Parser for the CSSX style language.
//!
//! Turns source text into a [`cssx_core::ast::Stylesheet`]. The document
//! structure is read line by line; selectors and values are tokenized with
//! [`cssparser`].
//!
//! # Example
//!
//! ```ignore
//! use cssx_parser::parse;
//!
//! let sheet = parse(".box {\n  fondo = azul\n}", "main.cssx")?;
//! assert_eq!(sheet.rule_sets().count(), 1);
//! ```

mod error;
mod parser;
mod selector;
mod value;

pub use error::{ParseError, Result};
pub use parser::parse;
