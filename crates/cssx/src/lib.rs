//! # CSSX
//!
//! A compiler for CSSX, a small style language with Spanish keywords that
//! produces plain CSS and a skeleton HTML document.
//!
//! ```text
//! @primario = #3498db
//!
//! plantilla tarjeta(@fondo=blanco, @radio=8) {
//!     fondo = @fondo
//!     border-radius = @radio
//! }
//!
//! .cta {
//!     color = @primario
//!     usar tarjeta(@radio=12)
//!     &:hover { opacidad = 0.8 }
//! }
//! ```
//!
//! ## Crates
//!
//! - [`cssx_core`]: tree model, diagnostics, template expansion, semantic
//!   analysis and variable resolution
//! - [`cssx_parser`]: source text to tree
//! - [`cssx_codegen`]: CSS and HTML generation
//!
//! This crate ties them together behind [`Compiler`] and ships the `cssx`
//! command-line tool.
//!
//! ## Features
//!
//! - `watch` (default): [`watch::SourceWatcher`] and `cssx watch`
//!
//! # Example
//!
//! ```ignore
//! use cssx::prelude::*;
//!
//! let compiler = Compiler::new(CompilerConfig::default());
//! let result = compiler.compile(source, "main.cssx");
//! for diagnostic in &result.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! if result.success {
//!     std::fs::write("main.css", &result.css)?;
//! }
//! ```

mod compiler;
pub mod config;
mod error;
#[cfg(feature = "watch")]
pub mod watch;

pub use compiler::{CompileResult, Compiler};
pub use config::{CompilerConfig, OutputConfig, ProjectConfig};
pub use error::{Error, Result};

/// Tree model, diagnostics and semantic passes.
pub mod analysis {
    pub use cssx_core::*;
}

/// Source text to tree.
pub mod parser {
    pub use cssx_parser::*;
}

/// CSS and HTML generation.
pub mod codegen {
    pub use cssx_codegen::*;
}

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::{CompileResult, Compiler, CompilerConfig, Error, OutputConfig, ProjectConfig, Result};
    pub use cssx_core::diagnostics::{Diagnostic, DiagnosticCode, Severity};
}
