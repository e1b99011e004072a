//! The compile entry point.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cssx_codegen::{build_html, generate_css, render_document};
use cssx_core::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use cssx_core::sema::{self, VariableResolver};
use serde::Serialize;

use crate::config::{CompilerConfig, OutputConfig};
use crate::{Error, Result};

/// Outcome of one compile.
///
/// `success` is false exactly when a diagnostic has error severity; the
/// outputs are then empty. Diagnostics are always returned, sorted by
/// location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileResult {
    pub success: bool,
    pub css: String,
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Diagnostics with a given code.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Diagnostics as text, one per line, followed by a summary line.
    pub fn render_diagnostics(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{diagnostic}");
        }
        let _ = writeln!(
            out,
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );
        out
    }

    /// The whole result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the enabled outputs as `<stem>.css` and `<stem>.html` under
    /// `output.dir`, creating the directory if needed.
    ///
    /// Nothing is written for a failed compile. Returns the written paths.
    pub fn write_outputs(&self, stem: &str, output: &OutputConfig) -> Result<Vec<PathBuf>> {
        if !self.success {
            return Ok(Vec::new());
        }
        std::fs::create_dir_all(&output.dir).map_err(|e| Error::io(&output.dir, e))?;

        let mut written = Vec::new();
        let targets = [
            (output.css, "css", &self.css),
            (output.html, "html", &self.html),
        ];
        for (enabled, extension, contents) in targets {
            if !enabled {
                continue;
            }
            let path = output.dir.join(format!("{stem}.{extension}"));
            std::fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
            tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
            written.push(path);
        }
        Ok(written)
    }
}

/// Runs the full pipeline: parse, expand templates, analyze, resolve
/// variables and generate CSS and HTML.
///
/// A compiler holds only its configuration. Every call to
/// [`compile`](Self::compile) builds its own tree and tables, so one
/// compiler can be shared between threads.
///
/// # Example
///
/// ```ignore
/// let compiler = Compiler::new(CompilerConfig::default());
/// let result = compiler.compile("@c = #3498db\n.box { fondo = @c }", "main.cssx");
/// assert!(result.success);
/// assert!(result.css.contains("background-color: #3498db;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile source text. `filename` is used in diagnostics.
    pub fn compile(&self, source: &str, filename: &str) -> CompileResult {
        let span = tracing::info_span!("compile", file = filename);
        let _guard = span.enter();

        let mut sheet = match cssx_parser::parse(source, filename) {
            Ok(sheet) => sheet,
            Err(err) => {
                tracing::debug!(%err, "parse failed");
                let at = err.span();
                let diagnostic = Diagnostic::new(DiagnosticCode::ParseFailure, err.message, filename, at);
                return CompileResult {
                    diagnostics: vec![diagnostic],
                    ..CompileResult::default()
                };
            }
        };

        let mut diagnostics = Diagnostics::new(filename);
        sema::check(&mut sheet, self.config.max_expansion_depth, &mut diagnostics);

        if diagnostics.has_errors() {
            tracing::debug!(
                errors = diagnostics.error_count(),
                warnings = diagnostics.warning_count(),
                "compile failed"
            );
            return CompileResult {
                diagnostics: diagnostics.into_sorted(),
                ..CompileResult::default()
            };
        }

        let resolved = VariableResolver::new().resolve(&sheet);
        let indent = self.config.indent;
        let css = generate_css(&resolved, indent);
        let elements = build_html(&resolved);
        let title = elements
            .title
            .as_deref()
            .unwrap_or(&self.config.default_title);
        let html = render_document(title, &self.config.html_lang, &css, &elements.body(indent), indent);

        tracing::debug!(warnings = diagnostics.warning_count(), "compile succeeded");
        CompileResult {
            success: true,
            css,
            html,
            diagnostics: diagnostics.into_sorted(),
        }
    }

    /// Read and compile a file. Only reading the file can fail.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<CompileResult> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(self.compile(&source, &path.display().to_string()))
    }
}

static_assertions::assert_impl_all!(Compiler: Send, Sync);
static_assertions::assert_impl_all!(CompileResult: Send, Sync);
