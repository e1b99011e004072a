//! Coded, located diagnostics.
//!
//! Semantic problems are never Rust errors. Every pass pushes
//! [`Diagnostic`] values into a [`Diagnostics`] collector and keeps going;
//! the caller decides whether the compile succeeded by asking
//! [`Diagnostics::has_errors`].

use std::fmt;

use serde::{Serialize, Serializer};

use crate::ast::Span;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Malformed source; the compile stops.
    ParseFailure,
    UndefinedVariable,
    InvalidProperty,
    InvalidValue,
    InvalidVariableName,
    DuplicateTemplate,
    TemplateRecursion,
    TemplateInvocation,
    UnusedVariable,
    DeprecatedProperty,
    NonStandardElement,
    SuspiciousValue,
}

impl DiagnosticCode {
    /// The code as printed, e.g. `E001`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseFailure => "E0001",
            Self::UndefinedVariable => "E001",
            Self::InvalidProperty => "E002",
            Self::InvalidValue => "E003",
            Self::InvalidVariableName => "E006",
            Self::DuplicateTemplate => "E040",
            Self::TemplateRecursion => "E041",
            Self::TemplateInvocation => "E042",
            Self::UnusedVariable => "W001",
            Self::DeprecatedProperty => "W002",
            Self::NonStandardElement => "W004",
            Self::SuspiciousValue => "W005",
        }
    }

    /// Severity every diagnostic with this code carries.
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnusedVariable
            | Self::DeprecatedProperty
            | Self::NonStandardElement
            | Self::SuspiciousValue => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single located message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic; severity follows from the code.
    pub fn new(
        code: DiagnosticCode,
        message: impl Into<String>,
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            file: file.into(),
            line: span.line,
            column: span.column,
            doc_url: None,
        }
    }

    /// Attach a documentation link.
    pub fn with_doc(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }

    /// Attach a documentation link to an already reported diagnostic.
    pub fn doc(&mut self, url: impl Into<String>) -> &mut Self {
        self.doc_url = Some(url.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Location as a span.
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file, self.line, self.column, self.code, self.message
        )?;
        if let Some(url) = &self.doc_url {
            write!(f, " (doc: {url})")?;
        }
        Ok(())
    }
}

/// Collector for one compile.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    file: String,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector for a source file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            items: Vec::new(),
        }
    }

    /// The file new diagnostics are attributed to.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Record a diagnostic at `span` and return it for further decoration.
    pub fn report(
        &mut self,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<String>,
    ) -> &mut Diagnostic {
        let diagnostic = Diagnostic::new(code, message, self.file.clone(), span);
        self.push(diagnostic)
    }

    /// Record a prebuilt diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        self.items.push(diagnostic);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(Diagnostic::is_warning)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Diagnostics in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics with a given code.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.code == code)
    }

    /// Consume the collector, returning diagnostics sorted by
    /// (file, line, column). Equal keys keep their report order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.items
            .sort_by(|a, b| (&a.file, a.line, a.column).cmp(&(&b.file, b.line, b.column)));
        self.items
    }
}
