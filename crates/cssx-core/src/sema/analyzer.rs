//! Semantic validation of an expanded stylesheet.

use std::collections::HashMap;

use crate::ast::{
    BodyItem, Declaration, Item, RuleSet, Selector, SimpleKind, Span, Stylesheet, Value,
    VariableDecl, format_number,
};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::lexicon::{self, HtmlProperty, SIGIL};
use crate::properties::{self, PropertyInfo, PropertyRef};

use super::ScopeTable;

const LENGTH_UNITS: &[&str] = &[
    "px", "pt", "pc", "in", "cm", "mm", "q", "em", "rem", "ex", "ch", "vh", "vw", "vmin", "vmax",
    "fr", "s", "ms", "deg", "rad", "grad", "turn",
];

/// Validates a stylesheet after template expansion.
///
/// The analyzer never changes the tree. It reports into the borrowed
/// [`Diagnostics`] and keeps walking after each problem so one pass finds
/// as much as it can.
pub struct SemanticAnalyzer<'d> {
    diagnostics: &'d mut Diagnostics,
    scopes: ScopeTable,
}

impl<'d> SemanticAnalyzer<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            diagnostics,
            scopes: ScopeTable::new(),
        }
    }

    /// Walk the stylesheet, then report unused variables. Returns the final
    /// scope table.
    pub fn analyze(mut self, sheet: &Stylesheet) -> ScopeTable {
        for item in &sheet.items {
            match item {
                Item::Variable(decl) => self.visit_variable(decl),
                Item::RuleSet(rule) => self.visit_rule_set(rule),
                Item::Declaration(decl) => self.visit_page_declaration(decl),
                // Bodies were already copied into every use site.
                Item::Template(_) => {}
            }
        }

        for symbol in self.scopes.unused() {
            self.diagnostics.report(
                DiagnosticCode::UnusedVariable,
                symbol.declared_at,
                format!("variable '{}' is declared but never used", symbol.name),
            );
        }
        self.scopes
    }

    fn visit_variable(&mut self, decl: &VariableDecl) {
        let Some(ident) = decl.name.strip_prefix(SIGIL) else {
            self.diagnostics.report(
                DiagnosticCode::InvalidVariableName,
                decl.span,
                format!("variable name '{}' must start with '{SIGIL}'", decl.name),
            );
            return;
        };
        if !lexicon::is_identifier(ident) {
            self.diagnostics.report(
                DiagnosticCode::InvalidVariableName,
                decl.span,
                format!("variable name '{}' is not a valid identifier", decl.name),
            );
            return;
        }

        self.check_literals(&decl.value, decl.span);
        let value = self
            .resolve_references(&decl.value, decl.span)
            .unwrap_or_else(|| decl.value.clone());
        self.scopes.declare(decl.name.as_str(), value, decl.span);
    }

    fn visit_rule_set(&mut self, rule: &RuleSet) {
        self.scopes.enter_scope();

        for selector in &rule.selectors {
            self.visit_selector(selector, rule.span);
        }

        let mut seen: HashMap<String, Span> = HashMap::new();
        for item in &rule.body {
            match item {
                BodyItem::Variable(decl) => self.visit_variable(decl),
                BodyItem::Declaration(decl) => self.visit_declaration(decl, &mut seen),
                BodyItem::Use(invocation) => {
                    tracing::warn!(template = %invocation.name, "unexpanded template invocation");
                }
                BodyItem::RuleSet(child) => self.visit_rule_set(child),
            }
        }

        self.scopes.exit_scope();
    }

    fn visit_selector(&mut self, selector: &Selector, fallback: Span) {
        for simple in selector.simples() {
            let span = if simple.span.is_synthetic() { fallback } else { simple.span };
            match simple.kind {
                SimpleKind::Class | SimpleKind::Id => {
                    if !lexicon::is_identifier(&simple.name) {
                        let what = if simple.kind == SimpleKind::Class { "class" } else { "id" };
                        self.diagnostics.report(
                            DiagnosticCode::InvalidValue,
                            span,
                            format!("'{}' is not a valid {what} name", simple.name),
                        );
                    }
                }
                SimpleKind::Type => {
                    if !simple.is_universal() && !lexicon::is_standard_element(&simple.name) {
                        self.diagnostics.report(
                            DiagnosticCode::NonStandardElement,
                            span,
                            format!("'{}' is not a standard HTML element", simple.name),
                        );
                    }
                }
                _ => {}
            }
        }

        for compound in selector.compounds() {
            let ids = compound.iter().filter(|s| s.kind == SimpleKind::Id).count();
            if ids > 1 {
                self.diagnostics.report(
                    DiagnosticCode::SuspiciousValue,
                    fallback,
                    format!("selector '{selector}' has more than one id in a compound and can never match"),
                );
            }
        }
    }

    fn visit_page_declaration(&mut self, decl: &Declaration) {
        let resolved = self.resolve_references(&decl.value, decl.span);
        if HtmlProperty::from_name(&decl.property) != Some(HtmlProperty::PageTitle) {
            self.diagnostics.report(
                DiagnosticCode::InvalidProperty,
                decl.span,
                format!(
                    "property '{}' is not allowed outside a rule set; only '{}' is",
                    decl.property,
                    HtmlProperty::PageTitle.name()
                ),
            );
            return;
        }
        if let Some(value) = resolved {
            if !matches!(value, Value::String(_)) {
                self.diagnostics.report(
                    DiagnosticCode::InvalidValue,
                    decl.span,
                    format!(
                        "'{}' expects a string, found {}",
                        decl.property,
                        value.kind()
                    ),
                );
            }
        }
    }

    fn visit_declaration(&mut self, decl: &Declaration, seen: &mut HashMap<String, Span>) {
        self.check_literals(&decl.value, decl.span);
        let resolved = self.resolve_references(&decl.value, decl.span);

        let Some(property) = properties::lookup(&decl.property) else {
            self.diagnostics
                .report(
                    DiagnosticCode::InvalidProperty,
                    decl.span,
                    format!("unknown property '{}'", decl.property),
                )
                .doc(format!("{}Reference", properties::MDN_BASE_URL));
            return;
        };

        let key = match property {
            PropertyRef::Css { css_name, .. } => css_name.to_ascii_lowercase(),
            PropertyRef::Html(html) => html.name().to_string(),
        };
        if let Some(&first) = seen.get(&key) {
            self.diagnostics.report(
                DiagnosticCode::SuspiciousValue,
                decl.span,
                format!(
                    "property '{}' is declared more than once in this rule (first at line {}); the last declaration wins",
                    decl.property, first.line
                ),
            );
        } else {
            seen.insert(key, decl.span);
        }

        match property {
            PropertyRef::Html(html) => {
                if let Some(value) = resolved {
                    self.check_html_value(decl, html, &value);
                }
            }
            PropertyRef::Css { css_name, info } => {
                let Some(info) = info else {
                    return;
                };
                if info.deprecated {
                    self.diagnostics
                        .report(
                            DiagnosticCode::DeprecatedProperty,
                            decl.span,
                            format!("property '{}' ({css_name}) is deprecated", decl.property),
                        )
                        .doc(info.doc_url());
                }
                if let Some(value) = resolved {
                    self.check_css_value(decl, css_name, info, &value);
                }
            }
        }
    }

    fn check_css_value(&mut self, decl: &Declaration, css_name: &str, info: &PropertyInfo, value: &Value) {
        if let Value::Keyword(keyword) = value {
            if properties::is_global_keyword(keyword) {
                return;
            }
        }

        let kind = properties::classify(value, css_name);
        if !info.accepts_kind(kind) {
            self.diagnostics
                .report(
                    DiagnosticCode::InvalidValue,
                    decl.span,
                    format!(
                        "property '{}' does not accept {kind} values; accepted: {}",
                        decl.property,
                        info.accepted_kinds()
                    ),
                )
                .doc(info.doc_url());
            return;
        }

        if let Value::Keyword(keyword) = value {
            if !info.accepts_keyword(keyword) {
                self.diagnostics
                    .report(
                        DiagnosticCode::InvalidValue,
                        decl.span,
                        format!(
                            "keyword '{keyword}' is not valid for property '{}'; accepted keywords: {}",
                            decl.property,
                            info.accepted_keywords()
                        ),
                    )
                    .doc(info.doc_url());
            }
        }
    }

    fn check_html_value(&mut self, decl: &Declaration, html: HtmlProperty, value: &Value) {
        let ok = match html {
            HtmlProperty::Text | HtmlProperty::Content => {
                matches!(value, Value::String(_) | Value::Number(_))
            }
            HtmlProperty::Link => matches!(value, Value::String(_) | Value::Url(_)),
            HtmlProperty::PageTitle => {
                self.diagnostics.report(
                    DiagnosticCode::InvalidProperty,
                    decl.span,
                    format!("'{}' is only allowed at the top level", html.name()),
                );
                return;
            }
        };
        if !ok {
            self.diagnostics.report(
                DiagnosticCode::InvalidValue,
                decl.span,
                format!(
                    "'{}' does not accept {} values",
                    decl.property,
                    value.kind()
                ),
            );
        }
    }

    /// Check units and color literals written in the source value.
    /// Values reached through variables were checked at their declaration.
    fn check_literals(&mut self, value: &Value, span: Span) {
        match value {
            Value::Dimension { unit, .. } => {
                if !LENGTH_UNITS.contains(&unit.to_ascii_lowercase().as_str()) {
                    self.diagnostics.report(
                        DiagnosticCode::InvalidValue,
                        span,
                        format!("unit '{unit}' is not valid"),
                    );
                }
            }
            Value::Color(text) if text.starts_with('#') => {
                if !lexicon::is_hex_color(text) {
                    self.diagnostics.report(
                        DiagnosticCode::SuspiciousValue,
                        span,
                        format!("color '{text}' may not be valid"),
                    );
                }
            }
            Value::Number(n) if *n < 0.0 => {
                self.diagnostics.report(
                    DiagnosticCode::SuspiciousValue,
                    span,
                    format!("negative value {} may cause problems", format_number(*n)),
                );
            }
            other => {
                for child in other.children() {
                    self.check_literals(child, span);
                }
            }
        }
    }

    /// Mark every reference in `value` as used and return the value with
    /// references replaced by their bindings. Returns `None`, after
    /// reporting, if any reference is undefined.
    fn resolve_references(&mut self, value: &Value, span: Span) -> Option<Value> {
        if !value.has_references() {
            return Some(value.clone());
        }

        let mut names: Vec<String> = Vec::new();
        for name in value.references() {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
        let mut complete = true;
        for name in &names {
            if self.scopes.mark_used(name, span).is_none() {
                complete = false;
                self.diagnostics.report(
                    DiagnosticCode::UndefinedVariable,
                    span,
                    format!("variable '{name}' is not defined"),
                );
            }
        }
        if !complete {
            return None;
        }

        let scopes = &self.scopes;
        Some(value.map_references(&mut |name| scopes.lookup(name).map(|s| s.value.clone())))
    }
}
