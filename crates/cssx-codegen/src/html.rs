//! HTML document generation.
//!
//! Every rule set becomes one element and nested rule sets become its
//! children. The element list is returned to the caller; nothing is kept
//! between calls.

use std::fmt::Write as _;

use cssx_core::ast::{RuleSet, SimpleKind, Stylesheet, Value, format_number};
use cssx_core::lexicon::HtmlProperty;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source"];

/// One generated element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlElement {
    pub tag: String,
    /// Attributes in output order.
    pub attributes: Vec<(String, String)>,
    /// Text content, unescaped.
    pub text: Option<String>,
    pub children: Vec<HtmlElement>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    fn render(&self, out: &mut String, depth: usize, indent: usize) {
        let pad = " ".repeat(depth * indent);
        let _ = write!(out, "{pad}<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push('\n');
            return;
        }

        if self.children.is_empty() {
            if let Some(text) = &self.text {
                out.push_str(&escape_text(text));
            }
            let _ = writeln!(out, "</{}>", self.tag);
            return;
        }

        out.push('\n');
        if let Some(text) = &self.text {
            let inner = " ".repeat((depth + 1) * indent);
            let _ = writeln!(out, "{inner}{}", escape_text(text));
        }
        for child in &self.children {
            child.render(out, depth + 1, indent);
        }
        let _ = writeln!(out, "{pad}</{}>", self.tag);
    }
}

/// Result of HTML generation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlOutput {
    /// Title from a top-level `titulo_pagina`, if any.
    pub title: Option<String>,
    /// Top-level elements in document order.
    pub elements: Vec<HtmlElement>,
}

impl HtmlOutput {
    /// Render the elements as body markup.
    pub fn body(&self, indent: usize) -> String {
        let mut out = String::new();
        for element in &self.elements {
            element.render(&mut out, 1, indent);
        }
        out
    }
}

/// Build the element tree of a resolved stylesheet.
pub fn build_html(sheet: &Stylesheet) -> HtmlOutput {
    let title = sheet
        .page_declarations()
        .filter(|d| HtmlProperty::from_name(&d.property) == Some(HtmlProperty::PageTitle))
        .filter_map(|d| text_of(&d.value))
        .last();

    let elements: Vec<HtmlElement> = sheet.rule_sets().filter_map(element_for).collect();
    tracing::debug!(elements = elements.len(), "built html elements");
    HtmlOutput { title, elements }
}

fn element_for(rule: &RuleSet) -> Option<HtmlElement> {
    let selector = rule.selectors.first()?;
    if selector.is_parent_reference() {
        return None;
    }

    let subject = selector.subject();
    let tag = subject
        .iter()
        .find(|s| s.kind == SimpleKind::Type && !s.is_universal())
        .map_or("div", |s| s.name.as_str());
    let mut element = HtmlElement::new(tag);

    let classes: Vec<&str> = subject
        .iter()
        .filter(|s| s.kind == SimpleKind::Class)
        .map(|s| s.name.as_str())
        .collect();
    if !classes.is_empty() {
        element.set_attribute("class", classes.join(" "));
    }
    if let Some(id) = subject.iter().find(|s| s.kind == SimpleKind::Id) {
        element.set_attribute("id", id.name.clone());
    }

    for decl in rule.declarations() {
        match HtmlProperty::from_name(&decl.property) {
            Some(HtmlProperty::Text | HtmlProperty::Content) => {
                element.text = text_of(&decl.value);
            }
            Some(HtmlProperty::Link) => {
                if let Some(href) = text_of(&decl.value) {
                    element.tag = "a".to_string();
                    element.set_attribute("href", href);
                }
            }
            _ => {}
        }
    }

    element.children = rule.children().filter_map(element_for).collect();
    Some(element)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) | Value::Url(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        _ => None,
    }
}

/// Render a complete HTML document with the CSS inlined.
pub fn render_document(title: &str, lang: &str, css: &str, body: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let style_pad = " ".repeat(indent * 2);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(out, "<html lang=\"{}\">", escape_attribute(lang));
    out.push_str("<head>\n");
    let _ = writeln!(out, "{pad}<meta charset=\"UTF-8\">");
    let _ = writeln!(
        out,
        "{pad}<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    );
    let _ = writeln!(out, "{pad}<title>{}</title>", escape_text(title));
    let _ = writeln!(out, "{pad}<style>");
    for line in css.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{style_pad}{line}");
        }
    }
    let _ = writeln!(out, "{pad}</style>");
    out.push_str("</head>\n<body>\n");
    out.push_str(body);
    out.push_str("</body>\n</html>\n");
    out
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
