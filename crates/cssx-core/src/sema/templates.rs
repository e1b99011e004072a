//! Registry of template definitions.

use std::collections::HashMap;

use crate::ast::{Item, Span, Stylesheet, TemplateDef};
use crate::diagnostics::{DiagnosticCode, Diagnostics};

use super::TEMPLATE_DOC_URL;

/// A second definition of an already registered template name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template '{name}' is already defined")]
pub struct DuplicateTemplate {
    pub name: String,
    /// Location of the rejected definition.
    pub span: Span,
}

/// Flat name to definition map. The first definition of a name wins.
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    templates: HashMap<String, TemplateDef>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. A name that is already present is rejected
    /// and the table keeps the earlier definition.
    pub fn register(&mut self, def: TemplateDef) -> Result<(), DuplicateTemplate> {
        if self.templates.contains_key(&def.name) {
            return Err(DuplicateTemplate {
                name: def.name,
                span: def.span,
            });
        }
        self.templates.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TemplateDef> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Register every top-level template definition. Runs before any
/// expansion so templates may invoke templates defined further down.
pub fn collect_templates(sheet: &Stylesheet, diagnostics: &mut Diagnostics) -> TemplateTable {
    let mut table = TemplateTable::new();
    for item in &sheet.items {
        let Item::Template(def) = item else {
            continue;
        };
        if let Err(err) = table.register(def.clone()) {
            diagnostics
                .report(DiagnosticCode::DuplicateTemplate, err.span, err.to_string())
                .doc(TEMPLATE_DOC_URL);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Value};

    fn def(name: &str, line: u32, color: &str) -> TemplateDef {
        TemplateDef::new(name, vec![], Span::new(line, 1)).with_declaration(Declaration::new(
            "color",
            Value::Color(color.into()),
            Span::new(line + 1, 5),
        ))
    }

    #[test]
    fn first_definition_wins() {
        let mut table = TemplateTable::new();
        assert!(table.register(def("card", 1, "red")).is_ok());

        let err = table.register(def("card", 5, "blue"));
        assert_eq!(
            err,
            Err(DuplicateTemplate {
                name: "card".into(),
                span: Span::new(5, 1)
            })
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("card").map(|d| d.span), Some(Span::new(1, 1)));
    }

    #[test]
    fn collect_reports_duplicate_at_second_definition() {
        let mut sheet = Stylesheet::new("t.cssx");
        sheet.push(Item::Template(def("card", 1, "red")));
        sheet.push(Item::Template(def("badge", 4, "green")));
        sheet.push(Item::Template(def("card", 8, "blue")));

        let mut diags = Diagnostics::new("t.cssx");
        let table = collect_templates(&sheet, &mut diags);

        assert_eq!(table.names(), vec!["badge", "card"]);
        let found: Vec<_> = diags.with_code(DiagnosticCode::DuplicateTemplate).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 8);
        assert_eq!(found[0].doc_url.as_deref(), Some(TEMPLATE_DOC_URL));
    }
}
