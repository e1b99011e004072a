//! Template expansion.

use std::collections::{HashMap, HashSet};

use crate::ast::{
    Argument, BodyItem, Declaration, Item, RuleSet, Span, Stylesheet, TemplateDef, TemplateItem,
    TemplateUse, Value,
};
use crate::diagnostics::{DiagnosticCode, Diagnostics};

use super::TemplateTable;

/// Default bound on nested template expansion.
pub const MAX_EXPANSION_DEPTH: usize = 50;

/// Documentation link attached to template diagnostics.
pub const TEMPLATE_DOC_URL: &str = "internal://templates";

type Bindings = HashMap<String, Value>;

/// Expands template invocations into declarations.
///
/// The expander keeps an explicit stack of the templates currently being
/// expanded. An invocation of a name already on the stack is a cycle; a
/// stack deeper than the configured bound is rejected even without a cycle.
#[derive(Debug)]
pub struct TemplateExpander<'t> {
    table: &'t TemplateTable,
    stack: Vec<String>,
    max_depth: usize,
    expansions: usize,
}

impl<'t> TemplateExpander<'t> {
    /// Create an expander over a template table.
    pub fn new(table: &'t TemplateTable) -> Self {
        Self {
            table,
            stack: Vec::new(),
            max_depth: MAX_EXPANSION_DEPTH,
            expansions: 0,
        }
    }

    /// Set the depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Templates currently being expanded, outermost first.
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Number of successful expansions so far, nested ones included.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Expand one invocation.
    ///
    /// Never fails: a bad invocation yields no declarations and at least
    /// one diagnostic at `call_site`. Expanded declarations are located at
    /// `call_site` as well.
    pub fn expand(
        &mut self,
        invocation: &TemplateUse,
        call_site: Span,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Declaration> {
        let table = self.table;
        let Some(def) = table.get(&invocation.name) else {
            report(
                diagnostics,
                DiagnosticCode::TemplateInvocation,
                call_site,
                format!("template '{}' is not defined", invocation.name),
            );
            return Vec::new();
        };

        if self.stack.iter().any(|name| *name == invocation.name) {
            let cycle = self
                .stack
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(invocation.name.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ");
            report(
                diagnostics,
                DiagnosticCode::TemplateRecursion,
                call_site,
                format!("template recursion detected: {cycle}"),
            );
            return Vec::new();
        }

        if self.stack.len() >= self.max_depth {
            report(
                diagnostics,
                DiagnosticCode::TemplateRecursion,
                call_site,
                format!(
                    "maximum template expansion depth ({}) exceeded while expanding '{}'",
                    self.max_depth, invocation.name
                ),
            );
            return Vec::new();
        }

        let Some(bindings) = bind_arguments(def, invocation, call_site, diagnostics) else {
            return Vec::new();
        };

        self.stack.push(def.name.clone());
        let mut output = Vec::new();
        for item in &def.body {
            match item {
                TemplateItem::Declaration(decl) => {
                    output.push(Declaration {
                        property: decl.property.clone(),
                        value: substitute(&decl.value, &bindings),
                        important: decl.important,
                        span: call_site,
                    });
                }
                TemplateItem::Use(nested) => {
                    let nested = TemplateUse {
                        name: nested.name.clone(),
                        args: nested
                            .args
                            .iter()
                            .map(|arg| arg.map_value(|value| substitute(value, &bindings)))
                            .collect(),
                        span: nested.span,
                    };
                    output.extend(self.expand(&nested, call_site, diagnostics));
                }
            }
        }
        self.stack.pop();

        self.expansions += 1;
        tracing::trace!(
            template = %def.name,
            declarations = output.len(),
            depth = self.stack.len(),
            "expanded template"
        );
        output
    }

    /// Replace every invocation in a rule set and its nested rule sets.
    pub fn expand_rule_set(&mut self, rule: &mut RuleSet, diagnostics: &mut Diagnostics) {
        let body = std::mem::take(&mut rule.body);
        for item in body {
            match item {
                BodyItem::Use(invocation) => {
                    let declarations = self.expand(&invocation, invocation.span, diagnostics);
                    rule.body
                        .extend(declarations.into_iter().map(BodyItem::Declaration));
                }
                BodyItem::RuleSet(mut child) => {
                    self.expand_rule_set(&mut child, diagnostics);
                    rule.body.push(BodyItem::RuleSet(child));
                }
                other => rule.body.push(other),
            }
        }
    }
}

fn report(diagnostics: &mut Diagnostics, code: DiagnosticCode, span: Span, message: String) {
    diagnostics.report(code, span, message).doc(TEMPLATE_DOC_URL);
}

/// Map parameters to values. Arguments must be all positional or all
/// named; any mismatch reports one diagnostic and binds nothing.
fn bind_arguments(
    def: &TemplateDef,
    invocation: &TemplateUse,
    call_site: Span,
    diagnostics: &mut Diagnostics,
) -> Option<Bindings> {
    let named = invocation
        .args
        .iter()
        .filter(|arg| matches!(arg, Argument::Named { .. }))
        .count();

    let result = if named > 0 && named < invocation.args.len() {
        Err("cannot mix positional and named arguments".to_string())
    } else if named > 0 {
        bind_named(def, &invocation.args)
    } else {
        bind_positional(def, &invocation.args)
    };

    match result {
        Ok(bindings) => Some(bindings),
        Err(message) => {
            report(
                diagnostics,
                DiagnosticCode::TemplateInvocation,
                call_site,
                format!("invalid invocation of template '{}': {message}", def.name),
            );
            None
        }
    }
}

fn bind_positional(def: &TemplateDef, args: &[Argument]) -> Result<Bindings, String> {
    if args.len() > def.params.len() {
        return Err(format!(
            "too many arguments: expected at most {}, got {}",
            def.params.len(),
            args.len()
        ));
    }

    let mut bindings = Bindings::new();
    for (i, param) in def.params.iter().enumerate() {
        let value = match args.get(i) {
            Some(arg) => arg.value().clone(),
            None => param.default.clone().ok_or_else(|| {
                format!("parameter '{}' has no default and no argument was supplied", param.name)
            })?,
        };
        bindings.insert(param.name.clone(), value);
    }
    Ok(bindings)
}

fn bind_named(def: &TemplateDef, args: &[Argument]) -> Result<Bindings, String> {
    let mut bindings = Bindings::new();
    let mut supplied = HashSet::new();

    for arg in args {
        let Argument::Named { name, value } = arg else {
            continue;
        };
        if def.param(name).is_none() {
            return Err(format!("no parameter named '{name}'"));
        }
        if !supplied.insert(name.as_str()) {
            return Err(format!("parameter '{name}' is supplied more than once"));
        }
        bindings.insert(name.clone(), value.clone());
    }

    for param in &def.params {
        if supplied.contains(param.name.as_str()) {
            continue;
        }
        let default = param
            .default
            .clone()
            .ok_or_else(|| format!("required parameter '{}' not provided", param.name))?;
        bindings.insert(param.name.clone(), default);
    }
    Ok(bindings)
}

/// Replace parameter references. Names that are not parameters refer to
/// document variables and are left for the resolver.
fn substitute(value: &Value, bindings: &Bindings) -> Value {
    value.map_references(&mut |name| bindings.get(name).cloned())
}

/// Expand every invocation in the stylesheet in place. Returns the number
/// of successful top-level and nested expansions.
pub fn expand_templates(
    sheet: &mut Stylesheet,
    table: &TemplateTable,
    max_depth: usize,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut expander = TemplateExpander::new(table).with_max_depth(max_depth);
    for item in &mut sheet.items {
        if let Item::RuleSet(rule) = item {
            expander.expand_rule_set(rule, diagnostics);
        }
    }
    expander.expansions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Param, Selector};

    fn decl(property: &str, value: Value) -> Declaration {
        Declaration::new(property, value, Span::new(2, 5))
    }

    fn call(name: &str, args: Vec<Argument>) -> TemplateUse {
        TemplateUse::new(name, args, Span::new(10, 5))
    }

    fn box_template() -> TemplateDef {
        TemplateDef::new(
            "box",
            vec![
                Param::with_default("@color", Value::Color("blue".into())),
                Param::with_default("@size", Value::Number(16.0)),
            ],
            Span::new(1, 1),
        )
        .with_declaration(decl("fondo", Value::variable("@color")))
        .with_declaration(decl("tamano", Value::variable("@size")))
    }

    fn table_with(defs: Vec<TemplateDef>) -> TemplateTable {
        let mut table = TemplateTable::new();
        for def in defs {
            assert!(table.register(def).is_ok());
        }
        table
    }

    fn values(decls: &[Declaration]) -> Vec<Value> {
        decls.iter().map(|d| d.value.clone()).collect()
    }

    #[test]
    fn defaults_fill_missing_arguments() {
        let table = table_with(vec![box_template()]);
        let mut diags = Diagnostics::new("t.cssx");
        let mut expander = TemplateExpander::new(&table);

        let out = expander.expand(&call("box", vec![]), Span::new(10, 5), &mut diags);
        assert!(diags.is_empty());
        assert_eq!(values(&out), vec![Value::Color("blue".into()), Value::Number(16.0)]);
        assert!(out.iter().all(|d| d.span == Span::new(10, 5)));

        let out = expander.expand(
            &call("box", vec![Argument::named("@size", Value::Number(20.0))]),
            Span::new(10, 5),
            &mut diags,
        );
        assert!(diags.is_empty());
        assert_eq!(values(&out), vec![Value::Color("blue".into()), Value::Number(20.0)]);
    }

    #[test]
    fn positional_binding_in_order() {
        let table = table_with(vec![box_template()]);
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(
            &call(
                "box",
                vec![Argument::Positional(Value::Color("red".into()))],
            ),
            Span::new(10, 5),
            &mut diags,
        );
        assert_eq!(values(&out), vec![Value::Color("red".into()), Value::Number(16.0)]);
    }

    fn single_invocation_error(args: Vec<Argument>) {
        let table = table_with(vec![box_template()]);
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(&call("box", args), Span::new(10, 5), &mut diags);
        assert!(out.is_empty());
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.with_code(DiagnosticCode::TemplateInvocation).count(),
            1
        );
    }

    #[test]
    fn too_many_positional_arguments() {
        single_invocation_error(vec![
            Argument::Positional(Value::Number(1.0)),
            Argument::Positional(Value::Number(2.0)),
            Argument::Positional(Value::Number(3.0)),
        ]);
    }

    #[test]
    fn unknown_named_argument() {
        single_invocation_error(vec![Argument::named("@weight", Value::keyword("bold"))]);
    }

    #[test]
    fn repeated_named_argument() {
        single_invocation_error(vec![
            Argument::named("@size", Value::Number(1.0)),
            Argument::named("@size", Value::Number(2.0)),
        ]);
    }

    #[test]
    fn mixed_argument_styles() {
        single_invocation_error(vec![
            Argument::Positional(Value::Color("red".into())),
            Argument::named("@size", Value::Number(2.0)),
        ]);
    }

    #[test]
    fn missing_required_parameter() {
        let def = TemplateDef::new("pad", vec![Param::required("@p")], Span::new(1, 1))
            .with_declaration(decl("relleno", Value::variable("@p")));
        let table = table_with(vec![def]);

        for args in [vec![], vec![Argument::named("@q", Value::Number(1.0))]] {
            let mut diags = Diagnostics::new("t.cssx");
            let out = TemplateExpander::new(&table).expand(&call("pad", args), Span::new(3, 1), &mut diags);
            assert!(out.is_empty());
            assert_eq!(diags.len(), 1);
        }
    }

    #[test]
    fn unknown_template() {
        let table = TemplateTable::new();
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(&call("nope", vec![]), Span::new(4, 2), &mut diags);
        assert!(out.is_empty());
        let d = diags.iter().next().map(|d| (d.code, d.line, d.column));
        assert_eq!(d, Some((DiagnosticCode::TemplateInvocation, 4, 2)));
    }

    #[test]
    fn substitution_reaches_nested_values_and_keeps_globals() {
        let def = TemplateDef::new("edge", vec![Param::required("@w")], Span::new(1, 1))
            .with_declaration(decl(
                "border",
                Value::SpaceList(vec![
                    Value::variable("@w"),
                    Value::keyword("solid"),
                    Value::Function {
                        name: "rgba".into(),
                        args: vec![Value::variable("@w"), Value::variable("@global")],
                    },
                ]),
            ));
        let table = table_with(vec![def]);
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(
            &call("edge", vec![Argument::Positional(Value::dimension(2.0, "px"))]),
            Span::new(9, 1),
            &mut diags,
        );

        assert_eq!(
            values(&out),
            vec![Value::SpaceList(vec![
                Value::dimension(2.0, "px"),
                Value::keyword("solid"),
                Value::Function {
                    name: "rgba".into(),
                    args: vec![Value::dimension(2.0, "px"), Value::variable("@global")],
                },
            ])]
        );
    }

    #[test]
    fn argument_named_like_a_parameter_is_not_resubstituted() {
        let def = TemplateDef::new(
            "pair",
            vec![Param::required("@a"), Param::required("@b")],
            Span::new(1, 1),
        )
        .with_declaration(decl("margen", Value::SpaceList(vec![Value::variable("@a"), Value::variable("@b")])));
        let table = table_with(vec![def]);
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(
            &call(
                "pair",
                vec![
                    Argument::Positional(Value::variable("@b")),
                    Argument::Positional(Value::Number(4.0)),
                ],
            ),
            Span::new(9, 1),
            &mut diags,
        );
        assert_eq!(
            values(&out),
            vec![Value::SpaceList(vec![Value::variable("@b"), Value::Number(4.0)])]
        );
    }

    #[test]
    fn nested_invocations_see_outer_bindings() {
        let inner = TemplateDef::new("inner", vec![Param::required("@c")], Span::new(1, 1))
            .with_declaration(decl("color", Value::variable("@c")));
        let outer = TemplateDef::new("outer", vec![Param::required("@x")], Span::new(5, 1))
            .with_declaration(decl("fondo", Value::Color("white".into())))
            .with_use(TemplateUse::new(
                "inner",
                vec![Argument::Positional(Value::variable("@x"))],
                Span::new(7, 5),
            ));
        let table = table_with(vec![outer, inner]);
        let mut diags = Diagnostics::new("t.cssx");
        let mut expander = TemplateExpander::new(&table);
        let out = expander.expand(
            &call("outer", vec![Argument::Positional(Value::Color("red".into()))]),
            Span::new(20, 3),
            &mut diags,
        );
        assert!(diags.is_empty());
        assert_eq!(
            values(&out),
            vec![Value::Color("white".into()), Value::Color("red".into())]
        );
        assert!(expander.stack().is_empty());
        assert_eq!(expander.expansions(), 2);
    }

    #[test]
    fn direct_recursion_is_reported() {
        let def = TemplateDef::new("t", vec![], Span::new(1, 1))
            .with_declaration(decl("color", Value::Color("red".into())))
            .with_use(TemplateUse::new("t", vec![], Span::new(3, 5)));
        let table = table_with(vec![def]);
        let mut diags = Diagnostics::new("t.cssx");
        let mut expander = TemplateExpander::new(&table);
        let out = expander.expand(&call("t", vec![]), Span::new(10, 5), &mut diags);

        assert_eq!(out.len(), 1);
        let messages: Vec<_> = diags
            .with_code(DiagnosticCode::TemplateRecursion)
            .map(|d| d.message.clone())
            .collect();
        assert_eq!(messages, vec!["template recursion detected: t -> t"]);
        assert!(expander.stack().is_empty());
    }

    #[test]
    fn indirect_cycle_names_every_template() {
        let a = TemplateDef::new("A", vec![], Span::new(1, 1))
            .with_use(TemplateUse::new("B", vec![], Span::new(2, 5)));
        let b = TemplateDef::new("B", vec![], Span::new(4, 1))
            .with_use(TemplateUse::new("A", vec![], Span::new(5, 5)));
        let table = table_with(vec![a, b]);
        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(&call("A", vec![]), Span::new(10, 5), &mut diags);

        assert!(out.is_empty());
        let found: Vec<_> = diags.iter().collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].message.ends_with("A -> B -> A"));
        assert_eq!(found[0].line, 10);
    }

    #[test]
    fn depth_bound_stops_long_chains() {
        // t0 -> t1 -> ... -> t9, no cycle
        let defs: Vec<_> = (0..10)
            .map(|i| {
                let def = TemplateDef::new(format!("t{i}"), vec![], Span::new(i + 1, 1))
                    .with_declaration(decl("color", Value::Color("red".into())));
                if i < 9 {
                    def.with_use(TemplateUse::new(format!("t{}", i + 1), vec![], Span::new(i + 1, 5)))
                } else {
                    def
                }
            })
            .collect();
        let table = table_with(defs);

        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table)
            .with_max_depth(4)
            .expand(&call("t0", vec![]), Span::new(30, 1), &mut diags);
        assert_eq!(out.len(), 4);
        let d: Vec<_> = diags.with_code(DiagnosticCode::TemplateRecursion).collect();
        assert_eq!(d.len(), 1);
        assert!(d[0].message.contains("(4)"));

        let mut diags = Diagnostics::new("t.cssx");
        let out = TemplateExpander::new(&table).expand(&call("t0", vec![]), Span::new(30, 1), &mut diags);
        assert_eq!(out.len(), 10);
        assert!(diags.is_empty());
    }

    #[test]
    fn expand_templates_splices_in_order() {
        let table = table_with(vec![box_template()]);
        let rule = RuleSet::new(vec![Selector::class("card")], Span::new(5, 1))
            .with_declaration(Declaration::new("color", Value::Color("black".into()), Span::new(6, 3)))
            .with_use(TemplateUse::new("box", vec![], Span::new(7, 3)))
            .with_use(TemplateUse::new("missing", vec![], Span::new(8, 3)))
            .with_child(
                RuleSet::new(vec![Selector::class("inner")], Span::new(9, 3))
                    .with_use(TemplateUse::new("box", vec![], Span::new(10, 5))),
            );
        let mut sheet = Stylesheet::new("t.cssx");
        sheet.push(Item::RuleSet(rule));

        let mut diags = Diagnostics::new("t.cssx");
        let count = expand_templates(&mut sheet, &table, MAX_EXPANSION_DEPTH, &mut diags);

        assert_eq!(count, 2);
        assert!(!sheet.has_pending_uses());
        assert_eq!(diags.len(), 1);

        let Some(rule) = sheet.rule_sets().next() else {
            panic!("rule set missing");
        };
        let props: Vec<_> = rule.declarations().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["color", "fondo", "tamano"]);
        let Some(child) = rule.children().next() else {
            panic!("nested rule set missing");
        };
        assert_eq!(child.declarations().count(), 2);
    }
}
