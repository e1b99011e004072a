//! CSS text generation.

use cssx_core::ast::{Declaration, RuleSet, Selector, Stylesheet, Value, format_number};
use cssx_core::lexicon::{HtmlProperty, SIGIL};
use cssx_core::properties;

/// Generate CSS for a resolved stylesheet.
///
/// Nested rule sets are flattened: each child selector is combined with
/// every selector of its parent. A rule set with no CSS declarations emits
/// no block, but its children are still visited.
pub fn generate_css(sheet: &Stylesheet, indent: usize) -> String {
    let mut out = String::new();
    let pad = " ".repeat(indent);
    for rule in sheet.rule_sets() {
        emit_rule(rule, &[], &pad, &mut out);
    }
    tracing::debug!(bytes = out.len(), "generated css");
    out
}

fn emit_rule(rule: &RuleSet, parents: &[String], pad: &str, out: &mut String) {
    let selectors = flatten_selectors(parents, &rule.selectors);

    let declarations: Vec<String> = rule
        .declarations()
        .filter_map(|decl| render_declaration(decl, pad))
        .collect();
    if !declarations.is_empty() {
        out.push_str(&selectors.join(", "));
        out.push_str(" {\n");
        for line in &declarations {
            out.push_str(line);
        }
        out.push_str("}\n\n");
    }

    for child in rule.children() {
        emit_rule(child, &selectors, pad, out);
    }
}

/// Every parent alternative combined with every child alternative.
fn flatten_selectors(parents: &[String], selectors: &[Selector]) -> Vec<String> {
    if parents.is_empty() {
        return selectors
            .iter()
            .map(|s| s.parent_suffix().unwrap_or_else(|| s.to_string()))
            .collect();
    }
    let mut out = Vec::with_capacity(parents.len() * selectors.len());
    for parent in parents {
        for selector in selectors {
            match selector.parent_suffix() {
                Some(suffix) => out.push(format!("{parent}{suffix}")),
                None => out.push(format!("{parent} {selector}")),
            }
        }
    }
    out
}

fn render_declaration(decl: &Declaration, pad: &str) -> Option<String> {
    if HtmlProperty::from_name(&decl.property).is_some() {
        return None;
    }
    let name = properties::css_name(&decl.property);
    let value = render_value(&decl.value, properties::accepts_bare_pixels(name));
    let important = if decl.important { " !important" } else { "" };
    Some(format!("{pad}{name}: {value}{important};\n"))
}

/// Print a value. With `pixels`, bare numbers (also inside a space list)
/// gain a `px` unit.
pub fn render_value(value: &Value, pixels: bool) -> String {
    match value {
        Value::Number(n) if pixels => format!("{}px", format_number(*n)),
        Value::SpaceList(items) => items
            .iter()
            .map(|item| render_value(item, pixels))
            .collect::<Vec<_>>()
            .join(" "),
        Value::CommaList(items) => items
            .iter()
            .map(|item| render_value(item, false))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Function { name, args } => {
            let args: Vec<String> = args.iter().map(|arg| render_value(arg, false)).collect();
            format!("{name}({})", args.join(", "))
        }
        Value::Variable(name) => format!("var(--{})", name.trim_start_matches(SIGIL)),
        other => other.to_string(),
    }
}
