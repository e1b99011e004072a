//! Variable substitution.

use crate::ast::{BodyItem, Declaration, Item, RuleSet, Stylesheet, Value, VariableDecl};
use crate::lexicon;

use super::ScopeTable;

/// Replaces variable references with the values bound at each use site.
///
/// Bindings store already resolved values, so chains such as
/// `@b = @a` resolve fully. References with no visible binding are left in
/// place; the analyzer has reported them.
#[derive(Debug, Default)]
pub struct VariableResolver {
    scopes: ScopeTable,
}

impl VariableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a copy of `sheet` with every resolvable reference replaced.
    pub fn resolve(&mut self, sheet: &Stylesheet) -> Stylesheet {
        let mut out = sheet.clone();
        for item in &mut out.items {
            match item {
                Item::Variable(decl) => self.bind(decl),
                Item::Declaration(decl) => self.substitute(decl),
                Item::RuleSet(rule) => self.resolve_rule_set(rule),
                Item::Template(_) => {}
            }
        }
        out
    }

    fn resolve_rule_set(&mut self, rule: &mut RuleSet) {
        self.scopes.enter_scope();
        for item in &mut rule.body {
            match item {
                BodyItem::Variable(decl) => self.bind(decl),
                BodyItem::Declaration(decl) => self.substitute(decl),
                BodyItem::RuleSet(child) => self.resolve_rule_set(child),
                BodyItem::Use(_) => {}
            }
        }
        self.scopes.exit_scope();
    }

    fn bind(&mut self, decl: &mut VariableDecl) {
        decl.value = self.value_of(&decl.value);
        if lexicon::is_variable_name(&decl.name) {
            self.scopes.declare(decl.name.as_str(), decl.value.clone(), decl.span);
        }
    }

    fn substitute(&self, decl: &mut Declaration) {
        decl.value = self.value_of(&decl.value);
    }

    fn value_of(&self, value: &Value) -> Value {
        if !value.has_references() {
            return value.clone();
        }
        value.map_references(&mut |name| self.scopes.lookup(name).map(|s| s.value.clone()))
    }
}
