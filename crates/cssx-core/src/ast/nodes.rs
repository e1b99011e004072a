//! Document structure: stylesheets, rule sets, declarations and templates.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{Selector, Span, Value};

/// A parsed CSSX document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// Source file name, used for diagnostics.
    pub file: String,
    /// Top-level items in source order.
    pub items: Vec<Item>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            items: Vec::new(),
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Top-level rule sets.
    pub fn rule_sets(&self) -> impl Iterator<Item = &RuleSet> {
        self.items.iter().filter_map(|item| match item {
            Item::RuleSet(rule) => Some(rule),
            _ => None,
        })
    }

    /// Top-level rule sets, mutably.
    pub fn rule_sets_mut(&mut self) -> impl Iterator<Item = &mut RuleSet> {
        self.items.iter_mut().filter_map(|item| match item {
            Item::RuleSet(rule) => Some(rule),
            _ => None,
        })
    }

    /// Template definitions.
    pub fn templates(&self) -> impl Iterator<Item = &TemplateDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Template(def) => Some(def),
            _ => None,
        })
    }

    /// Top-level page declarations (`titulo_pagina = ...`).
    pub fn page_declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            Item::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Whether any template invocation is still waiting for expansion.
    pub fn has_pending_uses(&self) -> bool {
        self.rule_sets().any(RuleSet::has_pending_uses)
    }
}

/// A top-level item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    RuleSet(RuleSet),
    Variable(VariableDecl),
    Template(TemplateDef),
    /// Page-level declaration outside any rule set.
    Declaration(Declaration),
}

/// A selector list with its body.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// Selector alternatives (`a, b`).
    pub selectors: Vec<Selector>,
    /// Body items, nested rule sets included, in source order.
    pub body: Vec<BodyItem>,
    pub span: Span,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new(selectors: Vec<Selector>, span: Span) -> Self {
        Self {
            selectors,
            body: Vec::new(),
            span,
        }
    }

    /// Add a declaration to the body.
    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.body.push(BodyItem::Declaration(decl));
        self
    }

    /// Add a template invocation to the body.
    pub fn with_use(mut self, invocation: TemplateUse) -> Self {
        self.body.push(BodyItem::Use(invocation));
        self
    }

    /// Add a nested rule set.
    pub fn with_child(mut self, child: RuleSet) -> Self {
        self.body.push(BodyItem::RuleSet(child));
        self
    }

    /// Declarations in the body, in order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Nested rule sets, in order.
    pub fn children(&self) -> impl Iterator<Item = &RuleSet> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::RuleSet(child) => Some(child),
            _ => None,
        })
    }

    /// Get the last declaration of a property, if any.
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations().filter(|d| d.property == property).last()
    }

    /// Whether this rule set or any nested one still holds a template
    /// invocation.
    pub fn has_pending_uses(&self) -> bool {
        self.body.iter().any(|item| match item {
            BodyItem::Use(_) => true,
            BodyItem::RuleSet(child) => child.has_pending_uses(),
            BodyItem::Declaration(_) | BodyItem::Variable(_) => false,
        })
    }
}

/// An item inside a rule set body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Declaration(Declaration),
    /// Variable declared inside the block.
    Variable(VariableDecl),
    /// Template invocation, replaced during expansion.
    Use(TemplateUse),
    /// Nested rule set.
    RuleSet(RuleSet),
}

/// A property/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: Value,
    pub important: bool,
    pub span: Span,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(property: impl Into<String>, value: Value, span: Span) -> Self {
        Self {
            property: property.into(),
            value,
            important: false,
            span,
        }
    }

    /// Mark as `!important`.
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Structural hash of property, value and importance. Location is not
    /// part of the fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.property.hash(&mut hasher);
        self.value.hash(&mut hasher);
        self.important.hash(&mut hasher);
        hasher.finish()
    }
}

/// `@name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Name including the `@` sigil.
    pub name: String,
    pub value: Value,
    pub span: Span,
}

impl VariableDecl {
    pub fn new(name: impl Into<String>, value: Value, span: Span) -> Self {
        Self {
            name: name.into(),
            value,
            span,
        }
    }
}

/// A template parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Name including the `@` sigil.
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    /// A parameter without a default.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// `plantilla Name(@a, @b=default) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<TemplateItem>,
    pub span: Span,
}

impl TemplateDef {
    pub fn new(name: impl Into<String>, params: Vec<Param>, span: Span) -> Self {
        Self {
            name: name.into(),
            params,
            body: Vec::new(),
            span,
        }
    }

    /// Add a declaration to the body.
    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.body.push(TemplateItem::Declaration(decl));
        self
    }

    /// Add a nested invocation to the body.
    pub fn with_use(mut self, invocation: TemplateUse) -> Self {
        self.body.push(TemplateItem::Use(invocation));
        self
    }

    /// Find a parameter by name.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// An item inside a template body.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateItem {
    Declaration(Declaration),
    Use(TemplateUse),
}

/// `usar Name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUse {
    pub name: String,
    pub args: Vec<Argument>,
    pub span: Span,
}

impl TemplateUse {
    pub fn new(name: impl Into<String>, args: Vec<Argument>, span: Span) -> Self {
        Self {
            name: name.into(),
            args,
            span,
        }
    }
}

/// A template invocation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Value),
    /// `@param=value`; the name includes the sigil.
    Named { name: String, value: Value },
}

impl Argument {
    /// Create a named argument.
    pub fn named(name: impl Into<String>, value: Value) -> Self {
        Self::Named {
            name: name.into(),
            value,
        }
    }

    /// The argument's value.
    pub fn value(&self) -> &Value {
        match self {
            Argument::Positional(value) | Argument::Named { value, .. } => value,
        }
    }

    /// Rebuild this argument with its value transformed.
    pub fn map_value(&self, f: impl FnOnce(&Value) -> Value) -> Self {
        match self {
            Argument::Positional(value) => Argument::Positional(f(value)),
            Argument::Named { name, value } => Argument::Named {
                name: name.clone(),
                value: f(value),
            },
        }
    }
}
