//! Property value expressions.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A property or variable value.
///
/// Values are trees: functions hold arguments and lists hold items. A
/// [`Value::Variable`] is a reference by name (including the `@` sigil)
/// that the resolver replaces with the bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Hex or named color, already translated from the Spanish color names.
    Color(String),
    /// Bare number.
    Number(f32),
    /// Number with a unit, e.g. `10px`.
    Dimension { value: f32, unit: String },
    /// Percentage in whole units (`50%` is stored as `50.0`).
    Percentage(f32),
    /// Identifier keyword such as `bold` or `center`.
    Keyword(String),
    /// Quoted string literal (contents only).
    String(String),
    /// `url(...)` target.
    Url(String),
    /// Function call such as `rgba(0, 0, 0, 0.5)`.
    Function { name: String, args: Vec<Value> },
    /// Whitespace separated list, e.g. `1px solid red`.
    SpaceList(Vec<Value>),
    /// Comma separated list, e.g. a font stack.
    CommaList(Vec<Value>),
    /// Reference to a variable or template parameter.
    Variable(String),
}

/// The coarse type of a value, used for property type checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Color,
    Length,
    Percentage,
    Number,
    Keyword,
    String,
    Url,
    Function,
    SpaceList,
    CommaList,
    Variable,
}

impl ValueKind {
    /// Lowercase name used in diagnostic messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Length => "length",
            Self::Percentage => "percentage",
            Self::Number => "number",
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Url => "url",
            Self::Function => "function",
            Self::SpaceList => "list",
            Self::CommaList => "comma-list",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Create a keyword value.
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::Keyword(name.into())
    }

    /// Create a dimension value.
    pub fn dimension(value: f32, unit: impl Into<String>) -> Self {
        Self::Dimension {
            value,
            unit: unit.into(),
        }
    }

    /// Create a variable reference. The name must include the sigil.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Get the coarse kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Color(_) => ValueKind::Color,
            Self::Number(_) => ValueKind::Number,
            Self::Dimension { .. } => ValueKind::Length,
            Self::Percentage(_) => ValueKind::Percentage,
            Self::Keyword(_) => ValueKind::Keyword,
            Self::String(_) => ValueKind::String,
            Self::Url(_) => ValueKind::Url,
            Self::Function { .. } => ValueKind::Function,
            Self::SpaceList(_) => ValueKind::SpaceList,
            Self::CommaList(_) => ValueKind::CommaList,
            Self::Variable(_) => ValueKind::Variable,
        }
    }

    /// Nested values: function arguments or list items.
    pub fn children(&self) -> &[Value] {
        match self {
            Self::Function { args, .. } => args,
            Self::SpaceList(items) | Self::CommaList(items) => items,
            _ => &[],
        }
    }

    /// Names of all variables referenced anywhere in this value, in order.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Variable(name) => names.push(name),
            _ => {
                for child in self.children() {
                    child.collect_references(names);
                }
            }
        }
    }

    /// Whether any variable reference remains in this value.
    pub fn has_references(&self) -> bool {
        match self {
            Self::Variable(_) => true,
            _ => self.children().iter().any(Value::has_references),
        }
    }

    /// Rebuild this value with every reference that `lookup` knows about
    /// replaced by its binding.
    ///
    /// Replacement is a single pass: values returned by `lookup` are
    /// inserted as they are and never searched for further references.
    /// Unknown references are kept.
    pub fn map_references<F>(&self, lookup: &mut F) -> Value
    where
        F: FnMut(&str) -> Option<Value>,
    {
        match self {
            Self::Variable(name) => lookup(name.as_str()).unwrap_or_else(|| self.clone()),
            Self::Function { name, args } => Self::Function {
                name: name.clone(),
                args: args.iter().map(|arg| arg.map_references(lookup)).collect(),
            },
            Self::SpaceList(items) => {
                Self::SpaceList(items.iter().map(|item| item.map_references(lookup)).collect())
            }
            Self::CommaList(items) => {
                Self::CommaList(items.iter().map(|item| item.map_references(lookup)).collect())
            }
            other => other.clone(),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Color(s) | Self::Keyword(s) | Self::String(s) | Self::Url(s) | Self::Variable(s) => {
                s.hash(state)
            }
            Self::Number(n) | Self::Percentage(n) => n.to_bits().hash(state),
            Self::Dimension { value, unit } => {
                value.to_bits().hash(state);
                unit.hash(state);
            }
            Self::Function { name, args } => {
                name.hash(state);
                args.hash(state);
            }
            Self::SpaceList(items) | Self::CommaList(items) => items.hash(state),
        }
    }
}

/// Format a number the way CSS expects: integers without a fraction.
pub fn format_number(n: f32) -> String {
    if n.fract() == 0.0 && n.abs() < 1e9 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => f.write_str(c),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Dimension { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            Self::Percentage(p) => write!(f, "{}%", format_number(*p)),
            Self::Keyword(k) => f.write_str(k),
            Self::String(s) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Self::Url(u) => write!(f, "url(\"{u}\")"),
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                write_joined(f, args, ", ")?;
                f.write_str(")")
            }
            Self::SpaceList(items) => write_joined(f, items, " "),
            Self::CommaList(items) => write_joined(f, items, ", "),
            Self::Variable(name) => f.write_str(name),
        }
    }
}
