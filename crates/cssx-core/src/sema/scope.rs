//! Lexical scopes for variables.

use std::collections::HashMap;

use crate::ast::{Span, Value};

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Name including the sigil.
    pub name: String,
    /// Bound value. References to other variables are already resolved
    /// when the table is driven by the analyzer or the resolver.
    pub value: Value,
    pub declared_at: Span,
    /// Every place the binding was read.
    pub uses: Vec<Span>,
}

impl Symbol {
    pub fn is_used(&self) -> bool {
        !self.uses.is_empty()
    }
}

/// Stack of scopes. The bottom frame is the document scope and is never
/// popped; one frame is pushed per rule set body.
///
/// Bindings that leave the table, by being overwritten or by their frame
/// being popped, are retired rather than dropped so unused-variable
/// reporting sees every declaration.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    frames: Vec<HashMap<String, Symbol>>,
    retired: Vec<Symbol>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// Create a table holding only the document scope.
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
            retired: Vec::new(),
        }
    }

    /// Number of frames, including the document scope.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a scope for a rule set body.
    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the innermost scope. The document scope stays.
    pub fn exit_scope(&mut self) {
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                self.retired.extend(frame.into_values());
            }
        }
    }

    /// Bind `name` in the innermost scope. A binding of the same name in
    /// that scope is replaced and its declaration span returned.
    pub fn declare(&mut self, name: impl Into<String>, value: Value, span: Span) -> Option<Span> {
        let name = name.into();
        let symbol = Symbol {
            name: name.clone(),
            value,
            declared_at: span,
            uses: Vec::new(),
        };
        let frame = self.frames.last_mut()?;
        let previous = frame.insert(name, symbol)?;
        let declared_at = previous.declared_at;
        self.retired.push(previous);
        Some(declared_at)
    }

    /// Find the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Record a read of `name` at `span`. Returns the binding, or `None` if
    /// the name is not declared.
    pub fn mark_used(&mut self, name: &str, span: Span) -> Option<&Symbol> {
        let symbol = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))?;
        symbol.uses.push(span);
        Some(symbol)
    }

    /// Every binding ever declared and never read, ordered by declaration.
    pub fn unused(&self) -> Vec<&Symbol> {
        let mut unused: Vec<&Symbol> = self
            .frames
            .iter()
            .flat_map(|frame| frame.values())
            .chain(self.retired.iter())
            .filter(|symbol| !symbol.is_used())
            .collect();
        unused.sort_by_key(|symbol| symbol.declared_at);
        unused
    }

    /// Bindings currently visible from the innermost scope, one per name.
    pub fn visible(&self) -> Vec<&Symbol> {
        let mut seen = HashMap::new();
        for frame in self.frames.iter().rev() {
            for (name, symbol) in frame {
                seen.entry(name.as_str()).or_insert(symbol);
            }
        }
        let mut symbols: Vec<&Symbol> = seen.into_values().collect();
        symbols.sort_by_key(|symbol| symbol.declared_at);
        symbols
    }
}
