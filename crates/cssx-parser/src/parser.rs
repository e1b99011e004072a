//! Line-oriented document parser.
//!
//! Each source line is one of: a comment, a block opener (`selector {` or
//! `plantilla Name(...) {`), a block closer (`}`), a one-line block
//! (`selector { a = 1; b = 2 }`) or one or more `;`-separated statements.
//! Value and selector text is handed to the `cssparser`-based readers in
//! [`crate::value`] and [`crate::selector`].

use std::collections::HashSet;

use cssx_core::ast::{
    Argument, BodyItem, Declaration, Item, Param, RuleSet, Span, Stylesheet, TemplateDef,
    TemplateItem, TemplateUse, VariableDecl,
};
use cssx_core::lexicon::{self, SIGIL, TEMPLATE_KEYWORD, USE_KEYWORD};

use crate::error::{ParseError, Result};
use crate::selector::parse_selectors;
use crate::value::{parse_declaration_value, parse_value};

/// Parse a CSSX document into a stylesheet.
///
/// The first malformed line aborts the parse; no partial tree is returned.
///
/// # Example
///
/// ```ignore
/// let sheet = cssx_parser::parse("@c = #3498db\n.box { fondo = @c }", "main.cssx")?;
/// assert_eq!(sheet.items.len(), 2);
/// ```
pub fn parse(source: &str, file: &str) -> Result<Stylesheet> {
    let mut parser = DocumentParser::new(file);
    for (index, raw) in source.lines().enumerate() {
        let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        parser.line(&Line { number, raw })?;
    }
    let sheet = parser.finish()?;
    tracing::debug!(file, items = sheet.items.len(), "parsed document");
    Ok(sheet)
}

/// One source line, for computing columns of sub-slices.
struct Line<'s> {
    number: u32,
    raw: &'s str,
}

impl Line<'_> {
    /// Span of `part`, which must be a slice of this line.
    fn span_of(&self, part: &str) -> Span {
        let offset = (part.as_ptr() as usize).saturating_sub(self.raw.as_ptr() as usize);
        let prefix = self.raw.get(..offset).unwrap_or(self.raw);
        let column = u32::try_from(prefix.chars().count() + 1).unwrap_or(u32::MAX);
        Span::new(self.number, column)
    }
}

/// An open block.
enum Block {
    Rule(RuleSet),
    Template(TemplateDef),
}

impl Block {
    fn span(&self) -> Span {
        match self {
            Block::Rule(rule) => rule.span,
            Block::Template(def) => def.span,
        }
    }
}

struct DocumentParser {
    sheet: Stylesheet,
    stack: Vec<Block>,
}

impl DocumentParser {
    fn new(file: &str) -> Self {
        Self {
            sheet: Stylesheet::new(file),
            stack: Vec::new(),
        }
    }

    fn line(&mut self, line: &Line<'_>) -> Result<()> {
        let text = line.raw.trim();
        if text.is_empty() || text.starts_with("//") {
            return Ok(());
        }
        if text.starts_with('#') && !text.contains('{') {
            return Ok(());
        }

        if let Some(rest) = text.strip_prefix('}') {
            if !rest.trim().is_empty() {
                return Err(ParseError::at(
                    "unexpected text after '}'",
                    line.span_of(rest.trim_start()),
                ));
            }
            return self.close(line.span_of(text));
        }

        if let Some(open) = find_top_level(text, '{') {
            let header = text[..open].trim();
            let body = text[open + 1..].trim();
            self.open(header, line.span_of(text), line)?;
            if body.is_empty() {
                return Ok(());
            }
            let Some(inner) = body.strip_suffix('}') else {
                return Err(ParseError::at(
                    "expected '}' at the end of a one-line block",
                    line.span_of(body),
                ));
            };
            self.statements(inner, line)?;
            return self.close(line.span_of(body));
        }

        self.statements(text, line)
    }

    fn statements(&mut self, text: &str, line: &Line<'_>) -> Result<()> {
        for statement in split_top_level(text, ';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                self.statement(statement, line)?;
            }
        }
        Ok(())
    }

    fn open(&mut self, header: &str, span: Span, line: &Line<'_>) -> Result<()> {
        if header.is_empty() {
            return Err(ParseError::at("missing selector before '{'", span));
        }

        if let Some(rest) = strip_keyword(header, TEMPLATE_KEYWORD) {
            if !self.stack.is_empty() {
                return Err(ParseError::at("templates must be defined at the top level", span));
            }
            let def = parse_template_header(rest, span, line)?;
            self.stack.push(Block::Template(def));
            return Ok(());
        }

        if matches!(self.stack.last(), Some(Block::Template(_))) {
            return Err(ParseError::at("rule sets are not allowed inside a template", span));
        }
        let selectors = parse_selectors(header, line.span_of(header), !self.stack.is_empty())?;
        self.stack.push(Block::Rule(RuleSet::new(selectors, span)));
        Ok(())
    }

    fn close(&mut self, span: Span) -> Result<()> {
        match self.stack.pop() {
            None => Err(ParseError::at("unexpected '}'", span)),
            Some(Block::Template(def)) => {
                self.sheet.push(Item::Template(def));
                Ok(())
            }
            Some(Block::Rule(rule)) => {
                match self.stack.last_mut() {
                    Some(Block::Rule(parent)) => parent.body.push(BodyItem::RuleSet(rule)),
                    Some(Block::Template(_)) => {
                        return Err(ParseError::at("rule sets are not allowed inside a template", rule.span));
                    }
                    None => self.sheet.push(Item::RuleSet(rule)),
                }
                Ok(())
            }
        }
    }

    fn statement(&mut self, text: &str, line: &Line<'_>) -> Result<()> {
        let span = line.span_of(text);

        if let Some(rest) = strip_keyword(text, USE_KEYWORD) {
            let invocation = parse_use(rest, span, line)?;
            return match self.stack.last_mut() {
                Some(Block::Rule(rule)) => {
                    rule.body.push(BodyItem::Use(invocation));
                    Ok(())
                }
                Some(Block::Template(def)) => {
                    def.body.push(TemplateItem::Use(invocation));
                    Ok(())
                }
                None => Err(ParseError::at(
                    format!("'{USE_KEYWORD}' is only allowed inside a block"),
                    span,
                )),
            };
        }

        let Some(eq) = find_assignment(text) else {
            return Err(ParseError::at(
                format!("expected 'property = value', found '{text}'"),
                span,
            ));
        };
        let name = text[..eq].trim();
        let value_text = text[eq + 1..].trim();
        if name.is_empty() {
            return Err(ParseError::at("missing name before '='", span));
        }

        if name.starts_with(SIGIL) {
            let value = parse_value(value_text, line.span_of(value_text))?;
            let decl = VariableDecl::new(name, value, span);
            return match self.stack.last_mut() {
                Some(Block::Rule(rule)) => {
                    rule.body.push(BodyItem::Variable(decl));
                    Ok(())
                }
                Some(Block::Template(_)) => Err(ParseError::at(
                    "variables cannot be declared inside a template",
                    span,
                )),
                None => {
                    self.sheet.push(Item::Variable(decl));
                    Ok(())
                }
            };
        }

        if !lexicon::is_identifier(name) {
            return Err(ParseError::at(format!("invalid property name '{name}'"), span));
        }
        let (value, important) = parse_declaration_value(value_text, line.span_of(value_text))?;
        let mut decl = Declaration::new(name, value, span);
        decl.important = important;
        match self.stack.last_mut() {
            Some(Block::Rule(rule)) => rule.body.push(BodyItem::Declaration(decl)),
            Some(Block::Template(def)) => def.body.push(TemplateItem::Declaration(decl)),
            None => self.sheet.push(Item::Declaration(decl)),
        }
        Ok(())
    }

    fn finish(self) -> Result<Stylesheet> {
        if let Some(block) = self.stack.last() {
            return Err(ParseError::at("block is never closed", block.span()));
        }
        Ok(self.sheet)
    }
}

/// `plantilla Name(@a, @b=default)`
fn parse_template_header(rest: &str, span: Span, line: &Line<'_>) -> Result<TemplateDef> {
    let (name, params_text) = split_call(rest, span)?;
    let mut params = Vec::new();
    let mut seen = HashSet::new();
    for piece in params_text.map(|text| split_arguments(text, span)).transpose()?.unwrap_or_default() {
        let param = match find_top_level(piece, '=') {
            Some(eq) => {
                let default_text = piece[eq + 1..].trim();
                let default = parse_value(default_text, line.span_of(default_text))?;
                Param::with_default(piece[..eq].trim(), default)
            }
            None => Param::required(piece),
        };
        if !lexicon::is_variable_name(&param.name) {
            return Err(ParseError::at(
                format!("template parameter '{}' must be '{SIGIL}' followed by a name", param.name),
                line.span_of(piece),
            ));
        }
        if !seen.insert(param.name.clone()) {
            return Err(ParseError::at(
                format!("parameter '{}' is declared more than once", param.name),
                line.span_of(piece),
            ));
        }
        params.push(param);
    }
    Ok(TemplateDef::new(name, params, span))
}

/// `usar Name(args)` or `usar Name`
fn parse_use(rest: &str, span: Span, line: &Line<'_>) -> Result<TemplateUse> {
    let (name, args_text) = split_call(rest, span)?;
    let mut args = Vec::new();
    for piece in args_text.map(|text| split_arguments(text, span)).transpose()?.unwrap_or_default() {
        let argument = match find_top_level(piece, '=') {
            Some(eq) if piece.starts_with(SIGIL) => {
                let value_text = piece[eq + 1..].trim();
                Argument::named(piece[..eq].trim(), parse_value(value_text, line.span_of(value_text))?)
            }
            _ => Argument::Positional(parse_value(piece, line.span_of(piece))?),
        };
        args.push(argument);
    }
    Ok(TemplateUse::new(name, args, span))
}

/// Split `Name(args)` into the name and the text between the parentheses.
fn split_call(text: &str, span: Span) -> Result<(&str, Option<&str>)> {
    let (name, args) = match text.find('(') {
        Some(open) => {
            let Some(inner) = text[open + 1..].trim_end().strip_suffix(')') else {
                return Err(ParseError::at("expected ')' to close the argument list", span));
            };
            (text[..open].trim(), Some(inner))
        }
        None => (text.trim(), None),
    };
    if !lexicon::is_identifier(name) {
        return Err(ParseError::at(format!("invalid template name '{name}'"), span));
    }
    Ok((name, args))
}

fn split_arguments(text: &str, span: Span) -> Result<Vec<&str>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',')
        .into_iter()
        .map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                Err(ParseError::at("empty argument", span))
            } else {
                Ok(piece)
            }
        })
        .collect()
}

/// `keyword rest` or `keyword(rest`; returns the text after the keyword.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Position of the `=` or `:` separating a name from its value.
fn find_assignment(text: &str) -> Option<usize> {
    match (find_top_level(text, '='), find_top_level(text, ':')) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Byte offset of the first `target` outside quotes, parentheses and
/// brackets.
fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split on every top-level `separator`. Pieces are slices of `text`.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(at) = find_top_level(rest, separator) {
        pieces.push(&rest[..at]);
        rest = &rest[at + separator.len_utf8()..];
    }
    pieces.push(rest);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssx_core::ast::Value;

    fn parse_ok(source: &str) -> Stylesheet {
        parse(source, "t.cssx").expect("document should parse")
    }

    fn parse_err(source: &str) -> ParseError {
        parse(source, "t.cssx").expect_err("document should not parse")
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let sheet = parse_ok("// comentario\n# otro comentario\n\n");
        assert!(sheet.items.is_empty());
    }

    #[test]
    fn test_id_selector_line_is_not_a_comment() {
        let sheet = parse_ok("#principal {\n  color = red\n}");
        let rule = sheet.rule_sets().next().expect("rule set");
        assert_eq!(rule.selectors[0].to_string(), "#principal");
    }

    #[test]
    fn test_rule_set_with_declarations() {
        let sheet = parse_ok(".box {\n  fondo = azul\n  padding: 10px;\n  color = red !important\n}");
        let rule = sheet.rule_sets().next().expect("rule set");
        let decls: Vec<_> = rule.declarations().collect();
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].property, "fondo");
        assert_eq!(decls[0].value, Value::Color("blue".into()));
        assert_eq!(decls[0].span, Span::new(2, 3));
        assert_eq!(decls[1].value, Value::dimension(10.0, "px"));
        assert!(decls[2].important);
    }

    #[test]
    fn test_one_line_block() {
        let sheet = parse_ok(".a { color = red; margin = 0 }");
        let rule = sheet.rule_sets().next().expect("rule set");
        assert_eq!(rule.declarations().count(), 2);
        assert_eq!(rule.declaration("margin").map(|d| d.span), Some(Span::new(1, 19)));
    }

    #[test]
    fn test_nested_rule_sets() {
        let sheet = parse_ok(".btn {\n  color = white\n  &:hover {\n    color = red\n  }\n  .icon {\n    width = 16\n  }\n}");
        let rule = sheet.rule_sets().next().expect("rule set");
        let children: Vec<&RuleSet> = rule.children().collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].selectors[0].is_parent_reference());
        assert_eq!(children[1].span, Span::new(6, 3));
        assert!(matches!(rule.body[1], BodyItem::RuleSet(_)));
    }

    #[test]
    fn test_variables_and_page_title() {
        let sheet = parse_ok("@c = #3498db\ntitulo_pagina = \"Inicio\"\n.box {\n  @local = 4px\n  margin = @local\n}");
        assert!(matches!(&sheet.items[0], Item::Variable(v) if v.name == "@c"));
        assert!(matches!(&sheet.items[1], Item::Declaration(d) if d.property == "titulo_pagina"));
        let rule = sheet.rule_sets().next().expect("rule set");
        assert!(matches!(&rule.body[0], BodyItem::Variable(v) if v.name == "@local"));
    }

    #[test]
    fn test_template_definition_and_use() {
        let source = "plantilla boton(@fondo, @radio=4px) {\n  fondo = @fondo\n  border-radius = @radio\n  usar sombra\n}\n.cta {\n  usar boton(azul, @radio=8px)\n}";
        let sheet = parse_ok(source);

        let def = sheet.templates().next().expect("template");
        assert_eq!(def.name, "boton");
        assert_eq!(def.params[0], Param::required("@fondo"));
        assert_eq!(def.params[1], Param::with_default("@radio", Value::dimension(4.0, "px")));
        assert_eq!(def.body.len(), 3);
        assert!(matches!(&def.body[2], TemplateItem::Use(u) if u.name == "sombra" && u.args.is_empty()));

        let rule = sheet.rule_sets().next().expect("rule set");
        let BodyItem::Use(invocation) = &rule.body[0] else {
            panic!("expected a template use");
        };
        assert_eq!(invocation.span, Span::new(7, 3));
        assert_eq!(
            invocation.args,
            vec![
                Argument::Positional(Value::Color("blue".into())),
                Argument::named("@radio", Value::dimension(8.0, "px")),
            ]
        );
    }

    #[test]
    fn test_quoted_braces_do_not_open_blocks() {
        let sheet = parse_ok("p {\n  texto = \"a { b } c; d\"\n}");
        let rule = sheet.rule_sets().next().expect("rule set");
        assert_eq!(
            rule.declaration("texto").map(|d| &d.value),
            Some(&Value::String("a { b } c; d".into()))
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse_err("}").span(), Span::new(1, 1));
        assert_eq!(parse_err(".a {\n  color = red").span(), Span::new(1, 1));
        assert!(parse_err(".a {\n  color\n}").message.contains("expected 'property = value'"));
        assert!(parse_err("usar x").message.contains("only allowed inside a block"));
        assert!(parse_err("plantilla t(@a) {\n  .x {\n  }\n}").message.contains("not allowed inside a template"));
        assert!(parse_err("plantilla t(a) {\n}").message.contains("must be '@'"));
        assert!(parse_err("plantilla t(@a, @a) {\n}").message.contains("more than once"));
        assert!(parse_err(".a {\n  plantilla t {\n  }\n}").message.contains("top level"));
        assert!(parse_err("&:hover {\n}").message.contains("nested"));
    }

    #[test]
    fn test_value_error_column() {
        let err = parse_err(".a {\n  width = 10px {\n}");
        // `{` opens a block, so the header is the declaration text.
        assert_eq!(err.line, 2);

        let err = parse_err(".a {\n  width = 10px )\n}");
        assert_eq!((err.line, err.column), (2, 16));
    }
}
