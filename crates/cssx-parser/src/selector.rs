//! Selector lists.

use cssparser::{
    Delimiter, ParseError as CssParseError, Parser, ParserInput, SourceLocation, Token,
};
use cssx_core::ast::{Combinator, Selector, SimpleKind, SimpleSelector, Span};
use cssx_core::lexicon;

use crate::error::{ParseError, Result};

type CssResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse a comma-separated selector list starting at `origin`.
///
/// `nested` allows a leading `&`, which is only meaningful inside another
/// rule set.
pub(crate) fn parse_selectors(text: &str, origin: Span, nested: bool) -> Result<Vec<Selector>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_entirely(|p| parse_list(p, origin, nested))
        .map_err(|e| ParseError::from_css(e, origin))
}

fn parse_list<'i>(
    parser: &mut Parser<'i, '_>,
    origin: Span,
    nested: bool,
) -> CssResult<'i, Vec<Selector>> {
    let mut selectors = Vec::new();
    loop {
        let selector = parser.parse_until_before(Delimiter::Comma, |p| {
            SelectorBuilder::new(origin, nested).parse(p)
        })?;
        selectors.push(selector);
        match parser.next() {
            Ok(Token::Comma) => continue,
            Ok(other) => {
                let token = other.clone();
                return Err(parser.new_unexpected_token_error(token));
            }
            Err(_) => break,
        }
    }
    Ok(selectors)
}

/// Accumulates compounds and the combinators between them.
struct SelectorBuilder {
    origin: Span,
    nested: bool,
    parent_ref: bool,
    parts: Vec<Vec<SimpleSelector>>,
    combinators: Vec<Combinator>,
    current: Vec<SimpleSelector>,
    pending: Option<Combinator>,
}

impl SelectorBuilder {
    fn new(origin: Span, nested: bool) -> Self {
        Self {
            origin,
            nested,
            parent_ref: false,
            parts: Vec::new(),
            combinators: Vec::new(),
            current: Vec::new(),
            pending: None,
        }
    }

    fn parse<'i>(mut self, parser: &mut Parser<'i, '_>) -> CssResult<'i, Selector> {
        parser.skip_whitespace();
        let start_location = parser.current_source_location();

        loop {
            let start = parser.position();
            let location = parser.current_source_location();
            let span = self.span_at(location);
            let token = match parser.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match token {
                Token::WhiteSpace(_) => self.close_compound(),
                Token::Delim('&') => self.parent_reference(parser, location)?,
                Token::Delim('>') => self.combinator(Combinator::Child, location)?,
                Token::Delim('+') => self.combinator(Combinator::AdjacentSibling, location)?,
                Token::Delim('~') => self.combinator(Combinator::GeneralSibling, location)?,
                Token::Ident(name) => {
                    if !self.current.is_empty() {
                        return Err(location.new_custom_error(format!(
                            "element name '{name}' must come first in a compound selector"
                        )));
                    }
                    let tag = lexicon::html_tag(&name).unwrap_or(&*name).to_string();
                    self.push(SimpleSelector::type_selector(tag).at(span));
                }
                Token::Delim('*') => self.push(SimpleSelector::type_selector("*").at(span)),
                Token::Delim('.') => match parser.next_including_whitespace() {
                    Ok(Token::Ident(name)) => {
                        let name = name.to_string();
                        self.push(SimpleSelector::class(name).at(span));
                    }
                    _ => {
                        return Err(location.new_custom_error("expected a class name after '.'".to_string()));
                    }
                },
                // `.1col` tokenizes as a number; keep the raw name so the
                // analyzer can report it.
                Token::Number { .. } | Token::Dimension { .. }
                    if parser.slice_from(start).starts_with('.') =>
                {
                    let raw = parser.slice_from(start)[1..].to_string();
                    self.push(SimpleSelector::class(raw).at(span));
                }
                Token::IDHash(name) | Token::Hash(name) => {
                    self.push(SimpleSelector::id(name.to_string()).at(span));
                }
                Token::Colon => {
                    let simple = parse_pseudo(parser, location)?;
                    self.push(simple.at(span));
                }
                Token::SquareBracketBlock => {
                    let attribute = parser.parse_nested_block(raw_block)?;
                    self.push(SimpleSelector::new(SimpleKind::Attribute, attribute).at(span));
                }
                other => return Err(location.new_unexpected_token_error(other)),
            }
        }

        self.finish(start_location)
    }

    fn span_at(&self, location: SourceLocation) -> Span {
        self.origin.offset(location.column.saturating_sub(1))
    }

    fn push(&mut self, simple: SimpleSelector) {
        if self.current.is_empty() && !self.parts.is_empty() {
            self.combinators
                .push(self.pending.take().unwrap_or(Combinator::Descendant));
        }
        self.pending = None;
        self.current.push(simple);
    }

    fn close_compound(&mut self) {
        if !self.current.is_empty() {
            self.parts.push(std::mem::take(&mut self.current));
        }
    }

    fn combinator<'i>(&mut self, combinator: Combinator, location: SourceLocation) -> CssResult<'i, ()> {
        self.close_compound();
        if self.parts.is_empty() {
            return Err(location.new_custom_error(format!(
                "selector cannot start with '{}'",
                combinator.separator().trim()
            )));
        }
        if self.pending.is_some() {
            return Err(location.new_custom_error("two combinators in a row".to_string()));
        }
        self.pending = Some(combinator);
        Ok(())
    }

    fn parent_reference<'i>(
        &mut self,
        parser: &mut Parser<'i, '_>,
        location: SourceLocation,
    ) -> CssResult<'i, ()> {
        if !self.nested {
            return Err(location.new_custom_error("'&' is only allowed in a nested rule set".to_string()));
        }
        if self.parent_ref || !self.parts.is_empty() || !self.current.is_empty() {
            return Err(location.new_custom_error("'&' must start the selector".to_string()));
        }
        let state = parser.state();
        match parser.next_including_whitespace() {
            Ok(Token::WhiteSpace(_)) | Err(_) => {
                return Err(location.new_custom_error(
                    "'&' must be immediately followed by a selector".to_string(),
                ));
            }
            Ok(_) => parser.reset(&state),
        }
        self.parent_ref = true;
        Ok(())
    }

    fn finish<'i>(mut self, location: SourceLocation) -> CssResult<'i, Selector> {
        self.close_compound();
        if self.pending.is_some() {
            return Err(location.new_custom_error("selector ends with a combinator".to_string()));
        }
        let mut parts = self.parts.into_iter();
        let Some(first) = parts.next() else {
            return Err(location.new_custom_error("empty selector".to_string()));
        };

        let mut selector = Selector::compound(first);
        for (combinator, part) in self.combinators.into_iter().zip(parts) {
            selector = selector.combine(combinator, Selector::compound(part));
        }
        Ok(if self.parent_ref {
            Selector::parent_ref(selector)
        } else {
            selector
        })
    }
}

fn parse_pseudo<'i>(
    parser: &mut Parser<'i, '_>,
    location: SourceLocation,
) -> CssResult<'i, SimpleSelector> {
    let token = match parser.next_including_whitespace() {
        Ok(token) => token.clone(),
        Err(_) => {
            return Err(location.new_custom_error("expected a pseudo-class name after ':'".to_string()));
        }
    };
    match token {
        Token::Ident(name) => Ok(SimpleSelector::pseudo_class(name.to_string())),
        Token::Function(name) => {
            let args = parser.parse_nested_block(raw_block)?;
            Ok(SimpleSelector::pseudo_class(format!("{name}({args})")))
        }
        Token::Colon => match parser.next_including_whitespace() {
            Ok(Token::Ident(name)) => {
                let name = name.to_string();
                Ok(SimpleSelector::new(SimpleKind::PseudoElement, name))
            }
            _ => Err(location.new_custom_error(
                "expected a pseudo-element name after '::'".to_string(),
            )),
        },
        other => Err(location.new_unexpected_token_error(other)),
    }
}

/// The source text of a block's contents, trimmed.
fn raw_block<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, String> {
    let start = parser.position();
    while parser.next_including_whitespace_and_comments().is_ok() {}
    Ok(parser.slice_from(start).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(text: &str) -> Selector {
        let mut list = parse_selectors(text, Span::new(1, 1), true).expect("selector should parse");
        assert_eq!(list.len(), 1);
        list.remove(0)
    }

    #[test]
    fn test_simple_and_compound() {
        assert_eq!(one(".card").to_string(), ".card");
        assert_eq!(one("div.card#main").to_string(), "div.card#main");
        assert_eq!(one("boton").to_string(), "button");
        assert_eq!(one("a:hover").to_string(), "a:hover");
        assert_eq!(one("p::first-line").to_string(), "p::first-line");
        assert_eq!(one("li:nth-child(2n + 1)").to_string(), "li:nth-child(2n + 1)");
        assert_eq!(one("input[type=\"text\"]").to_string(), "input[type=\"text\"]");
    }

    #[test]
    fn test_combinators() {
        assert_eq!(one("nav  a").to_string(), "nav a");
        assert_eq!(one("ul>li").to_string(), "ul > li");
        assert_eq!(one("h1 + p ~ span").to_string(), "h1 + p ~ span");
        assert_eq!(one("#id div.foo").specificity().to_string(), "(1,1,1)");
    }

    #[test]
    fn test_parent_reference() {
        let hover = one("&:hover");
        assert!(hover.is_parent_reference());
        assert_eq!(hover.parent_suffix().as_deref(), Some(":hover"));

        assert!(parse_selectors("&:hover", Span::new(1, 1), false).is_err());
        assert!(parse_selectors("& .x", Span::new(1, 1), true).is_err());
        assert!(parse_selectors(".a &.b", Span::new(1, 1), true).is_err());
    }

    #[test]
    fn test_list_and_spans() {
        let list = parse_selectors("h1, .title", Span::new(4, 3), false).expect("parses");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].simples()[0].span, Span::new(4, 7));
    }

    #[test]
    fn test_numeric_class_kept_for_analysis() {
        let sel = one(".1col");
        assert_eq!(sel.simples()[0].kind, SimpleKind::Class);
        assert_eq!(sel.simples()[0].name, "1col");
    }

    #[test]
    fn test_errors() {
        for bad in ["> a", "a >", "a > > b", "a,", "", "a {"] {
            assert!(
                parse_selectors(bad, Span::new(1, 1), true).is_err(),
                "'{bad}' should not parse"
            );
        }
    }
}
