//! Value expressions, tokenized with `cssparser`.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};
use cssx_core::ast::{Span, Value};
use cssx_core::lexicon::{self, SIGIL};

use crate::error::{ParseError, Result};

type CssResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse the value text of a declaration, variable or argument. `origin`
/// is where `text` starts in the source, used for error locations.
pub(crate) fn parse_value(text: &str, origin: Span) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(ParseError::at("missing value", origin));
    }
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_entirely(parse_list)
        .map_err(|e| ParseError::from_css(e, origin))
}

/// Parse a value that may end in `!important`.
pub(crate) fn parse_declaration_value(text: &str, origin: Span) -> Result<(Value, bool)> {
    let trimmed = text.trim_end();
    let split = trimmed.len().saturating_sub("!important".len());
    match trimmed.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case("!important") => {
            Ok((parse_value(&trimmed[..split], origin)?, true))
        }
        _ => Ok((parse_value(trimmed, origin)?, false)),
    }
}

/// Items separated by whitespace form a space list; top-level commas
/// separate the groups of a comma list.
fn parse_list<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, Value> {
    let mut groups = parse_groups(parser)?;
    if groups.iter().any(Vec::is_empty) {
        return Err(parser.new_custom_error("empty item in comma-separated list".to_string()));
    }
    Ok(if groups.len() == 1 {
        group_value(groups.remove(0))
    } else {
        Value::CommaList(groups.into_iter().map(group_value).collect())
    })
}

fn parse_groups<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, Vec<Vec<Value>>> {
    let mut groups: Vec<Vec<Value>> = vec![Vec::new()];
    loop {
        parser.skip_whitespace();
        let location = parser.current_source_location();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Comma => groups.push(Vec::new()),
            other => {
                let value = parse_token(parser, other, location)?;
                if let Some(group) = groups.last_mut() {
                    group.push(value);
                }
            }
        }
    }
    Ok(groups)
}

fn group_value(mut items: Vec<Value>) -> Value {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Value::SpaceList(items)
    }
}

fn parse_token<'i>(
    parser: &mut Parser<'i, '_>,
    token: Token<'i>,
    location: cssparser::SourceLocation,
) -> CssResult<'i, Value> {
    let value = match token {
        Token::Hash(hex) | Token::IDHash(hex) => Value::Color(format!("#{hex}")),
        Token::Number { value, .. } => Value::Number(value),
        Token::Percentage {
            unit_value,
            int_value,
            ..
        } => Value::Percentage(int_value.map_or(unit_value * 100.0, |i| i as f32)),
        Token::Dimension { value, unit, .. } => Value::dimension(value, unit.to_string()),
        Token::Ident(name) => ident_value(&name),
        Token::QuotedString(text) => Value::String(text.to_string()),
        Token::UnquotedUrl(url) => Value::Url(url.to_string()),
        Token::AtKeyword(name) => Value::variable(format!("{SIGIL}{name}")),
        Token::Function(name) if name.eq_ignore_ascii_case("url") => {
            let url = parser.parse_nested_block(|p| -> CssResult<'i, String> {
                Ok(p.expect_string()?.to_string())
            })?;
            Value::Url(url)
        }
        Token::Function(name) => {
            let args = parser.parse_nested_block(parse_arguments)?;
            Value::Function {
                name: name.to_string(),
                args,
            }
        }
        Token::Delim(c @ ('/' | '+' | '-' | '*')) => Value::keyword(c.to_string()),
        other => return Err(location.new_unexpected_token_error(other)),
    };
    Ok(value)
}

fn parse_arguments<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, Vec<Value>> {
    let groups = parse_groups(parser)?;
    if groups.len() == 1 && groups[0].is_empty() {
        return Ok(Vec::new());
    }
    if groups.iter().any(Vec::is_empty) {
        return Err(parser.new_custom_error("empty function argument".to_string()));
    }
    Ok(groups.into_iter().map(group_value).collect())
}

/// Spanish and CSS color names become colors; everything else is a keyword.
fn ident_value(name: &str) -> Value {
    if let Some(css) = lexicon::spanish_color(name) {
        Value::Color(css.to_string())
    } else if lexicon::is_named_color(name) {
        Value::Color(name.to_string())
    } else {
        Value::keyword(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Value {
        parse_value(text, Span::new(1, 1)).expect("value should parse")
    }

    #[test]
    fn test_scalars() {
        assert_eq!(value("#3498db"), Value::Color("#3498db".into()));
        assert_eq!(value("#fff"), Value::Color("#fff".into()));
        assert_eq!(value("16"), Value::Number(16.0));
        assert_eq!(value("1.5em"), Value::dimension(1.5, "em"));
        assert_eq!(value("50%"), Value::Percentage(50.0));
        assert_eq!(value("\"hola mundo\""), Value::String("hola mundo".into()));
        assert_eq!(value("@primario"), Value::variable("@primario"));
        assert_eq!(value("bold"), Value::keyword("bold"));
    }

    #[test]
    fn test_colors_by_name() {
        assert_eq!(value("azul"), Value::Color("blue".into()));
        assert_eq!(value("red"), Value::Color("red".into()));
    }

    #[test]
    fn test_lists_and_functions() {
        assert_eq!(
            value("1px solid @borde"),
            Value::SpaceList(vec![
                Value::dimension(1.0, "px"),
                Value::keyword("solid"),
                Value::variable("@borde"),
            ])
        );
        assert_eq!(
            value("\"Open Sans\", sans-serif"),
            Value::CommaList(vec![Value::String("Open Sans".into()), Value::keyword("sans-serif")])
        );
        assert_eq!(
            value("rgba(0, 0, 0, 0.5)"),
            Value::Function {
                name: "rgba".into(),
                args: vec![
                    Value::Number(0.0),
                    Value::Number(0.0),
                    Value::Number(0.0),
                    Value::Number(0.5),
                ],
            }
        );
        assert_eq!(value("url(\"fondo.png\")"), Value::Url("fondo.png".into()));
        assert_eq!(value("url(fondo.png)"), Value::Url("fondo.png".into()));
    }

    #[test]
    fn test_important_suffix() {
        let (v, important) =
            parse_declaration_value("red !important", Span::new(1, 1)).expect("parses");
        assert_eq!(v, Value::Color("red".into()));
        assert!(important);

        let (_, important) = parse_declaration_value("red", Span::new(1, 1)).expect("parses");
        assert!(!important);
    }

    #[test]
    fn test_errors_are_located() {
        let err = parse_value("1px {", Span::new(3, 10)).expect_err("should fail");
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 14);

        let err = parse_value("a, , b", Span::new(1, 1)).expect_err("should fail");
        assert!(err.message.contains("empty item"));

        assert!(parse_value("   ", Span::new(1, 1)).is_err());
    }
}
