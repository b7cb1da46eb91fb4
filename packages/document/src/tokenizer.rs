use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::ops::Range;

/// Token types for the persisted markup form.
///
/// Text content is carried as a quoted string, so a single lexing mode covers
/// both tag internals and element content.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token<'src> {
    #[token("</")]
    OpenClose,

    #[token("<")]
    Open,

    #[token("/>")]
    SelfClose,

    #[token(">")]
    Close,

    #[token("=")]
    Equals,

    // Tag and attribute names, including dashed names like data-table-id
    #[regex(r"[a-zA-Z][a-zA-Z0-9-]*", |lex| lex.slice())]
    Ident(&'src str),

    // Quoted attribute values and text content
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    String(&'src str),
}

/// Lex `source` into spanned tokens, failing on the first unreadable input.
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(ParseError::lexer_error(lexer.span().start)),
        }
    }
    Ok(tokens)
}

/// Strip the surrounding quotes and resolve `\"` and `\\` escapes.
pub(crate) fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape and quote a string for the markup form.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_tag() {
        let tokens = tokenize(r#"<td data-table-id="t1">"#).unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(token, _)| token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Open,
                Token::Ident("td"),
                Token::Ident("data-table-id"),
                Token::Equals,
                Token::String("\"t1\""),
                Token::Close,
            ]
        );
    }

    #[test]
    fn rejects_unreadable_input() {
        assert!(tokenize("<td !>").is_err());
    }

    #[test]
    fn quoting_round_trips() {
        for text in ["plain", r#"say "hi""#, r"back\slash", ""] {
            assert_eq!(unquote(&quote(text)), text);
        }
    }
}
