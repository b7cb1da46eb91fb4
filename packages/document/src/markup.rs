//! Persisted representation of a document subtree.
//!
//! Identity is the only state this layer owns: it is serialized as
//! `data-table-id` / `data-row-id` / `data-cell-id` attributes on each
//! element, and must round-trip exactly through serialize → parse →
//! `identity()`. Unknown attributes are tolerated and dropped, so legacy or
//! hand-authored content with partial identity still parses.

use crate::arena::{Document, NodeId};
use crate::error::{ParseError, ParseResult};
use crate::node::{Identity, NodeKind};
use crate::tokenizer::{quote, tokenize, unquote, Token};
use std::fmt::Write;
use std::ops::Range;

/// Serialize the subtree rooted at `node` to markup.
pub fn serialize(doc: &Document, node: NodeId) -> String {
    Serializer::new().serialize(doc, node)
}

/// Parse markup into a fresh document; the parsed nodes become children of
/// the document root.
pub fn parse(source: &str) -> ParseResult<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    Parser::new(source)?.parse_into(&mut doc, root)?;
    Ok(doc)
}

/// Serializer converts a subtree back to its markup form.
///
/// The output is pretty-printed; whitespace between elements is not
/// significant and the parser discards it.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Serializer {
        Serializer {
            indent_level: 0,
            indent_string: "  ".to_string(),
        }
    }

    pub fn serialize(&mut self, doc: &Document, node: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(doc, node, &mut output);
        output
    }

    fn serialize_node(&mut self, doc: &Document, node: NodeId, output: &mut String) {
        let Some(kind) = doc.kind(node) else {
            return;
        };
        let tag = kind.tag().to_ascii_lowercase();
        self.write_indent(output);
        let _ = write!(output, "<{}", tag);
        if let Some(identity) = doc.identity(node) {
            for (name, value) in attribute_pairs(identity) {
                let _ = write!(output, " {}={}", name, quote(value));
            }
        }

        let children = doc.children(node);
        let text = doc.text(node);
        if children.is_empty() && text.is_none() {
            output.push_str("/>\n");
            return;
        }
        output.push('>');

        if let Some(text) = text {
            let _ = write!(output, "{}", quote(text));
        }
        if !children.is_empty() {
            output.push('\n');
            self.indent_level += 1;
            for &child in children {
                self.serialize_node(doc, child, output);
            }
            self.indent_level -= 1;
            self.write_indent(output);
        }
        let _ = write!(output, "</{}>\n", tag);
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

fn attribute_pairs(identity: &Identity) -> impl Iterator<Item = (&'static str, &str)> {
    [
        ("data-table-id", identity.table_id.as_deref()),
        ("data-row-id", identity.row_id.as_deref()),
        ("data-cell-id", identity.cell_id.as_deref()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
}

/// Recursive-descent parser over the markup token stream.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    len: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            tokens,
            pos: 0,
            len: source.len(),
        })
    }

    /// Parse every top-level element and append it under `parent`.
    pub fn parse_into(&mut self, doc: &mut Document, parent: NodeId) -> ParseResult<Vec<NodeId>> {
        let mut nodes = Vec::new();
        while !self.is_at_end() {
            nodes.push(self.parse_element(doc, parent)?);
        }
        Ok(nodes)
    }

    fn parse_element(&mut self, doc: &mut Document, parent: NodeId) -> ParseResult<NodeId> {
        self.expect(Token::Open)?;
        let (tag, tag_pos) = self.expect_ident()?;
        let kind = NodeKind::from_tag(tag)
            .ok_or_else(|| ParseError::invalid_markup(tag_pos, format!("unknown tag `{tag}`")))?;

        let mut identity = Identity::none();
        loop {
            match self.peek() {
                Some((Token::Ident(name), _)) => {
                    let name = *name;
                    self.advance();
                    self.expect(Token::Equals)?;
                    let value = self.expect_string()?;
                    match name {
                        "data-table-id" => identity.table_id = Some(value),
                        "data-row-id" => identity.row_id = Some(value),
                        "data-cell-id" => identity.cell_id = Some(value),
                        // Unknown attributes are legacy content; drop them.
                        _ => {}
                    }
                }
                Some((Token::SelfClose, _)) => {
                    self.advance();
                    let node = doc.create_node(kind, identity);
                    doc.append_child(parent, node)
                        .map_err(|_| ParseError::invalid_markup(tag_pos, "dangling parent"))?;
                    return Ok(node);
                }
                Some((Token::Close, _)) => {
                    self.advance();
                    break;
                }
                Some((token, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        "attribute, `>` or `/>`",
                        format!("{token:?}"),
                    ));
                }
                None => return Err(ParseError::unexpected_eof(self.len)),
            }
        }

        let node = doc.create_node(kind, identity);
        doc.append_child(parent, node)
            .map_err(|_| ParseError::invalid_markup(tag_pos, "dangling parent"))?;

        // Content: quoted text and child elements, until the closing tag.
        loop {
            match self.peek() {
                Some((Token::String(raw), _)) => {
                    let mut text = doc.text(node).map(str::to_string).unwrap_or_default();
                    text.push_str(&unquote(raw));
                    doc.set_text(node, Some(text))
                        .map_err(|_| ParseError::invalid_markup(tag_pos, "dangling node"))?;
                    self.advance();
                }
                Some((Token::Open, _)) => {
                    self.parse_element(doc, node)?;
                }
                Some((Token::OpenClose, _)) => {
                    self.advance();
                    let (close_tag, close_pos) = self.expect_ident()?;
                    if !close_tag.eq_ignore_ascii_case(tag) {
                        return Err(ParseError::invalid_markup(
                            close_pos,
                            format!("expected `</{tag}>`, found `</{close_tag}>`"),
                        ));
                    }
                    self.expect(Token::Close)?;
                    return Ok(node);
                }
                Some((token, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        "content or closing tag",
                        format!("{token:?}"),
                    ));
                }
                None => return Err(ParseError::unexpected_eof(self.len)),
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, token: Token<'src>) -> ParseResult<()> {
        match self.peek() {
            Some((found, _)) if *found == token => {
                self.advance();
                Ok(())
            }
            Some((found, span)) => Err(ParseError::unexpected_token(
                span.start,
                format!("{token:?}"),
                format!("{found:?}"),
            )),
            None => Err(ParseError::unexpected_eof(self.len)),
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(&'src str, usize)> {
        match self.peek() {
            Some((Token::Ident(name), span)) => {
                let result = (*name, span.start);
                self.advance();
                Ok(result)
            }
            Some((found, span)) => Err(ParseError::unexpected_token(
                span.start,
                "identifier",
                format!("{found:?}"),
            )),
            None => Err(ParseError::unexpected_eof(self.len)),
        }
    }

    fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::String(raw), _)) => {
                let value = unquote(raw);
                self.advance();
                Ok(value)
            }
            Some((found, span)) => Err(ParseError::unexpected_token(
                span.start,
                "quoted string",
                format!("{found:?}"),
            )),
            None => Err(ParseError::unexpected_eof(self.len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_identity_attributes() {
        let mut doc = Document::new();
        let cell = doc.create_node(NodeKind::Cell, Identity::cell("t1", "r1", "c1"));
        doc.append_child(doc.root(), cell).unwrap();

        let markup = serialize(&doc, cell);
        assert_eq!(
            markup,
            "<td data-table-id=\"t1\" data-row-id=\"r1\" data-cell-id=\"c1\"/>\n"
        );
    }

    #[test]
    fn parses_nested_elements() {
        let doc = parse(
            r#"<table data-table-id="t1">
                 <tr data-table-id="t1" data-row-id="r1">
                   <td data-table-id="t1" data-row-id="r1" data-cell-id="c1">
                     <div>"hello"</div>
                   </td>
                 </tr>
               </table>"#,
        )
        .unwrap();

        let table = doc.children(doc.root())[0];
        assert_eq!(doc.kind(table), Some(NodeKind::Table));
        let row = doc.children(table)[0];
        let cell = doc.children(row)[0];
        let block = doc.children(cell)[0];
        assert_eq!(doc.identity(cell), Some(&Identity::cell("t1", "r1", "c1")));
        assert_eq!(doc.text(block), Some("hello"));
    }

    #[test]
    fn unknown_attributes_are_dropped() {
        let doc = parse(r#"<td data-cell-id="c1" contenteditable="false"/>"#).unwrap();
        let cell = doc.children(doc.root())[0];
        // data-cell-id survives, the foreign attribute does not
        let identity = doc.identity(cell).unwrap();
        assert_eq!(identity.cell_id.as_deref(), Some("c1"));
        assert_eq!(identity.table_id, None);
    }

    #[test]
    fn mismatched_close_tag_is_reported() {
        let err = parse(r#"<table></tr>"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMarkup { .. }));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let err = parse(r#"<section/>"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMarkup { .. }));
    }
}
