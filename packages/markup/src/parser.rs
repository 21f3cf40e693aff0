use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use braid_model::{IdGenerator, NodeDictionary, NodePayload, SchemaSet, TEXT_TYPE};
use std::collections::BTreeMap;
use std::ops::Range;

/// Parse markup into a node dictionary.
///
/// Pure over its inputs. The previous dictionary contributes only its id
/// seed, so a reparse stays within the same document identity while every
/// node receives a fresh pre-order id.
pub fn parse(
    source: &str,
    previous: &NodeDictionary,
    schemas: &SchemaSet,
) -> ParseResult<NodeDictionary> {
    Parser::new(source, IdGenerator::from_existing_id(previous.root_id()), schemas).parse_document()
}

/// Recursive descent parser for the Braid markup
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    ids: IdGenerator,
    schemas: &'src SchemaSet,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, ids: IdGenerator, schemas: &'src SchemaSet) -> Self {
        let tokens = tokenize(source);
        Self {
            source,
            tokens,
            pos: 0,
            ids,
            schemas,
        }
    }

    #[cfg(test)]
    pub fn new_with_uri(source: &'src str, uri: &str, schemas: &'src SchemaSet) -> Self {
        Self::new(source, IdGenerator::new(uri), schemas)
    }

    /// Parse a complete document: exactly one root element
    pub fn parse_document(&mut self) -> ParseResult<NodeDictionary> {
        self.skip_whitespace();

        match self.peek() {
            Some((Token::Open, _)) => {}
            Some((other, span)) => {
                return Err(ParseError::unexpected_token(
                    span.start,
                    "<",
                    format!("{:?}", other),
                ));
            }
            None => return Err(ParseError::unexpected_eof(self.source.len())),
        }

        let (type_name, attributes, self_closed) = self.parse_open_tag()?;
        let root_id = self.ids.next_id();
        let mut dict = NodeDictionary::with_root(
            &root_id,
            &type_name,
            NodePayload::Element { attributes },
        );

        if !self_closed {
            self.parse_children(&mut dict, &root_id, &type_name)?;
        }

        self.skip_whitespace();
        if let Some((_, span)) = self.peek() {
            return Err(ParseError::TrailingContent { pos: span.start });
        }

        Ok(dict)
    }

    /// Parse `<name attr="value" …` up to and including `>` or `/>`
    fn parse_open_tag(&mut self) -> ParseResult<(String, BTreeMap<String, String>, bool)> {
        self.advance(); // consume `<`
        let type_name = self.expect_name()?;

        if !self.schemas.contains(&type_name) {
            return Err(ParseError::unknown_type(self.current_pos(), type_name));
        }

        let mut attributes = BTreeMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some((Token::Close, _)) => {
                    self.advance();
                    return Ok((type_name, attributes, false));
                }
                Some((Token::SlashClose, _)) => {
                    self.advance();
                    return Ok((type_name, attributes, true));
                }
                Some((Token::Chunk(_), _)) => {
                    let name = self.expect_name()?;
                    let value = if self.match_token(&Token::Equals) {
                        self.expect_string()?
                    } else {
                        String::new()
                    };
                    attributes.insert(name, value);
                }
                Some((other, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        "attribute, > or />",
                        format!("{:?}", other),
                    ));
                }
                None => return Err(ParseError::unexpected_eof(self.source.len())),
            }
        }
    }

    /// Parse children of an open element until its closing tag
    fn parse_children(
        &mut self,
        dict: &mut NodeDictionary,
        parent_id: &str,
        open_type: &str,
    ) -> ParseResult<()> {
        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len())),
                Some((Token::OpenSlash, span)) => {
                    let pos = span.start;
                    self.advance();
                    let closed = self.expect_name()?;
                    self.skip_whitespace();
                    self.expect_close()?;
                    if closed != open_type {
                        return Err(ParseError::mismatched_close(pos, open_type, closed));
                    }
                    return Ok(());
                }
                Some((Token::Open, _)) => {
                    let (type_name, attributes, self_closed) = self.parse_open_tag()?;
                    let id = self.ids.next_id();
                    dict.append_child(
                        parent_id,
                        &id,
                        &type_name,
                        NodePayload::Element { attributes },
                    )
                    .expect("parent was inserted by this parse");

                    if !self_closed {
                        self.parse_children(dict, &id, &type_name)?;
                    }
                }
                Some((_, span)) => {
                    // text run: consume everything up to the next tag and
                    // slice the source so interior spacing survives
                    let start = span.start;
                    let mut end = span.end;
                    while let Some((token, span)) = self.peek() {
                        if matches!(token, Token::Open | Token::OpenSlash) {
                            break;
                        }
                        end = span.end;
                        self.advance();
                    }

                    let text = self.source[start..end].trim();
                    if !text.is_empty() {
                        let id = self.ids.next_id();
                        dict.append_child(parent_id, &id, TEXT_TYPE, NodePayload::text(text))
                            .expect("parent was inserted by this parse");
                    }
                }
            }
        }
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn current_pos(&self) -> usize {
        self.peek()
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((Token::Whitespace, _))) {
            self.advance();
        }
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.peek().map(|(t, _)| t) == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a chunk that is a well-formed tag or attribute name
    fn expect_name(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Chunk(name), span)) => {
                let name = *name;
                let pos = span.start;
                if !is_name(name) {
                    return Err(ParseError::unexpected_token(pos, "name", name));
                }
                self.advance();
                Ok(name.to_string())
            }
            Some((other, span)) => Err(ParseError::unexpected_token(
                span.start,
                "name",
                format!("{:?}", other),
            )),
            None => Err(ParseError::unexpected_eof(self.source.len())),
        }
    }

    /// Expect a quoted string and return it without the quotes
    fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::String(raw), _)) => {
                let value = raw[1..raw.len() - 1].to_string();
                self.advance();
                Ok(value)
            }
            Some((other, span)) => Err(ParseError::unexpected_token(
                span.start,
                "quoted value",
                format!("{:?}", other),
            )),
            None => Err(ParseError::unexpected_eof(self.source.len())),
        }
    }

    fn expect_close(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some((Token::Close, _)) => {
                self.advance();
                Ok(())
            }
            Some((other, span)) => Err(ParseError::unexpected_token(
                span.start,
                ">",
                format!("{:?}", other),
            )),
            None => Err(ParseError::unexpected_eof(self.source.len())),
        }
    }
}

fn is_name(chunk: &str) -> bool {
    let mut chars = chunk.chars();
    chars
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
