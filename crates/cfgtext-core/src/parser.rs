//! Recursive-descent parser for values and whole documents.
//!
//! The value grammar:
//!
//! - scalars: `"string"`, `1.5`, `true`, `null`, and the sentinels `inf`,
//!   `-inf`, `nan`
//! - `Color(r, g, b, a)` and `Vector2(x, y)` with exact arity
//! - `PackedStringArray(...)` (aliases `PoolStringArray`, `StringArray`):
//!   zero or more strings
//! - `Object(ClassName, "key": value, ...)`
//! - arrays `[v, ...]` and dictionaries `{"key": v, ...}`, nesting freely
//!
//! A trailing comma before any closer is rejected. Arrays, dictionaries and
//! `Object(...)` nest at most [`MAX_NESTING_DEPTH`] levels deep.
//!
//! At statement level the document parser reads `[section]` headers and
//! `key=value` entries. Internally every rule short-circuits with `?`;
//! [`parse_document`] is the boundary that turns a [`SyntaxError`] into a
//! value returned next to the partially built document.

use crate::document::Document;
use crate::error::{CfgError, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::{ClassObject, Color, Dictionary, Value, Vector2};
use tracing::{debug, instrument, trace, warn};

type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// How many arrays, dictionaries and class objects may enclose one another.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Result of [`parse_document`]: whatever was built, plus the error that
/// stopped parsing, if any.
#[derive(Debug)]
pub struct ParseOutcome {
    pub document: Document,
    pub error: Option<SyntaxError>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Discard the partial document on failure.
    pub fn into_result(self) -> crate::error::Result<Document> {
        match self.error {
            Some(err) => Err(CfgError::Syntax(err)),
            None => Ok(self.document),
        }
    }
}

/// Parse configuration text into a [`Document`].
///
/// Never fails outright: a syntax error is reported in
/// [`ParseOutcome::error`] together with the entries parsed before it.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_document(text: &str) -> ParseOutcome {
    let mut document = Document::new();
    let mut parser = Parser::new(text);
    let error = parser.parse_statements(&mut document).err();

    match &error {
        Some(err) => warn!(line = err.line, message = %err.message, "configuration text rejected"),
        None => debug!(sections = document.len(), "configuration text parsed"),
    }

    ParseOutcome { document, error }
}

/// Parse a single standalone value such as `Color(1, 0, 0, 1)` or `[1, 2]`.
/// Anything after the value other than whitespace or comments is an error.
pub fn parse_value_str(text: &str) -> ParseResult<Value> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    let trailing = parser.next()?;
    if trailing.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            trailing.line,
            format!("unexpected {} after value", trailing.kind),
        ));
    }
    Ok(value)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(text),
            peeked: None,
            depth: 0,
        }
    }

    fn next(&mut self) -> ParseResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> ParseResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn expect(&mut self, want: TokenKind, context: &str) -> ParseResult<Token> {
        let token = self.next()?;
        if token.kind != want {
            return Err(SyntaxError::new(
                token.line,
                format!("expected {} {}, found {}", want, context, token.kind),
            ));
        }
        Ok(token)
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn parse_statements(&mut self, document: &mut Document) -> ParseResult<()> {
        let mut current = String::new();

        loop {
            // Values never leave a lookahead token behind, so the raw
            // scanners below see the character stream directly.
            debug_assert!(self.peeked.is_none());

            let Some(c) = self.lexer.peek_significant() else {
                return Ok(());
            };
            let line = self.lexer.line();

            match c {
                '[' => {
                    self.lexer.bump();
                    let name = self.lexer.read_section_name()?;
                    if !document.has_section(&name) {
                        trace!(section = %name, line, "section opened");
                    }
                    document.ensure_section(&name);
                    current = name;
                }
                ']' => return Err(SyntaxError::new(line, "unmatched ']'")),
                '"' => {
                    self.lexer.bump();
                    let key = self.lexer.read_quoted(line)?;
                    self.parse_assignment(document, &current, key)?;
                }
                _ => {
                    let key = self.lexer.read_bare_key();
                    if key.is_empty() {
                        return Err(SyntaxError::new(
                            line,
                            format!("expected key, found '{}'", c),
                        ));
                    }
                    self.parse_assignment(document, &current, key)?;
                }
            }
        }
    }

    fn parse_assignment(
        &mut self,
        document: &mut Document,
        section: &str,
        key: String,
    ) -> ParseResult<()> {
        self.expect(TokenKind::Equals, &format!("after key '{}'", key))?;
        let value = self.parse_value()?;
        if document.set(section, &key, value).is_some() {
            debug!(section, key = %key, "duplicate key, keeping last value");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    fn parse_value(&mut self) -> ParseResult<Value> {
        let token = self.next()?;
        match token.kind {
            TokenKind::String(s) => Ok(Value::String(s)),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Boolean(b) => Ok(Value::Bool(b)),
            TokenKind::BracketOpen => self.nested(token.line, Self::parse_array),
            TokenKind::CurlyOpen => self.nested(token.line, Self::parse_dictionary),
            TokenKind::Identifier(name) => self.parse_identifier(&name, token.line),
            other => Err(SyntaxError::new(
                token.line,
                format!("unexpected {}, expected a value", other),
            )),
        }
    }

    fn parse_identifier(&mut self, name: &str, line: usize) -> ParseResult<Value> {
        match name {
            "null" => Ok(Value::Null),
            "Color" => {
                let args = self.parse_numeric_args(name, 4, line)?;
                Ok(Value::Color(Color::new(args[0], args[1], args[2], args[3])))
            }
            "Vector2" => {
                let args = self.parse_numeric_args(name, 2, line)?;
                Ok(Value::Vector2(Vector2::new(args[0], args[1])))
            }
            "PackedStringArray" | "PoolStringArray" | "StringArray" => self.parse_string_array(),
            "Object" => self.nested(line, Self::parse_class_object),
            other => match numeric_sentinel(other) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(SyntaxError::new(
                    line,
                    format!("unknown identifier '{}'", other),
                )),
            },
        }
    }

    /// Run a container rule one level deeper. `line` is where the container
    /// opens.
    fn nested(
        &mut self,
        line: usize,
        rule: fn(&mut Self) -> ParseResult<Value>,
    ) -> ParseResult<Value> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(
                line,
                format!("nesting too deep (limit {})", MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    /// Parse `item (, item)*` up to `closer`, which is consumed. The opening
    /// delimiter is already consumed. An immediate closer yields no items.
    fn parse_list<T>(
        &mut self,
        closer: TokenKind,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        if self.peek()?.kind == closer {
            self.next()?;
            return Ok(items);
        }

        loop {
            items.push(item(self)?);
            let token = self.next()?;
            if token.kind == closer {
                return Ok(items);
            }
            if token.kind != TokenKind::Comma {
                return Err(SyntaxError::new(
                    token.line,
                    format!("expected ',' or {}, found {}", closer, token.kind),
                ));
            }
            let after_comma = self.peek()?;
            if after_comma.kind == closer {
                return Err(SyntaxError::new(
                    after_comma.line,
                    format!("trailing comma before {}", closer),
                ));
            }
        }
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        let items = self.parse_list(TokenKind::BracketClose, |p| p.parse_value())?;
        Ok(Value::Array(items))
    }

    fn parse_dictionary(&mut self) -> ParseResult<Value> {
        let pairs = self.parse_list(TokenKind::CurlyClose, |p| p.parse_pair())?;
        Ok(Value::Dictionary(pairs.into_iter().collect::<Dictionary>()))
    }

    /// `"key": value`
    fn parse_pair(&mut self) -> ParseResult<(String, Value)> {
        let token = self.next()?;
        let key = match token.kind {
            TokenKind::String(key) => key,
            other => {
                return Err(SyntaxError::new(
                    token.line,
                    format!("expected string key, found {}", other),
                ))
            }
        };
        self.expect(TokenKind::Colon, &format!("after key \"{}\"", key))?;
        let value = self.parse_value()?;
        Ok((key, value))
    }

    fn parse_numeric_args(
        &mut self,
        constructor: &str,
        arity: usize,
        line: usize,
    ) -> ParseResult<Vec<f64>> {
        self.expect(TokenKind::ParenOpen, &format!("after {}", constructor))?;
        let args = self.parse_list(TokenKind::ParenClose, |p| p.parse_numeric_arg())?;
        if args.len() != arity {
            return Err(SyntaxError::new(
                line,
                format!(
                    "{} expects {} arguments, found {}",
                    constructor,
                    arity,
                    args.len()
                ),
            ));
        }
        Ok(args)
    }

    fn parse_numeric_arg(&mut self) -> ParseResult<f64> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::Number(n) => Ok(*n),
            TokenKind::Identifier(name) => numeric_sentinel(name).ok_or_else(|| {
                SyntaxError::new(token.line, format!("expected number, found {}", token.kind))
            }),
            other => Err(SyntaxError::new(
                token.line,
                format!("expected number, found {}", other),
            )),
        }
    }

    fn parse_string_array(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::ParenOpen, "after string array constructor")?;
        let items = self.parse_list(TokenKind::ParenClose, |p| {
            let token = p.next()?;
            match token.kind {
                TokenKind::String(s) => Ok(Value::String(s)),
                other => Err(SyntaxError::new(
                    token.line,
                    format!("expected string in string array, found {}", other),
                )),
            }
        })?;
        Ok(Value::Array(items))
    }

    /// `Object(ClassName)` or `Object(ClassName, "key": value, ...)`.
    fn parse_class_object(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::ParenOpen, "after Object")?;
        let token = self.next()?;
        let mut object = match token.kind {
            TokenKind::Identifier(class_name) => ClassObject::new(class_name),
            other => {
                return Err(SyntaxError::new(
                    token.line,
                    format!("expected class name, found {}", other),
                ))
            }
        };

        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::ParenClose => return Ok(Value::Object(object)),
                TokenKind::Comma => {
                    let after_comma = self.peek()?;
                    if after_comma.kind == TokenKind::ParenClose {
                        return Err(SyntaxError::new(
                            after_comma.line,
                            "trailing comma before ')'",
                        ));
                    }
                    let (key, value) = self.parse_pair()?;
                    object.properties.insert(key, value);
                }
                other => {
                    return Err(SyntaxError::new(
                        token.line,
                        format!("expected ',' or ')', found {}", other),
                    ))
                }
            }
        }
    }
}

fn numeric_sentinel(name: &str) -> Option<f64> {
    match name {
        "inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}
