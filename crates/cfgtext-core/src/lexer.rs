//! Tokenizer for the configuration text format.
//!
//! The lexer walks a character cursor with exactly one character of pushback
//! and keeps a running 1-based line counter. Whitespace and comments (`;` or
//! `#` through end of line) are absorbed and never surface as tokens.
//!
//! Besides `next_token`, the lexer exposes two raw scanners used by the
//! document parser at statement position: section names inside `[...]`
//! (where `\]` is a literal bracket) and bare keys, which are read as a run of
//! characters rather than as identifiers so keys like `3d/size` or `a,b`
//! survive a round trip.
//!
//! # String termination
//!
//! A `"` only closes a string when the character after it is whitespace,
//! end-of-input, a comment start, or one of `= , : ) ] }`. Any other quote is
//! literal content. This keeps values such as `"say "hi"!"` readable without
//! escapes, at the cost of being unable to express a literal quote followed by
//! one of those characters without escaping it.

use crate::error::SyntaxError;
use std::fmt;
use std::str::Chars;

/// The kind of a token, carrying its literal where it has one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    String(String),
    Number(f64),
    Boolean(bool),
    Identifier(String),
    BracketOpen,
    BracketClose,
    ParenOpen,
    ParenClose,
    CurlyOpen,
    CurlyClose,
    Equals,
    Comma,
    Colon,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::String(s) => write!(f, "string \"{}\"", s),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Boolean(b) => write!(f, "boolean {}", b),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::BracketOpen => f.write_str("'['"),
            TokenKind::BracketClose => f.write_str("']'"),
            TokenKind::ParenOpen => f.write_str("'('"),
            TokenKind::ParenClose => f.write_str("')'"),
            TokenKind::CurlyOpen => f.write_str("'{'"),
            TokenKind::CurlyClose => f.write_str("'}'"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub struct Lexer<'a> {
    chars: Chars<'a>,
    saved: Option<char>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Lexer {
            chars: text.chars(),
            saved: None,
            line: 1,
        }
    }

    /// Current 1-based line of the cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    fn get_char(&mut self) -> Option<char> {
        let c = match self.saved.take() {
            Some(c) => Some(c),
            None => self.chars.next(),
        };
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn put_back(&mut self, c: char) {
        debug_assert!(self.saved.is_none(), "only one character of pushback");
        if c == '\n' {
            self.line -= 1;
        }
        self.saved = Some(c);
    }

    /// Consume whitespace and comments, returning the first significant
    /// character (consumed) or `None` at end of input.
    fn skip_trivia(&mut self) -> Option<char> {
        loop {
            match self.get_char()? {
                ' ' | '\t' | '\r' | '\n' => continue,
                ';' | '#' => self.skip_comment(),
                c => return Some(c),
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.get_char() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Skip trivia and report the next significant character without consuming it.
    pub fn peek_significant(&mut self) -> Option<char> {
        let c = self.skip_trivia()?;
        self.put_back(c);
        Some(c)
    }

    /// Consume one character that the caller already saw via `peek_significant`.
    pub(crate) fn bump(&mut self) {
        self.get_char();
    }

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let Some(c) = self.skip_trivia() else {
            return Ok(self.token(TokenKind::Eof));
        };
        let line = self.line;

        let kind = match c {
            '[' => TokenKind::BracketOpen,
            ']' => TokenKind::BracketClose,
            '(' => TokenKind::ParenOpen,
            ')' => TokenKind::ParenClose,
            '{' => TokenKind::CurlyOpen,
            '}' => TokenKind::CurlyClose,
            '=' => TokenKind::Equals,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '"' => TokenKind::String(self.read_quoted(line)?),
            '+' | '-' => match self.get_char() {
                Some(d) if d.is_ascii_digit() => {
                    self.put_back(d);
                    self.lex_number(c, line)?
                }
                // `-inf` and friends: the sign belongs to a symbolic identifier
                Some(d) if is_identifier_start(d) => {
                    self.put_back(d);
                    self.lex_identifier(c)
                }
                other => {
                    if let Some(d) = other {
                        self.put_back(d);
                    }
                    return Err(SyntaxError::new(
                        line,
                        format!("unexpected character '{}'", c),
                    ));
                }
            },
            c if c.is_ascii_digit() => self.lex_number(c, line)?,
            c if is_identifier_start(c) => self.lex_identifier(c),
            c => {
                return Err(SyntaxError::new(
                    line,
                    format!("unexpected character '{}'", c),
                ))
            }
        };

        Ok(Token { kind, line })
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            line: self.line,
        }
    }

    /// Body of a string literal; the opening quote is already consumed.
    pub(crate) fn read_quoted(&mut self, open_line: usize) -> Result<String, SyntaxError> {
        let unterminated = || SyntaxError::new(open_line, "unterminated string");
        let mut s = String::new();
        loop {
            match self.get_char().ok_or_else(unterminated)? {
                '\\' => {
                    let escaped = self.get_char().ok_or_else(unterminated)?;
                    s.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                '"' => match self.get_char() {
                    None => return Ok(s),
                    Some(next) if closes_string(next) => {
                        self.put_back(next);
                        return Ok(s);
                    }
                    Some(next) => {
                        s.push('"');
                        self.put_back(next);
                    }
                },
                c => s.push(c),
            }
        }
    }

    fn lex_number(&mut self, first: char, line: usize) -> Result<TokenKind, SyntaxError> {
        let mut text = String::from(first);
        let mut seen_dot = false;
        while let Some(c) = self.get_char() {
            if c.is_ascii_digit() {
                text.push(c);
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                text.push(c);
            } else {
                self.put_back(c);
                break;
            }
        }
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| SyntaxError::new(line, format!("malformed number '{}'", text)))
    }

    fn lex_identifier(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(c) = self.get_char() {
            if is_identifier_continue(c) {
                text.push(c);
            } else {
                self.put_back(c);
                break;
            }
        }
        match text.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            _ => TokenKind::Identifier(text),
        }
    }

    /// Read a section name up to the first unescaped `]`. The opening `[` is
    /// already consumed. `\]` and `\\` yield `]` and `\`; any other backslash
    /// is kept as written.
    pub fn read_section_name(&mut self) -> Result<String, SyntaxError> {
        let line = self.line;
        let unterminated = || SyntaxError::new(line, "unterminated section header");
        let mut name = String::new();
        loop {
            match self.get_char() {
                None | Some('\n') => return Err(unterminated()),
                Some(']') => return Ok(name),
                Some('\\') => match self.get_char() {
                    Some(']') => name.push(']'),
                    Some('\\') => name.push('\\'),
                    Some(c) => {
                        name.push('\\');
                        self.put_back(c);
                    }
                    None => return Err(unterminated()),
                },
                Some(c) => name.push(c),
            }
        }
    }

    /// Read an unquoted key: every character up to whitespace, `=`, `"`, `;`,
    /// `[`, `]` or end of input. May return an empty string.
    pub fn read_bare_key(&mut self) -> String {
        let mut key = String::new();
        while let Some(c) = self.get_char() {
            if ends_bare_key(c) {
                self.put_back(c);
                break;
            }
            key.push(c);
        }
        key
    }
}

/// Tokenize the whole input, including the trailing `Eof` token.
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '/'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-')
}

fn closes_string(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | ';' | '#' | '=' | ',' | ':' | ')' | ']' | '}'
    )
}

fn ends_bare_key(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '=' | '"' | ';' | '[' | ']')
}
