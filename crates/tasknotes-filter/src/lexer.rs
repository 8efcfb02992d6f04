//! Lexer (tokenizer) for filter expressions.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::ast::Conjunction;
use super::error::{FilterError, FilterResult};

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// The `:` separating property, operator and value.
    Colon,

    /// A bare word such as `status`, `file.ctime` or `does-not-contain`.
    Identifier(String),

    /// The unescaped content of a quoted string.
    String(String),

    /// `AND` or `OR`, in any case.
    Logical(Conjunction),
}

impl FilterToken {
    /// Returns the text of the token (normalized for logical connectives).
    pub fn text(&self) -> &str {
        match self {
            FilterToken::OpenParen => "(",
            FilterToken::CloseParen => ")",
            FilterToken::Colon => ":",
            FilterToken::Identifier(s) | FilterToken::String(s) => s.as_str(),
            FilterToken::Logical(c) => c.as_str(),
        }
    }
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterToken::String(s) => write!(f, "\"{s}\""),
            other => f.write_str(other.text()),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Returns true for characters allowed in identifiers.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.next_char();
        }
    }

    /// Reads a maximal run of identifier characters.
    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|c| is_identifier_char(*c)) {
            ident.push(c);
            self.next_char();
        }
        ident
    }

    /// Reads a quoted string; the opening quote is at `start`.
    fn read_quoted_string(&mut self, quote_char: char, start: usize) -> FilterResult<String> {
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote_char => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                },
                Some(c) => result.push(c),
                None => break,
            }
        }
        Err(FilterError::UnterminatedString { position: start })
    }

    /// Returns the next token with its position, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnterminatedString` or
    /// `FilterError::UnexpectedCharacter` on malformed input.
    pub fn next_token(&mut self) -> FilterResult<Option<PositionedToken>> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match c {
            '(' => {
                self.next_char();
                FilterToken::OpenParen
            }
            ')' => {
                self.next_char();
                FilterToken::CloseParen
            }
            ':' => {
                self.next_char();
                FilterToken::Colon
            }
            '"' | '\'' => FilterToken::String(self.read_quoted_string(c, position)?),
            _ if is_identifier_char(c) => {
                let ident = self.read_identifier();
                if ident.eq_ignore_ascii_case("and") {
                    FilterToken::Logical(Conjunction::And)
                } else if ident.eq_ignore_ascii_case("or") {
                    FilterToken::Logical(Conjunction::Or)
                } else {
                    FilterToken::Identifier(ident)
                }
            }
            _ => {
                return Err(FilterError::UnexpectedCharacter {
                    character: c,
                    position,
                })
            }
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens with their positions.
    ///
    /// # Errors
    ///
    /// Returns the first lexical error encountered.
    pub fn tokenize(mut self) -> FilterResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token()? {
            tokens.push(positioned_token);
        }
        Ok(tokens)
    }
}

/// Tokenizes an expression, discarding positions.
///
/// # Errors
///
/// Returns the first lexical error encountered.
pub fn tokenize(expression: &str) -> FilterResult<Vec<FilterToken>> {
    Ok(Lexer::new(expression)
        .tokenize()?
        .into_iter()
        .map(|pt| pt.token)
        .collect())
}
