//! Thorn parser
//!
//! Recursive-descent Pratt parser: token stream → AST. Never aborts on
//! malformed input — it accumulates up to [`MAX_PARSE_ERRORS`] error
//! strings and resynchronizes to the next statement boundary.

mod expr;
mod stmt;

use thiserror::Error;
use thorn_ast::Program;
use thorn_lexer::{tokenize, SpannedToken, Token};

/// Parser never records more than this many errors before giving up
/// on the remainder of the input.
pub const MAX_PARSE_ERRORS: usize = 8;

/// Operator-precedence ladder, lowest to highest (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn token_precedence(token: &Token) -> Precedence {
    match token {
        Token::Eq | Token::NotEq => Precedence::Equals,
        Token::Lt | Token::Gt => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Asterisk | Token::Slash => Precedence::Product,
        Token::LParen => Precedence::Call,
        Token::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// A single parse failure. `Display` renders the exact wording the
/// observable error-message contract (§6) specifies.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no prefix parse function found for {0}")]
    NoPrefixParseFn(String),
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: String, found: String },
}

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent Pratt parser over a token stream.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the whole token stream into a [`Program`], collecting
    /// error strings instead of aborting on the first malformed
    /// statement (§4.1).
    pub fn parse_program(mut self) -> (Program, Vec<String>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.errors.len() >= MAX_PARSE_ERRORS {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        let messages = self.errors.iter().map(|e| e.to_string()).collect();
        (Program::new(statements), messages)
    }

    /// Skip tokens until the next statement boundary (a `;` consumed,
    /// or `EOF`), per §4.1's resynchronization rule.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.check(&Token::Semicolon) {
                self.advance();
                return;
            }
            self.advance();
        }
    }

    // === Token stream helpers ===

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].token
    }

    pub(crate) fn peek_token(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].token
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    pub(crate) fn expect(&mut self, expected: &Token) -> ParseResult<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current().to_string(),
            })
        }
    }

    /// Consume a trailing `;` if present; it's always optional (§4.1).
    pub(crate) fn consume_optional_semicolon(&mut self) {
        if self.check(&Token::Semicolon) {
            self.advance();
        }
    }

    pub(crate) fn current_span(&self) -> thorn_ast::Span {
        let s = &self.tokens[self.pos.min(self.tokens.len() - 1)].span;
        thorn_ast::Span::new(s.start, s.end)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        token_precedence(self.peek_token())
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }
}

/// Tokenize and parse `source` in one step, matching the public
/// contract in §4.1: `parse_program(tokens) → (Program, errors)`.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let tokens = tokenize(source);
    Parser::new(tokens).parse_program()
}
