//! Thorn lexer
//!
//! Flat finite-state scanner producing the token contract the parser
//! builds on. Never fails: a byte sequence it cannot classify becomes
//! a [`Token::Illegal`] rather than aborting the scan, so `tokenize`
//! always yields a token stream ending in [`Token::Eof`].

use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Identifiers longer than this are truncated at lex time (§6).
pub const MAX_IDENT_LENGTH: usize = 32;

/// Token kinds, per the token contract.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("let")]
    Let,
    #[token("return")]
    Return,
    #[token("fn")]
    Function,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z_0-9]*", |lex| truncate_ident(lex.slice()))]
    Ident(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    String(String),

    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    /// A byte (or byte run) the scanner could not classify.
    Illegal,

    /// Synthetic end-of-input marker. `tokenize` appends exactly one;
    /// callers that walk past it should treat it as repeating forever.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Let => write!(f, "let"),
            Token::Return => write!(f, "return"),
            Token::Function => write!(f, "fn"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Int(n) => write!(f, "{n}"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Assign => write!(f, "="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Bang => write!(f, "!"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Eq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Illegal => write!(f, "ILLEGAL"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

fn truncate_ident(s: &str) -> String {
    if s.len() <= MAX_IDENT_LENGTH {
        s.to_string()
    } else {
        // Truncate on a char boundary at or before the byte cap.
        let mut end = MAX_IDENT_LENGTH;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

/// A token tagged with the byte range of source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
}

/// Scan `source` to completion, always returning a token stream whose
/// last element is [`Token::Eof`].
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    let mut out = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.unwrap_or(Token::Illegal);
        out.push(SpannedToken { token, span });
    }

    let eof_at = source.len();
    out.push(SpannedToken {
        token: Token::Eof,
        span: eof_at..eof_at,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keywords_and_punctuation() {
        let src = "let five = 5;";
        let tokens: Vec<_> = tokenize(src).into_iter().map(|t| t.token).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Let,
                Token::Ident("five".into()),
                Token::Assign,
                Token::Int(5),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn operators() {
        let src = "!-/*5; 5 < 10 > 5; 10 == 10; 10 != 9;";
        let tokens: Vec<_> = tokenize(src).into_iter().map(|t| t.token).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Bang,
                Token::Minus,
                Token::Slash,
                Token::Asterisk,
                Token::Int(5),
                Token::Semicolon,
                Token::Int(5),
                Token::Lt,
                Token::Int(10),
                Token::Gt,
                Token::Int(5),
                Token::Semicolon,
                Token::Int(10),
                Token::Eq,
                Token::Int(10),
                Token::Semicolon,
                Token::Int(10),
                Token::NotEq,
                Token::Int(9),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn function_and_call() {
        let src = "let add = fn(x, y) { x + y; }; add(1, 2);";
        let tokens: Vec<_> = tokenize(src).into_iter().map(|t| t.token).collect();
        assert!(tokens.contains(&Token::Function));
        assert!(tokens.contains(&Token::LBrace));
        assert!(tokens.contains(&Token::RBrace));
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn string_literal() {
        let tokens = tokenize(r#""foo bar""#);
        assert_eq!(tokens[0].token, Token::String("foo bar".to_string()));
    }

    #[test]
    fn arrays_and_index() {
        let tokens: Vec<_> = tokenize("[1, 2][0]").into_iter().map(|t| t.token).collect();
        assert_eq!(
            tokens,
            vec![
                Token::LBracket,
                Token::Int(1),
                Token::Comma,
                Token::Int(2),
                Token::RBracket,
                Token::LBracket,
                Token::Int(0),
                Token::RBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn illegal_byte_does_not_abort_scan() {
        let tokens = tokenize("let x = 5 @ 3;");
        assert!(tokens.iter().any(|t| t.token == Token::Illegal));
        assert_eq!(tokens.last().unwrap().token, Token::Eof);
    }

    #[test]
    fn identifiers_truncate_at_32_bytes() {
        let long = "a".repeat(40);
        let tokens = tokenize(&long);
        match &tokens[0].token {
            Token::Ident(s) => assert_eq!(s.len(), MAX_IDENT_LENGTH),
            other => panic!("expected ident, got {other:?}"),
        }
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(s in ".{0,200}") {
            let _ = tokenize(&s);
        }
    }
}
