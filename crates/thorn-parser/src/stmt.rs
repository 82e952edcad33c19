//! Statement parsing.

use thorn_ast::{Block, Spanned, Stmt};
use thorn_lexer::Token;

use crate::{ParseResult, Parser, Precedence};

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        match self.current() {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.current_span();
        self.advance(); // `let`

        let name = match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                name
            }
            other => {
                return Err(crate::ParseError::UnexpectedToken {
                    expected: "IDENT".to_string(),
                    found: other.to_string(),
                })
            }
        };

        self.expect(&Token::Assign)?;
        let value = self.parse_expression(Precedence::Lowest)?;
        let end = value.span;
        self.consume_optional_semicolon();

        Ok(Spanned::new(Stmt::Let { name, value }, start.merge(end)))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.current_span();
        self.advance(); // `return`
        let value = self.parse_expression(Precedence::Lowest)?;
        let end = value.span;
        self.consume_optional_semicolon();
        Ok(Spanned::new(Stmt::Return { value }, start.merge(end)))
    }

    fn parse_expr_statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        let value = self.parse_expression(Precedence::Lowest)?;
        let span = value.span;
        self.consume_optional_semicolon();
        Ok(Spanned::new(Stmt::Expr(value), span))
    }

    /// Parse statements until `}` or `EOF`.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();

        while !self.check(&Token::RBrace) && !self.check(&Token::Eof) {
            stmts.push(self.parse_statement()?);
        }

        self.expect(&Token::RBrace)?;
        Ok(stmts)
    }
}
