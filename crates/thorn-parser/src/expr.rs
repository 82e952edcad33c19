//! Pratt expression parsing.

use thorn_ast::{Expr, InfixOp, PrefixOp, Spanned};
use thorn_lexer::Token;

use crate::{ParseError, ParseResult, Parser, Precedence};

impl Parser {
    /// `parse_expression(prec)`: dispatch to a prefix parser, then loop
    /// while the next token binds tighter than `prec` (§4.1).
    pub(crate) fn parse_expression(&mut self, prec: Precedence) -> ParseResult<Spanned<Expr>> {
        let mut left = self.parse_prefix()?;

        while !self.check(&Token::Semicolon) && prec < self.peek_precedence() {
            self.advance();
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Spanned<Expr>> {
        let span = self.current_span();
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(Spanned::new(Expr::Ident(name), span))
            }
            Token::Int(n) => {
                self.advance();
                Ok(Spanned::new(Expr::Int(n), span))
            }
            Token::String(s) => {
                self.advance();
                Ok(Spanned::new(Expr::String(s), span))
            }
            Token::True => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), span))
            }
            Token::False => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), span))
            }
            Token::Bang => self.parse_prefix_expr(PrefixOp::Not),
            Token::Minus => self.parse_prefix_expr(PrefixOp::Minus),
            Token::LParen => self.parse_grouped(),
            Token::LBracket => self.parse_array(),
            Token::If => self.parse_if(),
            Token::Function => self.parse_function(),
            other => Err(ParseError::NoPrefixParseFn(other.to_string())),
        }
    }

    fn parse_infix(&mut self, left: Spanned<Expr>) -> ParseResult<Spanned<Expr>> {
        match self.current().clone() {
            Token::Plus => self.parse_infix_expr(InfixOp::Add, left),
            Token::Minus => self.parse_infix_expr(InfixOp::Sub, left),
            Token::Asterisk => self.parse_infix_expr(InfixOp::Mul, left),
            Token::Slash => self.parse_infix_expr(InfixOp::Div, left),
            Token::Lt => self.parse_infix_expr(InfixOp::Lt, left),
            Token::Gt => self.parse_infix_expr(InfixOp::Gt, left),
            Token::Eq => self.parse_infix_expr(InfixOp::Eq, left),
            Token::NotEq => self.parse_infix_expr(InfixOp::NotEq, left),
            Token::LParen => self.parse_call(left),
            Token::LBracket => self.parse_index(left),
            other => Err(ParseError::NoPrefixParseFn(other.to_string())),
        }
    }

    fn parse_prefix_expr(&mut self, op: PrefixOp) -> ParseResult<Spanned<Expr>> {
        let start = self.current_span();
        self.advance(); // operator token
        let right = self.parse_expression(Precedence::Prefix)?;
        let span = start.merge(right.span);
        Ok(Spanned::new(
            Expr::Prefix {
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_infix_expr(&mut self, op: InfixOp, left: Spanned<Expr>) -> ParseResult<Spanned<Expr>> {
        let prec = crate::token_precedence(self.current());
        self.advance(); // operator token
        let right = self.parse_expression(prec)?;
        let span = left.span.merge(right.span);
        Ok(Spanned::new(
            Expr::Infix {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_grouped(&mut self) -> ParseResult<Spanned<Expr>> {
        self.advance(); // `(`
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect(&Token::RParen)?;
        Ok(expr)
    }

    fn parse_array(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.current_span();
        self.advance(); // `[`
        let elements = self.parse_expression_list(&Token::RBracket)?;
        let end = self.current_span();
        self.expect(&Token::RBracket)?;
        Ok(Spanned::new(Expr::Array { elements }, start.merge(end)))
    }

    fn parse_index(&mut self, left: Spanned<Expr>) -> ParseResult<Spanned<Expr>> {
        self.advance(); // `[`
        let index = self.parse_expression(Precedence::Lowest)?;
        let end = self.current_span();
        self.expect(&Token::RBracket)?;
        let span = left.span.merge(end);
        Ok(Spanned::new(
            Expr::Index {
                left: Box::new(left),
                index: Box::new(index),
            },
            span,
        ))
    }

    fn parse_if(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.current_span();
        self.advance(); // `if`
        self.expect(&Token::LParen)?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(&Token::RParen)?;
        let consequence = self.parse_block()?;

        let alternative = if self.check(&Token::Else) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = self.current_span();
        Ok(Spanned::new(
            Expr::If {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
            start.merge(end),
        ))
    }

    fn parse_function(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.current_span();
        self.advance(); // `fn`
        self.expect(&Token::LParen)?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        let end = self.current_span();
        Ok(Spanned::new(Expr::Function { params, body }, start.merge(end)))
    }

    fn parse_param_list(&mut self) -> ParseResult<Vec<Spanned<String>>> {
        let mut params = Vec::new();

        if self.check(&Token::RParen) {
            self.advance();
            return Ok(params);
        }

        loop {
            let span = self.current_span();
            match self.current().clone() {
                Token::Ident(name) => {
                    self.advance();
                    params.push(Spanned::new(name, span));
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "IDENT".to_string(),
                        found: other.to_string(),
                    })
                }
            }

            if self.check(&Token::Comma) {
                self.advance();
                continue;
            }
            break;
        }

        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_call(&mut self, callee: Spanned<Expr>) -> ParseResult<Spanned<Expr>> {
        self.advance(); // `(`
        let args = self.parse_expression_list(&Token::RParen)?;
        let end = self.current_span();
        self.expect(&Token::RParen)?;
        let span = callee.span.merge(end);
        Ok(Spanned::new(
            Expr::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    fn parse_expression_list(&mut self, terminator: &Token) -> ParseResult<Vec<Spanned<Expr>>> {
        let mut list = Vec::new();

        if self.check(terminator) {
            return Ok(list);
        }

        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.check(&Token::Comma) {
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        Ok(list)
    }
}
