use crate::ast::{BinaryExpr, BinaryOp, Block, Call, Expr, IfExpr, Literal, Primitive, Variable};
use crate::lexer::{TokenKind, unescape};
use crate::parser::{ParseResult, Parser};

impl Parser<'_> {
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_primary()?;
        self.parse_bin_op(0, lhs)
    }

    /// Precedence climbing. Folds operators binding at least as tightly as
    /// `min_precedence` into `lhs`, left to right; a tighter operator after
    /// the right operand pulls that operand into its own subtree first.
    pub fn parse_bin_op(&mut self, min_precedence: u8, mut lhs: Expr) -> ParseResult<Expr> {
        loop {
            let Some(op) = BinaryOp::from_token(self.current().kind) else {
                return Ok(lhs);
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                return Ok(lhs);
            }

            let op_token = self.advance();
            let mut rhs = self.parse_primary()?;

            if let Some(next) = BinaryOp::from_token(self.current().kind) {
                if next.precedence() > precedence {
                    rhs = self.parse_bin_op(precedence + 1, rhs)?;
                }
            }

            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                loc: op_token.loc,
            });
        }
    }

    pub fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current().kind {
            TokenKind::Identifier => {
                if self.peek_next().kind == TokenKind::OpenParen {
                    self.parse_call()
                } else {
                    let name = self.advance();
                    Ok(Expr::Variable(Variable {
                        name: name.text,
                        loc: name.loc,
                    }))
                }
            }
            TokenKind::OpenParen => self.parse_parentheses(),
            TokenKind::If => self.parse_if_expr(),
            kind if kind.is_literal() => self.parse_primitive(),
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    fn parse_parentheses(&mut self) -> ParseResult<Expr> {
        self.advance(); // '('
        let expr = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "expected closing parenthesis ')'")?;
        Ok(expr)
    }

    /// `callee(arg, ...)`; a ',' right before ')' is rejected.
    fn parse_call(&mut self) -> ParseResult<Expr> {
        let callee = self.advance();
        self.expect(TokenKind::OpenParen, "expected '(' after function callee")?;

        let mut args = vec![];
        if self.check(TokenKind::CloseParen) {
            self.advance();
        } else {
            loop {
                args.push(self.parse_expression()?);
                match self.current().kind {
                    TokenKind::Comma => {
                        self.advance();
                        if self.check(TokenKind::CloseParen) {
                            return Err(self.unexpected("expected an argument after ','"));
                        }
                    }
                    TokenKind::CloseParen => {
                        self.advance();
                        break;
                    }
                    _ => return Err(self.unexpected("expected ',' or ')' within function call")),
                }
            }
        }

        Ok(Expr::Call(Call {
            callee: callee.text,
            args,
            loc: callee.loc,
        }))
    }

    /// `if cond { .. } (else { .. } | else if ..)?`
    pub fn parse_if_expr(&mut self) -> ParseResult<Expr> {
        let if_token = self.advance();
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;

        let else_block = if self.check(TokenKind::Else) {
            self.advance();
            if self.check(TokenKind::If) {
                let nested = self.parse_if_expr()?;
                let loc = nested.loc();
                Some(Block {
                    statements: vec![],
                    value: Some(Box::new(nested)),
                    loc,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(Expr::If(IfExpr {
            condition: Box::new(condition),
            then_block,
            else_block,
            loc: if_token.loc,
        }))
    }

    fn parse_primitive(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let value = match token.kind {
            TokenKind::Int64Literal => token.text.parse().map(Literal::Int64).map_err(|_| {
                self.error(
                    format!("integer literal {} does not fit in int64", token.text),
                    token.loc,
                )
            })?,
            TokenKind::Uint64Literal => token
                .text
                .trim_end_matches('u')
                .parse()
                .map(Literal::Uint64)
                .map_err(|_| {
                    self.error(
                        format!("integer literal {} does not fit in uint64", token.text),
                        token.loc,
                    )
                })?,
            TokenKind::Float64Literal => token.text.parse().map(Literal::Float64).map_err(|_| {
                self.error(format!("invalid float literal {}", token.text), token.loc)
            })?,
            TokenKind::StringLiteral => Literal::String(unescape(&token.text)),
            _ => return Err(self.error("invalid token in expression", token.loc)),
        };

        Ok(Expr::Primitive(Primitive {
            value,
            loc: token.loc,
        }))
    }
}
