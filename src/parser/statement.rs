use crate::ast::{Block, Expr, ExprStmt, Omg, Stmt, VarDeclare};
use crate::lexer::{SourceLocation, TokenKind};
use crate::parser::{ParseResult, Parsed, Parser};
use crate::types::Type;

impl Parser<'_> {
    pub(super) fn parse_statement_inner(&mut self) -> ParseResult<Parsed> {
        let (kind, loc) = (self.current().kind, self.current().loc);
        match kind {
            TokenKind::Let => self.parse_var_declaration().map(Parsed::Stmt),
            TokenKind::Func => self.parse_function().map(Parsed::Stmt),
            TokenKind::Omg => self.parse_omg().map(Parsed::Stmt),
            TokenKind::OpenBrace => self.parse_block().map(|block| Parsed::Stmt(Stmt::Block(block))),
            TokenKind::Return => Err(self
                .error("'return' statements are not supported", loc)
                .with_note("the trailing expression of a function body, written without ';', is its return value")),
            TokenKind::Else => Err(self.error("'else' without a preceding 'if'", loc)),
            _ => self.parse_expression_statement(),
        }
    }

    /// `{ stmt* value? }`. Statements inside recover on their own, so one bad
    /// statement does not lose the rest of the block.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(TokenKind::OpenBrace, "expected '{' to start a block")?;
        self.block_depth += 1;
        let block = self.parse_block_contents(open.loc);
        self.block_depth -= 1;
        block
    }

    fn parse_block_contents(&mut self, loc: SourceLocation) -> ParseResult<Block> {
        let mut statements = vec![];
        let mut value = None;

        while !self.check(TokenKind::CloseBrace) {
            if self.at_end() {
                return Err(self
                    .unexpected("expected '}' to close the block")
                    .with_note(format!("the block was opened at line {}, column {}", loc.line, loc.column)));
            }
            match self.parse_statement() {
                Some(Parsed::Stmt(stmt)) => statements.push(stmt),
                Some(Parsed::Value(expr)) => value = Some(Box::new(expr)),
                None => {}
            }
        }
        self.advance(); // '}'

        Ok(Block {
            statements,
            value,
            loc,
        })
    }

    /// `let name (: type)? (= expr)? ;`
    pub fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // 'let'
        let name = self.expect(TokenKind::Identifier, "expected a variable name after 'let'")?;

        let (ty, type_loc) = if self.check(TokenKind::Colon) {
            self.advance();
            let type_name = self.expect(TokenKind::Identifier, "expected a type name after ':'")?;
            (self.context.get_type(&type_name.text), Some(type_name.loc))
        } else {
            (Type::None, None)
        };

        let init = if self.check(TokenKind::Assign) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;

        Ok(Stmt::VarDeclare(VarDeclare {
            name: name.text,
            ty,
            type_loc,
            init,
            loc: name.loc,
        }))
    }

    /// `__omg expr ;`
    pub fn parse_omg(&mut self) -> ParseResult<Stmt> {
        let omg = self.advance();
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after traced expression")?;
        Ok(Stmt::Omg(Omg { expr, loc: omg.loc }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Parsed> {
        let expr = self.parse_expression()?;
        let loc = expr.loc();

        if self.check(TokenKind::Semicolon) {
            self.advance();
            return Ok(Parsed::Stmt(Stmt::Expr(ExprStmt { expr, loc })));
        }
        if self.block_depth > 0 && self.check(TokenKind::CloseBrace) {
            return Ok(Parsed::Value(expr));
        }
        // `if` ends in a block, so it reads fine without a ';'
        if matches!(expr, Expr::If(_)) {
            return Ok(Parsed::Stmt(Stmt::Expr(ExprStmt { expr, loc })));
        }

        Err(self.unexpected("expected ';' after expression"))
    }
}
