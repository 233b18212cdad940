pub mod expression;
pub mod function;
pub mod statement;


use tracing::{debug, trace};

use crate::ast::{Expr, Stmt};
use crate::diagnostics::{Diagnostic, Stage};
use crate::lexer::{SourceLocation, Token, TokenKind};
use crate::types::Context;

/// A local syntax error on its way up to the statement loop, which records
/// it and resynchronizes.
pub type ParseResult<T> = Result<T, Diagnostic>;

/// What a single step of a statement loop produced.
#[derive(Debug)]
enum Parsed {
    Stmt(Stmt),
    /// A final expression of a block, directly followed by `}`.
    Value(Expr),
}

#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub statements: Vec<Stmt>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    cursor: usize,
    lines: &'a [String],
    context: &'a Context,
    errors: Vec<Diagnostic>,
    block_depth: usize,
}

pub fn parse(tokens: &[Token], lines: &[String], context: &Context) -> ParseOutput {
    let mut parser = Parser::new(tokens, lines, context);
    let statements = parser.parse_program();
    debug!(
        statements = statements.len(),
        errors = parser.errors.len(),
        "parsed token stream"
    );
    ParseOutput {
        statements,
        diagnostics: parser.errors,
    }
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &[Token], lines: &'a [String], context: &'a Context) -> Self {
        // Invalid tokens were already reported by the lexer.
        let mut tokens: Vec<Token> = tokens
            .iter()
            .filter(|token| token.kind != TokenKind::Invalid)
            .cloned()
            .collect();
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let loc = tokens.last().map(|token| token.loc).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                loc,
            });
        }
        Parser {
            tokens,
            cursor: 0,
            lines,
            context,
            errors: vec![],
            block_depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut tree = vec![];
        while !self.at_end() {
            if let Some(Parsed::Stmt(stmt)) = self.parse_statement() {
                tree.push(stmt);
            }
        }
        tree
    }

    /// Parses one statement, recovering from a syntax error by recording it
    /// and skipping to the next statement boundary.
    fn parse_statement(&mut self) -> Option<Parsed> {
        let start = self.cursor;
        match self.parse_statement_inner() {
            Ok(parsed) => Some(parsed),
            Err(diagnostic) => {
                trace!(%diagnostic, "statement failed to parse");
                self.errors.push(diagnostic);
                self.synchronize(start);
                None
            }
        }
    }

    /// Discards tokens until just past a `;`, or up to the start of a new
    /// declaration, the `}` closing the current block, or end of input.
    fn synchronize(&mut self, start: usize) {
        if self.cursor == start {
            self.advance();
        }
        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }
            match self.current().kind {
                TokenKind::Let | TokenKind::Func | TokenKind::Omg => break,
                TokenKind::CloseBrace if self.block_depth > 0 => break,
                _ => {}
            }
            self.advance();
        }
        trace!(at = %self.current().loc, "synchronized");
    }

    fn current(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.cursor + 1).min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.cursor.saturating_sub(1).min(self.tokens.len() - 1)]
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consumes the current token. Never moves past `Eof`.
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(message))
        }
    }

    fn error(&self, message: impl Into<String>, loc: SourceLocation) -> Diagnostic {
        Diagnostic::new(Stage::Parse, message, loc, self.lines)
    }

    /// `"<message>, found <current token>"` anchored at the current token.
    fn unexpected(&self, message: &str) -> Diagnostic {
        let token = self.current();
        self.error(format!("{message}, found {}", token.describe()), token.loc)
    }
}
