mod token;


pub use token::{SourceLocation, Token, TokenKind};

use logos::Logos;
use tracing::{debug, trace};

use std::ops::Range;

use crate::diagnostics::{Diagnostic, Stage};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Ignore this regex pattern between tokens
#[logos(skip r"//[^\n]*")] // Line comments
enum Lexeme {
    // Keywords are sorted out of identifiers afterwards, see `TokenKind::keyword`
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Int64,

    #[regex(r"[0-9]+u")]
    Uint64,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float64,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("%")]
    Mod,

    #[token("**")]
    Pow,

    #[token("&")]
    BitwiseAnd,

    #[token("|")]
    BitwiseOr,

    #[token("~")]
    BitwiseNot,

    #[token("=")]
    Assign,

    #[token(">")]
    GreaterThan,

    #[token("<")]
    LessThan,

    #[token(">=")]
    GreaterEqual,

    #[token("<=")]
    LessEqual,

    #[token("==")]
    Equal,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("->")]
    Arrow,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,
}

impl Lexeme {
    fn kind(self, text: &str) -> TokenKind {
        match self {
            Lexeme::Identifier => TokenKind::keyword(text).unwrap_or(TokenKind::Identifier),
            Lexeme::Int64 => TokenKind::Int64Literal,
            Lexeme::Uint64 => TokenKind::Uint64Literal,
            Lexeme::Float64 => TokenKind::Float64Literal,
            Lexeme::String => TokenKind::StringLiteral,
            Lexeme::Add => TokenKind::Add,
            Lexeme::Sub => TokenKind::Sub,
            Lexeme::Mul => TokenKind::Mul,
            Lexeme::Div => TokenKind::Div,
            Lexeme::Mod => TokenKind::Mod,
            Lexeme::Pow => TokenKind::Pow,
            Lexeme::BitwiseAnd => TokenKind::BitwiseAnd,
            Lexeme::BitwiseOr => TokenKind::BitwiseOr,
            Lexeme::BitwiseNot => TokenKind::BitwiseNot,
            Lexeme::Assign => TokenKind::Assign,
            Lexeme::GreaterThan => TokenKind::GreaterThan,
            Lexeme::LessThan => TokenKind::LessThan,
            Lexeme::GreaterEqual => TokenKind::GreaterEqual,
            Lexeme::LessEqual => TokenKind::LessEqual,
            Lexeme::Equal => TokenKind::Equal,
            Lexeme::OpenParen => TokenKind::OpenParen,
            Lexeme::CloseParen => TokenKind::CloseParen,
            Lexeme::OpenBracket => TokenKind::OpenBracket,
            Lexeme::CloseBracket => TokenKind::CloseBracket,
            Lexeme::OpenBrace => TokenKind::OpenBrace,
            Lexeme::CloseBrace => TokenKind::CloseBrace,
            Lexeme::Arrow => TokenKind::Arrow,
            Lexeme::Dot => TokenKind::Dot,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Colon => TokenKind::Colon,
            Lexeme::Semicolon => TokenKind::Semicolon,
        }
    }
}

/// Byte offsets of line starts, to turn logos spans into line/column pairs.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex {
            source,
            line_starts,
        }
    }

    fn locate(&self, span: Range<usize>) -> SourceLocation {
        let line = self.line_starts.partition_point(|&start| start <= span.start);
        let line_start = self.line_starts[line - 1];
        SourceLocation {
            line,
            column: self.source[line_start..span.start].chars().count() + 1,
            length: self.source[span].chars().count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LexOutput {
    /// Always ends with exactly one `TokenKind::Eof`.
    pub tokens: Vec<Token>,
    /// The raw source lines, for diagnostic text only.
    pub lines: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn source_lines(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}

pub fn lex(source: &str) -> LexOutput {
    let lines = source_lines(source);
    let index = LineIndex::new(source);
    let mut tokens = vec![];
    let mut diagnostics = vec![];

    for (lexeme, span) in Lexeme::lexer(source).spanned() {
        let text = &source[span.clone()];
        let loc = index.locate(span);
        match lexeme {
            Ok(lexeme) => tokens.push(Token {
                kind: lexeme.kind(text),
                text: text.to_string(),
                loc,
            }),
            Err(()) => {
                trace!(text, %loc, "invalid character sequence");
                let message = if text.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unrecognized character sequence '{}'", text.escape_debug())
                };
                diagnostics.push(Diagnostic::new(Stage::Lex, message, loc, &lines));
                tokens.push(Token {
                    kind: TokenKind::Invalid,
                    text: text.to_string(),
                    loc,
                });
            }
        }
    }

    let mut eof_loc = index.locate(source.len()..source.len());
    eof_loc.length = 0;
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        loc: eof_loc,
    });

    debug!(
        tokens = tokens.len(),
        errors = diagnostics.len(),
        "lexed source"
    );

    LexOutput {
        tokens,
        lines,
        diagnostics,
    }
}

/// Resolves the escapes of a string literal's text, quotes included.
pub fn unescape(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}
