use std::fmt;

/// Position of a token or node in the source, for diagnostics.
///
/// `line` and `column` are 1-based; `column` and `length` count characters,
/// not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,

    // literals
    Int64Literal,
    Uint64Literal,
    Float64Literal,
    StringLiteral,

    // operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitwiseAnd,
    BitwiseOr,
    BitwiseNot,
    Assign,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,

    // symbols
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Arrow,
    Dot,
    Comma,
    Colon,
    Semicolon,

    // keywords
    Func,
    Let,
    Omg,
    Return,
    If,
    Else,

    Eof,
    Invalid,
}

const KEYWORDS: [(&str, TokenKind); 6] = [
    ("func", TokenKind::Func),
    ("let", TokenKind::Let),
    ("__omg", TokenKind::Omg),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
];

impl TokenKind {
    /// Keyword for an identifier spelling, if it is one.
    pub fn keyword(identifier: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == identifier)
            .map(|(_, kind)| *kind)
    }

    /// Fixed spelling of operators, symbols and keywords.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        let spelling = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "**",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseNot => "~",
            Assign => "=",
            GreaterThan => ">",
            LessThan => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            Equal => "==",
            OpenParen => "(",
            CloseParen => ")",
            OpenBracket => "[",
            CloseBracket => "]",
            OpenBrace => "{",
            CloseBrace => "}",
            Arrow => "->",
            Dot => ".",
            Comma => ",",
            Colon => ":",
            Semicolon => ";",
            Func => "func",
            Let => "let",
            Omg => "__omg",
            Return => "return",
            If => "if",
            Else => "else",
            Identifier | Int64Literal | Uint64Literal | Float64Literal | StringLiteral | Eof
            | Invalid => return None,
        };
        Some(spelling)
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int64Literal
                | TokenKind::Uint64Literal
                | TokenKind::Float64Literal
                | TokenKind::StringLiteral
        )
    }

    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Add | Sub
                | Mul
                | Div
                | Mod
                | Pow
                | BitwiseAnd
                | BitwiseOr
                | BitwiseNot
                | Assign
                | GreaterThan
                | LessThan
                | GreaterEqual
                | LessEqual
                | Equal
        )
    }

    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier => "Identifier",
            Int64Literal => "Int64",
            Uint64Literal => "Uint64",
            Float64Literal => "Float64",
            StringLiteral => "String",
            Add => "Add",
            Sub => "Subtract",
            Mul => "Multiply",
            Div => "Divide",
            Mod => "Modulo",
            Pow => "Power",
            BitwiseAnd => "BitwiseAnd",
            BitwiseOr => "BitwiseOr",
            BitwiseNot => "BitwiseNot",
            Assign => "Assign",
            GreaterThan => "GreaterThan",
            LessThan => "LessThan",
            GreaterEqual => "GreaterEqual",
            LessEqual => "LessEqual",
            Equal => "Equal",
            OpenParen => "OpenParentheses",
            CloseParen => "CloseParentheses",
            OpenBracket => "OpenBrackets",
            CloseBracket => "CloseBrackets",
            OpenBrace => "OpenBraces",
            CloseBrace => "CloseBraces",
            Arrow => "Arrow",
            Dot => "Dot",
            Comma => "Comma",
            Colon => "Colon",
            Semicolon => "Semicolon",
            Func => "Func",
            Let => "Let",
            Omg => "Omg",
            Return => "Return",
            If => "If",
            Else => "Else",
            Eof => "EndOfFile",
            Invalid => "Invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub loc: SourceLocation,
}

impl Token {
    /// How the token is referred to in diagnostics, e.g. `identifier 'x'`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            kind if kind.is_literal() => format!("literal {}", self.text),
            kind if kind.is_keyword() => format!("keyword '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "{}", self.kind.name()),
            kind if kind.spelling().is_some() => write!(f, "{}", kind.name()),
            kind => write!(f, "{}({})", kind.name(), self.text),
        }
    }
}
