pub mod display;
pub mod resolved;

use crate::lexer::{SourceLocation, TokenKind};
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Operators the expression parser knows how to combine. Comparison and
    /// bitwise operators are lexed but have no precedence, so they end an
    /// expression.
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Add => Some(BinaryOp::Add),
            TokenKind::Sub => Some(BinaryOp::Sub),
            TokenKind::Mul => Some(BinaryOp::Mul),
            TokenKind::Div => Some(BinaryOp::Div),
            TokenKind::Mod => Some(BinaryOp::Mod),
            TokenKind::Pow => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 2,
            BinaryOp::Pow => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Subtract",
            BinaryOp::Mul => "Multiply",
            BinaryOp::Div => "Divide",
            BinaryOp::Mod => "Modulo",
            BinaryOp::Pow => "Power",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    String(String),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int64(_) => Type::Int64,
            Literal::Uint64(_) => Type::Uint64,
            Literal::Float64(_) => Type::Float64,
            Literal::String(_) => Type::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    VarDeclare(VarDeclare),
    Function(Function),
    Omg(Omg),
    Expr(ExprStmt),
}

impl Stmt {
    pub fn loc(&self) -> SourceLocation {
        match self {
            Stmt::Block(block) => block.loc,
            Stmt::VarDeclare(var) => var.loc,
            Stmt::Function(function) => function.loc,
            Stmt::Omg(omg) => omg.loc,
            Stmt::Expr(stmt) => stmt.loc,
        }
    }
}

/// `{ statements value? }`. `value` is a final expression with no `;`
/// after it, which becomes the value of the block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub value: Option<Box<Expr>>,
    pub loc: SourceLocation,
}

/// `let name: type = init;` with both the annotation and the initializer
/// optional. Without an annotation `ty` is `Type::None`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclare {
    pub name: String,
    pub ty: Type,
    pub type_loc: Option<SourceLocation>,
    pub init: Option<Expr>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDeclare {
    pub name: String,
    pub ty: Type,
    pub type_loc: SourceLocation,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<ParamDeclare>,
    pub return_type: Type,
    pub return_loc: Option<SourceLocation>,
    pub body: Block,
    pub loc: SourceLocation,
}

/// Trace statement, `__omg expr;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Omg {
    pub expr: Expr,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Call(Call),
    If(IfExpr),
    Primitive(Primitive),
    Variable(Variable),
}

impl Expr {
    pub fn loc(&self) -> SourceLocation {
        match self {
            Expr::Binary(binary) => binary.loc,
            Expr::Call(call) => call.loc,
            Expr::If(if_expr) => if_expr.loc,
            Expr::Primitive(primitive) => primitive.loc,
            Expr::Variable(variable) => variable.loc,
        }
    }
}

/// `loc` is the operator token.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: String,
    pub args: Vec<Expr>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub value: Literal,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub loc: SourceLocation,
}
