//! The tree produced by semantic analysis.
//!
//! It mirrors the syntax tree, except that every expression carries its
//! checked [`Type`] and every name use has been replaced by a [`DeclId`]
//! pointing into the module's [`DeclArena`]. The arena owns all declarations,
//! so a resolved module is self-contained and can be handed to a backend as a
//! single value.

use std::fmt;
use std::ops::Index;

use crate::ast::{BinaryOp, Literal};
use crate::lexer::SourceLocation;
use crate::types::Type;

/// Stable index of a declaration in a [`DeclArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct DeclId(u32);

impl DeclId {
    pub const fn from_raw(raw: u32) -> Self {
        DeclId(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: Type,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<DeclId>,
    pub return_type: Type,
    pub loc: SourceLocation,
    /// Provided by the compiler rather than declared in source (`print`).
    pub builtin: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VarDecl),
    Parameter(ParamDecl),
    Function(FunctionDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable(var) => &var.name,
            Declaration::Parameter(param) => &param.name,
            Declaration::Function(function) => &function.name,
        }
    }

    pub fn loc(&self) -> SourceLocation {
        match self {
            Declaration::Variable(var) => var.loc,
            Declaration::Parameter(param) => param.loc,
            Declaration::Function(function) => function.loc,
        }
    }

    /// Type of the value a use of this declaration produces; the return type
    /// for functions.
    pub fn ty(&self) -> &Type {
        match self {
            Declaration::Variable(var) => &var.ty,
            Declaration::Parameter(param) => &param.ty,
            Declaration::Function(function) => &function.return_type,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match self {
            Declaration::Function(function) => Some(function),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclArena {
    decls: Vec<Declaration>,
}

impl DeclArena {
    pub fn new() -> Self {
        DeclArena::default()
    }

    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(index, decl)| (DeclId(index as u32), decl))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl Index<DeclId> for DeclArena {
    type Output = Declaration;

    fn index(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModule {
    pub decls: DeclArena,
    /// User functions in source order. Built-ins only live in `decls`.
    pub functions: Vec<ResolvedFunction>,
}

impl ResolvedModule {
    pub fn function(&self, name: &str) -> Option<&ResolvedFunction> {
        self.functions
            .iter()
            .find(|function| self.decls[function.decl].name() == name)
    }

    pub fn signature(&self, function: &ResolvedFunction) -> Option<&FunctionDecl> {
        self.decls[function.decl].as_function()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFunction {
    pub decl: DeclId,
    pub body: ResolvedBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock {
    pub statements: Vec<ResolvedStmt>,
    pub value: Option<Box<ResolvedExpr>>,
    /// Type of `value`, or `void` without one.
    pub ty: Type,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStmt {
    Block(ResolvedBlock),
    VarDeclare {
        decl: DeclId,
        init: Option<ResolvedExpr>,
        loc: SourceLocation,
    },
    /// Trace statement. Backends treat it as a no-op for now.
    Omg {
        expr: ResolvedExpr,
        loc: SourceLocation,
    },
    Expr {
        expr: ResolvedExpr,
        loc: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExpr {
    pub kind: ResolvedExprKind,
    pub ty: Type,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedExprKind {
    Binary {
        op: BinaryOp,
        lhs: Box<ResolvedExpr>,
        rhs: Box<ResolvedExpr>,
    },
    Call {
        callee: DeclId,
        args: Vec<ResolvedExpr>,
    },
    If {
        condition: Box<ResolvedExpr>,
        then_block: ResolvedBlock,
        else_block: Option<ResolvedBlock>,
    },
    Primitive(Literal),
    Variable(DeclId),
}
