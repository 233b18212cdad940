//! Human readable dumps of the syntax tree.
//!
//! [`render_tree`] draws the indented tree printed by `chungc --dump-ast`;
//! the `Display` impls print expressions fully parenthesized, which is how
//! parser tests state the shape of a tree.

use std::fmt::{self, Write};

use crate::ast::{Block, Expr, Literal, Stmt};
use crate::types::Type;

const INDENT: &str = "│   ";
const BRANCH: &str = "├── ";

fn line(out: &mut String, level: usize, text: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(BRANCH);
    out.push_str(text);
    out.push('\n');
}

pub fn render_tree(statements: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in statements {
        write_stmt(&mut out, stmt, 0);
    }
    out
}

fn write_block(out: &mut String, block: &Block, level: usize) {
    for stmt in &block.statements {
        write_stmt(out, stmt, level);
    }
    if let Some(value) = &block.value {
        line(out, level, "Value");
        write_expr(out, value, level + 1);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    match stmt {
        Stmt::Block(block) => {
            line(out, level, "Block");
            write_block(out, block, level + 1);
        }
        Stmt::VarDeclare(var) => {
            let header = match &var.ty {
                Type::None => format!("VarDeclare {}", var.name),
                ty => format!("VarDeclare {}: {}", var.name, ty),
            };
            line(out, level, &header);
            if let Some(init) = &var.init {
                write_expr(out, init, level + 1);
            }
        }
        Stmt::Function(function) => {
            let params = function
                .params
                .iter()
                .map(|param| format!("{}: {}", param.name, param.ty))
                .collect::<Vec<_>>()
                .join(", ");
            line(
                out,
                level,
                &format!(
                    "Function {}({}) -> {}",
                    function.name, params, function.return_type
                ),
            );
            write_block(out, &function.body, level + 1);
        }
        Stmt::Omg(omg) => {
            line(out, level, "Omg");
            write_expr(out, &omg.expr, level + 1);
        }
        Stmt::Expr(stmt) => {
            line(out, level, "ExprStmt");
            write_expr(out, &stmt.expr, level + 1);
        }
    }
}

fn write_expr(out: &mut String, expr: &Expr, level: usize) {
    match expr {
        Expr::Binary(binary) => {
            line(out, level, &format!("BinaryExpr {}", binary.op.name()));
            write_expr(out, &binary.lhs, level + 1);
            write_expr(out, &binary.rhs, level + 1);
        }
        Expr::Call(call) => {
            line(out, level, &format!("Call {}", call.callee));
            for arg in &call.args {
                write_expr(out, arg, level + 1);
            }
        }
        Expr::If(if_expr) => {
            line(out, level, "IfExpr");
            write_expr(out, &if_expr.condition, level + 1);
            line(out, level + 1, "Then");
            write_block(out, &if_expr.then_block, level + 2);
            if let Some(else_block) = &if_expr.else_block {
                line(out, level + 1, "Else");
                write_block(out, else_block, level + 2);
            }
        }
        Expr::Primitive(primitive) => {
            let text = match &primitive.value {
                Literal::Int64(value) => format!("Int64 {value}"),
                Literal::Uint64(value) => format!("Uint64 {value}"),
                Literal::Float64(value) => format!("Float64 {value}"),
                Literal::String(value) => format!("String {value:?}"),
            };
            line(out, level, &text);
        }
        Expr::Variable(variable) => line(out, level, &format!("Variable {}", variable.name)),
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int64(value) => write!(f, "{value}"),
            Literal::Uint64(value) => write!(f, "{value}u"),
            Literal::Float64(value) => write!(f, "{value:?}"),
            Literal::String(value) => write!(f, "{value:?}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for stmt in &self.statements {
            write!(f, " {stmt}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(block) => write!(f, "{block}"),
            Stmt::VarDeclare(var) => {
                write!(f, "let {}", var.name)?;
                if !matches!(var.ty, Type::None) {
                    write!(f, ": {}", var.ty)?;
                }
                if let Some(init) = &var.init {
                    write!(f, " = {init}")?;
                }
                f.write_char(';')
            }
            Stmt::Function(function) => {
                write!(f, "func {}(", function.name)?;
                for (i, param) in function.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", param.name, param.ty)?;
                }
                write!(f, ") -> {} {}", function.return_type, function.body)
            }
            Stmt::Omg(omg) => write!(f, "__omg {};", omg.expr),
            Stmt::Expr(stmt) => write!(f, "{};", stmt.expr),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(binary) => {
                write!(f, "({} {} {})", binary.lhs, binary.op.symbol(), binary.rhs)
            }
            Expr::Call(call) => {
                write!(f, "{}(", call.callee)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_char(')')
            }
            Expr::If(if_expr) => {
                write!(f, "if {} {}", if_expr.condition, if_expr.then_block)?;
                if let Some(else_block) = &if_expr.else_block {
                    write!(f, " else {else_block}")?;
                }
                Ok(())
            }
            Expr::Primitive(primitive) => write!(f, "{}", primitive.value),
            Expr::Variable(variable) => f.write_str(&variable.name),
        }
    }
}
