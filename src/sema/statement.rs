use crate::ast::resolved::{Declaration, ResolvedBlock, ResolvedStmt, VarDecl};
use crate::ast::{Block, Stmt, VarDeclare};
use crate::sema::Sema;
use crate::types::Type;

impl Sema<'_> {
    pub fn resolve_statement(&mut self, stmt: &Stmt) -> Option<ResolvedStmt> {
        match stmt {
            Stmt::Block(block) => self.resolve_block(block).map(ResolvedStmt::Block),
            Stmt::VarDeclare(var) => self.resolve_var_declare(var),
            Stmt::Function(function) => {
                let mut diagnostic = self.diagnostic(
                    "functions may only be declared at module scope",
                    function.loc,
                );
                if let Some(outer) = self.current_function {
                    diagnostic = diagnostic.with_note(format!(
                        "'{}' is declared inside function '{}'",
                        function.name,
                        self.decls[outer].name()
                    ));
                }
                self.errors.push(diagnostic);
                None
            }
            Stmt::Omg(omg) => self.resolve_expr(&omg.expr).map(|expr| ResolvedStmt::Omg {
                expr,
                loc: omg.loc,
            }),
            Stmt::Expr(stmt) => self.resolve_expr(&stmt.expr).map(|expr| ResolvedStmt::Expr {
                expr,
                loc: stmt.loc,
            }),
        }
    }

    /// Resolves a block in a scope of its own. Every statement is resolved
    /// even after one of them failed, so all of their errors are reported.
    pub fn resolve_block(&mut self, block: &Block) -> Option<ResolvedBlock> {
        let mut scope = self.enter_scope();
        let mut failed = false;

        let mut statements = vec![];
        for stmt in &block.statements {
            match scope.resolve_statement(stmt) {
                Some(resolved) => statements.push(resolved),
                None => failed = true,
            }
        }

        let value = match &block.value {
            Some(value) => match scope.resolve_expr(value) {
                Some(resolved) => Some(Box::new(resolved)),
                None => {
                    failed = true;
                    None
                }
            },
            None => None,
        };

        if failed {
            return None;
        }
        let ty = value.as_ref().map_or(Type::Void, |value| value.ty.clone());
        Some(ResolvedBlock {
            statements,
            value,
            ty,
            loc: block.loc,
        })
    }

    /// The name is bound only after the initializer is resolved, so
    /// `let x = x;` reads an outer `x`.
    pub fn resolve_var_declare(&mut self, var: &VarDeclare) -> Option<ResolvedStmt> {
        let annotation = match &var.ty {
            Type::None => None,
            ty => {
                let loc = var.type_loc.unwrap_or(var.loc);
                let resolved = self.resolve_type(ty, loc);
                if resolved.is_void() {
                    self.error(
                        format!("variable '{}' cannot have type 'void'", var.name),
                        loc,
                    );
                    Some(Type::Invalid)
                } else {
                    Some(resolved)
                }
            }
        };

        let init = var.init.as_ref().map(|init| self.resolve_expr(init));
        let init_ty = match &init {
            Some(Some(init)) if init.ty.is_void() => {
                self.error(
                    format!(
                        "variable '{}' cannot be initialized with a value of type 'void'",
                        var.name
                    ),
                    init.loc,
                );
                Some(Type::Invalid)
            }
            Some(Some(init)) => Some(init.ty.clone()),
            Some(None) => Some(Type::Invalid),
            None => None,
        };

        let ty = match (annotation, init_ty) {
            (Some(annotation), Some(init_ty)) => {
                if let Some(Some(init)) = &init {
                    self.expect_type(&annotation, &init_ty, init.loc);
                }
                annotation
            }
            (Some(annotation), None) => annotation,
            (None, Some(init_ty)) => init_ty,
            (None, None) => {
                self.error(
                    format!(
                        "variable '{}' needs a type annotation or an initializer",
                        var.name
                    ),
                    var.loc,
                );
                Type::Invalid
            }
        };

        let valid = ty != Type::Invalid;
        let decl = self.decls.alloc(Declaration::Variable(VarDecl {
            name: var.name.clone(),
            ty,
            loc: var.loc,
        }));
        let declared = self.declare(&var.name, decl, var.loc);

        match init {
            Some(None) => None,
            _ if !valid || !declared => None,
            init => Some(ResolvedStmt::VarDeclare {
                decl,
                init: init.flatten(),
                loc: var.loc,
            }),
        }
    }
}
