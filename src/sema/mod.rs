//! Scope and type resolution.
//!
//! Runs over the whole syntax tree in two passes. The first registers every
//! function signature in the module scope, so bodies can call functions
//! declared further down; the second resolves bodies. Every name use is
//! bound to a [`DeclId`] and every expression gets a checked [`Type`].
//! Diagnostics are accumulated, and any of them means no module comes out.

pub mod expression;
pub mod function;
pub mod scope;
pub mod statement;

#[cfg(test)]
pub mod test;

use tracing::{debug, trace};

use crate::ast::Stmt;
use crate::ast::resolved::{DeclArena, DeclId, Declaration, ResolvedModule};
use crate::diagnostics::{Diagnostic, Stage};
use crate::lexer::SourceLocation;
use crate::types::Type;

use self::scope::{Scope, ScopeGuard};

#[derive(Debug, Clone)]
pub struct SemaOutput {
    /// `None` as soon as a single diagnostic was reported.
    pub module: Option<ResolvedModule>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Sema<'a> {
    lines: &'a [String],
    scopes: Vec<Scope>,
    decls: DeclArena,
    current_function: Option<DeclId>,
    errors: Vec<Diagnostic>,
}

pub fn resolve(statements: &[Stmt], lines: &[String]) -> SemaOutput {
    let mut sema = Sema::new(lines);
    let module = sema.resolve_module(statements);
    debug!(
        decls = sema.decls.len(),
        errors = sema.errors.len(),
        resolved = module.is_some(),
        "resolved module"
    );
    SemaOutput {
        module,
        diagnostics: sema.errors,
    }
}

impl<'a> Sema<'a> {
    /// Starts with the module scope already pushed and the built-ins in it.
    pub fn new(lines: &'a [String]) -> Self {
        let mut sema = Sema {
            lines,
            scopes: vec![Scope::default()],
            decls: DeclArena::new(),
            current_function: None,
            errors: vec![],
        };
        sema.declare_builtins();
        sema
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    fn resolve_module(&mut self, statements: &[Stmt]) -> Option<ResolvedModule> {
        let mut signatures = vec![];
        for stmt in statements {
            match stmt {
                Stmt::Function(function) => {
                    if let Some(id) = self.declare_function(function) {
                        signatures.push((function, id));
                    }
                }
                other => self.error(
                    "only function declarations are allowed at module scope",
                    other.loc(),
                ),
            }
        }
        trace!(functions = signatures.len(), "declared signatures");
        if !self.errors.is_empty() {
            return None;
        }

        let mut functions = vec![];
        for (function, id) in signatures {
            if let Some(resolved) = self.resolve_function(function, id) {
                functions.push(resolved);
            }
        }
        if !self.errors.is_empty() {
            return None;
        }

        Some(ResolvedModule {
            decls: std::mem::take(&mut self.decls),
            functions,
        })
    }

    /// Pushes a scope that is popped again when the guard is dropped.
    pub fn enter_scope(&mut self) -> ScopeGuard<'_, 'a> {
        ScopeGuard::new(self)
    }

    /// Binds `name` in the innermost scope. Reports a redeclaration and
    /// returns `false` when that scope already has it.
    pub fn declare(&mut self, name: &str, id: DeclId, loc: SourceLocation) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.insert(name, id) {
            trace!(name, ?id, depth = self.scopes.len(), "declared");
            return true;
        }

        let previous = scope.get(name).map(|previous| &self.decls[previous]);
        let note = match previous {
            Some(Declaration::Function(function)) if function.builtin => {
                format!("'{name}' is a built-in function")
            }
            Some(decl) => format!(
                "previously declared at line {}, column {}",
                decl.loc().line,
                decl.loc().column
            ),
            None => String::new(),
        };
        let diagnostic = self
            .diagnostic(format!("'{name}' is already declared in this scope"), loc)
            .with_note(note);
        self.errors.push(diagnostic);
        false
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// The one place types are compared. Mismatches involving `Invalid` were
    /// already reported where the invalid type came from.
    pub fn expect_type(&mut self, expected: &Type, found: &Type, loc: SourceLocation) -> bool {
        if expected.same_tag(found) {
            return true;
        }
        if matches!(expected, Type::Invalid) || matches!(found, Type::Invalid) {
            return false;
        }
        let diagnostic = self.type_mismatch(expected, found, loc);
        self.errors.push(diagnostic);
        false
    }

    fn type_mismatch(&self, expected: &Type, found: &Type, loc: SourceLocation) -> Diagnostic {
        self.diagnostic(
            format!("expected type '{expected}', found type '{found}'"),
            loc,
        )
    }

    /// Rejects type names the type table did not know. Comes back as
    /// `Invalid` after reporting.
    pub fn resolve_type(&mut self, ty: &Type, loc: SourceLocation) -> Type {
        match ty {
            Type::User(name) => {
                self.error(format!("unknown type '{name}'"), loc);
                Type::Invalid
            }
            ty => ty.clone(),
        }
    }

    fn diagnostic(&self, message: impl Into<String>, loc: SourceLocation) -> Diagnostic {
        Diagnostic::new(Stage::Sema, message, loc, self.lines)
    }

    fn error(&mut self, message: impl Into<String>, loc: SourceLocation) {
        let diagnostic = self.diagnostic(message, loc);
        self.errors.push(diagnostic);
    }
}
