use tracing::trace;

use crate::ast::Function;
use crate::ast::resolved::{DeclId, Declaration, FunctionDecl, ParamDecl, ResolvedFunction};
use crate::lexer::SourceLocation;
use crate::sema::Sema;
use crate::types::Type;

impl Sema<'_> {
    /// `print(value: int64) -> void`
    pub(super) fn declare_builtins(&mut self) {
        let value = self.decls.alloc(Declaration::Parameter(ParamDecl {
            name: "value".to_string(),
            ty: Type::Int64,
            loc: SourceLocation::default(),
        }));
        let print = self.decls.alloc(Declaration::Function(FunctionDecl {
            name: "print".to_string(),
            params: vec![value],
            return_type: Type::Void,
            loc: SourceLocation::default(),
            builtin: true,
        }));
        self.declare("print", print, SourceLocation::default());
    }

    /// First pass: resolves the signature and binds it in the module scope.
    /// `None` if anything about the signature was wrong.
    pub fn declare_function(&mut self, function: &Function) -> Option<DeclId> {
        let errors_before = self.errors.len();

        let mut params = vec![];
        {
            // parameter names share one scope
            let mut scope = self.enter_scope();
            for param in &function.params {
                let mut ty = scope.resolve_type(&param.ty, param.type_loc);
                if ty.is_void() {
                    scope.error(
                        format!("parameter '{}' cannot have type 'void'", param.name),
                        param.type_loc,
                    );
                    ty = Type::Invalid;
                }
                let id = scope.decls.alloc(Declaration::Parameter(ParamDecl {
                    name: param.name.clone(),
                    ty,
                    loc: param.loc,
                }));
                scope.declare(&param.name, id, param.loc);
                params.push(id);
            }
        }

        let return_loc = function.return_loc.unwrap_or(function.loc);
        let return_type = self.resolve_type(&function.return_type, return_loc);

        if function.name == "main" {
            if !params.is_empty() {
                self.error("function 'main' must not take any parameters", function.loc);
            }
            if !return_type.is_void() && return_type != Type::Invalid {
                self.error(
                    format!("function 'main' must return 'void', found '{return_type}'"),
                    return_loc,
                );
            }
        }

        let id = self.decls.alloc(Declaration::Function(FunctionDecl {
            name: function.name.clone(),
            params,
            return_type,
            loc: function.loc,
            builtin: false,
        }));
        self.declare(&function.name, id, function.loc);

        (self.errors.len() == errors_before).then_some(id)
    }

    /// Second pass: resolves the body against the signature declared in the
    /// first pass.
    pub fn resolve_function(&mut self, function: &Function, id: DeclId) -> Option<ResolvedFunction> {
        let signature = self.decls[id].as_function()?.clone();
        trace!(function = %signature.name, "resolving body");
        self.current_function = Some(id);

        let mut scope = self.enter_scope();
        for &param in &signature.params {
            let (name, loc) = (scope.decls[param].name().to_string(), scope.decls[param].loc());
            scope.declare(&name, param, loc);
        }
        let body = scope.resolve_block(&function.body);
        drop(scope);
        self.current_function = None;

        let body = body?;
        if !body.ty.same_tag(&signature.return_type) {
            let loc = body.value.as_ref().map_or(body.loc, |value| value.loc);
            let diagnostic = self
                .type_mismatch(&signature.return_type, &body.ty, loc)
                .with_note(format!(
                    "function '{}' is declared to return '{}'",
                    signature.name, signature.return_type
                ));
            self.errors.push(diagnostic);
            return None;
        }

        Some(ResolvedFunction { decl: id, body })
    }
}
