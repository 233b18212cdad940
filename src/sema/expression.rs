use crate::ast::resolved::{Declaration, ResolvedBlock, ResolvedExpr, ResolvedExprKind};
use crate::ast::{BinaryExpr, Call, Expr, IfExpr, Variable};
use crate::lexer::SourceLocation;
use crate::sema::Sema;
use crate::types::Type;

fn arguments(count: usize) -> String {
    match count {
        1 => "1 argument".to_string(),
        n => format!("{n} arguments"),
    }
}

impl Sema<'_> {
    /// `None` once a diagnostic has been reported for the expression, or for
    /// a declaration it depends on.
    pub fn resolve_expr(&mut self, expr: &Expr) -> Option<ResolvedExpr> {
        match expr {
            Expr::Binary(binary) => self.resolve_binary(binary),
            Expr::Call(call) => self.resolve_call(call),
            Expr::If(if_expr) => self.resolve_if(if_expr),
            Expr::Primitive(primitive) => Some(ResolvedExpr {
                ty: primitive.value.ty(),
                kind: ResolvedExprKind::Primitive(primitive.value.clone()),
                loc: primitive.loc,
            }),
            Expr::Variable(variable) => self.resolve_variable(variable),
        }
    }

    fn resolve_variable(&mut self, variable: &Variable) -> Option<ResolvedExpr> {
        let Some(id) = self.lookup(&variable.name) else {
            self.error(
                format!("use of undeclared variable '{}'", variable.name),
                variable.loc,
            );
            return None;
        };

        let decl = &self.decls[id];
        let is_function = matches!(decl, Declaration::Function(_));
        let ty = decl.ty().clone();
        if is_function {
            self.error(
                format!("'{}' is a function, not a variable", variable.name),
                variable.loc,
            );
            return None;
        }
        // the declaration itself failed and was reported
        if ty == Type::Invalid {
            return None;
        }

        Some(ResolvedExpr {
            kind: ResolvedExprKind::Variable(id),
            ty,
            loc: variable.loc,
        })
    }

    /// Both operands must have the same type, which is also the type of the
    /// result.
    fn resolve_binary(&mut self, binary: &BinaryExpr) -> Option<ResolvedExpr> {
        let lhs = self.resolve_expr(&binary.lhs);
        let rhs = self.resolve_expr(&binary.rhs);
        let (lhs, rhs) = (lhs?, rhs?);

        if let Some(operand) = [&lhs, &rhs].into_iter().find(|operand| operand.ty.is_void()) {
            let loc = operand.loc;
            self.error(
                format!(
                    "operator '{}' cannot be applied to a value of type 'void'",
                    binary.op.symbol()
                ),
                loc,
            );
            return None;
        }
        if !self.expect_type(&lhs.ty, &rhs.ty, binary.loc) {
            return None;
        }

        Some(ResolvedExpr {
            ty: lhs.ty.clone(),
            kind: ResolvedExprKind::Binary {
                op: binary.op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            loc: binary.loc,
        })
    }

    fn resolve_call(&mut self, call: &Call) -> Option<ResolvedExpr> {
        let Some(id) = self.lookup(&call.callee) else {
            self.error(
                format!("call to undeclared function '{}'", call.callee),
                call.loc,
            );
            return None;
        };
        let Some(signature) = self.decls[id].as_function().cloned() else {
            self.error(format!("'{}' is not a function", call.callee), call.loc);
            return None;
        };

        let args: Vec<_> = call.args.iter().map(|arg| self.resolve_expr(arg)).collect();
        if args.len() != signature.params.len() {
            self.error(
                format!(
                    "function '{}' expects {}, found {}",
                    signature.name,
                    arguments(signature.params.len()),
                    args.len()
                ),
                call.loc,
            );
            return None;
        }

        let mut failed = false;
        let mut resolved = vec![];
        for (arg, &param) in args.into_iter().zip(&signature.params) {
            let Some(arg) = arg else {
                failed = true;
                continue;
            };
            let expected = self.decls[param].ty().clone();
            if !self.expect_type(&expected, &arg.ty, arg.loc) {
                failed = true;
            }
            resolved.push(arg);
        }
        if failed {
            return None;
        }

        Some(ResolvedExpr {
            kind: ResolvedExprKind::Call {
                callee: id,
                args: resolved,
            },
            ty: signature.return_type,
            loc: call.loc,
        })
    }

    /// Without `else` the expression is `void`. With it, both arms must agree,
    /// and a disagreement is reported at both arms.
    fn resolve_if(&mut self, if_expr: &IfExpr) -> Option<ResolvedExpr> {
        let condition = self.resolve_expr(&if_expr.condition);
        if let Some(condition) = &condition {
            if condition.ty.is_void() {
                self.error(
                    "the condition of 'if' must produce a value, found type 'void'",
                    condition.loc,
                );
            }
        }

        let then_block = self.resolve_block(&if_expr.then_block);
        let else_block = if_expr
            .else_block
            .as_ref()
            .map(|block| self.resolve_block(block));

        let condition = condition.filter(|condition| !condition.ty.is_void())?;
        let then_block = then_block?;
        let else_block = match else_block {
            Some(block) => Some(block?),
            None => None,
        };

        let ty = match &else_block {
            Some(else_block) => {
                if !then_block.ty.same_tag(&else_block.ty) {
                    self.report_arm_mismatch(&then_block, else_block);
                    return None;
                }
                then_block.ty.clone()
            }
            None => Type::Void,
        };

        Some(ResolvedExpr {
            kind: ResolvedExprKind::If {
                condition: Box::new(condition),
                then_block,
                else_block,
            },
            ty,
            loc: if_expr.loc,
        })
    }

    fn report_arm_mismatch(&mut self, then_block: &ResolvedBlock, else_block: &ResolvedBlock) {
        let arm_loc = |block: &ResolvedBlock| -> SourceLocation {
            block.value.as_ref().map_or(block.loc, |value| value.loc)
        };
        self.error(
            format!(
                "'if' branch has type '{}', but the 'else' branch has type '{}'",
                then_block.ty, else_block.ty
            ),
            arm_loc(then_block),
        );
        self.error(
            format!(
                "'else' branch has type '{}', but the 'if' branch has type '{}'",
                else_block.ty, then_block.ty
            ),
            arm_loc(else_block),
        );
    }
}
