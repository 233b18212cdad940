use super::*;
use crate::ast::resolved::{ResolvedExpr, ResolvedExprKind, ResolvedStmt};
use crate::lexer::lex;
use crate::parser::parse;
use crate::types::Context;

fn resolve_str(input: &str) -> SemaOutput {
    let lexed = lex(input);
    assert!(lexed.diagnostics.is_empty(), "{:?}", lexed.diagnostics);
    let parsed = parse(&lexed.tokens, &lexed.lines, &Context::new());
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    resolve(&parsed.statements, &lexed.lines)
}

fn messages(input: &str) -> Vec<String> {
    let output = resolve_str(input);
    assert!(output.diagnostics.iter().all(|d| d.stage == Stage::Sema));
    output.diagnostics.into_iter().map(|d| d.message).collect()
}

fn module(input: &str) -> ResolvedModule {
    let output = resolve_str(input);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    output.module.expect("module should resolve")
}

fn variable_decl(expr: &ResolvedExpr) -> DeclId {
    match expr.kind {
        ResolvedExprKind::Variable(id) => id,
        ref other => panic!("expected a variable, got {other:?}"),
    }
}

#[test]
fn test_print_builtin() {
    let module = module("func main() { print(42); }");
    let main = module.function("main").unwrap();
    let ResolvedStmt::Expr { expr, .. } = &main.body.statements[0] else {
        panic!("expected an expression statement");
    };
    let ResolvedExprKind::Call { callee, args } = &expr.kind else {
        panic!("expected a call");
    };
    let print = module.decls[*callee].as_function().unwrap();
    assert_eq!(print.name, "print");
    assert!(print.builtin);
    assert_eq!(args[0].ty, Type::Int64);
    assert_eq!(expr.ty, Type::Void);
    // built-ins are not part of the user function list
    assert_eq!(module.functions.len(), 1);
}

#[test]
fn test_redeclaration_in_same_block() {
    let output = resolve_str("func main() { let x = 1; let x = 2; }");
    assert!(output.module.is_none());
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.stage, Stage::Sema);
    assert_eq!(diagnostic.message, "'x' is already declared in this scope");
    assert_eq!(diagnostic.loc.column, 30);
    assert_eq!(
        diagnostic.note.as_deref(),
        Some("previously declared at line 1, column 19")
    );
}

#[test]
fn test_shadowing_in_nested_scopes_is_allowed() {
    module("func main() { let x = 1; { let x = \"s\"; } }");
    module("func g(x: int64) { let x = 2; }");
}

#[test]
fn test_duplicate_parameters() {
    assert_eq!(
        messages("func f(a: int64, a: string) { }"),
        vec!["'a' is already declared in this scope"]
    );
}

#[test]
fn test_shadowing_resolves_innermost() {
    let module = module(
        "func f(x: int64) -> int64 {
    {
        let x = \"shadow\";
        __omg x;
    }
    x
}",
    );
    let f = module.function("f").unwrap();
    let signature = module.signature(f).unwrap();
    let param = signature.params[0];

    let ResolvedStmt::Block(inner) = &f.body.statements[0] else {
        panic!("expected a nested block");
    };
    let ResolvedStmt::Omg { expr, .. } = &inner.statements[1] else {
        panic!("expected a trace statement");
    };
    let inner_x = variable_decl(expr);
    assert_ne!(inner_x, param);
    assert!(matches!(module.decls[inner_x], Declaration::Variable(_)));
    assert_eq!(expr.ty, Type::String);

    // back to the parameter after the block
    let value = f.body.value.as_ref().unwrap();
    assert_eq!(variable_decl(value), param);
    assert_eq!(value.ty, Type::Int64);
    assert_eq!(f.body.ty, Type::Int64);
}

#[test]
fn test_initializer_sees_outer_binding() {
    let module = module("func f(x: int64) { let x = x + 1; print(x); }");
    let f = module.function("f").unwrap();
    let param = module.signature(f).unwrap().params[0];
    let ResolvedStmt::VarDeclare { decl, init, .. } = &f.body.statements[0] else {
        panic!("expected a declaration");
    };
    let Some(ResolvedExpr {
        kind: ResolvedExprKind::Binary { lhs, .. },
        ..
    }) = init
    else {
        panic!("expected a binary initializer");
    };
    assert_eq!(variable_decl(lhs), param);

    let ResolvedStmt::Expr { expr, .. } = &f.body.statements[1] else {
        panic!("expected a call");
    };
    let ResolvedExprKind::Call { args, .. } = &expr.kind else {
        panic!("expected a call");
    };
    assert_eq!(variable_decl(&args[0]), *decl);
}

#[test]
fn test_forward_reference() {
    let module = module(
        "func main() { a(); }
func a() { b(1) }
func b(n: int64) { print(n) }",
    );
    let main = module.function("main").unwrap();
    let ResolvedStmt::Expr { expr, .. } = &main.body.statements[0] else {
        panic!("expected an expression statement");
    };
    let ResolvedExprKind::Call { callee, .. } = expr.kind else {
        panic!("expected a call");
    };
    assert_eq!(module.decls[callee].name(), "a");
    assert_eq!(module.functions.len(), 3);
}

#[test]
fn test_recursion() {
    module("func count(n: int64) -> int64 { count(n - 1) }");
}

#[test]
fn test_undeclared_names() {
    assert_eq!(
        messages("func main() { print(y); }"),
        vec!["use of undeclared variable 'y'"]
    );
    assert_eq!(
        messages("func main() { nope(); }"),
        vec!["call to undeclared function 'nope'"]
    );
}

#[test]
fn test_failed_declaration_does_not_cascade() {
    assert_eq!(
        messages("func main() { let a = nope; print(a); let b = a + 1; }"),
        vec!["use of undeclared variable 'nope'"]
    );
}

#[test]
fn test_function_is_not_a_variable() {
    assert_eq!(
        messages("func main() { let p = print; }"),
        vec!["'print' is a function, not a variable"]
    );
    assert_eq!(
        messages("func main() { let v = 1; v(); }"),
        vec!["'v' is not a function"]
    );
}

#[test]
fn test_binary_operand_mismatch() {
    let output = resolve_str("func main() { let a = 1 + \"s\"; }");
    assert!(output.module.is_none());
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.message, "expected type 'int64', found type 'string'");
    // anchored at the operator
    assert_eq!(diagnostic.loc.column, 25);
}

#[test]
fn test_numeric_types_do_not_mix() {
    assert_eq!(
        messages("func main() { let a = 1u * 2; let b = 1.5 - 1; }"),
        vec![
            "expected type 'uint64', found type 'int64'",
            "expected type 'float64', found type 'int64'",
        ]
    );
}

#[test]
fn test_binary_result_type() {
    let module = module("func f() -> float64 { 1.5 * 2.0 ** 3.0 }");
    let f = module.function("f").unwrap();
    assert_eq!(f.body.ty, Type::Float64);
}

#[test]
fn test_void_operand() {
    assert_eq!(
        messages("func main() { let a = print(1) + 1; }"),
        vec!["operator '+' cannot be applied to a value of type 'void'"]
    );
}

#[test]
fn test_wrong_argument_type() {
    let output = resolve_str("func f(a: int64) { }\nfunc main() { f(\"s\"); }");
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.message, "expected type 'int64', found type 'string'");
    assert_eq!((diagnostic.loc.line, diagnostic.loc.column), (2, 17));
}

#[test]
fn test_wrong_argument_count() {
    assert_eq!(
        messages("func main() { print(1, 2); }"),
        vec!["function 'print' expects 1 argument, found 2"]
    );
    assert_eq!(
        messages("func f(a: int64, b: int64) { }\nfunc main() { f(); }"),
        vec!["function 'f' expects 2 arguments, found 0"]
    );
}

#[test]
fn test_branch_mismatch_reports_both_arms() {
    let output = resolve_str(
        "func f(c: int64) -> int64 {
    let v = if c {
        1
    } else {
        \"no\"
    };
    v
}",
    );
    assert!(output.module.is_none());
    assert_eq!(output.diagnostics.len(), 2);
    for diagnostic in &output.diagnostics {
        assert_eq!(diagnostic.stage, Stage::Sema);
        assert!(diagnostic.message.contains("'int64'"));
        assert!(diagnostic.message.contains("'string'"));
    }
    assert_eq!(output.diagnostics[0].loc.line, 3);
    assert_eq!(output.diagnostics[1].loc.line, 5);
    assert_eq!(output.diagnostics[1].source_line.trim(), "\"no\"");
}

#[test]
fn test_branch_mismatch_without_trailing_value() {
    let output = resolve_str("func f(c: int64) { let v = if c { 1 } else { print(2); }; }");
    assert_eq!(output.diagnostics.len(), 2);
    // the else arm has no value, so the block itself is blamed
    assert_eq!(output.diagnostics[1].loc.column, 44);
    assert!(output.diagnostics[1].message.contains("'void'"));
}

#[test]
fn test_if_types() {
    let module = module(
        "func f(a: int64) -> int64 { if a { 1 } else if a { 2 } else { 3 } }
func main() { if 1 { 2 } }",
    );
    assert_eq!(module.function("f").unwrap().body.ty, Type::Int64);
    // no else: the expression is void whatever the arm holds
    assert_eq!(module.function("main").unwrap().body.ty, Type::Void);
}

#[test]
fn test_void_condition() {
    assert_eq!(
        messages("func main() { if print(1) { } }"),
        vec!["the condition of 'if' must produce a value, found type 'void'"]
    );
}

#[test]
fn test_var_declare_rules() {
    assert_eq!(
        messages("func main() { let x; }"),
        vec!["variable 'x' needs a type annotation or an initializer"]
    );
    assert_eq!(
        messages("func main() { let x = print(1); }"),
        vec!["variable 'x' cannot be initialized with a value of type 'void'"]
    );
    assert_eq!(
        messages("func main() { let x: uint64 = 1; }"),
        vec!["expected type 'uint64', found type 'int64'"]
    );
    assert_eq!(
        messages("func main() { let x: void; }"),
        vec!["variable 'x' cannot have type 'void'"]
    );
    module("func main() { let x: string; let y: uint64 = 5u; }");
}

#[test]
fn test_unknown_types() {
    assert_eq!(
        messages("func f(p: Point) { }"),
        vec!["unknown type 'Point'"]
    );
    assert_eq!(
        messages("func f() -> Point { }"),
        vec!["unknown type 'Point'"]
    );
    assert_eq!(
        messages("func main() { let p: Point; }"),
        vec!["unknown type 'Point'"]
    );
    assert_eq!(
        messages("func f(p: void) { }"),
        vec!["parameter 'p' cannot have type 'void'"]
    );
}

#[test]
fn test_bodies_are_skipped_after_signature_errors() {
    assert_eq!(
        messages("func f(p: Point) { nope }"),
        vec!["unknown type 'Point'"]
    );
}

#[test]
fn test_main_signature() {
    assert_eq!(
        messages("func main(a: int64) { }"),
        vec!["function 'main' must not take any parameters"]
    );
    assert_eq!(
        messages("func main() -> int64 { 1 }"),
        vec!["function 'main' must return 'void', found 'int64'"]
    );
}

#[test]
fn test_return_type_mismatch() {
    let output = resolve_str("func f() -> int64 { \"s\" }");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].message,
        "expected type 'int64', found type 'string'"
    );
    assert_eq!(
        output.diagnostics[0].note.as_deref(),
        Some("function 'f' is declared to return 'int64'")
    );

    // a body without a trailing value is void
    assert_eq!(
        messages("func g() -> int64 { print(1); }"),
        vec!["expected type 'int64', found type 'void'"]
    );
}

#[test]
fn test_duplicate_functions() {
    assert_eq!(
        messages("func a() { }\nfunc a() { }"),
        vec!["'a' is already declared in this scope"]
    );
    let output = resolve_str("func print(v: int64) { }");
    assert_eq!(
        output.diagnostics[0].note.as_deref(),
        Some("'print' is a built-in function")
    );
}

#[test]
fn test_module_scope_only_holds_functions() {
    assert_eq!(
        messages("let x = 1;\nfunc main() { }"),
        vec!["only function declarations are allowed at module scope"]
    );
}

#[test]
fn test_nested_function() {
    let output = resolve_str("func main() { func inner() { } }");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].message,
        "functions may only be declared at module scope"
    );
    assert_eq!(
        output.diagnostics[0].note.as_deref(),
        Some("'inner' is declared inside function 'main'")
    );
}

#[test]
fn test_trace_statement_is_kept() {
    let module = module("func main() { __omg 1 + 2; }");
    let main = module.function("main").unwrap();
    assert!(matches!(
        &main.body.statements[0],
        ResolvedStmt::Omg { expr, .. } if expr.ty == Type::Int64
    ));
}

#[test]
fn test_scopes_are_popped_on_failure() {
    let lexed = lex("func main() { { let x = nope; } }");
    let parsed = parse(&lexed.tokens, &lexed.lines, &Context::new());
    let mut sema = Sema::new(&lexed.lines);
    assert!(sema.resolve_module(&parsed.statements).is_none());
    assert_eq!(sema.errors().len(), 1);
    assert_eq!(sema.scopes.len(), 1);
    assert!(sema.lookup("x").is_none());
    assert!(sema.lookup("main").is_some());
}
