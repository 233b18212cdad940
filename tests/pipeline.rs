use chung::ast::resolved::{Declaration, ResolvedExprKind, ResolvedStmt};
use chung::compile_source;
use chung::diagnostics::{Stage, render};
use chung::lexer::TokenKind;
use chung::types::{Context, Type};

const SHADOWING: &str = include_str!("../demos/shadowing.chung");
const ERRORS: &str = include_str!("../demos/errors.chung");

#[test]
fn test_demo_program_compiles() {
    let compilation = compile_source(SHADOWING, &Context::new());
    assert!(compilation.succeeded(), "{:?}", compilation.diagnostics);
    assert_eq!(
        compilation.tokens.last().map(|token| token.kind),
        Some(TokenKind::Eof)
    );

    let module = compilation.module.unwrap();
    let names: Vec<_> = module
        .functions
        .iter()
        .map(|function| module.decls[function.decl].name())
        .collect();
    assert_eq!(names, ["main", "add", "show"]);

    let add = module.function("add").unwrap();
    assert_eq!(module.signature(add).unwrap().return_type, Type::Int64);
    assert_eq!(add.body.ty, Type::Int64);
}

#[test]
fn test_every_variable_points_at_a_declaration() {
    let compilation = compile_source(SHADOWING, &Context::new());
    let module = compilation.module.unwrap();
    let add = module.function("add").unwrap();
    let Some(value) = &add.body.value else {
        panic!("add should end in a value");
    };
    let ResolvedExprKind::Binary { lhs, rhs, .. } = &value.kind else {
        panic!("expected a + b");
    };
    // `a` is the local from `let a = a + 0;`, `b` the parameter
    let ResolvedExprKind::Variable(a) = lhs.kind else {
        panic!("expected a variable");
    };
    let ResolvedExprKind::Variable(b) = rhs.kind else {
        panic!("expected a variable");
    };
    assert!(matches!(module.decls[a], Declaration::Variable(_)));
    assert!(matches!(module.decls[b], Declaration::Parameter(_)));
    assert!(matches!(add.body.statements[0], ResolvedStmt::VarDeclare { decl, .. } if decl == a));
}

#[test]
fn test_semantic_errors_are_all_collected() {
    let compilation = compile_source(ERRORS, &Context::new());
    assert!(!compilation.succeeded());
    assert!(compilation.module.is_none());
    let lines: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.stage, diagnostic.loc.line))
        .collect();
    assert_eq!(
        lines,
        [
            (Stage::Sema, 3),
            (Stage::Sema, 4),
            (Stage::Sema, 4),
            (Stage::Sema, 5),
        ]
    );
}

#[test]
fn test_sema_is_skipped_after_syntax_errors() {
    // the undeclared `y` would be a semantic error
    let compilation = compile_source("func main() { print(y) ; let = 1; }", &Context::new());
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].stage, Stage::Parse);
    assert!(compilation.module.is_none());
}

#[test]
fn test_lex_and_parse_errors_are_both_reported() {
    let compilation = compile_source("func main() { let a = 1 $ 2; }\nlet = 3;", &Context::new());
    let stages: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.stage)
        .collect();
    // `$` is dropped by the parser, which then sees `1 2`
    assert_eq!(stages, [Stage::Lex, Stage::Parse, Stage::Parse]);
}

#[test]
fn test_render_plain() {
    let source = "func main() { print(\"no\"); }";
    let compilation = compile_source(source, &Context::new());
    let rendered = render("main.chung", source, &compilation.diagnostics, false);
    assert!(rendered.contains("SemaError"));
    assert!(rendered.contains("expected type 'int64', found type 'string'"));
    assert!(rendered.contains("main.chung"));
    assert!(
        rendered
            .trim_end()
            .ends_with("error: could not compile 'main.chung' due to 1 previous error(s)")
    );
}
