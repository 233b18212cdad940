pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod types;

use tracing::debug;

use crate::ast::Stmt;
use crate::ast::resolved::ResolvedModule;
use crate::diagnostics::Diagnostic;
use crate::lexer::Token;
use crate::types::Context;

/// Everything one run of the front end produced.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub lines: Vec<String>,
    pub tokens: Vec<Token>,
    pub statements: Vec<Stmt>,
    /// Present only when no stage reported anything.
    pub module: Option<ResolvedModule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty() && self.module.is_some()
    }
}

/// Lexes, parses and resolves `source`. Semantic analysis only runs on a
/// syntax tree that came out of the first two stages without errors.
pub fn compile_source(source: &str, context: &Context) -> Compilation {
    let lexed = lexer::lex(source);
    let parsed = parser::parse(&lexed.tokens, &lexed.lines, context);

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parsed.diagnostics);

    let module = if diagnostics.is_empty() {
        let resolved = sema::resolve(&parsed.statements, &lexed.lines);
        diagnostics.extend(resolved.diagnostics);
        resolved.module
    } else {
        debug!(
            errors = diagnostics.len(),
            "skipping semantic analysis after syntax errors"
        );
        None
    };

    Compilation {
        lines: lexed.lines,
        tokens: lexed.tokens,
        statements: parsed.statements,
        module,
        diagnostics,
    }
}
