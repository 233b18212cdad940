use chung::ast::display::render_tree;
use chung::diagnostics::{DriverError, render};
use chung::types::Context;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Checks a chung source file.
#[derive(Parser, Debug)]
#[command(name = "chungc", version, about)]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Print the token stream
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    dump_ast: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,
}

fn run(cli: &Cli) -> Result<(), DriverError> {
    let contents = fs::read_to_string(&cli.file).map_err(|source| DriverError::Io {
        path: cli.file.clone(),
        source,
    })?;
    let filename = cli.file.display().to_string();

    let compilation = chung::compile_source(&contents, &Context::new());

    if cli.dump_tokens {
        for token in &compilation.tokens {
            println!("{}:{}\t{}", token.loc.line, token.loc.column, token);
        }
    }
    if cli.dump_ast {
        print!("{}", render_tree(&compilation.statements));
    }

    if !compilation.diagnostics.is_empty() {
        eprint!(
            "{}",
            render(&filename, &contents, &compilation.diagnostics, !cli.no_color)
        );
        return Err(DriverError::Failed {
            count: compilation.diagnostics.len(),
        });
    }

    if let Some(module) = &compilation.module {
        debug!(
            functions = module.functions.len(),
            decls = module.decls.len(),
            "module is ready for code generation"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::Failed { count }) => {
            debug!(count, "compilation failed");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
