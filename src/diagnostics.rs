//! Diagnostics shared by every stage of the front end.
//!
//! Lex, parse and semantic errors all have the same shape: a message, the
//! location it is anchored at, and the text of the offending source line.
//! Turning them into terminal output is done by [`render`], which builds an
//! ariadne report per diagnostic.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use ariadne::{ColorGenerator, Config, Label, Report, ReportKind, Source};
use thiserror::Error;
use yansi::Paint;

use crate::lexer::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lex,
    Parse,
    Sema,
}

impl Stage {
    pub fn code(self) -> &'static str {
        match self {
            Stage::Lex => "LexError",
            Stage::Parse => "ParseError",
            Stage::Sema => "SemaError",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lex => f.write_str("lex"),
            Stage::Parse => f.write_str("parse"),
            Stage::Sema => f.write_str("semantic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} error at {}:{}: {message}", .loc.line, .loc.column)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub loc: SourceLocation,
    pub source_line: String,
    pub note: Option<String>,
}

impl Diagnostic {
    pub fn new(
        stage: Stage,
        message: impl Into<String>,
        loc: SourceLocation,
        lines: &[String],
    ) -> Self {
        let source_line = loc
            .line
            .checked_sub(1)
            .and_then(|index| lines.get(index))
            .cloned()
            .unwrap_or_default();
        Diagnostic {
            stage,
            message: message.into(),
            loc,
            source_line,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Errors of the command line driver, as opposed to diagnostics about the
/// program being compiled.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("compilation failed with {count} diagnostic(s)")]
    Failed { count: usize },
}

/// Character range of `loc` inside `source`, as ariadne expects it.
fn char_span(source: &str, loc: &SourceLocation) -> Range<usize> {
    let mut offset = 0;
    for line in source.split_inclusive('\n').take(loc.line.saturating_sub(1)) {
        offset += line.chars().count();
    }
    let total = source.chars().count();
    let start = (offset + loc.column.saturating_sub(1)).min(total);
    let end = (start + loc.length.max(1)).min(total).max(start);
    start..end
}

fn build_report<'a>(
    file: &str,
    source: &str,
    diagnostic: &Diagnostic,
    color: bool,
) -> Report<'a, (String, Range<usize>)> {
    let span = char_span(source, &diagnostic.loc);
    let mut colors = ColorGenerator::new();
    let mut report = Report::build(ReportKind::Error, (file.to_string(), span.clone()))
        .with_config(Config::default().with_color(color))
        .with_code(diagnostic.stage.code())
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((file.to_string(), span))
                .with_message(&diagnostic.message)
                .with_color(colors.next()),
        );
    if let Some(note) = &diagnostic.note {
        report = report.with_note(note);
    }
    report.finish()
}

/// Renders every diagnostic against `source` and appends a summary line.
pub fn render(file: &str, source: &str, diagnostics: &[Diagnostic], color: bool) -> String {
    let source_cache = Source::from(source.to_string());
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let report = build_report(file, source, diagnostic, color);
        if report
            .write((file.to_string(), source_cache.clone()), &mut out)
            .is_err()
        {
            // Writing into a Vec only fails on a broken report; fall back to
            // the plain one-line form.
            out.extend_from_slice(format!("{diagnostic}\n").as_bytes());
        }
    }

    let mut rendered = String::from_utf8_lossy(&out).into_owned();
    if !diagnostics.is_empty() {
        let summary = format!(
            "error: could not compile '{}' due to {} previous error(s)",
            file,
            diagnostics.len()
        );
        if color {
            rendered.push_str(&summary.red().bold().to_string());
        } else {
            rendered.push_str(&summary);
        }
        rendered.push('\n');
    }
    rendered
}

#[cfg(test)]
mod test {
    use super::*;

    fn loc(line: usize, column: usize, length: usize) -> SourceLocation {
        SourceLocation {
            line,
            column,
            length,
        }
    }

    #[test]
    fn test_diagnostic_picks_source_line() {
        let lines = vec!["let x = 1;".to_string(), "let y = @;".to_string()];
        let diagnostic = Diagnostic::new(Stage::Lex, "bad character", loc(2, 9, 1), &lines);
        assert_eq!(diagnostic.source_line, "let y = @;");
        assert_eq!(
            diagnostic.to_string(),
            "lex error at 2:9: bad character"
        );
    }

    #[test]
    fn test_diagnostic_past_last_line_has_empty_source_line() {
        let lines = vec!["x".to_string()];
        let diagnostic = Diagnostic::new(Stage::Parse, "eof", loc(3, 1, 0), &lines);
        assert_eq!(diagnostic.source_line, "");
    }

    #[test]
    fn test_char_span_counts_previous_lines() {
        let source = "ab\ncd ef\n";
        assert_eq!(char_span(source, &loc(1, 1, 2)), 0..2);
        assert_eq!(char_span(source, &loc(2, 4, 2)), 6..8);
        // end of input clamps to the source length
        assert_eq!(char_span(source, &loc(3, 1, 0)), 9..9);
    }

    #[test]
    fn test_render_plain() {
        let source = "let x = @;\n";
        let lines = vec!["let x = @;".to_string()];
        let diagnostic = Diagnostic::new(
            Stage::Lex,
            "unrecognized character '@'",
            loc(1, 9, 1),
            &lines,
        )
        .with_note("remove it");
        let rendered = render("main.chung", source, &[diagnostic], false);
        assert!(rendered.contains("unrecognized character '@'"));
        assert!(rendered.contains("LexError"));
        assert!(rendered.contains("remove it"));
        assert!(rendered.contains("due to 1 previous error(s)"));
    }

    #[test]
    fn test_render_nothing() {
        assert_eq!(render("main.chung", "", &[], false), "");
    }
}
