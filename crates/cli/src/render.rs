//! Diagnostic rendering for the OPL CLI.
//!
//! Converts the parser's positional [`OplError`]s into ariadne reports
//! for coloured, source-annotated terminal output, or into structured
//! JSON when the output is piped or explicitly requested.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use opl_toolchain_diagnostics::{LineIndex, OplError, Span};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for diagnostics and command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` value, or detect from whether
    /// stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Position mapping ────────────────────────────────────────────────────

/// Map an error's (line, column) to a one-byte span in the whole source.
///
/// The parser reports per-line positions; ariadne wants offsets into the
/// full file. Clamped to the source length for safety on truncated input.
fn error_span(source: &str, error: &OplError) -> Span {
    let index = LineIndex::new(source);
    let line = error.line.saturating_sub(1) as usize;
    let line_start = index.line_start(line).unwrap_or(source.len());
    let start = (line_start + error.column as usize).min(source.len());
    let end = (start + 1).min(source.len()).max(start);
    Span::new(start, end)
}

// ── Rendering ───────────────────────────────────────────────────────────

/// Render parse errors in the chosen format.
///
/// Pretty output goes to stderr with source context; JSON output goes to
/// stdout as an array of `{message, line, column}` objects.
pub(crate) fn render_errors(source: &str, filename: &str, errors: &[OplError], format: Format) {
    if errors.is_empty() {
        return;
    }
    match format {
        Format::Pretty => render_pretty(source, filename, errors),
        Format::Json => render_json(errors),
    }
}

fn render_pretty(source: &str, filename: &str, errors: &[OplError]) {
    let config = Config::default().with_compact(false);

    // Build the Source once (O(n) line index) and reuse across reports.
    let mut cache = (filename, Source::from(source));

    for error in errors {
        let span = error_span(source, error);
        let report = Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(error.message())
            .with_config(config)
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish();

        if report.eprint(&mut cache).is_err() {
            // Fall back to the plain rendering if the terminal write failed.
            eprintln!("{error}");
        }
    }
}

fn render_json(errors: &[OplError]) {
    let objects: Vec<serde_json::Value> = errors
        .iter()
        .map(|error| {
            serde_json::json!({
                "message": error.message(),
                "line": error.line,
                "column": error.column,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&objects).expect("error serialization cannot fail")
    );
}
