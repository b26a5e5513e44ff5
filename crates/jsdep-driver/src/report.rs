//! Human-readable error output

use std::fs;
use std::io::{self, IsTerminal};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use jsdep_annotations::AnnotationError;
use jsdep_resolver::Error;

use crate::error::DriverError;

/// Print `err` to stderr. Annotation errors are shown against their source
/// line when the file can still be read.
pub fn report(err: &DriverError) {
    match err {
        DriverError::Resolve(Error::Parsing { diagnostics, .. }) if !diagnostics.is_empty() => {
            for diagnostic in diagnostics {
                report_annotation(diagnostic);
            }
        }
        DriverError::Resolve(e @ Error::Parsing { errors, .. }) => {
            eprintln!("error[{}]: compile failed", code(e));
            for message in errors {
                eprintln!("  {message}");
            }
        }
        DriverError::Resolve(e) => eprintln!("error[{}]: {e}", code(e)),
        other => eprintln!("error: {other}"),
    }
}

fn code(err: &Error) -> &'static str {
    match err {
        Error::MissingFile { .. } => "E001",
        Error::Recursion { .. } => "E002",
        Error::Parsing { .. } => "E003",
        Error::CannotWrite { .. } => "E004",
    }
}

fn report_annotation(diagnostic: &AnnotationError) {
    let filename = diagnostic.path.display().to_string();
    let Ok(source) = fs::read_to_string(&diagnostic.path) else {
        eprintln!("error[E003]: {diagnostic}");
        return;
    };
    if diagnostic.line == 0 || diagnostic.span.end > source.len() {
        eprintln!("error[E003]: {diagnostic}");
        return;
    }

    let span = (filename.as_str(), diagnostic.span.clone());
    let printed = Report::build(ReportKind::Error, span.clone())
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(io::stderr().is_terminal()),
        )
        .with_code("E003")
        .with_message("invalid annotation")
        .with_label(
            Label::new(span)
                .with_message(&diagnostic.message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename.as_str(), Source::from(source.as_str())));

    if printed.is_err() {
        eprintln!("error[E003]: {diagnostic}");
    }
}
