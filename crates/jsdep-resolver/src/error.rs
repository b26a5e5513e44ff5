//! Resolution and build failures

use std::io;
use std::path::{Path, PathBuf};

use jsdep_annotations::AnnotationError;
use thiserror::Error;

/// Everything that can stop a resolution or a build.
#[derive(Debug, Error)]
pub enum Error {
    /// A required file, or the entry root, does not exist.
    #[error("missing file: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// A file requires itself, directly or through other files.
    #[error("recursive dependency: {}", format_chain(.chain))]
    Recursion { chain: Vec<PathBuf> },

    /// Annotation blocks couldn't be parsed, or the compile step failed.
    #[error("{}", format_errors(.errors))]
    Parsing {
        errors: Vec<String>,
        /// Structured form of the annotation errors, empty for compile failures.
        diagnostics: Vec<AnnotationError>,
    },

    /// An artifact couldn't be written or removed.
    #[error("cannot write {}: {source}", .path.display())]
    CannotWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Error kinds, for callers that report each one distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingFile,
    Recursion,
    Parsing,
    CannotWrite,
}

impl Error {
    pub fn parsing(errors: Vec<String>) -> Self {
        Error::Parsing {
            errors,
            diagnostics: Vec::new(),
        }
    }

    pub fn from_diagnostics(diagnostics: Vec<AnnotationError>) -> Self {
        Error::Parsing {
            errors: diagnostics.iter().map(ToString::to_string).collect(),
            diagnostics,
        }
    }

    pub fn cannot_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::CannotWrite {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFile { .. } => ErrorKind::MissingFile,
            Error::Recursion { .. } => ErrorKind::Recursion,
            Error::Parsing { .. } => ErrorKind::Parsing,
            Error::CannotWrite { .. } => ErrorKind::CannotWrite,
        }
    }

    /// The path a [`Error::MissingFile`] reports.
    pub fn missing_path(&self) -> Option<&Path> {
        match self {
            Error::MissingFile { path } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_errors(errors: &[String]) -> String {
    match errors {
        [] => "parsing failed".to_string(),
        [only] => only.clone(),
        many => format!("{} errors:\n  {}", many.len(), many.join("\n  ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let missing = Error::MissingFile {
            path: PathBuf::from("foo/bar.js"),
        };
        assert_eq!(missing.to_string(), "missing file: foo/bar.js");
        assert_eq!(missing.kind(), ErrorKind::MissingFile);
        assert_eq!(missing.missing_path(), Some(Path::new("foo/bar.js")));

        let cycle = Error::Recursion {
            chain: vec!["a.js".into(), "b.js".into(), "a.js".into()],
        };
        assert_eq!(cycle.to_string(), "recursive dependency: a.js -> b.js -> a.js");

        let parsing = Error::parsing(vec!["one".into(), "two".into()]);
        assert_eq!(parsing.to_string(), "2 errors:\n  one\n  two");
    }

    #[test]
    fn test_from_diagnostics() {
        let err = Error::from_diagnostics(vec![AnnotationError::new(
            "a.js",
            3,
            10..20,
            "@require expects a path",
        )]);
        match err {
            Error::Parsing {
                errors,
                diagnostics,
            } => {
                assert_eq!(errors, vec!["a.js:3: @require expects a path".to_string()]);
                assert_eq!(diagnostics.len(), 1);
            }
            other => panic!("expected Parsing, got {other:?}"),
        }
    }
}
