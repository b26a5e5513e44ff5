use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

/// The directives understood in a file's leading comment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `@require <path>`
    Require,
    /// `@root`
    Root,
    /// `@nocompile <path>` or `@require <path> @nocompile`
    NoCompile,
    /// `@remote <path>`
    Remote,
}

impl AnnotationKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AnnotationKind::Require => "require",
            AnnotationKind::Root => "root",
            AnnotationKind::NoCompile => "nocompile",
            AnnotationKind::Remote => "remote",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "require" => Some(AnnotationKind::Require),
            "root" => Some(AnnotationKind::Root),
            "nocompile" => Some(AnnotationKind::NoCompile),
            "remote" => Some(AnnotationKind::Remote),
            _ => None,
        }
    }

    /// Whether the directive names another file.
    pub fn takes_path(&self) -> bool {
        !matches!(self, AnnotationKind::Root)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.keyword())
    }
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// The path exactly as written; `None` for `@root`.
    pub target: Option<String>,
    /// 1-based line number.
    pub line: usize,
    /// Byte range of the line within the file.
    pub span: Range<usize>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, target: Option<String>, line: usize, span: Range<usize>) -> Self {
        Self {
            kind,
            target,
            line,
            span,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {} (line {})", self.kind, target, self.line),
            None => write!(f, "{} (line {})", self.kind, self.line),
        }
    }
}

/// A directive that couldn't be understood, or a read failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{}: {}", .path.display(), .line, .message)]
pub struct AnnotationError {
    pub path: PathBuf,
    pub line: usize,
    pub span: Range<usize>,
    pub message: String,
}

impl AnnotationError {
    pub fn new(
        path: impl Into<PathBuf>,
        line: usize,
        span: Range<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            span,
            message: message.into(),
        }
    }
}
