//! Dependency annotations read from the leading comment block of a script.

pub mod annotation;
pub mod parser;

pub use annotation::{Annotation, AnnotationError, AnnotationKind};
pub use parser::{parse_annotations, AnnotationParser, ParsedAnnotations};
