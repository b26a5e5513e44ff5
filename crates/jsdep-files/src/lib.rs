//! # jsdep files
//!
//! File-level building blocks shared by the resolver and the driver:
//! the source/compiled/manifest naming convention, file type recognition,
//! directory walking, lexical path helpers and the injectable file access
//! layer used to read annotation headers.

pub mod access;
pub mod finder;
pub mod naming;
pub mod paths;
pub mod recognizer;

pub use access::{DiskFileAccess, FileAccess, MemoryFileAccess};
pub use finder::{FileFinder, FindError};
pub use naming::{
    FilenameConverter, DEFAULT_COMPILED_SUFFIX, DEFAULT_MANIFEST_SUFFIX, SCRIPT_EXTENSION,
    STYLESHEET_EXTENSION,
};
pub use paths::{normalize, relative_to};
pub use recognizer::{is_script, is_stylesheet, FileTypeRecognizer, UnknownCategory};
