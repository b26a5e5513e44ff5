//! Filename convention tying sources to their compiled output and manifests
//!
//! `app/main.js` compiles to `app/main.compiled.js` and describes its
//! runtime requirements in `app/main.js.manifest`. Every transform only looks
//! at the end of the path string, so directory names containing dots are
//! never touched.

use std::path::{Path, PathBuf};

/// Extension of script files, without the leading dot.
pub const SCRIPT_EXTENSION: &str = "js";
/// Extension of stylesheet files, without the leading dot.
pub const STYLESHEET_EXTENSION: &str = "css";
pub const DEFAULT_COMPILED_SUFFIX: &str = "compiled";
pub const DEFAULT_MANIFEST_SUFFIX: &str = "manifest";

/// Maps between source, compiled and manifest filenames.
///
/// All transforms are pure. A path that doesn't have the expected shape is
/// returned unchanged rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameConverter {
    compiled_suffix: String,
    manifest_suffix: String,
}

impl FilenameConverter {
    pub fn new(compiled_suffix: impl Into<String>, manifest_suffix: impl Into<String>) -> Self {
        Self {
            compiled_suffix: compiled_suffix.into(),
            manifest_suffix: manifest_suffix.into(),
        }
    }

    pub fn compiled_suffix(&self) -> &str {
        &self.compiled_suffix
    }

    pub fn manifest_suffix(&self) -> &str {
        &self.manifest_suffix
    }

    /// `foo.js` → `foo.compiled.js`
    pub fn to_compiled_name(&self, path: &Path) -> PathBuf {
        rewrite(path, |name| {
            name.strip_suffix(&script_suffix())
                .map(|stem| format!("{stem}.{}.{SCRIPT_EXTENSION}", self.compiled_suffix))
        })
    }

    /// `foo.compiled.js` → `foo.js`
    pub fn to_source_name_from_compiled(&self, path: &Path) -> PathBuf {
        rewrite(path, |name| {
            name.strip_suffix(&self.compiled_ending())
                .map(|stem| format!("{stem}.{SCRIPT_EXTENSION}"))
        })
    }

    /// `foo.js` → `foo.js.manifest`
    pub fn to_manifest_name(&self, path: &Path) -> PathBuf {
        rewrite(path, |name| {
            name.ends_with(&script_suffix())
                .then(|| format!("{name}.{}", self.manifest_suffix))
        })
    }

    /// `foo.js.manifest` → `foo.js`
    pub fn to_source_name_from_manifest(&self, path: &Path) -> PathBuf {
        rewrite(path, |name| {
            name.strip_suffix(&format!(".{}", self.manifest_suffix))
                .filter(|source| source.ends_with(&script_suffix()))
                .map(str::to_string)
        })
    }

    /// Whether `path` looks like the output of [`Self::to_compiled_name`].
    pub fn is_compiled_name(&self, path: &Path) -> bool {
        path.to_str()
            .is_some_and(|name| name.ends_with(&self.compiled_ending()))
    }

    /// Whether `path` looks like the output of [`Self::to_manifest_name`].
    pub fn is_manifest_name(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|name| {
            name.ends_with(&format!("{}.{}", script_suffix(), self.manifest_suffix))
        })
    }

    fn compiled_ending(&self) -> String {
        format!(".{}.{SCRIPT_EXTENSION}", self.compiled_suffix)
    }
}

impl Default for FilenameConverter {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILED_SUFFIX, DEFAULT_MANIFEST_SUFFIX)
    }
}

fn script_suffix() -> String {
    format!(".{SCRIPT_EXTENSION}")
}

/// Apply a string transform, falling back to the original path when the
/// path isn't UTF-8 or the transform doesn't apply.
fn rewrite(path: &Path, transform: impl FnOnce(&str) -> Option<String>) -> PathBuf {
    path.to_str()
        .and_then(transform)
        .map(PathBuf::from)
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_compiled_name() {
        let converter = FilenameConverter::default();
        assert_eq!(converter.to_compiled_name(&p("foo.js")), p("foo.compiled.js"));
        assert_eq!(
            converter.to_compiled_name(&p("lib.v2/app/main.js")),
            p("lib.v2/app/main.compiled.js")
        );
        assert_eq!(converter.to_compiled_name(&p("style.css")), p("style.css"));
        assert_eq!(converter.to_compiled_name(&p("dir.js/readme")), p("dir.js/readme"));
    }

    #[test]
    fn test_source_name_from_compiled() {
        let converter = FilenameConverter::default();
        assert_eq!(
            converter.to_source_name_from_compiled(&p("a/foo.compiled.js")),
            p("a/foo.js")
        );
        assert_eq!(converter.to_source_name_from_compiled(&p("a/foo.js")), p("a/foo.js"));
        assert_eq!(
            converter.to_source_name_from_compiled(&p("foo.compiled.css")),
            p("foo.compiled.css")
        );
    }

    #[test]
    fn test_manifest_name() {
        let converter = FilenameConverter::default();
        assert_eq!(converter.to_manifest_name(&p("a/foo.js")), p("a/foo.js.manifest"));
        assert_eq!(converter.to_manifest_name(&p("a/foo.css")), p("a/foo.css"));
        assert_eq!(
            converter.to_source_name_from_manifest(&p("a/foo.js.manifest")),
            p("a/foo.js")
        );
        // Only a manifest of a script is a manifest.
        assert_eq!(
            converter.to_source_name_from_manifest(&p("notes.manifest")),
            p("notes.manifest")
        );
    }

    #[test]
    fn test_custom_suffixes() {
        let converter = FilenameConverter::new("min", "deps");
        assert_eq!(converter.to_compiled_name(&p("x.js")), p("x.min.js"));
        assert_eq!(converter.to_manifest_name(&p("x.js")), p("x.js.deps"));
        assert!(converter.is_compiled_name(&p("x.min.js")));
        assert!(!converter.is_compiled_name(&p("x.compiled.js")));
        assert!(converter.is_manifest_name(&p("x.js.deps")));
    }

    #[test]
    fn test_artifact_predicates() {
        let converter = FilenameConverter::default();
        assert!(converter.is_compiled_name(&p("a/b.compiled.js")));
        assert!(!converter.is_compiled_name(&p("a/b.js")));
        assert!(converter.is_manifest_name(&p("a/b.js.manifest")));
        assert!(!converter.is_manifest_name(&p("a/b.manifest")));
    }
}
