//! File type recognition
//!
//! Categories are named predicates kept in a registry, so callers can add
//! their own classifications without touching the recognizer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::naming::{FilenameConverter, SCRIPT_EXTENSION, STYLESHEET_EXTENSION};

/// A pure predicate over a path.
pub type Recognition = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// Lookup of a category nobody registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown file category '{0}'")]
pub struct UnknownCategory(pub String);

/// Whether `path` names a script.
pub fn is_script(path: &Path) -> bool {
    has_extension(path, SCRIPT_EXTENSION)
}

/// Whether `path` names a stylesheet.
pub fn is_stylesheet(path: &Path) -> bool {
    has_extension(path, STYLESHEET_EXTENSION)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.to_str()
        .and_then(|name| name.strip_suffix(extension))
        .is_some_and(|rest| rest.ends_with('.'))
}

pub struct FileTypeRecognizer {
    recognitions: BTreeMap<String, Recognition>,
}

impl FileTypeRecognizer {
    pub const SCRIPT: &'static str = "script";
    pub const STYLESHEET: &'static str = "stylesheet";
    /// A script that isn't a compiled artifact.
    pub const SOURCE: &'static str = "source";
    pub const COMPILED: &'static str = "compiled";
    pub const MANIFEST: &'static str = "manifest";

    /// A recognizer with no categories at all.
    pub fn empty() -> Self {
        Self {
            recognitions: BTreeMap::new(),
        }
    }

    /// A recognizer with the built-in categories, using `converter` to spot
    /// compiled and manifest artifacts.
    pub fn new(converter: &FilenameConverter) -> Self {
        let mut recognizer = Self::empty();
        recognizer.register(Self::SCRIPT, is_script);
        recognizer.register(Self::STYLESHEET, is_stylesheet);

        let compiled = converter.clone();
        recognizer.register(Self::SOURCE, move |path| {
            is_script(path) && !compiled.is_compiled_name(path)
        });

        let compiled = converter.clone();
        recognizer.register(Self::COMPILED, move |path| compiled.is_compiled_name(path));

        let manifest = converter.clone();
        recognizer.register(Self::MANIFEST, move |path| manifest.is_manifest_name(path));

        recognizer
    }

    /// Add a category, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, recognition: F)
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.recognitions.insert(name.into(), Box::new(recognition));
    }

    /// Run the predicate registered under `category`.
    pub fn recognize(&self, category: &str, path: &Path) -> Result<bool, UnknownCategory> {
        self.recognitions
            .get(category)
            .map(|recognition| recognition(path))
            .ok_or_else(|| UnknownCategory(category.to_string()))
    }

    /// Every category `path` belongs to.
    pub fn classify(&self, path: &Path) -> BTreeSet<&str> {
        self.recognitions
            .iter()
            .filter(|(_, recognition)| recognition(path))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.recognitions.keys().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.recognitions.contains_key(category)
    }
}

impl Default for FileTypeRecognizer {
    fn default() -> Self {
        Self::new(&FilenameConverter::default())
    }
}

impl fmt::Debug for FileTypeRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTypeRecognizer")
            .field("categories", &self.recognitions.keys().collect::<Vec<_>>())
            .finish()
    }
}
