//! Recursive discovery of sources and build artifacts

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::recognizer::{FileTypeRecognizer, UnknownCategory};

#[derive(Debug, Error)]
pub enum FindError {
    #[error("cannot read directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
}

/// Walks directory trees depth-first, entries sorted by name, returning the
/// files whose categories match a query.
#[derive(Debug, Default)]
pub struct FileFinder {
    recognizer: FileTypeRecognizer,
}

impl FileFinder {
    pub fn new(recognizer: FileTypeRecognizer) -> Self {
        Self { recognizer }
    }

    pub fn recognizer(&self) -> &FileTypeRecognizer {
        &self.recognizer
    }

    /// Script sources, excluding compiled output.
    pub fn find_source_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FindError> {
        self.find(dir, &[FileTypeRecognizer::SOURCE])
    }

    /// Compiled scripts and manifests.
    pub fn find_artifact_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FindError> {
        self.find(
            dir,
            &[FileTypeRecognizer::COMPILED, FileTypeRecognizer::MANIFEST],
        )
    }

    /// Files belonging to any of `categories`.
    pub fn find(&self, dir: &Path, categories: &[&str]) -> Result<Vec<PathBuf>, FindError> {
        if let Some(unknown) = categories.iter().find(|c| !self.recognizer.contains(c)) {
            return Err(UnknownCategory(unknown.to_string()).into());
        }

        // walkdir only reports an unreadable root once iteration starts.
        fs::read_dir(dir).map_err(|source| FindError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut found = Vec::new();
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    None
                }
            });

        for entry in walker {
            if !is_file(&entry) {
                continue;
            }
            if self.matches(entry.path(), categories)? {
                found.push(entry.into_path());
            }
        }
        Ok(found)
    }

    fn matches(&self, path: &Path, categories: &[&str]) -> Result<bool, FindError> {
        for category in categories {
            if self.recognizer.recognize(category, path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Regular files, and symlinks that resolve to one. Directory links are
/// never descended into.
fn is_file(entry: &DirEntry) -> bool {
    if !entry.path_is_symlink() {
        return entry.file_type().is_file();
    }
    match fs::metadata(entry.path()) {
        Ok(metadata) => metadata.is_file(),
        Err(_) => {
            debug!(path = %entry.path().display(), "skipping dangling entry");
            false
        }
    }
}
