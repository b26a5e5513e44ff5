//! File access used while resolving
//!
//! The resolver reads files only through [`FileAccess`], which lets tests
//! feed fixed content without a real directory tree.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::paths::normalize;

pub trait FileAccess {
    /// Whether `path` names an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    /// Open `path` for streaming, line-oriented reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;
}

impl<T: FileAccess + ?Sized> FileAccess for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        (**self).open(path)
    }
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileAccess;

impl FileAccess for DiskFileAccess {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Serves files from memory. Paths are normalized on insert and lookup.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileAccess {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileAccess for MemoryFileAccess {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let contents = self.files.get(&normalize(path)).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        Ok(Box::new(Cursor::new(contents.as_bytes())))
    }
}
