//! Nodes of the resolution tree

use std::path::{Path, PathBuf};

pub(crate) type NodeId = usize;

/// One outgoing edge of a visited file, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Edge {
    /// A plain script inside the same package.
    Script(NodeId),
    Stylesheet(PathBuf),
    /// A file carrying `@root`, flattened into its own set.
    Package(PathBuf),
    NoCompile(PathBuf),
}

/// A file visited while resolving.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    is_root: bool,
    no_compile: bool,
    remote_path: Option<PathBuf>,
    pub(crate) edges: Vec<Edge>,
}

impl SourceFile {
    pub(crate) fn new(path: PathBuf, is_root: bool) -> Self {
        Self {
            path,
            is_root,
            no_compile: false,
            remote_path: None,
            edges: Vec::new(),
        }
    }

    pub(crate) fn remote(mut self, remote_path: PathBuf) -> Self {
        self.remote_path = Some(remote_path);
        self
    }

    pub(crate) fn marked_no_compile(mut self) -> Self {
        self.no_compile = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marked `@root`, or the entry point.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// First reached through `@nocompile`; such files are never parsed.
    pub fn is_no_compile(&self) -> bool {
        self.no_compile
    }

    pub fn is_remote(&self) -> bool {
        self.remote_path.is_some()
    }

    /// The path as written after `@remote`, relative to the remote folder.
    pub fn remote_path(&self) -> Option<&Path> {
        self.remote_path.as_deref()
    }

    pub fn stylesheets(&self) -> impl Iterator<Item = &Path> {
        self.edges.iter().filter_map(|edge| match edge {
            Edge::Stylesheet(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn packages(&self) -> impl Iterator<Item = &Path> {
        self.edges.iter().filter_map(|edge| match edge {
            Edge::Package(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn no_compile_paths(&self) -> impl Iterator<Item = &Path> {
        self.edges.iter().filter_map(|edge| match edge {
            Edge::NoCompile(path) => Some(path.as_path()),
            _ => None,
        })
    }

    /// Number of plain scripts this file requires directly.
    pub fn script_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|edge| matches!(edge, Edge::Script(_)))
            .count()
    }
}
