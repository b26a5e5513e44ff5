//! Annotation-driven dependency resolution
//!
//! Files are visited depth-first from the entry root. Each file's leading
//! annotations name the files it needs; the walk follows them, keeping the
//! chain of files currently being resolved so that a file requiring one of
//! its own ancestors is reported as a cycle, while a file reached through
//! two unrelated branches is simply reused.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use jsdep_annotations::{parse_annotations, AnnotationError, AnnotationKind, ParsedAnnotations};
use jsdep_files::{is_stylesheet, normalize, FileAccess};
use tracing::{debug, info, trace};

use crate::collection::DependencySetCollection;
use crate::dependency_set::DependencySet;
use crate::error::{Error, Result};
use crate::remote::RemoteConfig;
use crate::source_file::{Edge, NodeId, SourceFile};

/// Output of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub collection: DependencySetCollection,
    /// Every visited file, in the order its resolution finished.
    pub files: Vec<SourceFile>,
}

/// Resolves an entry file into its [`DependencySetCollection`].
#[derive(Debug, Clone)]
pub struct DependencyResolver<F> {
    files: F,
    remote: Option<RemoteConfig>,
}

impl<F: FileAccess> DependencyResolver<F> {
    pub fn new(files: F) -> Self {
        Self {
            files,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn remote(&self) -> Option<&RemoteConfig> {
        self.remote.as_ref()
    }

    /// Resolve `root` into its package sets, deepest package first.
    pub fn resolve(&self, root: impl AsRef<Path>) -> Result<DependencySetCollection> {
        self.resolve_tree(root).map(|resolved| resolved.collection)
    }

    /// Like [`Self::resolve`], also returning the visited files.
    pub fn resolve_tree(&self, root: impl AsRef<Path>) -> Result<Resolved> {
        let root = normalize(root.as_ref());
        info!(root = %root.display(), "resolving");

        let mut resolution = Resolution::new(self);
        resolution.visit(root, Reference::Entry)?;
        resolution.finish()
    }
}

/// How a file was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reference {
    Entry,
    Require,
    /// Through `@remote`, with the path as written.
    Remote(PathBuf),
}

enum VisitState {
    /// On the current branch, still being resolved.
    Active,
    Resolved(NodeId),
}

/// State of one `resolve` call.
struct Resolution<'r, F> {
    resolver: &'r DependencyResolver<F>,
    arena: Vec<SourceFile>,
    states: HashMap<PathBuf, VisitState>,
    ancestors: Vec<PathBuf>,
    /// Every `@nocompile` target, wherever it was marked.
    no_compile: HashSet<PathBuf>,
    diagnostics: Vec<AnnotationError>,
    collection: DependencySetCollection,
}

impl<'r, F: FileAccess> Resolution<'r, F> {
    fn new(resolver: &'r DependencyResolver<F>) -> Self {
        Self {
            resolver,
            arena: Vec::new(),
            states: HashMap::new(),
            ancestors: Vec::new(),
            no_compile: HashSet::new(),
            diagnostics: Vec::new(),
            collection: DependencySetCollection::new(),
        }
    }

    fn visit(&mut self, path: PathBuf, reference: Reference) -> Result<NodeId> {
        match self.states.get(&path) {
            Some(VisitState::Resolved(id)) => {
                trace!(path = %path.display(), "already resolved");
                return Ok(*id);
            }
            Some(VisitState::Active) => return Err(self.cycle(path)),
            None => {}
        }

        if !self.resolver.files.exists(&path) {
            return Err(Error::MissingFile { path });
        }

        let parsed = self.parse(&path);
        let is_root = reference == Reference::Entry || parsed.is_root();
        let ParsedAnnotations {
            annotations,
            errors,
        } = parsed;
        debug!(
            path = %path.display(),
            annotations = annotations.len(),
            is_root,
            "visiting"
        );
        self.diagnostics.extend(errors);

        let mut node = SourceFile::new(path.clone(), is_root);
        if let Reference::Remote(written) = reference {
            node = node.remote(written);
        }

        self.states.insert(path.clone(), VisitState::Active);
        self.ancestors.push(path.clone());

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for annotation in annotations {
            let Some(target) = annotation.target else {
                continue;
            };

            let (resolved, reference) = match annotation.kind {
                AnnotationKind::Remote => match &self.resolver.remote {
                    Some(remote) => (
                        normalize(&remote.folder.join(&target)),
                        Reference::Remote(PathBuf::from(&target)),
                    ),
                    None => {
                        self.diagnostics.push(AnnotationError::new(
                            path.clone(),
                            annotation.line,
                            annotation.span,
                            format!("@remote {target} used without a remote folder"),
                        ));
                        continue;
                    }
                },
                _ => (normalize(&dir.join(&target)), Reference::Require),
            };

            let edge = self.edge(resolved, annotation.kind, reference)?;
            node.edges.push(edge);
        }

        self.ancestors.pop();
        let is_root = node.is_root();
        let id = self.push_node(node);
        self.states.insert(path, VisitState::Resolved(id));

        if is_root {
            let set = self.flatten(id);
            info!(
                root = %set.root().display(),
                dependencies = set.dependencies().len(),
                stylesheets = set.stylesheets().len(),
                packages = set.packages().len(),
                "package resolved"
            );
            self.collection.push(set);
        }

        Ok(id)
    }

    fn edge(&mut self, target: PathBuf, kind: AnnotationKind, reference: Reference) -> Result<Edge> {
        if is_stylesheet(&target) {
            self.require_exists(&target)?;
            return Ok(Edge::Stylesheet(target));
        }

        if kind == AnnotationKind::NoCompile {
            self.require_exists(&target)?;
            if !self.states.contains_key(&target) {
                let mut leaf = SourceFile::new(target.clone(), false).marked_no_compile();
                if let Reference::Remote(written) = reference {
                    leaf = leaf.remote(written);
                }
                let id = self.push_node(leaf);
                self.states.insert(target.clone(), VisitState::Resolved(id));
            }
            self.no_compile.insert(target.clone());
            return Ok(Edge::NoCompile(target));
        }

        let child = self.visit(target, reference)?;
        let node = &self.arena[child];
        Ok(if node.is_root() {
            Edge::Package(node.path().to_path_buf())
        } else {
            Edge::Script(child)
        })
    }

    fn require_exists(&self, path: &Path) -> Result<()> {
        if self.resolver.files.exists(path) {
            Ok(())
        } else {
            Err(Error::MissingFile {
                path: path.to_path_buf(),
            })
        }
    }

    fn parse(&self, path: &Path) -> ParsedAnnotations {
        match self.resolver.files.open(path) {
            Ok(reader) => parse_annotations(reader, path),
            Err(e) => ParsedAnnotations {
                annotations: Vec::new(),
                errors: vec![AnnotationError::new(
                    path,
                    0,
                    0..0,
                    format!("cannot open file: {e}"),
                )],
            },
        }
    }

    fn push_node(&mut self, node: SourceFile) -> NodeId {
        self.arena.push(node);
        self.arena.len() - 1
    }

    fn cycle(&self, path: PathBuf) -> Error {
        let start = self
            .ancestors
            .iter()
            .position(|ancestor| *ancestor == path)
            .unwrap_or(0);
        let mut chain = self.ancestors[start..].to_vec();
        chain.push(path);
        Error::Recursion { chain }
    }

    /// Fold a package root and the plain scripts inside its boundary into
    /// one set.
    fn flatten(&self, root: NodeId) -> DependencySet {
        let mut set = DependencySet::new(self.arena[root].path().to_path_buf());
        let mut seen = HashSet::new();
        self.collect(root, &mut set, &mut seen);
        set
    }

    fn collect(&self, id: NodeId, set: &mut DependencySet, seen: &mut HashSet<NodeId>) {
        for edge in &self.arena[id].edges {
            match edge {
                Edge::Script(child) => {
                    if seen.insert(*child) {
                        self.collect(*child, set, seen);
                        set.push_dependency(self.arena[*child].path().to_path_buf());
                    }
                }
                Edge::Stylesheet(path) => set.push_stylesheet(path.clone()),
                Edge::Package(path) => set.push_package(path.clone()),
                Edge::NoCompile(path) => set.push_no_compile(path.clone()),
            }
        }
    }

    fn finish(mut self) -> Result<Resolved> {
        if !self.diagnostics.is_empty() {
            return Err(Error::from_diagnostics(self.diagnostics));
        }

        // A file marked @nocompile anywhere is loaded as-is, never compiled.
        if !self.no_compile.is_empty() {
            for index in 0..self.collection.len() {
                if let Some(set) = self.collection.get_mut(index) {
                    set.drop_dependencies(|path| self.no_compile.contains(path));
                }
            }
        }

        self.collection.dedup();
        Ok(Resolved {
            collection: self.collection,
            files: self.arena,
        })
    }
}
