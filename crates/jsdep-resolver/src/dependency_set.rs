//! The flattened dependency list of one package root

use std::path::{Path, PathBuf};

/// One entry of [`DependencySet::dependencies`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// A script on disk.
    File(PathBuf),
    /// Generated content that has no file of its own, such as a manifest.
    Content { name: PathBuf, contents: String },
}

impl Dependency {
    pub fn path(&self) -> &Path {
        match self {
            Dependency::File(path) => path,
            Dependency::Content { name, .. } => name,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Dependency::Content { .. })
    }
}

/// Ordered dependencies of a package root.
///
/// `dependencies` always ends with the root itself, and everything before it
/// is in dependency-first order: a script comes after every script it
/// requires. The other lists keep discovery order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencySet {
    stylesheets: Vec<PathBuf>,
    packages: Vec<PathBuf>,
    dependencies: Vec<Dependency>,
    paths_marked_no_compile: Vec<PathBuf>,
}

impl DependencySet {
    /// A set holding nothing but `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            stylesheets: Vec::new(),
            packages: Vec::new(),
            dependencies: vec![Dependency::File(root.into())],
            paths_marked_no_compile: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, path: impl Into<PathBuf>) -> Self {
        self.push_dependency(path.into());
        self
    }

    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.push_stylesheet(path.into());
        self
    }

    pub fn with_package(mut self, path: impl Into<PathBuf>) -> Self {
        self.push_package(path.into());
        self
    }

    pub fn with_no_compile(mut self, path: impl Into<PathBuf>) -> Self {
        self.push_no_compile(path.into());
        self
    }

    /// The package root, always the last dependency.
    pub fn root(&self) -> &Path {
        self.dependencies
            .last()
            .map(Dependency::path)
            .unwrap_or_else(|| Path::new(""))
    }

    pub fn stylesheets(&self) -> &[PathBuf] {
        &self.stylesheets
    }

    pub fn packages(&self) -> &[PathBuf] {
        &self.packages
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn paths_marked_no_compile(&self) -> &[PathBuf] {
        &self.paths_marked_no_compile
    }

    /// Paths of every dependency, in order, including content entries.
    pub fn dependency_paths(&self) -> impl Iterator<Item = &Path> {
        self.dependencies.iter().map(Dependency::path)
    }

    /// Insert generated content just before the root.
    pub fn splice_content(&mut self, name: impl Into<PathBuf>, contents: impl Into<String>) {
        let at = self.dependencies.len() - 1;
        self.dependencies.insert(
            at,
            Dependency::Content {
                name: name.into(),
                contents: contents.into(),
            },
        );
    }

    pub(crate) fn push_dependency(&mut self, path: PathBuf) {
        let dependency = Dependency::File(path);
        if !self.dependencies.contains(&dependency) {
            let at = self.dependencies.len() - 1;
            self.dependencies.insert(at, dependency);
        }
    }

    /// Remove the scripts matching `excluded`. The root always stays.
    pub(crate) fn drop_dependencies(&mut self, excluded: impl Fn(&Path) -> bool) {
        let root = self.dependencies.len() - 1;
        let mut index = 0;
        self.dependencies.retain(|dependency| {
            let keep = index == root || !excluded(dependency.path());
            index += 1;
            keep
        });
    }

    pub(crate) fn push_stylesheet(&mut self, path: PathBuf) {
        push_unique(&mut self.stylesheets, path);
    }

    pub(crate) fn push_package(&mut self, path: PathBuf) {
        push_unique(&mut self.packages, path);
    }

    pub(crate) fn push_no_compile(&mut self, path: PathBuf) {
        push_unique(&mut self.paths_marked_no_compile, path);
    }
}

pub(crate) fn push_unique(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_stays_last() {
        let set = DependencySet::new("app/main.js")
            .with_dependency("app/a.js")
            .with_dependency("app/b.js")
            .with_dependency("app/a.js");

        let paths: Vec<_> = set.dependency_paths().collect();
        assert_eq!(
            paths,
            vec![Path::new("app/a.js"), Path::new("app/b.js"), Path::new("app/main.js")]
        );
        assert_eq!(set.root(), Path::new("app/main.js"));
    }

    #[test]
    fn test_splice_content_before_root() {
        let mut set = DependencySet::new("main.js").with_dependency("a.js");
        set.splice_content("main.js.manifest", "theme.css\n");

        assert_eq!(set.dependencies().len(), 3);
        assert!(set.dependencies()[1].is_content());
        assert_eq!(set.dependencies()[1].path(), Path::new("main.js.manifest"));
        assert_eq!(set.root(), Path::new("main.js"));
    }

    #[test]
    fn test_lists_deduplicate() {
        let set = DependencySet::new("main.js")
            .with_stylesheet("a.css")
            .with_stylesheet("a.css")
            .with_package("pkg.js")
            .with_package("pkg.js")
            .with_no_compile("legacy.js");

        assert_eq!(set.stylesheets(), &[PathBuf::from("a.css")]);
        assert_eq!(set.packages(), &[PathBuf::from("pkg.js")]);
        assert_eq!(set.paths_marked_no_compile(), &[PathBuf::from("legacy.js")]);
    }
}
