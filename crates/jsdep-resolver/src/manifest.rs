//! Manifest rollup
//!
//! A compiled package root only contains its own scripts. Everything else its
//! loader has to fetch (stylesheets, other packages, scripts that are never
//! compiled) is listed in a manifest, one path per line, relative to the
//! root's directory.

use std::path::{Path, PathBuf};

use jsdep_files::{relative_to, FilenameConverter};
use tracing::debug;

use crate::collection::DependencySetCollection;
use crate::dependency_set::{push_unique, DependencySet};
use crate::remote::RemoteConfig;

/// Builds the manifest text of each package in a collection.
#[derive(Debug, Clone, Default)]
pub struct ManifestContentsGenerator {
    converter: FilenameConverter,
    remote: Option<RemoteConfig>,
}

impl ManifestContentsGenerator {
    pub fn new(converter: FilenameConverter) -> Self {
        Self {
            converter,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn converter(&self) -> &FilenameConverter {
        &self.converter
    }

    /// Manifest text for the set at `index`, or `None` when that set needs no
    /// manifest. Only the set's own lists decide that: a lone script with no
    /// stylesheets, packages or no-compile paths of its own gets none, even
    /// when earlier sets would roll lines into it.
    ///
    /// For `index > 0` stylesheets and packages are rolled up from every set
    /// up to and including `index`. `no_compile_so_far` is rendered under the
    /// original names and must already include the set's own no-compile paths.
    pub fn generate(
        &self,
        index: usize,
        collection: &DependencySetCollection,
        no_compile_so_far: &[PathBuf],
    ) -> Option<String> {
        let set = collection.get(index)?;
        if is_trivial(set) {
            debug!(root = %set.root().display(), "no manifest needed");
            return None;
        }

        let mut stylesheets = Vec::new();
        let mut packages = Vec::new();
        for rolled in collection.iter().take(index + 1) {
            for path in rolled.stylesheets() {
                push_unique(&mut stylesheets, path.clone());
            }
            for path in rolled.packages() {
                push_unique(&mut packages, path.clone());
            }
        }

        let mut no_compile = Vec::new();
        for path in no_compile_so_far {
            push_unique(&mut no_compile, path.clone());
        }

        let base = set.root().parent().unwrap_or_else(|| Path::new(""));
        let mut lines = Vec::new();
        lines.extend(stylesheets.iter().map(|path| self.render(path, base)));
        lines.extend(
            packages
                .iter()
                .map(|path| self.render(&self.converter.to_compiled_name(path), base)),
        );
        lines.extend(no_compile.iter().map(|path| self.render(path, base)));

        let mut contents = String::new();
        for line in lines {
            contents.push_str(&line);
            contents.push('\n');
        }
        Some(contents)
    }

    pub fn manifest_name(&self, set: &DependencySet) -> PathBuf {
        self.converter.to_manifest_name(set.root())
    }

    /// Insert `contents` into `set` as a pseudo-file named after the
    /// manifest, just before the root.
    pub fn splice_manifest(&self, set: &mut DependencySet, contents: impl Into<String>) {
        let name = self.manifest_name(set);
        set.splice_content(name, contents);
    }

    /// Generate and splice a manifest for every set in order. The returned
    /// vector has one entry per set.
    pub fn generate_all(&self, collection: &mut DependencySetCollection) -> Vec<Option<String>> {
        let mut no_compile_so_far = Vec::new();
        let mut manifests = Vec::with_capacity(collection.len());

        for index in 0..collection.len() {
            if let Some(set) = collection.get(index) {
                no_compile_so_far.extend(set.paths_marked_no_compile().iter().cloned());
            }

            let manifest = self.generate(index, collection, &no_compile_so_far);
            if let (Some(contents), Some(set)) = (&manifest, collection.get_mut(index)) {
                self.splice_manifest(set, contents.clone());
            }
            manifests.push(manifest);
        }

        manifests
    }

    fn render(&self, path: &Path, base: &Path) -> String {
        if let Some(rendered) = self.remote.as_ref().and_then(|remote| remote.render(path)) {
            return rendered;
        }
        slashed(&relative_to(path, base))
    }
}

fn is_trivial(set: &DependencySet) -> bool {
    set.stylesheets().is_empty()
        && set.dependencies().len() == 1
        && set.packages().is_empty()
        && set.paths_marked_no_compile().is_empty()
}

fn slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
