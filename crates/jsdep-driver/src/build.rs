//! The resolve → manifest → compile → write pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use jsdep_files::DiskFileAccess;
use jsdep_resolver::{Dependency, DependencySet, DependencySetCollection, Error, Resolved};
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::error::{DriverError, Result};
use crate::processor::{CommandProcessor, ConcatProcessor, Processor};

/// Files written for one package root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub root: PathBuf,
    pub compiled: PathBuf,
    pub manifest: Option<PathBuf>,
}

/// Resolve `entry` on disk.
pub fn resolve(config: &BuildConfig, entry: &Path) -> Result<Resolved> {
    Ok(config.resolver(DiskFileAccess).resolve_tree(entry)?)
}

/// Resolve `entry` and generate every set's manifest, splicing them in.
pub fn manifests(
    config: &BuildConfig,
    entry: &Path,
) -> Result<(DependencySetCollection, Vec<Option<String>>)> {
    let mut collection = resolve(config, entry)?.collection;
    let manifests = config.manifest_generator().generate_all(&mut collection);
    Ok((collection, manifests))
}

/// The processor the configuration asks for.
pub fn processor_for(config: &BuildConfig) -> Box<dyn Processor> {
    match &config.compiler {
        Some(command) => Box::new(CommandProcessor::new(command.clone())),
        None => Box::new(ConcatProcessor),
    }
}

/// Build every package reachable from `entry`, deepest first.
///
/// Each root gets its compiled file and, when it needs one, its manifest,
/// next to the root. The first failure stops the build.
pub fn build(
    config: &BuildConfig,
    entry: &Path,
    processor: &dyn Processor,
) -> Result<Vec<Artifact>> {
    let (collection, manifests) = manifests(config, entry)?;
    let mut artifacts = Vec::with_capacity(collection.len());

    for (set, manifest) in collection.iter().zip(manifests) {
        let root = set.root().to_path_buf();
        let compiled = config.converter.to_compiled_name(&root);
        debug!(root = %root.display(), files = set.dependencies().len(), "compiling");

        let inputs = Inputs::materialize(set)?;
        let output = processor
            .process(&inputs.paths)
            .map_err(|source| DriverError::Process {
                root: root.clone(),
                source,
            })?;
        drop(inputs);

        if !output.successful {
            warn!(root = %root.display(), return_code = output.return_code, "compile failed");
            let errors = if output.errors.is_empty() {
                vec![format!(
                    "{}: compiler exited with code {}",
                    root.display(),
                    output.return_code
                )]
            } else {
                output.errors
            };
            return Err(Error::parsing(errors).into());
        }

        write(&compiled, &output.output)?;
        let manifest = match manifest {
            Some(contents) => {
                let path = config.converter.to_manifest_name(&root);
                write(&path, &contents)?;
                Some(path)
            }
            None => None,
        };

        info!(compiled = %compiled.display(), "package built");
        artifacts.push(Artifact {
            root,
            compiled,
            manifest,
        });
    }

    Ok(artifacts)
}

/// Remove every compiled and manifest artifact under `dir`.
pub fn clean(config: &BuildConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    let artifacts = config.finder().find_artifact_files(dir)?;
    for path in &artifacts {
        fs::remove_file(path).map_err(|e| Error::cannot_write(path, e))?;
        debug!(path = %path.display(), "removed");
    }
    info!(dir = %dir.display(), removed = artifacts.len(), "cleaned");
    Ok(artifacts)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::cannot_write(path, e))?;
    Ok(())
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Processor input for one set. Generated content lives in temporary files
/// removed on drop.
struct Inputs {
    paths: Vec<PathBuf>,
    temporaries: Vec<PathBuf>,
}

impl Inputs {
    fn materialize(set: &DependencySet) -> Result<Self> {
        let mut inputs = Inputs {
            paths: Vec::with_capacity(set.dependencies().len()),
            temporaries: Vec::new(),
        };

        for dependency in set.dependencies() {
            match dependency {
                Dependency::File(path) => inputs.paths.push(path.clone()),
                Dependency::Content { name, contents } => {
                    let file_name = name
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let temp = std::env::temp_dir().join(format!(
                        "jsdep_{}_{}_{}",
                        std::process::id(),
                        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
                        file_name
                    ));
                    fs::write(&temp, contents).map_err(|e| Error::cannot_write(&temp, e))?;
                    inputs.temporaries.push(temp.clone());
                    inputs.paths.push(temp);
                }
            }
        }

        Ok(inputs)
    }
}

impl Drop for Inputs {
    fn drop(&mut self) {
        for temp in &self.temporaries {
            let _ = fs::remove_file(temp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ProcessOutput;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io;

    /// Records what it was asked to compile.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Processor for Recorder {
        fn process(&self, paths: &[PathBuf]) -> io::Result<ProcessOutput> {
            let mut seen = Vec::new();
            for path in paths {
                seen.push(fs::read_to_string(path)?);
            }
            self.calls.borrow_mut().push(seen);
            Ok(ProcessOutput {
                successful: true,
                output: "compiled".to_string(),
                ..ProcessOutput::default()
            })
        }
    }

    struct Failing;

    impl Processor for Failing {
        fn process(&self, _paths: &[PathBuf]) -> io::Result<ProcessOutput> {
            Ok(ProcessOutput {
                successful: false,
                return_code: 2,
                ..ProcessOutput::default()
            })
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("main.js"), "// @require pkg.js\n// @require a.js\nmain\n").unwrap();
        fs::write(root.join("a.js"), "a\n").unwrap();
        fs::write(root.join("pkg.js"), "// @root\npkg\n").unwrap();
        dir
    }

    #[test]
    fn test_build_feeds_manifest_before_root() {
        let dir = fixture();
        let recorder = Recorder::default();
        let entry = dir.path().join("main.js");
        let artifacts = build(&BuildConfig::default(), &entry, &recorder).unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].manifest, None);
        assert_eq!(
            artifacts[1].manifest.as_deref(),
            Some(dir.path().join("main.js.manifest").as_path())
        );

        let calls = recorder.calls.borrow();
        assert_eq!(calls[0], vec!["// @root\npkg\n".to_string()]);
        assert_eq!(
            calls[1],
            vec![
                "a\n".to_string(),
                "pkg.compiled.js\n".to_string(),
                "// @require pkg.js\n// @require a.js\nmain\n".to_string(),
            ]
        );

        assert_eq!(
            fs::read_to_string(dir.path().join("main.compiled.js")).unwrap(),
            "compiled"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("main.js.manifest")).unwrap(),
            "pkg.compiled.js\n"
        );
    }

    #[test]
    fn test_failed_compile_is_a_parsing_error() {
        let dir = fixture();
        let entry = dir.path().join("main.js");
        let err = build(&BuildConfig::default(), &entry, &Failing).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(!dir.path().join("pkg.compiled.js").exists());
    }

    #[test]
    fn test_clean_removes_artifacts_only() {
        let dir = fixture();
        build(&BuildConfig::default(), &dir.path().join("main.js"), &ConcatProcessor).unwrap();

        let mut removed = clean(&BuildConfig::default(), dir.path()).unwrap();
        removed.sort();
        assert_eq!(
            removed,
            vec![
                dir.path().join("main.compiled.js"),
                dir.path().join("main.js.manifest"),
                dir.path().join("pkg.compiled.js"),
            ]
        );
        assert!(dir.path().join("main.js").exists());
    }
}
