//! Build configuration
//!
//! Everything the command line (or its environment variables) can tune,
//! validated once and handed to the resolver, the manifest generator and
//! the build.

use std::path::{PathBuf, MAIN_SEPARATOR};

use jsdep_files::{FileAccess, FileFinder, FileTypeRecognizer, FilenameConverter};
use jsdep_resolver::{DependencyResolver, ManifestContentsGenerator, RemoteConfig};
use thiserror::Error;

pub const DEFAULT_REMOTE_SYMBOL: &str = "{remote}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the {which} suffix must not be empty")]
    EmptySuffix { which: &'static str },

    #[error("the {which} suffix '{suffix}' must not contain dots or path separators")]
    InvalidSuffix { which: &'static str, suffix: String },

    #[error("compiled and manifest suffixes are both '{0}'")]
    SameSuffix(String),

    #[error("the remote symbol must not be empty")]
    EmptyRemoteSymbol,
}

/// External program used to compile a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCommand {
    pub program: PathBuf,
    /// Passed before the input files.
    pub args: Vec<String>,
}

impl CompilerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub converter: FilenameConverter,
    pub remote: Option<RemoteConfig>,
    /// `None` selects the built-in concatenation.
    pub compiler: Option<CompilerCommand>,
}

impl BuildConfig {
    /// Validate the two suffixes and build a configuration around them.
    pub fn new(compiled_suffix: &str, manifest_suffix: &str) -> Result<Self, ConfigError> {
        check_suffix("compiled", compiled_suffix)?;
        check_suffix("manifest", manifest_suffix)?;
        if compiled_suffix == manifest_suffix {
            return Err(ConfigError::SameSuffix(compiled_suffix.to_string()));
        }

        Ok(Self {
            converter: FilenameConverter::new(compiled_suffix, manifest_suffix),
            remote: None,
            compiler: None,
        })
    }

    pub fn with_remote(
        mut self,
        folder: impl Into<PathBuf>,
        symbol: &str,
    ) -> Result<Self, ConfigError> {
        if symbol.is_empty() {
            return Err(ConfigError::EmptyRemoteSymbol);
        }
        self.remote = Some(RemoteConfig::new(folder, symbol));
        Ok(self)
    }

    pub fn with_compiler(mut self, compiler: CompilerCommand) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn resolver<F: FileAccess>(&self, files: F) -> DependencyResolver<F> {
        let resolver = DependencyResolver::new(files);
        match &self.remote {
            Some(remote) => resolver.with_remote(remote.clone()),
            None => resolver,
        }
    }

    pub fn manifest_generator(&self) -> ManifestContentsGenerator {
        let generator = ManifestContentsGenerator::new(self.converter.clone());
        match &self.remote {
            Some(remote) => generator.with_remote(remote.clone()),
            None => generator,
        }
    }

    pub fn finder(&self) -> FileFinder {
        FileFinder::new(FileTypeRecognizer::new(&self.converter))
    }
}

fn check_suffix(which: &'static str, suffix: &str) -> Result<(), ConfigError> {
    if suffix.is_empty() {
        return Err(ConfigError::EmptySuffix { which });
    }
    if suffix.contains(['.', '/', MAIN_SEPARATOR]) {
        return Err(ConfigError::InvalidSuffix {
            which,
            suffix: suffix.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsdep_files::{DEFAULT_COMPILED_SUFFIX, DEFAULT_MANIFEST_SUFFIX};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_suffix_validation() {
        assert!(BuildConfig::new("min", "deps").is_ok());
        assert_eq!(
            BuildConfig::new("", "deps").unwrap_err(),
            ConfigError::EmptySuffix { which: "compiled" }
        );
        assert_eq!(
            BuildConfig::new("min", "a.b").unwrap_err(),
            ConfigError::InvalidSuffix {
                which: "manifest",
                suffix: "a.b".to_string()
            }
        );
        assert_eq!(
            BuildConfig::new("x", "x").unwrap_err(),
            ConfigError::SameSuffix("x".to_string())
        );
    }

    #[test]
    fn test_remote_symbol_required() {
        let config = BuildConfig::default();
        assert_eq!(
            config.with_remote("vendor", "").unwrap_err(),
            ConfigError::EmptyRemoteSymbol
        );
    }

    #[test]
    fn test_default_matches_default_suffixes() {
        let config = BuildConfig::default();
        assert_eq!(config.converter.compiled_suffix(), DEFAULT_COMPILED_SUFFIX);
        assert_eq!(config.converter.manifest_suffix(), DEFAULT_MANIFEST_SUFFIX);
    }
}
