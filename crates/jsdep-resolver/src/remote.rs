use std::path::{Path, PathBuf};

/// Where `@remote` paths live, and the alias manifests use for that place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub folder: PathBuf,
    pub symbol: String,
}

impl RemoteConfig {
    pub fn new(folder: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            symbol: symbol.into(),
        }
    }

    /// `symbol/rest` for a path inside the remote folder.
    pub fn render(&self, path: &Path) -> Option<String> {
        let folder = jsdep_files::normalize(&self.folder);
        let rest = path.strip_prefix(&folder).ok()?;
        let rest: Vec<_> = rest
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(format!("{}/{}", self.symbol, rest.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let remote = RemoteConfig::new("./vendor/cdn", "{remote}");
        assert_eq!(
            remote.render(Path::new("vendor/cdn/jquery/jquery.js")).as_deref(),
            Some("{remote}/jquery/jquery.js")
        );
        assert_eq!(remote.render(Path::new("app/main.js")), None);
    }
}
