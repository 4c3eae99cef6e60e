use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

use crate::application::source::{FetchError, ResourceSource};

/// Reads resources from a local site directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path);
        if path.trim().is_empty() {
            return Err(FetchError::invalid_path(path, "path is empty"));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(FetchError::invalid_path(path, "parent segments are not allowed"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FetchError::invalid_path(path, "path must be relative"));
                }
            }
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceSource for DirectorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        debug!(file = %file.display(), "reading resource");

        tokio::fs::read_to_string(&file)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => FetchError::NotFound {
                    path: path.to_string(),
                },
                _ => FetchError::Io {
                    path: path.to_string(),
                    source,
                },
            })
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
