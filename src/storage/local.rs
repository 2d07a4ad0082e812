use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::DocumentSource;
use crate::errors::SourceError;

/// Documents under a local root directory; keys are `/`-separated relative paths
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> PathBuf {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            self.root.clone()
        } else {
            self.root.join(key)
        }
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl DocumentSource for LocalSource {
    async fn fetch(&self, key: &str) -> Result<Bytes, SourceError> {
        let path = self.resolve(key);
        if !path.is_file() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }

        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::RequestFailed(format!("{}: {}", path.display(), e)))?;
        Ok(Bytes::from(data))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, SourceError> {
        let dir = self.resolve(prefix);
        if !dir.is_dir() {
            return Err(SourceError::NotFound(dir.display().to_string()));
        }

        let mut keys: Vec<String> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| self.key_for(e.path()))
            .collect();
        keys.sort();

        debug!("Listed {} file(s) under {}", keys.len(), dir.display());
        Ok(keys)
    }

    fn describe(&self, key: &str) -> String {
        self.resolve(key).display().to_string()
    }

    fn presign(&self, _key: &str, _expires_secs: u64) -> Option<String> {
        None
    }
}
