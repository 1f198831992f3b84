//! Host filesystem adapter
//!
//! All I/O goes through `tokio::fs`. The default config path is
//! `$HOME/.envase/config.json` (`%USERPROFILE%` on Windows), falling back to
//! the working directory when no home directory is known.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use envase_core::{FileAdapter, RuntimeKind};
use envase_domain::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use envase_domain::Result;
use tracing::debug;

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct NativeFileAdapter {
    config_dir: PathBuf,
}

impl Default for NativeFileAdapter {
    fn default() -> Self {
        Self { config_dir: home_dir().unwrap_or_default().join(CONFIG_DIR_NAME) }
    }
}

impl NativeFileAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter whose config lives under `dir` instead of the home directory.
    pub fn with_config_dir(dir: impl Into<PathBuf>) -> Self {
        Self { config_dir: dir.into() }
    }
}

#[async_trait]
impl FileAdapter for NativeFileAdapter {
    async fn read_file(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        debug!(path = %path.display(), bytes = contents.len(), "writing file");
        tokio::fs::write(path, contents).await.map_err(InfraError::from)?;
        Ok(())
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await.map_err(InfraError::from)?;
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn runtime(&self) -> RuntimeKind {
        RuntimeKind::Native
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let adapter = NativeFileAdapter::with_config_dir(dir.path());

        assert_eq!(adapter.read_file(&dir.path().join("absent.json")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_into_ensured_directory() {
        let dir = TempDir::new().unwrap();
        let adapter = NativeFileAdapter::with_config_dir(dir.path().join("nested").join(".envase"));
        let path = adapter.config_path();

        adapter.ensure_dir(path.parent().unwrap()).await.unwrap();
        adapter.write_file(&path, "{}").await.unwrap();

        assert_eq!(adapter.read_file(&path).await.unwrap().as_deref(), Some("{}"));
        assert!(path.ends_with(".envase/config.json"));
        assert_eq!(adapter.runtime(), RuntimeKind::Native);
    }

    #[tokio::test]
    async fn write_without_parent_fails_with_io_code() {
        let dir = TempDir::new().unwrap();
        let adapter = NativeFileAdapter::with_config_dir(dir.path());

        let err = adapter.write_file(&dir.path().join("no/such/dir/file"), "x").await.unwrap_err();
        assert_eq!(err.code(), Some("FILE_IO_ERROR"));
    }
}
