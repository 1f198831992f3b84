//! In-process adapter for tests and sandboxes where touching disk is not
//! allowed. Directories are tracked so `write_file` enforces the same
//! parent-must-exist rule as the native adapter.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use envase_core::{FileAdapter, RuntimeKind};
use envase_domain::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use envase_domain::{EnvaseError, Result};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryFileAdapter {
    files: RwLock<HashMap<PathBuf, String>>,
    dirs: RwLock<HashSet<PathBuf>>,
}

impl MemoryFileAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored file, bypassing the async port.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

#[async_trait]
impl FileAdapter for MemoryFileAdapter {
    async fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.contents(path))
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dirs.read().contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(EnvaseError::Configuration {
                message: format!("Directory does not exist: {}", path.display()),
                code: Some("FILE_IO_ERROR".to_string()),
            });
        }

        self.files.write().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        let mut dirs = self.dirs.write();
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        PathBuf::from(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    fn runtime(&self) -> RuntimeKind {
        RuntimeKind::InMemory
    }
}
