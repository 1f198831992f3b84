//! Port interfaces for configuration file access
//!
//! The caller picks one adapter when building a client and passes it
//! explicitly; there is no process-wide "current adapter".

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use envase_domain::Result;

/// Environment an adapter serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeKind {
    /// Host filesystem.
    Native,
    /// Process memory only; nothing touches disk.
    InMemory,
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::InMemory => f.write_str("in-memory"),
        }
    }
}

#[async_trait]
pub trait FileAdapter: Send + Sync {
    /// Read a UTF-8 file. Returns `Ok(None)` if it does not exist.
    async fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// Write `contents`, replacing any existing file. Parent directories must
    /// already exist.
    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    /// Create `path` and any missing parents.
    async fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Default location of the Envase config file for this adapter.
    fn config_path(&self) -> PathBuf;

    fn runtime(&self) -> RuntimeKind;
}
