//! Durable file storage.
//!
//! The publisher talks to storage through [`FileStore`] so deployments can
//! swap the local filesystem for anything that can hold published files.

use std::path::{Path, PathBuf};

use sitemark_core::config::StoreConfig;
use thiserror::Error;
use tracing::debug;

/// File store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be used at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Directory creation failure.
    #[error("failed to create directory {path}: {source}")]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write failure.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable storage for published sitemap files.
pub trait FileStore {
    /// Writable base directory, or why there is none.
    fn base_dir(&self) -> Result<PathBuf>;

    /// Public URL mapping to the base directory, without a trailing slash.
    fn base_url(&self) -> Result<String>;

    /// Create `path` and any missing parents.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Write `content` to `path`, replacing any previous file.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
}

/// File store backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    public_url: String,
}

impl LocalFileStore {
    /// Create a store over `root`, published at `public_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    /// Build a store from configuration.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.root, &config.public_url)
    }
}

impl FileStore for LocalFileStore {
    fn base_dir(&self) -> Result<PathBuf> {
        if self.root.as_os_str().is_empty() {
            return Err(StoreError::Unavailable(
                "no writable base directory configured".to_string(),
            ));
        }
        Ok(self.root.clone())
    }

    fn base_url(&self) -> Result<String> {
        if self.public_url.is_empty() {
            return Err(StoreError::Unavailable(
                "no public base URL configured".to_string(),
            ));
        }
        Ok(self.public_url.trim_end_matches('/').to_string())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|source| StoreError::DirCreate {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        std::fs::write(path, content).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }
}
