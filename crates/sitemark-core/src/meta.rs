//! Persisted record of the most recent successful generation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// File name used by [`JsonMetaStore`] inside the sitemap directory.
pub const META_FILENAME: &str = "sitemap-meta.json";

/// Location of one published sitemap file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapFileMeta {
    /// File name, e.g. "sitemap-2.xml".
    pub name: String,

    /// Public URL of the file.
    pub url: String,

    /// Local path of the file.
    pub path: PathBuf,

    /// Newest entry modification covered by the file.
    #[serde(default)]
    pub lastmod: Option<DateTime<Utc>>,
}

impl SitemapFileMeta {
    /// Whether the file still exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Durable record of the most recent successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSitemapMeta {
    /// When the generation finished.
    pub generated_at: DateTime<Utc>,

    /// Primary url-set file, absent only when no url-set file was written.
    #[serde(default)]
    pub primary: Option<SitemapFileMeta>,

    /// Every published sitemap file, in write order.
    pub files: Vec<SitemapFileMeta>,

    /// The HTML sitemap, if one was written.
    #[serde(default)]
    pub html: Option<SitemapFileMeta>,

    /// The sitemap index, if one was written.
    #[serde(default)]
    pub index: Option<SitemapFileMeta>,
}

impl PersistedSitemapMeta {
    /// Published files that have since gone missing on disk.
    #[must_use]
    pub fn missing_files(&self) -> Vec<&SitemapFileMeta> {
        self.files
            .iter()
            .chain(self.html.iter())
            .chain(self.index.iter())
            .filter(|f| !f.exists())
            .collect()
    }
}

/// Storage for the persisted generation record.
///
/// Each successful generation overwrites the previous record wholesale.
pub trait MetaStore {
    /// Load the current record, if any generation has completed.
    fn load(&self) -> Result<Option<PersistedSitemapMeta>>;

    /// Replace the record with `meta`.
    fn store(&self, meta: &PersistedSitemapMeta) -> Result<()>;
}

/// Meta store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonMetaStore {
    path: PathBuf,
}

impl JsonMetaStore {
    /// Create a store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional meta file path under a sitemap directory.
    #[must_use]
    pub fn default_path(sitemap_dir: &Path) -> PathBuf {
        sitemap_dir.join(META_FILENAME)
    }
}

impl MetaStore for JsonMetaStore {
    fn load(&self) -> Result<Option<PersistedSitemapMeta>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let meta: PersistedSitemapMeta = serde_json::from_str(&content)?;
        Ok(Some(meta))
    }

    fn store(&self, meta: &PersistedSitemapMeta) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(meta)?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "persisted sitemap metadata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn file_meta(dir: &Path, name: &str) -> SitemapFileMeta {
        SitemapFileMeta {
            name: name.to_string(),
            url: format!("https://example.com/uploads/{name}"),
            path: dir.join(name),
            lastmod: None,
        }
    }

    fn test_meta(dir: &Path) -> PersistedSitemapMeta {
        let primary = file_meta(dir, "sitemap.xml");
        PersistedSitemapMeta {
            generated_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            primary: Some(primary.clone()),
            files: vec![primary, file_meta(dir, "sitemap-2.xml")],
            html: None,
            index: Some(file_meta(dir, "sitemap_index.xml")),
        }
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonMetaStore::new(dir.path().join("nested").join(META_FILENAME));
        let meta = test_meta(dir.path());

        store.store(&meta).expect("store");
        let loaded = store.load().expect("load").expect("some");

        assert_eq!(loaded, meta);
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonMetaStore::new(dir.path().join(META_FILENAME));

        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_store_overwrites_previous_record() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonMetaStore::new(dir.path().join(META_FILENAME));

        let mut meta = test_meta(dir.path());
        store.store(&meta).expect("store");

        meta.files.pop();
        meta.index = None;
        store.store(&meta).expect("store again");

        let loaded = store.load().expect("load").expect("some");
        assert_eq!(loaded.files.len(), 1);
        assert!(loaded.index.is_none());
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let meta = test_meta(dir.path());

        // Nothing written yet, everything is missing.
        assert_eq!(meta.missing_files().len(), 3);

        std::fs::write(dir.path().join("sitemap.xml"), "x").expect("write");
        std::fs::write(dir.path().join("sitemap_index.xml"), "x").expect("write");
        let missing = meta.missing_files();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "sitemap-2.xml");
    }
}
