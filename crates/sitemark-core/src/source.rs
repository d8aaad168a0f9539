//! Content records and the source seam the collectors read from.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Kind of content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Dated posts, the archive-bearing class.
    Post,
    /// Static pages.
    Page,
}

impl ContentKind {
    /// Lowercase name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
        }
    }
}

/// Publication status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Published,
    Draft,
    Pending,
    Private,
}

/// A single content record as exposed by a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Stable numeric identifier.
    pub id: u64,

    /// Content class.
    pub kind: ContentKind,

    /// Publication status; sources only hand out published records.
    #[serde(default)]
    pub status: RecordStatus,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Absolute permalink URL.
    pub permalink: String,

    /// Modification timestamp in UTC.
    #[serde(default)]
    pub modified_gmt: Option<DateTime<Utc>>,

    /// Modification timestamp in site-local time, normalized to UTC.
    #[serde(default)]
    pub modified_local: Option<DateTime<Utc>>,

    /// Publication timestamp in UTC.
    #[serde(default)]
    pub published_gmt: Option<DateTime<Utc>>,

    /// Publication timestamp in site-local time, normalized to UTC.
    #[serde(default)]
    pub published_local: Option<DateTime<Utc>>,

    /// Hand-written excerpt, if any.
    #[serde(default)]
    pub excerpt: String,

    /// Body text, possibly still carrying markup.
    #[serde(default)]
    pub body_text: String,

    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Attached video URLs.
    #[serde(default)]
    pub video_urls: Vec<String>,
}

impl ContentRecord {
    /// Best available last-modified timestamp, preferring modification
    /// dates over publication dates and UTC over site-local variants.
    #[must_use]
    pub fn best_lastmod(&self) -> Option<DateTime<Utc>> {
        self.modified_gmt
            .or(self.modified_local)
            .or(self.published_gmt)
            .or(self.published_local)
    }

    /// Best available publication timestamp.
    #[must_use]
    pub fn best_published(&self) -> Option<DateTime<Utc>> {
        self.published_gmt.or(self.published_local)
    }
}

/// Paged access to published content records.
///
/// Pages are 1-based. Implementations must return records in a stable
/// order (most recently modified first) so repeated walks see the same
/// sequence, and must apply the kind and exclusion filters themselves.
pub trait ContentSource {
    /// Fetch one page of published records.
    fn page(
        &self,
        kinds: &[ContentKind],
        exclude: &[u64],
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ContentRecord>>;
}

/// Content source backed by a JSON record file.
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    records: Vec<ContentRecord>,
}

impl JsonSource {
    /// Load records from a JSON array file, dropping unpublished entries.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::source(path, e.to_string()))?;
        let records: Vec<ContentRecord> = serde_json::from_str(&content)
            .map_err(|e| CoreError::source(path, e.to_string()))?;

        debug!(path = %path.display(), count = records.len(), "loaded content records");
        Ok(Self::from_records(records))
    }

    /// Build a source from in-memory records, dropping unpublished entries.
    #[must_use]
    pub fn from_records(records: Vec<ContentRecord>) -> Self {
        let mut records: Vec<ContentRecord> = records
            .into_iter()
            .filter(|r| r.status == RecordStatus::Published)
            .collect();

        // Most recently modified first; undated records sink to the end.
        records.sort_by(|a, b| {
            b.best_lastmod()
                .cmp(&a.best_lastmod())
                .then(b.id.cmp(&a.id))
        });

        Self { records }
    }

    /// Number of published records held by this source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether this source holds no published records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ContentSource for JsonSource {
    fn page(
        &self,
        kinds: &[ContentKind],
        exclude: &[u64],
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ContentRecord>> {
        if page == 0 || per_page == 0 {
            return Ok(Vec::new());
        }

        let filtered: Vec<&ContentRecord> = self
            .records
            .iter()
            .filter(|r| kinds.contains(&r.kind) && !exclude.contains(&r.id))
            .collect();

        let start = (page - 1) * per_page;
        if start >= filtered.len() {
            return Ok(Vec::new());
        }
        let end = (start + per_page).min(filtered.len());

        Ok(filtered[start..end].iter().map(|r| (*r).clone()).collect())
    }
}
