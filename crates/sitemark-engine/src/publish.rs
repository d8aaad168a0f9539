//! Sitemap publishing.
//!
//! Writes rendered files into the durable store, renders the index over
//! whatever landed, and persists the record of the run. A failed primary
//! write aborts the run; HTML, index and metadata failures only warn.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitemark_core::meta::{MetaStore, PersistedSitemapMeta, SitemapFileMeta};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    index::{render_index, IndexEntry},
    render::RenderedFile,
    store::{FileStore, StoreError},
};

/// Subdirectory of the store that holds every published sitemap file.
pub const SITEMAP_SUBDIR: &str = "sitemark-sitemaps";

/// File name of the sitemap index.
pub const INDEX_FILENAME: &str = "sitemap_index.xml";

/// File name of the HTML sitemap.
pub const HTML_FILENAME: &str = "sitemap.html";

/// Fatal publishing failures, in the order the run can hit them.
#[derive(Debug, Error)]
pub enum PublishFailure {
    /// The store has no usable base directory or URL.
    #[error("sitemap storage is unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The sitemap directory could not be created.
    #[error("could not create the sitemap directory: {0}")]
    DirCreateFailed(#[source] StoreError),

    /// A primary sitemap file could not be written.
    #[error("failed to write sitemap file {name}: {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: StoreError,
    },
}

/// One file that made it into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedFile {
    /// File name within the sitemap directory.
    pub name: String,

    /// Public URL of the file.
    pub url: String,

    /// Local path of the file.
    pub path: PathBuf,
}

/// What a publish run produced.
#[derive(Debug, Default)]
pub struct PublishOutcome {
    /// Primary files written, in write order.
    pub files: Vec<PublishedFile>,

    /// The HTML sitemap, if requested and written.
    pub html: Option<PublishedFile>,

    /// The sitemap index, if written.
    pub index: Option<PublishedFile>,

    /// Non-fatal problems hit along the way.
    pub warnings: Vec<String>,

    /// The fatal failure that aborted the run, if any.
    pub failure: Option<PublishFailure>,
}

impl PublishOutcome {
    /// Whether every primary file landed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Publisher that moves rendered files into durable storage.
pub struct Publisher<'a> {
    store: &'a dyn FileStore,
    meta: &'a dyn MetaStore,
}

impl<'a> Publisher<'a> {
    /// Create a new publisher.
    #[must_use]
    pub fn new(store: &'a dyn FileStore, meta: &'a dyn MetaStore) -> Self {
        Self { store, meta }
    }

    /// Publish `files` plus the optional HTML document.
    ///
    /// `latest_lastmod` stamps the HTML block of the index and the
    /// persisted record.
    pub fn publish(
        &self,
        files: &[RenderedFile],
        html: Option<&str>,
        latest_lastmod: Option<DateTime<Utc>>,
    ) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();

        // 1. Resolve the target directory and URL
        let base_dir = match self.store.base_dir() {
            Ok(dir) => dir,
            Err(e) => {
                outcome.failure = Some(PublishFailure::StoreUnavailable(e));
                return outcome;
            }
        };
        let base_url = match self.store.base_url() {
            Ok(url) => url,
            Err(e) => {
                outcome.failure = Some(PublishFailure::StoreUnavailable(e));
                return outcome;
            }
        };

        let dir = base_dir.join(SITEMAP_SUBDIR);
        let url_base = format!("{base_url}/{SITEMAP_SUBDIR}");

        if let Err(e) = self.store.ensure_dir(&dir) {
            outcome.failure = Some(PublishFailure::DirCreateFailed(e));
            return outcome;
        }

        info!(count = files.len(), dir = %dir.display(), "publishing sitemap files");

        // 2. Write every primary file; the first failure aborts the run
        for file in files {
            let path = dir.join(&file.name);
            if let Err(e) = self.store.write(&path, file.content.as_bytes()) {
                warn!(name = %file.name, error = %e, "primary sitemap write failed");
                outcome.failure = Some(PublishFailure::WriteFailed {
                    name: file.name.clone(),
                    source: e,
                });
                return outcome;
            }
            debug!(name = %file.name, "wrote sitemap file");
            outcome.files.push(PublishedFile {
                name: file.name.clone(),
                url: format!("{url_base}/{}", file.name),
                path,
            });
        }

        // 3. HTML sitemap; a failure here only warns
        if let Some(html) = html {
            if !html.is_empty() {
                let path = dir.join(HTML_FILENAME);
                match self.store.write(&path, html.as_bytes()) {
                    Ok(()) => {
                        outcome.html = Some(PublishedFile {
                            name: HTML_FILENAME.to_string(),
                            url: format!("{url_base}/{HTML_FILENAME}"),
                            path,
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "HTML sitemap write failed");
                        outcome
                            .warnings
                            .push(format!("failed to write the HTML sitemap: {e}"));
                    }
                }
            }
        }

        // 4. Index over whatever actually landed
        let index_entries: Vec<IndexEntry> = files
            .iter()
            .map(|f| IndexEntry {
                url: format!("{url_base}/{}", f.name),
                lastmod: f.lastmod,
            })
            .collect();
        let html_entry = outcome.html.as_ref().map(|h| IndexEntry {
            url: h.url.clone(),
            lastmod: latest_lastmod,
        });
        let doc = render_index(&index_entries, html_entry.as_ref());
        if doc.entry_count > 0 {
            let path = dir.join(INDEX_FILENAME);
            match self.store.write(&path, doc.xml.as_bytes()) {
                Ok(()) => {
                    outcome.index = Some(PublishedFile {
                        name: INDEX_FILENAME.to_string(),
                        url: format!("{url_base}/{INDEX_FILENAME}"),
                        path,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "sitemap index write failed");
                    outcome
                        .warnings
                        .push(format!("failed to write the sitemap index: {e}"));
                }
            }
        }

        // 5. Replace the persisted record of the last successful run
        let meta = build_meta(&outcome, files, latest_lastmod);
        if let Err(e) = self.meta.store(&meta) {
            warn!(error = %e, "failed to persist sitemap metadata");
            outcome
                .warnings
                .push(format!("failed to persist sitemap metadata: {e}"));
        }

        info!(files = outcome.files.len(), warnings = outcome.warnings.len(), "publish complete");
        outcome
    }
}

fn build_meta(
    outcome: &PublishOutcome,
    rendered: &[RenderedFile],
    latest_lastmod: Option<DateTime<Utc>>,
) -> PersistedSitemapMeta {
    let files: Vec<SitemapFileMeta> = outcome
        .files
        .iter()
        .zip(rendered.iter())
        .map(|(written, rendered)| SitemapFileMeta {
            name: written.name.clone(),
            url: written.url.clone(),
            path: written.path.clone(),
            lastmod: rendered.lastmod,
        })
        .collect();

    PersistedSitemapMeta {
        generated_at: Utc::now(),
        primary: files.first().cloned(),
        files,
        html: outcome.html.as_ref().map(|h| SitemapFileMeta {
            name: h.name.clone(),
            url: h.url.clone(),
            path: h.path.clone(),
            lastmod: latest_lastmod,
        }),
        index: outcome.index.as_ref().map(|i| SitemapFileMeta {
            name: i.name.clone(),
            url: i.url.clone(),
            path: i.path.clone(),
            lastmod: None,
        }),
    }
}
