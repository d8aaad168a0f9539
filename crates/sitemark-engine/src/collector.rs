//! Entry collection.
//!
//! Walks the content source page by page and turns records into sitemap
//! entries, folding in the home page and monthly archives.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use sitemark_core::{
    entry::{ChangeFreq, SitemapEntry},
    request::GenerationRequest,
    source::{ContentKind, ContentRecord, ContentSource},
    Config, CoreError,
};
use thiserror::Error;
use tracing::{debug, info};

/// Records fetched per source page.
pub const PAGE_SIZE: usize = 200;

/// Entry collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Content source failure.
    #[error("source error: {0}")]
    Source(#[from] CoreError),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected entries plus the newest modification seen among them.
#[derive(Debug, Default)]
pub struct CollectedEntries {
    /// Ordered entries: home first, then content, then archives.
    pub entries: Vec<SitemapEntry>,

    /// Newest lastmod among the emitted entries.
    pub latest_lastmod: Option<DateTime<Utc>>,
}

/// Entry collector that walks a content source.
#[derive(Debug)]
pub struct EntryCollector {
    config: Config,
}

impl EntryCollector {
    /// Create a new entry collector.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Collect every selected entry from `source`.
    ///
    /// `now` stamps the home entry, fills in for records without any
    /// usable date, and decides which archive month counts as current.
    pub fn collect(
        &self,
        source: &dyn ContentSource,
        request: &GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<CollectedEntries> {
        let mut collected = CollectedEntries::default();
        // (year, month) -> newest modification within that month
        let mut archives: BTreeMap<(i32, u32), Option<DateTime<Utc>>> = BTreeMap::new();

        if request.include_home {
            collected.entries.push(SitemapEntry {
                loc: self.config.home_url(),
                lastmod: Some(now),
                changefreq: Some(request.home_changefreq),
                priority: Some(request.home_priority),
            });
            bump_latest(&mut collected.latest_lastmod, Some(now));
        }

        let kinds = request.selected_kinds();
        if !kinds.is_empty() {
            let mut page = 1;
            loop {
                let records = source.page(&kinds, &request.exclude_ids, page, PAGE_SIZE)?;
                debug!(page, count = records.len(), "collected content page");
                if records.is_empty() {
                    break;
                }

                for record in &records {
                    self.push_record(record, request, now, &mut collected, &mut archives);
                }

                if records.len() < PAGE_SIZE {
                    break;
                }
                page += 1;
            }
        }

        if request.include_archives {
            let current = (now.year(), now.month());
            for (&(year, month), &lastmod) in archives.iter().rev() {
                let changefreq = if (year, month) == current {
                    ChangeFreq::Daily
                } else {
                    ChangeFreq::Monthly
                };
                collected.entries.push(SitemapEntry {
                    loc: self.config.url_for(&format!("{year:04}/{month:02}/")),
                    lastmod,
                    changefreq: Some(changefreq),
                    priority: None,
                });
            }
        }

        info!(count = collected.entries.len(), "collected sitemap entries");
        Ok(collected)
    }

    fn push_record(
        &self,
        record: &ContentRecord,
        request: &GenerationRequest,
        now: DateTime<Utc>,
        collected: &mut CollectedEntries,
        archives: &mut BTreeMap<(i32, u32), Option<DateTime<Utc>>>,
    ) {
        let (changefreq, priority) = match record.kind {
            ContentKind::Post => (request.post_changefreq, request.effective_post_priority()),
            ContentKind::Page => (request.page_changefreq, request.page_priority),
        };

        let entry_lastmod = record.best_lastmod().unwrap_or(now);
        bump_latest(&mut collected.latest_lastmod, Some(entry_lastmod));
        collected.entries.push(SitemapEntry {
            loc: record.permalink.clone(),
            lastmod: Some(entry_lastmod),
            changefreq: Some(changefreq),
            priority: Some(priority),
        });

        // Archives index publication months of posts.
        if request.include_archives && record.kind == ContentKind::Post {
            if let Some(published) = record.best_published() {
                let bucket = archives
                    .entry((published.year(), published.month()))
                    .or_default();
                bump_latest(bucket, Some(entry_lastmod));
            }
        }
    }
}

/// Move `latest` forward when `candidate` is strictly newer.
fn bump_latest(latest: &mut Option<DateTime<Utc>>, candidate: Option<DateTime<Utc>>) {
    if let Some(candidate) = candidate {
        match latest {
            Some(current) if candidate <= *current => {}
            _ => *latest = Some(candidate),
        }
    }
}
