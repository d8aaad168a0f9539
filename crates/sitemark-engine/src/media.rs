//! Media collection.
//!
//! Walks the same paged record stream as the entry collector and extracts
//! the thumbnail, video and summary data the media sitemaps need.

use sitemark_core::{
    entry::MediaEntry,
    request::GenerationRequest,
    source::{ContentRecord, ContentSource},
};
use tracing::{debug, info};

use crate::collector::{Result, PAGE_SIZE};

/// Maximum videos carried per entry.
pub const VIDEO_LIMIT: usize = 3;

/// Word limit for summaries derived from body text.
pub const SUMMARY_WORDS: usize = 30;

/// Media collector that walks a content source.
#[derive(Debug, Default)]
pub struct MediaCollector;

impl MediaCollector {
    /// Create a new media collector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Collect media entries for every selected record.
    pub fn collect(
        &self,
        source: &dyn ContentSource,
        request: &GenerationRequest,
    ) -> Result<Vec<MediaEntry>> {
        let mut entries = Vec::new();

        let kinds = request.selected_kinds();
        if kinds.is_empty() {
            return Ok(entries);
        }

        let mut page = 1;
        loop {
            let records = source.page(&kinds, &request.exclude_ids, page, PAGE_SIZE)?;
            debug!(page, count = records.len(), "collected media page");
            if records.is_empty() {
                break;
            }

            for record in &records {
                entries.push(media_entry(record, request));
            }

            if records.len() < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        info!(count = entries.len(), "collected media entries");
        Ok(entries)
    }
}

fn media_entry(record: &ContentRecord, request: &GenerationRequest) -> MediaEntry {
    let videos = if request.include_videos {
        record.video_urls.iter().take(VIDEO_LIMIT).cloned().collect()
    } else {
        Vec::new()
    };

    MediaEntry {
        loc: record.permalink.clone(),
        title: record.title.clone(),
        summary: summarize(record),
        thumbnail: record.thumbnail_url.clone(),
        videos,
        lastmod: record.best_lastmod(),
    }
}

/// Build a plain-text summary: the explicit excerpt when present, else
/// the first words of the stripped body with a truncation marker.
fn summarize(record: &ContentRecord) -> String {
    let excerpt = record.excerpt.trim();
    if !excerpt.is_empty() {
        return strip_html(excerpt).trim().to_string();
    }

    trim_words(&strip_html(&record.body_text), SUMMARY_WORDS)
}

/// Strip HTML tags, keeping only text content.
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Keep at most `limit` whitespace-separated words, marking truncation.
fn trim_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        words.join(" ")
    } else {
        format!("{}...", words[..limit].join(" "))
    }
}
