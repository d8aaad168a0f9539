//! Generation request normalization.
//!
//! Host frontends hand over loosely-typed form fields; this module turns
//! them into a validated, fully-defaulted request the pipeline can trust.

use serde::Deserialize;

use crate::{
    entry::{ChangeFreq, Priority},
    error::{CoreError, Result},
    source::ContentKind,
};

/// Default number of links per sitemap file.
pub const DEFAULT_LINKS_PER_FILE: usize = 100;

/// Hard cap on links per sitemap file, matching the protocol limit.
pub const MAX_LINKS_PER_FILE: usize = 50_000;

const DEFAULT_HOME_CHANGEFREQ: ChangeFreq = ChangeFreq::Daily;
const DEFAULT_POST_CHANGEFREQ: ChangeFreq = ChangeFreq::Weekly;
const DEFAULT_PAGE_CHANGEFREQ: ChangeFreq = ChangeFreq::Monthly;

const DEFAULT_HOME_PRIORITY: i64 = 10;
const DEFAULT_POST_PRIORITY: i64 = 6;
const DEFAULT_MIN_POST_PRIORITY: i64 = 1;
const DEFAULT_PAGE_PRIORITY: i64 = 3;

/// Raw generation request as submitted by a frontend form or CLI.
///
/// Checkbox-style fields carry the usual web truthy tokens; absent fields
/// mean unchecked. Everything is optional so partial submissions normalize
/// cleanly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenerationRequest {
    pub include_home: Option<String>,
    pub include_posts: Option<String>,
    pub include_pages: Option<String>,
    pub include_archives: Option<String>,

    pub home_changefreq: Option<String>,
    pub home_priority: Option<i64>,
    pub post_changefreq: Option<String>,
    pub post_priority: Option<i64>,
    pub min_post_priority: Option<i64>,
    pub page_changefreq: Option<String>,
    pub page_priority: Option<i64>,

    pub links_per_file: Option<i64>,
    pub exclude_ids: Option<String>,
    pub include_lastmod: Option<String>,

    pub include_html: Option<String>,
    pub include_images: Option<String>,
    pub include_videos: Option<String>,

    pub notify_indexnow: Option<String>,
    pub indexnow_key: Option<String>,
    pub notify_google: Option<String>,
    pub notify_all_files: Option<String>,
}

/// Validated generation request with every field defaulted and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub include_home: bool,
    pub include_posts: bool,
    pub include_pages: bool,
    pub include_archives: bool,

    pub home_changefreq: ChangeFreq,
    pub home_priority: Priority,
    pub post_changefreq: ChangeFreq,
    pub post_priority: Priority,
    pub min_post_priority: Priority,
    pub page_changefreq: ChangeFreq,
    pub page_priority: Priority,

    pub links_per_file: usize,
    pub exclude_ids: Vec<u64>,
    pub include_lastmod: bool,

    pub include_html: bool,
    pub include_images: bool,
    pub include_videos: bool,

    pub notify_indexnow: bool,
    pub indexnow_key: String,
    pub notify_google: bool,
    pub notify_all_files: bool,
}

impl GenerationRequest {
    /// Normalize a raw request, rejecting it when no content class at all
    /// is selected.
    pub fn from_raw(raw: &RawGenerationRequest) -> Result<Self> {
        let include_home = checkbox(&raw.include_home);
        let include_posts = checkbox(&raw.include_posts);
        let include_pages = checkbox(&raw.include_pages);

        if !include_home && !include_posts && !include_pages {
            return Err(CoreError::request(
                "select at least one of home, posts or pages",
            ));
        }

        Ok(Self {
            include_home,
            include_posts,
            include_pages,
            include_archives: checkbox(&raw.include_archives),

            home_changefreq: changefreq(&raw.home_changefreq, DEFAULT_HOME_CHANGEFREQ),
            home_priority: priority(raw.home_priority, DEFAULT_HOME_PRIORITY),
            post_changefreq: changefreq(&raw.post_changefreq, DEFAULT_POST_CHANGEFREQ),
            post_priority: priority(raw.post_priority, DEFAULT_POST_PRIORITY),
            min_post_priority: priority(raw.min_post_priority, DEFAULT_MIN_POST_PRIORITY),
            page_changefreq: changefreq(&raw.page_changefreq, DEFAULT_PAGE_CHANGEFREQ),
            page_priority: priority(raw.page_priority, DEFAULT_PAGE_PRIORITY),

            links_per_file: links_per_file(raw.links_per_file),
            exclude_ids: exclude_ids(&raw.exclude_ids),
            include_lastmod: checkbox(&raw.include_lastmod),

            include_html: checkbox(&raw.include_html),
            include_images: checkbox(&raw.include_images),
            include_videos: checkbox(&raw.include_videos),

            notify_indexnow: checkbox(&raw.notify_indexnow),
            indexnow_key: raw
                .indexnow_key
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
            notify_google: checkbox(&raw.notify_google),
            notify_all_files: checkbox(&raw.notify_all_files),
        })
    }

    /// Content kinds selected by this request, in collection order.
    #[must_use]
    pub fn selected_kinds(&self) -> Vec<ContentKind> {
        let mut kinds = Vec::new();
        if self.include_posts {
            kinds.push(ContentKind::Post);
        }
        if self.include_pages {
            kinds.push(ContentKind::Page);
        }
        kinds
    }

    /// Effective priority for a post, honoring the configured floor.
    #[must_use]
    pub fn effective_post_priority(&self) -> Priority {
        self.post_priority.max(self.min_post_priority)
    }
}

/// Interpret a checkbox-style form value.
fn checkbox(value: &Option<String>) -> bool {
    match value.as_deref().map(str::trim) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "on" | "1" | "true" | "yes"),
        None => false,
    }
}

fn changefreq(value: &Option<String>, default: ChangeFreq) -> ChangeFreq {
    value
        .as_deref()
        .and_then(ChangeFreq::parse)
        .unwrap_or(default)
}

fn priority(value: Option<i64>, default: i64) -> Priority {
    Priority::from_scale(value.unwrap_or(default))
}

fn links_per_file(value: Option<i64>) -> usize {
    match value {
        Some(v) if v >= 1 => (v as usize).min(MAX_LINKS_PER_FILE),
        _ => DEFAULT_LINKS_PER_FILE,
    }
}

/// Parse a comma-separated ID list, dropping tokens that are not numbers.
fn exclude_ids(value: &Option<String>) -> Vec<u64> {
    let Some(raw) = value else {
        return Vec::new();
    };
    raw.split(',')
        .filter_map(|token| token.trim().parse::<u64>().ok())
        .collect()
}
