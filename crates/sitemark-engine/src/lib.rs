//! Sitemark Engine Library
//!
//! Sitemap generation engine for Sitemark.
//!
//! # Modules
//!
//! - [`collector`] - Page-wise entry collection from a content source
//! - [`media`] - Image and video entry collection
//! - [`render`] - XML rendering for url-set, image and video sitemaps
//! - [`html`] - Human-readable HTML sitemap rendering
//! - [`index`] - Sitemap index rendering
//! - [`store`] - File storage abstraction
//! - [`publish`] - Publication of rendered files to the store
//! - [`notify`] - IndexNow and Google ping notifications
//! - [`pipeline`] - End-to-end generation pipeline
//! - [`handoff`] - Single-read result stash for cross-request handoff

pub mod collector;
pub mod handoff;
pub mod html;
pub mod index;
pub mod media;
pub mod notify;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod store;

pub use collector::{CollectedEntries, EntryCollector};
pub use handoff::ResultStash;
pub use html::HtmlSitemapRenderer;
pub use index::{render_index, IndexDoc, IndexEntry};
pub use media::MediaCollector;
pub use notify::{Notifier, PingOutcome, PingStatus};
pub use pipeline::{GenerationResult, Notice, NoticeLevel, Pipeline};
pub use publish::{PublishOutcome, PublishedFile, Publisher};
pub use render::{RenderSet, RenderedFile, SitemapRenderer};
pub use store::{FileStore, LocalFileStore};
