//! Sitemark Core Library
//!
//! Core types, configuration, and error handling for the Sitemark sitemap
//! generator.

pub mod config;
pub mod entry;
pub mod error;
pub mod meta;
pub mod request;
pub mod source;

pub use config::Config;
pub use entry::{ChangeFreq, MediaEntry, Priority, SitemapEntry};
pub use error::{CoreError, Result};
pub use meta::{JsonMetaStore, MetaStore, PersistedSitemapMeta, SitemapFileMeta};
pub use request::{GenerationRequest, RawGenerationRequest};
pub use source::{ContentKind, ContentRecord, ContentSource, JsonSource, RecordStatus};
