//! Command implementations for the Sitemark CLI.

use std::path::Path;

use sitemark_core::{meta::JsonMetaStore, Config};
use sitemark_engine::publish::SITEMAP_SUBDIR;

pub mod generate;
pub mod result;
pub mod status;

/// Metadata store rooted in the configured sitemap directory.
pub(crate) fn meta_store(config: &Config) -> JsonMetaStore {
    let dir = Path::new(&config.store.root).join(SITEMAP_SUBDIR);
    JsonMetaStore::new(JsonMetaStore::default_path(&dir))
}
