//! Sitemap index rendering.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::render::{escape_xml, format_lastmod};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One block of a sitemap index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Public URL of the referenced sitemap.
    pub url: String,

    /// Newest modification covered by the referenced sitemap.
    pub lastmod: Option<DateTime<Utc>>,
}

/// A rendered sitemap index document.
#[derive(Debug, Clone)]
pub struct IndexDoc {
    /// Document text.
    pub xml: String,

    /// Number of sitemap blocks; zero means nothing worth publishing.
    pub entry_count: usize,
}

/// Render a sitemap index over the published files plus the optional
/// HTML sitemap block.
#[must_use]
pub fn render_index(files: &[IndexEntry], html: Option<&IndexEntry>) -> IndexDoc {
    let mut xml = String::from(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<sitemapindex xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    let mut entry_count = 0;
    for entry in files.iter().chain(html) {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", format_lastmod(lastmod)));
        }
        xml.push_str("  </sitemap>\n");
        entry_count += 1;
    }

    xml.push_str("</sitemapindex>\n");

    debug!(entries = entry_count, "rendered sitemap index");
    IndexDoc { xml, entry_count }
}
