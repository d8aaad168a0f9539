//! HTML sitemap rendering.
//!
//! Renders the collected entries as a single human-readable HTML page.

use sitemark_core::{entry::SitemapEntry, Config};
use tracing::debug;

use crate::render::format_lastmod;

/// HTML sitemap page renderer.
#[derive(Debug)]
pub struct HtmlSitemapRenderer {
    config: Config,
    include_lastmod: bool,
}

impl HtmlSitemapRenderer {
    /// Create a new HTML renderer.
    #[must_use]
    pub fn new(config: Config, include_lastmod: bool) -> Self {
        Self {
            config,
            include_lastmod,
        }
    }

    /// Render the entry list as a standalone HTML document.
    #[must_use]
    pub fn render(&self, entries: &[SitemapEntry]) -> String {
        debug!(count = entries.len(), "rendering HTML sitemap");

        let title = escape_html(&self.config.site.title);

        let mut html = String::from("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");
        html.push_str("<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>Sitemap - {title}</title>\n"));
        html.push_str("</head>\n");
        html.push_str("<body>\n");
        html.push_str(&format!("<h1>Sitemap - {title}</h1>\n"));
        html.push_str(&format!("<p>{} URLs</p>\n", entries.len()));
        html.push_str("<ul class=\"sitemap\">\n");

        for entry in entries {
            html.push_str(&self.list_item(entry));
        }

        html.push_str("</ul>\n");
        html.push_str("</body>\n");
        html.push_str("</html>\n");
        html
    }

    fn list_item(&self, entry: &SitemapEntry) -> String {
        let loc = escape_html(&entry.loc);

        let mut annotations = Vec::new();
        if self.include_lastmod {
            if let Some(lastmod) = &entry.lastmod {
                annotations.push(format_lastmod(lastmod));
            }
        }
        if let Some(changefreq) = &entry.changefreq {
            annotations.push(changefreq.as_str().to_string());
        }
        if let Some(priority) = &entry.priority {
            annotations.push(priority.to_string());
        }

        if annotations.is_empty() {
            format!("  <li><a href=\"{loc}\">{loc}</a></li>\n")
        } else {
            format!(
                "  <li><a href=\"{loc}\">{loc}</a> <small>{}</small></li>\n",
                escape_html(&annotations.join(", "))
            )
        }
    }
}

/// Escape special HTML characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sitemark_core::entry::{ChangeFreq, Priority};

    use super::*;

    fn test_config() -> Config {
        Config {
            site: sitemark_core::config::SiteConfig {
                title: "Test Site".to_string(),
                base_url: "https://example.com".to_string(),
            },
            store: sitemark_core::config::StoreConfig::default(),
            handoff: sitemark_core::config::HandoffConfig::default(),
        }
    }

    fn test_entry() -> SitemapEntry {
        SitemapEntry {
            loc: "https://example.com/hello/".to_string(),
            lastmod: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(Priority::from_scale(6)),
        }
    }

    #[test]
    fn test_document_shape() {
        let renderer = HtmlSitemapRenderer::new(test_config(), true);
        let html = renderer.render(&[test_entry()]);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Sitemap - Test Site</title>"));
        assert!(html.contains("<p>1 URLs</p>"));
        assert!(html.contains(
            r#"<a href="https://example.com/hello/">https://example.com/hello/</a>"#
        ));
        assert!(html.contains("<small>2024-01-15T10:30:00Z, weekly, 0.6</small>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_lastmod_annotation_suppressed() {
        let renderer = HtmlSitemapRenderer::new(test_config(), false);
        let html = renderer.render(&[test_entry()]);

        assert!(!html.contains("2024-01-15"));
        assert!(html.contains("<small>weekly, 0.6</small>"));
    }

    #[test]
    fn test_escaping() {
        let mut entry = test_entry();
        entry.loc = "https://example.com/?a=1&b=2".to_string();
        let renderer = HtmlSitemapRenderer::new(test_config(), true);

        let html = renderer.render(&[entry]);

        assert!(html.contains("https://example.com/?a=1&amp;b=2"));
    }

    #[test]
    fn test_empty_list() {
        let renderer = HtmlSitemapRenderer::new(test_config(), true);
        let html = renderer.render(&[]);

        assert!(html.contains("<p>0 URLs</p>"));
        assert!(html.contains("<ul class=\"sitemap\">\n</ul>"));
    }
}
