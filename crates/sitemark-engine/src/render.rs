//! Sitemap rendering.
//!
//! Partitions entries into bounded chunks and renders url-set, image and
//! video sitemap documents.

use chrono::{DateTime, SecondsFormat, Utc};
use sitemark_core::entry::{MediaEntry, SitemapEntry};
use tracing::debug;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";
const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// File name family for url-set chunks.
pub const URLSET_FAMILY: &str = "sitemap";

/// File name family for image chunks.
pub const IMAGE_FAMILY: &str = "image-sitemap";

/// File name family for video chunks.
pub const VIDEO_FAMILY: &str = "video-sitemap";

/// One rendered sitemap document, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    /// File name, e.g. "sitemap-2.xml".
    pub name: String,

    /// Document text.
    pub content: String,

    /// Newest entry modification covered by this file.
    pub lastmod: Option<DateTime<Utc>>,
}

/// Rendered url-set chunks plus a preview of the first one.
#[derive(Debug, Default)]
pub struct RenderSet {
    /// Chunk files in order.
    pub files: Vec<RenderedFile>,

    /// Content of the first chunk, for display.
    pub preview: String,
}

/// Renderer that partitions entries and emits sitemap XML.
#[derive(Debug)]
pub struct SitemapRenderer {
    links_per_file: usize,
    include_lastmod: bool,
}

impl SitemapRenderer {
    /// Create a new renderer.
    #[must_use]
    pub fn new(links_per_file: usize, include_lastmod: bool) -> Self {
        Self {
            links_per_file: links_per_file.max(1),
            include_lastmod,
        }
    }

    /// Render url-set chunks, preserving entry order across files.
    pub fn render_urlset(&self, entries: &[SitemapEntry]) -> RenderSet {
        let mut files = Vec::new();

        for (index, chunk) in entries.chunks(self.links_per_file).enumerate() {
            let mut xml = String::from(XML_DECL);
            xml.push('\n');
            xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
            xml.push('\n');

            for entry in chunk {
                xml.push_str(&self.entry_to_xml(entry));
            }

            xml.push_str("</urlset>\n");

            files.push(RenderedFile {
                name: chunk_name(URLSET_FAMILY, index),
                content: xml,
                lastmod: self.chunk_lastmod(chunk.iter().map(|e| e.lastmod)),
            });
        }

        debug!(entries = entries.len(), files = files.len(), "rendered url-set sitemap");

        let preview = files.first().map(|f| f.content.clone()).unwrap_or_default();
        RenderSet { files, preview }
    }

    /// Render image sitemap chunks for entries that carry a thumbnail.
    pub fn render_images(&self, media: &[MediaEntry]) -> Vec<RenderedFile> {
        let with_images: Vec<&MediaEntry> =
            media.iter().filter(|m| m.thumbnail.is_some()).collect();
        let mut files = Vec::new();

        for (index, chunk) in with_images.chunks(self.links_per_file).enumerate() {
            let mut xml = String::from(XML_DECL);
            xml.push('\n');
            xml.push_str(&format!(
                r#"<urlset xmlns="{SITEMAP_NS}" xmlns:image="{IMAGE_NS}">"#
            ));
            xml.push('\n');

            for entry in chunk {
                xml.push_str("  <url>\n");
                xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
                if let Some(thumbnail) = &entry.thumbnail {
                    xml.push_str("    <image:image>\n");
                    xml.push_str(&format!(
                        "      <image:loc>{}</image:loc>\n",
                        escape_xml(thumbnail)
                    ));
                    if !entry.title.is_empty() {
                        xml.push_str(&format!(
                            "      <image:title>{}</image:title>\n",
                            escape_xml(&entry.title)
                        ));
                    }
                    xml.push_str("    </image:image>\n");
                }
                xml.push_str("  </url>\n");
            }

            xml.push_str("</urlset>\n");

            files.push(RenderedFile {
                name: chunk_name(IMAGE_FAMILY, index),
                content: xml,
                lastmod: self.chunk_lastmod(chunk.iter().map(|e| e.lastmod)),
            });
        }

        debug!(entries = with_images.len(), files = files.len(), "rendered image sitemap");
        files
    }

    /// Render video sitemap chunks for entries that carry videos, one
    /// `<url>` block per video URL.
    pub fn render_videos(&self, media: &[MediaEntry]) -> Vec<RenderedFile> {
        let with_videos: Vec<&MediaEntry> = media.iter().filter(|m| !m.videos.is_empty()).collect();
        let mut files = Vec::new();

        for (index, chunk) in with_videos.chunks(self.links_per_file).enumerate() {
            let mut xml = String::from(XML_DECL);
            xml.push('\n');
            xml.push_str(&format!(
                r#"<urlset xmlns="{SITEMAP_NS}" xmlns:video="{VIDEO_NS}">"#
            ));
            xml.push('\n');

            for entry in chunk {
                for video in &entry.videos {
                    xml.push_str("  <url>\n");
                    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
                    xml.push_str("    <video:video>\n");
                    if let Some(thumbnail) = &entry.thumbnail {
                        xml.push_str(&format!(
                            "      <video:thumbnail_loc>{}</video:thumbnail_loc>\n",
                            escape_xml(thumbnail)
                        ));
                    }
                    xml.push_str(&format!(
                        "      <video:content_loc>{}</video:content_loc>\n",
                        escape_xml(video)
                    ));
                    if !entry.title.is_empty() {
                        xml.push_str(&format!(
                            "      <video:title>{}</video:title>\n",
                            escape_xml(&entry.title)
                        ));
                    }
                    if !entry.summary.is_empty() {
                        xml.push_str(&format!(
                            "      <video:description>{}</video:description>\n",
                            escape_xml(&entry.summary)
                        ));
                    }
                    xml.push_str("    </video:video>\n");
                    xml.push_str("  </url>\n");
                }
            }

            xml.push_str("</urlset>\n");

            files.push(RenderedFile {
                name: chunk_name(VIDEO_FAMILY, index),
                content: xml,
                lastmod: self.chunk_lastmod(chunk.iter().map(|e| e.lastmod)),
            });
        }

        debug!(entries = with_videos.len(), files = files.len(), "rendered video sitemap");
        files
    }

    /// Convert a URL entry to XML.
    fn entry_to_xml(&self, entry: &SitemapEntry) -> String {
        let mut xml = String::from("  <url>\n");

        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));

        if self.include_lastmod {
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!(
                    "    <lastmod>{}</lastmod>\n",
                    format_lastmod(lastmod)
                ));
            }
        }

        if let Some(changefreq) = &entry.changefreq {
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                changefreq.as_str()
            ));
        }

        if let Some(priority) = &entry.priority {
            xml.push_str(&format!("    <priority>{priority}</priority>\n"));
        }

        xml.push_str("  </url>\n");
        xml
    }

    fn chunk_lastmod(
        &self,
        lastmods: impl Iterator<Item = Option<DateTime<Utc>>>,
    ) -> Option<DateTime<Utc>> {
        if !self.include_lastmod {
            return None;
        }
        lastmods.flatten().max()
    }
}

/// File name for chunk `index` within a family: the first chunk drops the
/// suffix, later ones count from 2.
#[must_use]
pub fn chunk_name(family: &str, index: usize) -> String {
    if index == 0 {
        format!("{family}.xml")
    } else {
        format!("{family}-{}.xml", index + 1)
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Format a lastmod timestamp in RFC 3339 with a Z suffix.
pub(crate) fn format_lastmod(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sitemark_core::entry::{ChangeFreq, Priority};

    use super::*;

    fn utc(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 10, 30, 0).unwrap()
    }

    fn test_entry(n: u64, lastmod: Option<DateTime<Utc>>) -> SitemapEntry {
        SitemapEntry {
            loc: format!("https://example.com/post/{n}/"),
            lastmod,
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(Priority::from_scale(6)),
        }
    }

    fn test_media(n: u64, thumbnail: bool, videos: usize) -> MediaEntry {
        MediaEntry {
            loc: format!("https://example.com/post/{n}/"),
            title: format!("Post {n}"),
            summary: "A summary".to_string(),
            thumbnail: thumbnail.then(|| format!("https://example.com/thumb-{n}.jpg")),
            videos: (1..=videos)
                .map(|v| format!("https://example.com/video-{n}-{v}.mp4"))
                .collect(),
            lastmod: Some(utc(2024, 1, n as u32)),
        }
    }

    fn extract_locs(xml: &str) -> Vec<String> {
        xml.lines()
            .filter_map(|line| {
                let line = line.trim();
                line.strip_prefix("<loc>")
                    .and_then(|rest| rest.strip_suffix("</loc>"))
                    .map(ToString::to_string)
            })
            .collect()
    }

    fn unescape_xml(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_chunk_names() {
        assert_eq!(chunk_name(URLSET_FAMILY, 0), "sitemap.xml");
        assert_eq!(chunk_name(URLSET_FAMILY, 1), "sitemap-2.xml");
        assert_eq!(chunk_name(IMAGE_FAMILY, 2), "image-sitemap-3.xml");
    }

    #[test]
    fn test_chunks_preserve_entry_order() {
        let entries: Vec<SitemapEntry> =
            (1..=5).map(|n| test_entry(n, Some(utc(2024, 1, 1)))).collect();
        let renderer = SitemapRenderer::new(2, true);

        let set = renderer.render_urlset(&entries);

        assert_eq!(set.files.len(), 3);
        assert_eq!(set.files[0].name, "sitemap.xml");
        assert_eq!(set.files[1].name, "sitemap-2.xml");
        assert_eq!(set.files[2].name, "sitemap-3.xml");

        let all_locs: Vec<String> = set
            .files
            .iter()
            .flat_map(|f| extract_locs(&f.content))
            .collect();
        let expected: Vec<String> = entries.iter().map(|e| e.loc.clone()).collect();
        assert_eq!(all_locs, expected);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let entries: Vec<SitemapEntry> =
            (1..=7).map(|n| test_entry(n, Some(utc(2024, 2, 2)))).collect();
        let renderer = SitemapRenderer::new(3, true);

        let first = renderer.render_urlset(&entries);
        let second = renderer.render_urlset(&entries);

        assert_eq!(first.files.len(), second.files.len());
        for (a, b) in first.files.iter().zip(second.files.iter()) {
            assert_eq!(a.content, b.content);
        }
    }

    #[test]
    fn test_urlset_document_shape() {
        let entry = test_entry(1, Some(utc(2024, 1, 15)));
        let renderer = SitemapRenderer::new(100, true);

        let set = renderer.render_urlset(&[entry]);
        let xml = &set.files[0].content;

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.com/post/1/</loc>"));
        assert!(xml.contains("<lastmod>2024-01-15T10:30:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.6</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
        assert_eq!(set.preview, *xml);
    }

    #[test]
    fn test_lastmod_suppressed_when_disabled() {
        let entry = test_entry(1, Some(utc(2024, 1, 15)));
        let renderer = SitemapRenderer::new(100, false);

        let set = renderer.render_urlset(&[entry]);

        assert!(!set.files[0].content.contains("<lastmod>"));
        assert!(set.files[0].lastmod.is_none());
    }

    #[test]
    fn test_file_lastmod_is_chunk_maximum() {
        let entries = vec![
            test_entry(1, Some(utc(2024, 1, 5))),
            test_entry(2, Some(utc(2024, 1, 20))),
            test_entry(3, None),
        ];
        let renderer = SitemapRenderer::new(100, true);

        let set = renderer.render_urlset(&entries);

        assert_eq!(set.files[0].lastmod, Some(utc(2024, 1, 20)));
    }

    #[test]
    fn test_empty_entries_render_nothing() {
        let renderer = SitemapRenderer::new(100, true);
        let set = renderer.render_urlset(&[]);

        assert!(set.files.is_empty());
        assert!(set.preview.is_empty());
    }

    #[test]
    fn test_escaping_special_characters() {
        let mut entry = test_entry(1, None);
        entry.loc = "https://example.com/?a=1&b=<2>".to_string();
        let renderer = SitemapRenderer::new(100, false);

        let set = renderer.render_urlset(&[entry]);

        assert!(set.files[0]
            .content
            .contains("<loc>https://example.com/?a=1&amp;b=&lt;2&gt;</loc>"));
    }

    #[test]
    fn test_locs_round_trip_as_absolute_urls() {
        let mut second = test_entry(2, None);
        second.loc = "https://example.com/archive/?tag=r&d".to_string();
        let entries = vec![test_entry(1, None), second];
        let renderer = SitemapRenderer::new(100, false);

        let set = renderer.render_urlset(&entries);

        let locs = extract_locs(&set.files[0].content);
        assert_eq!(locs.len(), entries.len());
        for (loc, entry) in locs.iter().zip(&entries) {
            let parsed = url::Url::parse(&unescape_xml(loc)).expect("loc should parse");
            assert_eq!(parsed.as_str(), entry.loc);
        }
    }

    #[test]
    fn test_image_sitemap_filters_and_renders() {
        let media = vec![test_media(1, true, 0), test_media(2, false, 0)];
        let renderer = SitemapRenderer::new(100, true);

        let files = renderer.render_images(&media);

        assert_eq!(files.len(), 1);
        let xml = &files[0].content;
        assert_eq!(files[0].name, "image-sitemap.xml");
        assert!(xml.contains(r#"xmlns:image="http://www.google.com/schemas/sitemap-image/1.1""#));
        assert!(xml.contains("<image:loc>https://example.com/thumb-1.jpg</image:loc>"));
        assert!(xml.contains("<image:title>Post 1</image:title>"));
        assert!(!xml.contains("post/2/"));
    }

    #[test]
    fn test_image_sitemap_empty_when_no_thumbnails() {
        let media = vec![test_media(1, false, 0), test_media(2, false, 3)];
        let renderer = SitemapRenderer::new(100, true);

        assert!(renderer.render_images(&media).is_empty());
    }

    #[test]
    fn test_video_sitemap_one_block_per_video() {
        let media = vec![test_media(1, true, 2), test_media(2, false, 0)];
        let renderer = SitemapRenderer::new(100, true);

        let files = renderer.render_videos(&media);

        assert_eq!(files.len(), 1);
        let xml = &files[0].content;
        assert_eq!(files[0].name, "video-sitemap.xml");
        assert!(xml.contains(r#"xmlns:video="http://www.google.com/schemas/sitemap-video/1.1""#));
        assert_eq!(xml.matches("<video:video>").count(), 2);
        assert_eq!(xml.matches("<loc>https://example.com/post/1/</loc>").count(), 2);
        assert!(xml.contains(
            "<video:content_loc>https://example.com/video-1-1.mp4</video:content_loc>"
        ));
        assert!(xml.contains(
            "<video:thumbnail_loc>https://example.com/thumb-1.jpg</video:thumbnail_loc>"
        ));
        assert!(xml.contains("<video:title>Post 1</video:title>"));
        assert!(xml.contains("<video:description>A summary</video:description>"));
    }

    #[test]
    fn test_video_optional_elements_omitted() {
        let mut media = test_media(1, false, 1);
        media.title = String::new();
        media.summary = String::new();
        let renderer = SitemapRenderer::new(100, true);

        let files = renderer.render_videos(&[media]);
        let xml = &files[0].content;

        assert!(!xml.contains("<video:thumbnail_loc>"));
        assert!(!xml.contains("<video:title>"));
        assert!(!xml.contains("<video:description>"));
        assert!(xml.contains("<video:content_loc>"));
    }

    #[test]
    fn test_video_chunks_count_entries_not_blocks() {
        let media = vec![test_media(1, false, 3), test_media(2, false, 3)];
        let renderer = SitemapRenderer::new(1, true);

        let files = renderer.render_videos(&media);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].content.matches("<video:video>").count(), 3);
    }
}
