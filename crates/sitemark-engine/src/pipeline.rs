//! Generation pipeline.
//!
//! Coordinates the full generation run: request validation, collection,
//! rendering, publishing and notification.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitemark_core::{
    meta::MetaStore,
    request::{GenerationRequest, RawGenerationRequest},
    source::ContentSource,
    Config,
};
use tracing::{info, warn};

use crate::{
    collector::EntryCollector,
    html::HtmlSitemapRenderer,
    media::MediaCollector,
    notify::{dedup_targets, Notifier, PingOutcome},
    publish::{PublishedFile, Publisher},
    render::SitemapRenderer,
    store::FileStore,
};

/// Severity of the user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// User-facing summary of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Warning notice.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything a generation run produced, ready for display or stashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Whether every primary file was published.
    pub success: bool,

    /// Summary notice for the user.
    pub notice: Notice,

    /// Published primary files, in write order.
    pub files: Vec<PublishedFile>,

    /// Published HTML sitemap, if any.
    pub html: Option<PublishedFile>,

    /// Published sitemap index, if any.
    pub index: Option<PublishedFile>,

    /// First url-set chunk, for display.
    pub preview: String,

    /// Per-endpoint IndexNow outcomes.
    pub indexnow: Vec<PingOutcome>,

    /// Per-target Google ping outcomes.
    pub google: Vec<PingOutcome>,
}

impl GenerationResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            notice: Notice::error(message),
            files: Vec::new(),
            html: None,
            index: None,
            preview: String::new(),
            indexnow: Vec::new(),
            google: Vec::new(),
        }
    }

    /// URL announced to search engines: the index when it exists, else
    /// the primary file.
    #[must_use]
    pub fn main_url(&self) -> Option<&str> {
        self.index
            .as_ref()
            .map(|f| f.url.as_str())
            .or_else(|| self.files.first().map(|f| f.url.as_str()))
    }
}

/// The full generation pipeline.
pub struct Pipeline<'a> {
    config: Config,
    source: &'a dyn ContentSource,
    store: &'a dyn FileStore,
    meta: &'a dyn MetaStore,
    notifier: Option<Notifier>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        config: Config,
        source: &'a dyn ContentSource,
        store: &'a dyn FileStore,
        meta: &'a dyn MetaStore,
    ) -> Self {
        Self {
            config,
            source,
            store,
            meta,
            notifier: None,
        }
    }

    /// Use a preconfigured notifier instead of the production endpoints.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Normalize and run a raw request.
    ///
    /// A rejected request returns immediately, before any source or
    /// store access.
    pub fn run(&self, raw: &RawGenerationRequest) -> GenerationResult {
        match GenerationRequest::from_raw(raw) {
            Ok(request) => self.run_validated(&request),
            Err(e) => {
                info!(error = %e, "rejected generation request");
                GenerationResult::failed(e.to_string())
            }
        }
    }

    /// Run an already-validated request.
    pub fn run_validated(&self, request: &GenerationRequest) -> GenerationResult {
        let now = Utc::now();
        info!("starting sitemap generation");

        // 1. Collect entries
        let collector = EntryCollector::new(self.config.clone());
        let collected = match collector.collect(self.source, request, now) {
            Ok(collected) => collected,
            Err(e) => return GenerationResult::failed(format!("failed to collect content: {e}")),
        };

        // 2. Render url-set chunks
        let renderer = SitemapRenderer::new(request.links_per_file, request.include_lastmod);
        let rendered = renderer.render_urlset(&collected.entries);
        let preview = rendered.preview;
        let mut files = rendered.files;

        // 3. Render media sitemaps over the same record stream
        if request.include_images || request.include_videos {
            let media = match MediaCollector::new().collect(self.source, request) {
                Ok(media) => media,
                Err(e) => {
                    return GenerationResult::failed(format!("failed to collect media: {e}"))
                }
            };
            if request.include_images {
                files.extend(renderer.render_images(&media));
            }
            if request.include_videos {
                files.extend(renderer.render_videos(&media));
            }
        }

        // 4. Render the HTML sitemap
        let html = if request.include_html {
            Some(
                HtmlSitemapRenderer::new(self.config.clone(), request.include_lastmod)
                    .render(&collected.entries),
            )
        } else {
            None
        };

        // 5. Publish
        let publisher = Publisher::new(self.store, self.meta);
        let outcome = publisher.publish(&files, html.as_deref(), collected.latest_lastmod);

        if !outcome.succeeded() {
            let message = match &outcome.failure {
                Some(failure) => failure.to_string(),
                None => "could not create the sitemap directory".to_string(),
            };
            return GenerationResult {
                success: false,
                notice: Notice::error(message),
                files: outcome.files,
                html: outcome.html,
                index: outcome.index,
                preview,
                indexnow: Vec::new(),
                google: Vec::new(),
            };
        }

        // 6. Summarize the run
        let mut notice = if outcome.warnings.is_empty() {
            Notice::success(format!(
                "Sitemap generated: {} file(s) written.",
                outcome.files.len()
            ))
        } else {
            Notice::warning(outcome.warnings.join(" "))
        };

        // 7. Notify search engines; never fatal
        let mut indexnow = Vec::new();
        let mut google = Vec::new();

        let main_url = outcome
            .index
            .as_ref()
            .map(|f| f.url.clone())
            .or_else(|| outcome.files.first().map(|f| f.url.clone()));

        if let Some(main_url) = &main_url {
            let wants_indexnow = request.notify_indexnow && !request.indexnow_key.is_empty();
            if request.notify_indexnow && request.indexnow_key.is_empty() {
                notice = Notice::error("an IndexNow key is required to notify search engines");
            }

            if wants_indexnow || request.notify_google {
                let built;
                let notifier = match &self.notifier {
                    Some(notifier) => Some(notifier),
                    None => match Notifier::new() {
                        Ok(notifier) => {
                            built = notifier;
                            Some(&built)
                        }
                        Err(e) => {
                            warn!(error = %e, "could not build notification client");
                            None
                        }
                    },
                };

                if let Some(notifier) = notifier {
                    if wants_indexnow {
                        indexnow = notifier.ping_indexnow(main_url, &request.indexnow_key);
                    }
                    if request.notify_google {
                        let mut targets = vec![main_url.clone()];
                        if request.notify_all_files {
                            targets.extend(outcome.files.iter().map(|f| f.url.clone()));
                        }
                        google = notifier.ping_google(&dedup_targets(targets));
                    }
                }
            }
        }

        info!(success = true, files = outcome.files.len(), "sitemap generation complete");

        GenerationResult {
            success: true,
            notice,
            files: outcome.files,
            html: outcome.html,
            index: outcome.index,
            preview,
            indexnow,
            google,
        }
    }
}
