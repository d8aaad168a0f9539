//! Generate command - build, publish and announce the sitemap set

use std::{path::Path, time::Instant};

use color_eyre::eyre::{bail, Result, WrapErr};
use sitemark_core::{request::RawGenerationRequest, source::JsonSource, Config};
use sitemark_engine::{
    handoff::ResultStash,
    notify::PingStatus,
    pipeline::{GenerationResult, NoticeLevel, Pipeline},
    store::LocalFileStore,
};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// JSON export of content records
    #[arg(long)]
    pub content: std::path::PathBuf,

    /// Include the home page
    #[arg(long)]
    pub home: bool,

    /// Include posts
    #[arg(long)]
    pub posts: bool,

    /// Include standalone pages
    #[arg(long)]
    pub pages: bool,

    /// Include monthly archive pages
    #[arg(long)]
    pub archives: bool,

    /// Change frequency for the home page (always..never)
    #[arg(long)]
    pub home_changefreq: Option<String>,

    /// Change frequency for posts
    #[arg(long)]
    pub post_changefreq: Option<String>,

    /// Change frequency for pages
    #[arg(long)]
    pub page_changefreq: Option<String>,

    /// Home page priority on a 1-10 scale
    #[arg(long)]
    pub home_priority: Option<i64>,

    /// Post priority on a 1-10 scale
    #[arg(long)]
    pub post_priority: Option<i64>,

    /// Lower bound for post priority
    #[arg(long)]
    pub min_post_priority: Option<i64>,

    /// Page priority on a 1-10 scale
    #[arg(long)]
    pub page_priority: Option<i64>,

    /// Maximum links per sitemap file
    #[arg(long)]
    pub links_per_file: Option<i64>,

    /// Comma-separated record ids to leave out
    #[arg(long)]
    pub exclude: Option<String>,

    /// Emit lastmod elements
    #[arg(long)]
    pub lastmod: bool,

    /// Also write a human-readable HTML sitemap
    #[arg(long)]
    pub html: bool,

    /// Also write an image sitemap
    #[arg(long)]
    pub images: bool,

    /// Also write a video sitemap
    #[arg(long)]
    pub videos: bool,

    /// Notify IndexNow endpoints after publishing
    #[arg(long)]
    pub indexnow: bool,

    /// IndexNow API key
    #[arg(long)]
    pub indexnow_key: Option<String>,

    /// Ping Google after publishing
    #[arg(long)]
    pub google: bool,

    /// Announce every published file, not just the index
    #[arg(long)]
    pub all_files: bool,

    /// Stash the result and print its one-time token
    #[arg(long)]
    pub stash: bool,
}

impl GenerateArgs {
    fn to_request(&self) -> RawGenerationRequest {
        RawGenerationRequest {
            include_home: flag(self.home),
            include_posts: flag(self.posts),
            include_pages: flag(self.pages),
            include_archives: flag(self.archives),
            home_changefreq: self.home_changefreq.clone(),
            home_priority: self.home_priority,
            post_changefreq: self.post_changefreq.clone(),
            post_priority: self.post_priority,
            min_post_priority: self.min_post_priority,
            page_changefreq: self.page_changefreq.clone(),
            page_priority: self.page_priority,
            links_per_file: self.links_per_file,
            exclude_ids: self.exclude.clone(),
            include_lastmod: flag(self.lastmod),
            include_html: flag(self.html),
            include_images: flag(self.images),
            include_videos: flag(self.videos),
            notify_indexnow: flag(self.indexnow),
            indexnow_key: self.indexnow_key.clone(),
            notify_google: flag(self.google),
            notify_all_files: flag(self.all_files),
        }
    }
}

fn flag(on: bool) -> Option<String> {
    on.then(|| "on".to_string())
}

/// Run the generate command.
///
/// Loads the configuration and content export, runs the pipeline and
/// prints the outcome.
pub fn run(config_path: &Path, args: &GenerateArgs) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, content = ?args.content, "Starting sitemap generation");

    let config = Config::load(config_path).wrap_err("Failed to load configuration")?;
    let source = JsonSource::load(&args.content).wrap_err("Failed to load content records")?;

    let store = LocalFileStore::from_config(&config.store);
    let meta = super::meta_store(&config);

    let pipeline = Pipeline::new(config.clone(), &source, &store, &meta);
    let result = pipeline.run(&args.to_request());

    print_result(&result);

    if args.stash {
        let stash = ResultStash::from_config(&config.handoff);
        if let Err(e) = stash.sweep() {
            tracing::warn!(error = %e, "Failed to sweep stale stash entries");
        }
        let token = stash.put(&result).wrap_err("Failed to stash result")?;
        println!("  Token:      {token}");
        println!();
    }

    let duration = start.elapsed();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(success = result.success, ?duration, "Generation finished");

    if !result.success {
        bail!("Sitemap generation failed");
    }

    Ok(())
}

/// Print a generation result as a command-line summary.
pub(crate) fn print_result(result: &GenerationResult) {
    println!();
    println!("  {} {}", level_mark(result.notice.level), result.notice.message);
    println!();

    if !result.files.is_empty() {
        println!("  Files:");
        for file in &result.files {
            println!("    {}", file.url);
        }
    }
    if let Some(html) = &result.html {
        println!("  HTML:       {}", html.url);
    }
    if let Some(index) = &result.index {
        println!("  Index:      {}", index.url);
    }

    if !result.indexnow.is_empty() || !result.google.is_empty() {
        println!();
        println!("  Notifications:");
        for outcome in result.indexnow.iter().chain(&result.google) {
            let mark = match outcome.status {
                PingStatus::Ok => '✓',
                PingStatus::Warn => '⚠',
                PingStatus::Error => '✗',
            };
            println!("    {mark} {}: {}", outcome.target, outcome.message);
        }
    }
    println!();
}

fn level_mark(level: NoticeLevel) -> char {
    match level {
        NoticeLevel::Success => '✓',
        NoticeLevel::Warning => '⚠',
        NoticeLevel::Error => '✗',
    }
}
