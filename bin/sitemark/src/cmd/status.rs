//! Status command - report the last published sitemap set

use std::path::Path;

use chrono::SecondsFormat;
use color_eyre::eyre::{Result, WrapErr};
use sitemark_core::{meta::MetaStore, Config};

/// Run the status command.
///
/// Loads the persisted metadata and checks each published file against
/// the filesystem.
pub fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking published sitemaps");

    let config = Config::load(config_path).wrap_err("Failed to load configuration")?;
    let meta = super::meta_store(&config);

    println!("Checking published sitemaps...");
    let Some(persisted) = meta.load().wrap_err("Failed to load sitemap metadata")? else {
        println!("  No sitemap has been published yet.");
        return Ok(());
    };

    println!(
        "  Generated:  {}",
        persisted.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!();

    for file in persisted.files.iter().chain(&persisted.html).chain(&persisted.index) {
        let mark = if file.exists() { '✓' } else { '✗' };
        println!("  {mark} {}", file.name);
        println!("      {}", file.url);
    }

    println!();
    let missing = persisted.missing_files();
    if missing.is_empty() {
        println!("  ✓ All published files present");
    } else {
        println!("  ⚠ {} file(s) missing from disk", missing.len());
    }

    Ok(())
}
