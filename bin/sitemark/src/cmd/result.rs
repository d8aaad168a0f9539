//! Result command - print a stashed generation result

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitemark_core::Config;
use sitemark_engine::handoff::ResultStash;

use super::generate::print_result;

/// Run the result command.
///
/// Consumes the stash entry for `token`, so a second call with the same
/// token reports nothing.
pub fn run(config_path: &Path, token: &str) -> Result<()> {
    tracing::info!(?config_path, "Looking up stashed result");

    let config = Config::load(config_path).wrap_err("Failed to load configuration")?;
    let stash = ResultStash::from_config(&config.handoff);

    match stash.take(token).wrap_err("Failed to read the stash")? {
        Some(result) => print_result(&result),
        None => {
            println!();
            println!("  Token unknown, already used or expired.");
            println!();
        }
    }

    Ok(())
}
