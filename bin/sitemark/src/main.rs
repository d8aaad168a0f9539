//! Sitemark CLI
//!
//! Sitemap generation and publication from the command line.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use sitemark::cmd::generate::GenerateArgs;

/// Command-line interface for Sitemark.
#[derive(Parser)]
#[command(
    name = "sitemark",
    version,
    about = "Generate, publish and announce search engine sitemaps"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sitemark.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate and publish the sitemap set
    Generate(GenerateArgs),
    /// Report the state of the last published sitemap set
    Status,
    /// Print a stashed generation result by its one-time token
    Result {
        /// Token printed by `generate --stash`
        token: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitemark::init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => {
            sitemark::cmd::generate::run(&cli.config, &args)?;
        }
        Commands::Status => {
            sitemark::cmd::status::run(&cli.config)?;
        }
        Commands::Result { token } => {
            sitemark::cmd::result::run(&cli.config, &token)?;
        }
    }

    Ok(())
}
