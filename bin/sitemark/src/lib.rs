//! Sitemark CLI Library
//!
//! Command implementations for the Sitemark binary. The entry point in
//! `main.rs` parses arguments and dispatches here.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (generate, status, result)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sitemark::cmd;
//!
//! // Report the state of the last published sitemap set
//! cmd::status::run(Path::new("sitemark.toml")).unwrap();
//! ```

pub mod cmd;

// Re-export the types commands hand around
pub use sitemark_core::Config;
pub use sitemark_engine::{GenerationResult, Pipeline};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
