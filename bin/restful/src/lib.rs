//! Restful CLI Library
//!
//! Command implementations for the restful JSON API generator. The binary
//! entry point lives in `main.rs`.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use restful::cmd::{self, Inputs};
//!
//! let inputs = Inputs::new(Path::new("_config.yml"), Path::new("content.yml"));
//! cmd::build::run(&inputs, Path::new("public"), false).unwrap();
//! ```

pub mod cmd;

pub use restful_core::{SiteConfig, SiteContent};
pub use restful_generator::{ApiGenerator, ApiStats, Resource};

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
