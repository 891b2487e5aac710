//! Restful Core Library
//!
//! Content model, configuration resolution, and error handling for the restful
//! static JSON API generator.

pub mod config;
pub mod content;
pub mod error;
pub mod restful;

pub use config::SiteConfig;
pub use content::{Post, SiteContent, Term, TermKind};
pub use error::{CoreError, Result};
pub use restful::{PostField, PostProps, RestfulConfig, SiteExposure};
