//! Restful Generator Library
//!
//! Static JSON API generation engine for restful.
//!
//! # Modules
//!
//! - [`projector`] - Field-limited projection of posts
//! - [`taxonomy`] - Category and tag aggregation
//! - [`paginate`] - Posts collection pagination
//! - [`resource`] - Output resources and path templates
//! - [`generate`] - Resource assembly

pub mod generate;
pub mod paginate;
pub mod projector;
pub mod resource;
pub mod taxonomy;

pub use generate::{ApiGenerator, ApiOutput, ApiStats, GenerateError};
pub use paginate::{PostCollection, PostPage};
pub use projector::{CrossLink, PostProjector, PostRecord};
pub use resource::Resource;
pub use taxonomy::{Taxonomy, TermPage, TermSummary};
