//! Output resources and their path templates.

use restful_core::TermKind;
use serde::Serialize;

/// Prefix shared by every generated path.
pub const API_ROOT: &str = "api";

/// One generated JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Forward-slash separated path relative to the output root.
    pub path: String,

    /// Compact JSON text, written verbatim.
    pub data: String,
}

impl Resource {
    /// Serialize `payload` as the resource data.
    pub fn json<T: Serialize + ?Sized>(
        path: impl Into<String>,
        payload: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            path: path.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

/// `api/site.json`
pub fn site_path() -> String {
    format!("{API_ROOT}/site.json")
}

/// `api/{kind}.json`
pub fn index_path(kind: TermKind) -> String {
    format!("{API_ROOT}/{kind}.json")
}

/// `api/{kind}/{name}.json`
pub fn term_path(kind: TermKind, name: &str) -> String {
    format!("{API_ROOT}/{kind}/{name}.json")
}

/// `api/posts.json`
pub fn posts_path() -> String {
    format!("{API_ROOT}/posts.json")
}

/// `api/posts/{page}.json`, pages are 1-indexed.
pub fn posts_page_path(page: usize) -> String {
    format!("{API_ROOT}/posts/{page}.json")
}

/// `api/articles/{slug}.json`
pub fn article_path(slug: &str) -> String {
    format!("{API_ROOT}/articles/{slug}.json")
}
