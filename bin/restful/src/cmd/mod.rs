//! Command implementations.

pub mod build;
pub mod check;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use restful_core::{SiteConfig, SiteContent};

/// Where a command reads its configuration and content from.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Site configuration file.
    pub config: PathBuf,

    /// Content dump (YAML or JSON).
    pub content: PathBuf,

    /// Layer `RESTFUL__*` environment variables over the configuration file.
    pub env: bool,

    /// Derive categories and tags from the posts instead of reading them.
    pub derive_terms: bool,
}

impl Inputs {
    /// Inputs with environment layering and term derivation off.
    pub fn new(config: impl Into<PathBuf>, content: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            content: content.into(),
            env: false,
            derive_terms: false,
        }
    }

    /// Load the site configuration.
    pub fn load_config(&self) -> Result<SiteConfig> {
        let config = if self.env {
            SiteConfig::load_with_env(&self.config)
        } else {
            SiteConfig::load(&self.config)
        };
        config.wrap_err_with(|| format!("Failed to load configuration {}", self.config.display()))
    }

    /// Load the content snapshot.
    pub fn load_content(&self) -> Result<SiteContent> {
        let content = SiteContent::load(&self.content)
            .wrap_err_with(|| format!("Failed to load content {}", self.content.display()))?;

        if self.derive_terms {
            tracing::debug!("deriving categories and tags from posts");
            return Ok(SiteContent::from_posts(content.posts));
        }
        Ok(content)
    }
}

/// Resolve a resource path below `root`, refusing anything that would escape
/// it.
pub(crate) fn output_path(root: &Path, resource_path: &str) -> Option<PathBuf> {
    use std::path::Component;

    let relative = Path::new(resource_path);
    let contained = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    contained.then(|| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            output_path(root, "api/posts/1.json"),
            Some(PathBuf::from("/srv/public/api/posts/1.json"))
        );
        assert_eq!(output_path(root, "../etc/passwd"), None);
        assert_eq!(output_path(root, "/etc/passwd"), None);
    }

    #[test]
    fn test_load_content_derives_terms() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let content_path = dir.path().join("content.yml");
        std::fs::write(
            &content_path,
            "posts:\n  - title: A\n    slug: a\n    date: 2024-01-01T00:00:00Z\n    tags: [rust]\n",
        )
        .expect("write");

        let mut inputs = Inputs::new(dir.path().join("_config.yml"), &content_path);
        assert!(inputs.load_content().expect("load").tags.is_empty());

        inputs.derive_terms = true;
        let content = inputs.load_content().expect("load");
        assert_eq!(content.tags.len(), 1);
        assert_eq!(content.tags[0].name, "rust");
    }
}
