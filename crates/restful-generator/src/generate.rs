//! Resource assembly.
//!
//! Runs the projector, taxonomy aggregation and pagination over one content
//! snapshot and concatenates their resources in a fixed order:
//!
//! 1. `api/site.json`
//! 2. `api/categories.json` and one resource per category
//! 3. `api/tags.json` and one resource per tag
//! 4. `api/posts.json` and the numbered posts pages
//! 5. one resource per article
//!
//! Generation is a pure function of the configuration and the content; it
//! performs no I/O and either returns every resource or fails.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use restful_core::{CoreError, RestfulConfig, SiteConfig, SiteContent, SiteExposure, TermKind};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    paginate::PostCollection,
    projector::PostProjector,
    resource::{Resource, article_path, site_path},
    taxonomy::Taxonomy,
};

/// Generation errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Invalid configuration or content.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Payload serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Generation statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiStats {
    /// Whether `api/site.json` was generated.
    pub site: bool,

    /// Number of category resources, index excluded.
    pub categories: usize,

    /// Number of tag resources, index excluded.
    pub tags: usize,

    /// Number of published posts.
    pub posts: usize,

    /// Number of numbered posts pages.
    pub post_pages: usize,

    /// Number of article resources.
    pub articles: usize,

    /// Total number of resources.
    pub resources: usize,

    /// Generation duration in milliseconds.
    pub duration_ms: u64,
}

/// Resources of one run together with their statistics.
#[derive(Debug, Clone)]
pub struct ApiOutput {
    pub resources: Vec<Resource>,
    pub stats: ApiStats,
}

/// Generator for the static JSON API.
#[derive(Debug, Clone)]
pub struct ApiGenerator {
    site: SiteConfig,
    restful: RestfulConfig,
}

impl ApiGenerator {
    /// Create a generator, resolving the `restful` section of `site`.
    pub fn new(site: SiteConfig) -> Result<Self> {
        let restful = site.restful()?;
        Ok(Self { site, restful })
    }

    /// Create a generator with already resolved settings.
    #[must_use]
    pub fn with_restful(site: SiteConfig, restful: RestfulConfig) -> Self {
        Self { site, restful }
    }

    /// The resolved settings.
    pub fn restful(&self) -> &RestfulConfig {
        &self.restful
    }

    /// Generate every resource for `content`.
    pub fn generate(&self, content: &SiteContent) -> Result<Vec<Resource>> {
        self.build(content).map(|output| output.resources)
    }

    /// Generate every resource for `content`, with statistics.
    pub fn build(&self, content: &SiteContent) -> Result<ApiOutput> {
        let start = Instant::now();
        content.validate()?;

        let posts = content.published();
        info!(
            posts = posts.len(),
            drafts = content.posts.len() - posts.len(),
            "generating api"
        );

        let projector = PostProjector::new(self.restful.posts_props.clone(), self.site.keywords());
        let mut stats = ApiStats {
            posts: posts.len(),
            ..Default::default()
        };
        let mut resources = Vec::new();

        if let Some(site) = self.site_resource()? {
            stats.site = true;
            resources.push(site);
        }

        for (kind, enabled) in [
            (TermKind::Categories, self.restful.categories),
            (TermKind::Tags, self.restful.tags),
        ] {
            if !enabled {
                debug!(%kind, "taxonomy disabled");
                continue;
            }
            let taxonomy = Taxonomy::aggregate(kind, content.terms(kind), &posts, &projector);
            match kind {
                TermKind::Categories => stats.categories = taxonomy.pages.len(),
                TermKind::Tags => stats.tags = taxonomy.pages.len(),
            }
            resources.extend(taxonomy.resources()?);
        }

        let records = posts.par_iter().map(|post| projector.project(post)).collect();
        let collection = PostCollection::split(records, self.restful.page_size());
        stats.post_pages = collection.page_count();
        resources.extend(collection.resources()?);

        if self.restful.post {
            let articles = projector.for_articles();
            let pages = posts
                .par_iter()
                .map(|post| Resource::json(article_path(&post.slug), &articles.project(post)))
                .collect::<serde_json::Result<Vec<_>>>()?;
            stats.articles = pages.len();
            resources.extend(pages);
        }

        stats.resources = resources.len();
        stats.duration_ms = millis(start.elapsed());

        info!(
            site = stats.site,
            categories = stats.categories,
            tags = stats.tags,
            post_pages = stats.post_pages,
            articles = stats.articles,
            resources = stats.resources,
            duration_ms = stats.duration_ms,
            "api generation complete"
        );

        Ok(ApiOutput { resources, stats })
    }

    /// `api/site.json`, unless site exposure is disabled.
    fn site_resource(&self) -> Result<Option<Resource>> {
        let resource = match &self.restful.site {
            SiteExposure::Hidden => None,
            SiteExposure::Full => Some(Resource::json(site_path(), self.site.as_map())?),
            SiteExposure::Keys(keys) => {
                Some(Resource::json(site_path(), &self.site.pick(keys.as_slice()))?)
            }
        };
        Ok(resource)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
