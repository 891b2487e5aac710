//! Resolution of the `restful` configuration section.
//!
//! The section controls which resource families are generated and which post
//! fields are projected into the JSON payloads.
//!
//! # Override semantics
//!
//! Resolution is all-or-nothing. Without a `restful` section the documented
//! defaults ([`RestfulConfig::default`]) apply. As soon as the section is
//! present it *replaces* the defaults wholesale: nothing is merged field by
//! field, and every field the user leaves out takes its unset value (flags
//! `false`, `posts_size` 0, no post fields). Listing only some `posts_props`
//! therefore disables every field that is not listed.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// A post field that can be projected into a payload.
///
/// Variants are declared in payload key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostField {
    Title,
    Slug,
    Date,
    Updated,
    Comments,
    Path,
    Excerpt,
    Keywords,
    Content,
    Raw,
    Categories,
    Tags,
}

impl PostField {
    /// Every projectable field, in payload key order.
    pub const ALL: [PostField; 12] = [
        Self::Title,
        Self::Slug,
        Self::Date,
        Self::Updated,
        Self::Comments,
        Self::Path,
        Self::Excerpt,
        Self::Keywords,
        Self::Content,
        Self::Raw,
        Self::Categories,
        Self::Tags,
    ];

    /// The configuration and payload key for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Date => "date",
            Self::Updated => "updated",
            Self::Comments => "comments",
            Self::Path => "path",
            Self::Excerpt => "excerpt",
            Self::Keywords => "keywords",
            Self::Content => "content",
            Self::Raw => "raw",
            Self::Categories => "categories",
            Self::Tags => "tags",
        }
    }

    /// Look a field up by its configuration key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

/// The set of post fields enabled for projection.
///
/// The default value enables nothing; see [`PostProps::documented`] for the
/// documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProps {
    enabled: BTreeSet<PostField>,
}

impl PostProps {
    /// No fields enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every field enabled.
    pub fn all() -> Self {
        Self {
            enabled: PostField::ALL.into_iter().collect(),
        }
    }

    /// The documented default projection.
    pub fn documented() -> Self {
        Self::none()
            .with(PostField::Title, true)
            .with(PostField::Slug, true)
            .with(PostField::Date, true)
            .with(PostField::Updated, true)
            .with(PostField::Comments, true)
            .with(PostField::Path, true)
            .with(PostField::Categories, true)
            .with(PostField::Tags, true)
    }

    /// Builder-style toggle.
    #[must_use]
    pub fn with(mut self, field: PostField, enabled: bool) -> Self {
        self.set(field, enabled);
        self
    }

    /// Enable or disable a field.
    pub fn set(&mut self, field: PostField, enabled: bool) {
        if enabled {
            self.enabled.insert(field);
        } else {
            self.enabled.remove(&field);
        }
    }

    /// Whether a field is projected.
    pub fn is_enabled(&self, field: PostField) -> bool {
        self.enabled.contains(&field)
    }

    /// Enabled fields in payload key order.
    pub fn fields(&self) -> impl Iterator<Item = PostField> + '_ {
        self.enabled.iter().copied()
    }
}

/// How much of the site configuration is published at `api/site.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteExposure {
    /// No site resource.
    Hidden,
    /// The whole configuration object, unmodified.
    Full,
    /// Only the listed top-level keys, in list order.
    Keys(Vec<String>),
}

impl SiteExposure {
    /// Whether a site resource is generated at all.
    pub fn is_exposed(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Resolved `restful` settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestfulConfig {
    /// Site metadata exposure.
    pub site: SiteExposure,

    /// Posts per page; zero or negative disables pagination.
    pub posts_size: i64,

    /// Projected post fields.
    pub posts_props: PostProps,

    /// Generate category resources.
    pub categories: bool,

    /// Generate tag resources.
    pub tags: bool,

    /// Generate one resource per article.
    pub post: bool,
}

impl Default for RestfulConfig {
    /// The documented defaults, used when no `restful` section is configured.
    fn default() -> Self {
        Self {
            site: SiteExposure::Full,
            posts_size: 10,
            posts_props: PostProps::documented(),
            categories: true,
            tags: true,
            post: true,
        }
    }
}

/// The `restful` section as written by the user. Every field is optional and
/// absent fields resolve to their unset value, not to a default.
#[derive(Debug, Deserialize)]
struct RestfulSection {
    #[serde(default)]
    site: Option<SiteSetting>,

    #[serde(default)]
    posts_size: Option<i64>,

    #[serde(default)]
    posts_props: Option<BTreeMap<String, Option<bool>>>,

    #[serde(default)]
    categories: Option<bool>,

    #[serde(default)]
    tags: Option<bool>,

    #[serde(default)]
    post: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SiteSetting {
    Flag(bool),
    Keys(Vec<String>),
}

impl RestfulConfig {
    /// Resolve the `restful` configuration value.
    ///
    /// `None` (or an explicit `null`) yields the documented defaults. Any other
    /// value replaces the defaults wholesale, see the module documentation.
    pub fn resolve(value: Option<&Value>) -> Result<Self> {
        let value = match value {
            None | Some(Value::Null) => {
                debug!("no restful section, using documented defaults");
                return Ok(Self::default());
            }
            Some(value) => value,
        };

        let section: RestfulSection = serde_json::from_value(value.clone()).map_err(|e| {
            CoreError::invalid_config_with_source(format!("malformed restful section: {e}"), e)
        })?;

        let site = match section.site {
            None | Some(SiteSetting::Flag(false)) => SiteExposure::Hidden,
            Some(SiteSetting::Flag(true)) => SiteExposure::Full,
            Some(SiteSetting::Keys(keys)) => SiteExposure::Keys(keys),
        };

        let mut posts_props = PostProps::none();
        for (name, enabled) in section.posts_props.unwrap_or_default() {
            match PostField::from_name(&name) {
                Some(field) => posts_props.set(field, enabled.unwrap_or(false)),
                None => warn!(field = %name, "ignoring unknown restful.posts_props field"),
            }
        }

        let resolved = Self {
            site,
            posts_size: section.posts_size.unwrap_or(0),
            posts_props,
            categories: section.categories.unwrap_or(false),
            tags: section.tags.unwrap_or(false),
            post: section.post.unwrap_or(false),
        };

        debug!(?resolved, "resolved user restful section");
        Ok(resolved)
    }

    /// The page size when pagination is enabled.
    pub fn page_size(&self) -> Option<usize> {
        usize::try_from(self.posts_size).ok().filter(|&n| n > 0)
    }
}
