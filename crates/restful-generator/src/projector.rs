//! Projection of posts into their public JSON representation.
//!
//! Every payload carries the full key set. Disabled fields are serialized as
//! `null` instead of being left out, so consumers see one stable schema.

use chrono::{DateTime, SecondsFormat, Utc};
use restful_core::{Post, PostField, PostProps, TermKind};
use serde::Serialize;
use serde_json::Value;

use crate::resource::{article_path, term_path};

/// Reference from a post to one of its category or tag resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossLink {
    pub name: String,
    pub path: String,
}

/// A projected post. Field order is payload key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub comments: Option<bool>,
    pub path: Option<String>,
    pub excerpt: Option<String>,
    pub keywords: Option<Value>,
    pub content: Option<String>,
    pub raw: Option<String>,
    pub categories: Option<Vec<CrossLink>>,
    pub tags: Option<Vec<CrossLink>>,
}

/// Maps posts to [`PostRecord`]s according to the enabled [`PostProps`].
#[derive(Debug, Clone)]
pub struct PostProjector<'a> {
    props: PostProps,
    keywords: Option<&'a Value>,
}

impl<'a> PostProjector<'a> {
    /// Create a projector for list payloads.
    pub fn new(props: PostProps, keywords: Option<&'a Value>) -> Self {
        Self { props, keywords }
    }

    /// Projector for single-article payloads: every field is filled in except
    /// `raw`, which keeps its configured state.
    #[must_use]
    pub fn for_articles(&self) -> Self {
        let raw = self.props.is_enabled(PostField::Raw);
        Self {
            props: PostProps::all().with(PostField::Raw, raw),
            keywords: self.keywords,
        }
    }

    /// The fields this projector fills in.
    pub fn props(&self) -> &PostProps {
        &self.props
    }

    /// Project one post.
    pub fn project(&self, post: &Post) -> PostRecord {
        PostRecord {
            title: self.field(PostField::Title, || post.title.clone()),
            slug: self.field(PostField::Slug, || post.slug.clone()),
            date: self.field(PostField::Date, || format_date(&post.date)),
            updated: self
                .field(PostField::Updated, || post.updated.as_ref().map(format_date))
                .flatten(),
            comments: self.field(PostField::Comments, || post.comments),
            path: self.field(PostField::Path, || article_path(&post.slug)),
            excerpt: self.field(PostField::Excerpt, || post.excerpt.clone()),
            keywords: self.field(PostField::Keywords, || {
                self.keywords.cloned().unwrap_or(Value::Null)
            }),
            content: self.field(PostField::Content, || post.content.clone()),
            raw: self.field(PostField::Raw, || post.raw.clone()),
            categories: self.field(PostField::Categories, || {
                cross_links(TermKind::Categories, &post.categories)
            }),
            tags: self.field(PostField::Tags, || cross_links(TermKind::Tags, &post.tags)),
        }
    }

    /// Evaluates `value` only when `field` is enabled.
    fn field<T>(&self, field: PostField, value: impl FnOnce() -> T) -> Option<T> {
        self.props.is_enabled(field).then(value)
    }
}

/// Fully expanded `{name, path}` links for a post's terms.
pub fn cross_links(kind: TermKind, names: &[String]) -> Vec<CrossLink> {
    names
        .iter()
        .map(|name| CrossLink {
            name: name.clone(),
            path: term_path(kind, name),
        })
        .collect()
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
