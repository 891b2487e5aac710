//! Content model supplied by the content store.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Taxonomy kind of a [`Term`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Categories,
    Tags,
}

impl TermKind {
    /// Path segment and resource name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Tags => "tags",
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title.
    #[serde(default)]
    pub title: String,

    /// URL slug, unique among published posts.
    #[serde(default)]
    pub slug: String,

    /// Publication date.
    pub date: DateTime<Utc>,

    /// Last updated date.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,

    /// Whether comments are enabled.
    #[serde(default = "default_true")]
    pub comments: bool,

    /// Rendered excerpt.
    #[serde(default)]
    pub excerpt: String,

    /// Rendered content.
    #[serde(default)]
    pub content: String,

    /// Raw source.
    #[serde(default)]
    pub raw: String,

    /// Whether the post is published. Drafts never reach the API.
    #[serde(default = "default_true")]
    pub published: bool,

    /// Category names, in order.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Tag names, in order.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Names of the terms of `kind` this post is filed under.
    pub fn terms(&self, kind: TermKind) -> &[String] {
        match kind {
            TermKind::Categories => &self.categories,
            TermKind::Tags => &self.tags,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A category or tag and the slugs of its member posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term name, unique within its kind.
    #[serde(default)]
    pub name: String,

    /// Member post slugs.
    #[serde(default)]
    pub posts: Vec<String>,
}

impl Term {
    /// Create a term.
    pub fn new(name: impl Into<String>, posts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            posts,
        }
    }
}

/// Everything the generator reads for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    /// All posts, published or not.
    #[serde(default)]
    pub posts: Vec<Post>,

    /// Category terms.
    #[serde(default)]
    pub categories: Vec<Term>,

    /// Tag terms.
    #[serde(default)]
    pub tags: Vec<Term>,
}

impl SiteContent {
    /// Load a content dump from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let site: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        debug!(
            path = %path.display(),
            posts = site.posts.len(),
            categories = site.categories.len(),
            tags = site.tags.len(),
            "loaded content"
        );
        Ok(site)
    }

    /// Build content whose terms are derived from the posts' own category and
    /// tag names. Terms appear in first-seen order with members in post order.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let categories = collect_terms(&posts, |post| &post.categories);
        let tags = collect_terms(&posts, |post| &post.tags);
        Self {
            posts,
            categories,
            tags,
        }
    }

    /// Terms of the given kind.
    pub fn terms(&self, kind: TermKind) -> &[Term] {
        match kind {
            TermKind::Categories => &self.categories,
            TermKind::Tags => &self.tags,
        }
    }

    /// Published posts ordered by date, newest first.
    ///
    /// Posts with equal dates keep their input order.
    pub fn published(&self) -> Vec<&Post> {
        let mut posts: Vec<_> = self.posts.iter().filter(|post| post.published).collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// Check the required fields and uniqueness rules.
    pub fn validate(&self) -> Result<()> {
        let mut slugs = HashSet::new();
        for (index, post) in self.posts.iter().enumerate() {
            if post.slug.is_empty() {
                return Err(CoreError::validation(format!(
                    "post #{index} (`{}`) has no slug",
                    post.title
                )));
            }
            check_path_segment("post slug", &post.slug)?;
            if post.published && !slugs.insert(post.slug.as_str()) {
                return Err(CoreError::validation(format!(
                    "duplicate slug `{}` among published posts",
                    post.slug
                )));
            }
        }

        let known: HashSet<_> = self.posts.iter().map(|post| post.slug.as_str()).collect();
        for kind in [TermKind::Categories, TermKind::Tags] {
            let mut names = HashSet::new();
            for (index, term) in self.terms(kind).iter().enumerate() {
                if term.name.is_empty() {
                    return Err(CoreError::validation(format!(
                        "{kind} term #{index} has no name"
                    )));
                }
                check_path_segment("term name", &term.name)?;
                if !names.insert(term.name.as_str()) {
                    return Err(CoreError::validation(format!(
                        "duplicate {kind} term `{}`",
                        term.name
                    )));
                }
                if let Some(missing) = term.posts.iter().find(|slug| !known.contains(slug.as_str()))
                {
                    return Err(CoreError::validation(format!(
                        "{kind} term `{}` references unknown post `{missing}`",
                        term.name
                    )));
                }
            }
        }

        for kind in [TermKind::Categories, TermKind::Tags] {
            self.validate_post_terms(kind)?;
        }

        Ok(())
    }

    /// Every term a published post links to must exist and list the post.
    fn validate_post_terms(&self, kind: TermKind) -> Result<()> {
        let members: HashMap<&str, HashSet<&str>> = self
            .terms(kind)
            .iter()
            .map(|term| {
                let posts: HashSet<&str> = term.posts.iter().map(String::as_str).collect();
                (term.name.as_str(), posts)
            })
            .collect();

        for post in &self.posts {
            for name in post.terms(kind) {
                if name.is_empty() {
                    return Err(CoreError::validation(format!(
                        "post `{}` has an empty {kind} name",
                        post.slug
                    )));
                }
                check_path_segment("term name", name)?;

                let listed = members
                    .get(name.as_str())
                    .is_some_and(|posts| posts.contains(post.slug.as_str()));
                if post.published && !listed {
                    return Err(CoreError::validation(format!(
                        "post `{}` lists {kind} `{name}`, but no such term lists the post",
                        post.slug
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Slugs and names become file paths; they must stay below their directory.
fn check_path_segment(what: &str, value: &str) -> Result<()> {
    let escapes = value.starts_with('/')
        || value
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if escapes {
        return Err(CoreError::validation(format!(
            "{what} `{value}` is not a valid relative path"
        )));
    }
    Ok(())
}

fn collect_terms(posts: &[Post], names: impl Fn(&Post) -> &Vec<String>) -> Vec<Term> {
    let mut terms: Vec<Term> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for name in names(post) {
            let position = *positions.entry(name.clone()).or_insert_with(|| {
                terms.push(Term::new(name.clone(), Vec::new()));
                terms.len() - 1
            });
            let members = &mut terms[position].posts;
            if !members.contains(&post.slug) {
                members.push(post.slug.clone());
            }
        }
    }

    terms
}
