//! Category and tag aggregation.
//!
//! Each term with at least one published member becomes a single,
//! unpaginated resource listing its posts, and every kind gets one summary
//! index of its surviving terms.

use std::collections::HashSet;

use rayon::prelude::*;
use restful_core::{Post, Term, TermKind};
use serde::Serialize;
use tracing::debug;

use crate::{
    projector::{PostProjector, PostRecord},
    resource::{Resource, index_path, term_path},
};

/// The generated page of one term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermPage {
    pub name: String,
    pub path: String,
    pub postlist: Vec<PostRecord>,
}

/// Entry of a taxonomy index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    pub name: String,
    pub path: String,
    pub count: usize,
}

#[derive(Serialize)]
struct TermPayload<'a> {
    name: &'a str,
    postlist: &'a [PostRecord],
}

/// All surviving terms of one kind.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub kind: TermKind,
    pub pages: Vec<TermPage>,
}

impl Taxonomy {
    /// Group `posts` by `terms`.
    ///
    /// `posts` is the published, date-descending sequence; a term's postlist
    /// follows that order. Terms left without published members are dropped,
    /// whatever the reason (no members, only drafts).
    pub fn aggregate(
        kind: TermKind,
        terms: &[Term],
        posts: &[&Post],
        projector: &PostProjector<'_>,
    ) -> Self {
        let pages: Vec<TermPage> = terms
            .par_iter()
            .filter_map(|term| {
                let members: HashSet<&str> = term.posts.iter().map(String::as_str).collect();
                let postlist: Vec<PostRecord> = posts
                    .iter()
                    .filter(|post| members.contains(post.slug.as_str()))
                    .map(|post| projector.project(post))
                    .collect();

                if postlist.is_empty() {
                    debug!(%kind, term = %term.name, "skipping term without published posts");
                    return None;
                }

                Some(TermPage {
                    path: term_path(kind, &term.name),
                    name: term.name.clone(),
                    postlist,
                })
            })
            .collect();

        debug!(%kind, terms = terms.len(), surviving = pages.len(), "aggregated taxonomy");
        Self { kind, pages }
    }

    /// Whether no term survived.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Index entries, one per surviving term.
    pub fn summaries(&self) -> Vec<TermSummary> {
        self.pages
            .iter()
            .map(|page| TermSummary {
                name: page.name.clone(),
                path: page.path.clone(),
                count: page.postlist.len(),
            })
            .collect()
    }

    /// The index resource followed by one resource per term. Nothing is
    /// emitted when no term survived.
    pub fn resources(&self) -> serde_json::Result<Vec<Resource>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut resources = Vec::with_capacity(self.pages.len() + 1);
        resources.push(Resource::json(index_path(self.kind), &self.summaries())?);
        for page in &self.pages {
            resources.push(Resource::json(
                page.path.clone(),
                &TermPayload {
                    name: &page.name,
                    postlist: &page.postlist,
                },
            )?);
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use restful_core::PostProps;
    use serde_json::{Value, json};

    use super::*;

    fn post(slug: &str, day: u32, published: bool) -> Post {
        Post {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            date: Utc
                .with_ymd_and_hms(2024, 5, day, 0, 0, 0)
                .single()
                .expect("valid date"),
            updated: None,
            comments: false,
            excerpt: String::new(),
            content: String::new(),
            raw: String::new(),
            published,
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn slugs_only() -> PostProjector<'static> {
        PostProjector::new(PostProps::none().with(restful_core::PostField::Slug, true), None)
    }

    #[test]
    fn test_postlist_follows_global_order() {
        let (a, b, c) = (post("a", 1, true), post("b", 2, true), post("c", 3, true));
        let posts = vec![&c, &b, &a];
        let terms = vec![Term::new(
            "rust",
            vec!["a".to_string(), "c".to_string()],
        )];

        let taxonomy = Taxonomy::aggregate(TermKind::Categories, &terms, &posts, &slugs_only());

        let slugs: Vec<_> = taxonomy.pages[0]
            .postlist
            .iter()
            .filter_map(|record| record.slug.as_deref())
            .collect();
        assert_eq!(slugs, vec!["c", "a"]);
    }

    #[test]
    fn test_empty_terms_are_skipped() {
        let a = post("a", 1, true);
        let draft = post("draft", 2, false);
        // Drafts never appear in the published sequence.
        let posts = vec![&a];
        let terms = vec![
            Term::new("empty", vec![]),
            Term::new("drafts-only", vec![draft.slug.clone()]),
            Term::new("kept", vec!["a".to_string()]),
        ];

        let taxonomy = Taxonomy::aggregate(TermKind::Tags, &terms, &posts, &slugs_only());

        assert_eq!(taxonomy.pages.len(), 1);
        assert_eq!(taxonomy.pages[0].name, "kept");
        assert_eq!(taxonomy.pages[0].path, "api/tags/kept.json");
    }

    #[test]
    fn test_resources_index_then_terms() {
        let (a, b) = (post("a", 1, true), post("b", 2, true));
        let posts = vec![&b, &a];
        let terms = vec![
            Term::new("rust", vec!["a".to_string(), "b".to_string()]),
            Term::new("web", vec!["b".to_string()]),
        ];

        let taxonomy = Taxonomy::aggregate(TermKind::Tags, &terms, &posts, &slugs_only());
        let resources = taxonomy.resources().expect("serialize");

        let paths: Vec<_> = resources.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["api/tags.json", "api/tags/rust.json", "api/tags/web.json"]);

        let index: Value = serde_json::from_str(&resources[0].data).expect("json");
        assert_eq!(
            index,
            json!([
                { "name": "rust", "path": "api/tags/rust.json", "count": 2 },
                { "name": "web", "path": "api/tags/web.json", "count": 1 }
            ])
        );

        assert!(resources[2].data.starts_with(r#"{"name":"web","postlist":[{"title":null,"slug":"b""#));
    }

    #[test]
    fn test_no_surviving_terms_emits_nothing() {
        let taxonomy =
            Taxonomy::aggregate(TermKind::Categories, &[Term::new("x", vec![])], &[], &slugs_only());
        assert!(taxonomy.is_empty());
        assert!(taxonomy.resources().expect("serialize").is_empty());
    }
}
