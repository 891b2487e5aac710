//! Pagination of the posts collection.

use serde::Serialize;

use crate::{
    projector::PostRecord,
    resource::{Resource, posts_page_path, posts_path},
};

/// Paginate a slice of items. `page` is 1-indexed.
///
/// Page `0`, pages past the end and a `per_page` of `0` yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], usize) {
    if per_page == 0 {
        return (&[], 0);
    }
    let total_pages = items.len().div_ceil(per_page);
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(per_page))
        .filter(|&start| start < items.len())
    else {
        return (&[], total_pages);
    };
    let end = start.saturating_add(per_page).min(items.len());

    (&items[start..end], total_pages)
}

/// Pagination envelope of one posts page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub total: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub data: Vec<PostRecord>,
}

/// The projected posts, either as one list or split into pages.
#[derive(Debug, Clone, PartialEq)]
pub enum PostCollection {
    /// `api/posts.json` holds the bare array.
    Unpaginated(Vec<PostRecord>),

    /// `api/posts/{n}.json` pages, with `api/posts.json` aliasing page 1.
    Paginated { page_size: usize, pages: Vec<PostPage> },
}

impl PostCollection {
    /// Split `posts` into pages of `page_size`; `None` keeps a single list.
    pub fn split(posts: Vec<PostRecord>, page_size: Option<usize>) -> Self {
        let Some(page_size) = page_size.filter(|&n| n > 0) else {
            return Self::Unpaginated(posts);
        };

        let total = posts.len();
        let page_count = total.div_ceil(page_size);
        let pages = (1..=page_count)
            .map(|page| {
                let (data, _) = paginate(&posts, page, page_size);
                PostPage {
                    total,
                    page_size,
                    page_count,
                    data: data.to_vec(),
                }
            })
            .collect();

        Self::Paginated { page_size, pages }
    }

    /// Number of `api/posts/{n}.json` pages.
    pub fn page_count(&self) -> usize {
        match self {
            Self::Unpaginated(_) => 0,
            Self::Paginated { pages, .. } => pages.len(),
        }
    }

    /// `api/posts.json` followed by the numbered pages.
    pub fn resources(&self) -> serde_json::Result<Vec<Resource>> {
        let pages = match self {
            Self::Unpaginated(posts) => return Ok(vec![Resource::json(posts_path(), posts)?]),
            Self::Paginated { page_size, pages } if pages.is_empty() => {
                let empty = PostPage {
                    total: 0,
                    page_size: *page_size,
                    page_count: 0,
                    data: Vec::new(),
                };
                return Ok(vec![Resource::json(posts_path(), &empty)?]);
            }
            Self::Paginated { pages, .. } => pages,
        };

        let numbered = pages
            .iter()
            .enumerate()
            .map(|(index, page)| Resource::json(posts_page_path(index + 1), page))
            .collect::<serde_json::Result<Vec<_>>>()?;

        let mut resources = Vec::with_capacity(numbered.len() + 1);
        resources.push(Resource {
            path: posts_path(),
            data: numbered[0].data.clone(),
        });
        resources.extend(numbered);
        Ok(resources)
    }
}
