use std::num::NonZeroUsize;

use pb_types::Post;
use serde::Serialize;

use crate::error::ViewError;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of posts per page. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, ViewError> {
        NonZeroUsize::new(size).map(Self).ok_or(ViewError::ZeroPageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ViewError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub items: Vec<Post>,
    /// The page actually shown, after clamping to at least 1.
    pub page: usize,
    /// `max(1, ceil(N / page_size))`.
    pub total_pages: usize,
    /// Length of the whole listing.
    pub total_items: usize,
}

impl PostView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Local posts first, then remote posts, each in its own order.
pub fn merge(local: Vec<Post>, remote: Vec<Post>) -> Vec<Post> {
    let mut combined = local;
    combined.extend(remote);
    combined
}

fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slice out page `page_number` of an already merged listing.
///
/// `page_number < 1` is treated as 1; a page past the end is empty.
pub fn paginate(posts: &[Post], page_size: PageSize, page_number: usize) -> PostView {
    let page = page_number.max(1);
    let total_pages = total_pages(posts.len(), page_size);
    let size = page_size.get();

    let items = if page > total_pages {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(size).min(posts.len());
        let end = start.saturating_add(size).min(posts.len());
        posts[start..end].to_vec()
    };

    PostView {
        items,
        page,
        total_pages,
        total_items: posts.len(),
    }
}

/// Merge local and remote posts and return one page of the result.
pub fn build_view(
    local: Vec<Post>,
    remote: Vec<Post>,
    page_size: PageSize,
    page_number: usize,
) -> PostView {
    let combined = merge(local, remote);
    paginate(&combined, page_size, page_number)
}
