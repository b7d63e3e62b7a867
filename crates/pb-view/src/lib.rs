//! Merge and pagination of post listings, plus the view state a front end
//! carries between actions.
//!
//! Local posts always precede remote posts. Within each source the source's
//! own order is kept. Pages are 1-indexed and there is always at least one
//! page, possibly empty.

pub mod error;
pub mod page;
pub mod state;

pub use error::ViewError;
pub use page::{build_view, merge, paginate, PageSize, PostView, DEFAULT_PAGE_SIZE};
pub use state::{DetailState, ListState, FETCH_FAILED_MESSAGE};
