//! Cursor-based pagination for list endpoints.
//!
//! - [`Page`]: one page of items and its continuation token
//! - [`PageIterator`]: all items across pages, fetched on demand

mod iter;
mod page;

pub use iter::PageIterator;
pub use page::Page;
