//! Lazy iteration over cursor-paginated list endpoints.

use std::collections::VecDeque;
use std::fmt;

use super::Page;
use crate::Error;

/// Position of the iterator relative to the upstream pages.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    /// Nothing fetched yet.
    Start,
    /// The last page pointed at this token.
    Next(String),
    /// The last page was final, or a fetch failed.
    Done,
}

/// Iterates over every item of a paginated listing, fetching pages lazily.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's token afterwards. Iteration ends after a page without a token.
/// Pages are only fetched when the buffered items run out.
///
/// The iterator is forward-only and cannot be restarted; build a new one to
/// list again. A fetch error is yielded once, after which the iterator is
/// exhausted.
///
/// ## Example
///
/// ```rust,ignore
/// use gantry::{ApiRequest, Connection, PageIterator};
///
/// let conn = Connection::from_env()?;
/// let models = PageIterator::new(|cursor| {
///     let mut request = ApiRequest::get("/v1/models");
///     if let Some(cursor) = cursor {
///         request = request.query("next_token", cursor);
///     }
///     conn.api_request(request)
/// });
///
/// for model in models {
///     let model: serde_json::Value = model?;
///     println!("{}", model["name"]);
/// }
/// ```
pub struct PageIterator<T, F> {
    fetch: F,
    buffer: VecDeque<T>,
    cursor: Cursor,
}

impl<T, F> PageIterator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, Error>,
{
    /// Creates an iterator over the pages produced by `fetch`.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            buffer: VecDeque::new(),
            cursor: Cursor::Start,
        }
    }

    /// Returns `true` if another page may still be fetched.
    pub fn has_more(&self) -> bool {
        !self.buffer.is_empty() || self.cursor != Cursor::Done
    }

    /// Returns the number of items fetched but not yet yielded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the rest of the current page as one batch.
    ///
    /// If items are buffered, they are returned without fetching. Otherwise
    /// the next page is fetched and returned whole. `None` once the listing
    /// is exhausted.
    pub fn next_page(&mut self) -> Option<Result<Vec<T>, Error>> {
        if self.buffer.is_empty() {
            if let Err(e) = self.fill()? {
                return Some(Err(e));
            }
        }
        Some(Ok(self.buffer.drain(..).collect()))
    }

    /// Fetches pages until at least one item is buffered.
    ///
    /// Returns `None` when no further page exists.
    fn fill(&mut self) -> Option<Result<(), Error>> {
        while self.buffer.is_empty() {
            let token = match &self.cursor {
                Cursor::Done => return None,
                Cursor::Start => None,
                Cursor::Next(token) => Some(token.clone()),
            };

            tracing::debug!(cursor = token.as_deref(), "fetching page");
            match (self.fetch)(token.as_deref()) {
                Ok(page) => {
                    self.cursor = match page.next_token() {
                        Some(next) => Cursor::Next(next.to_string()),
                        None => Cursor::Done,
                    };
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.cursor = Cursor::Done;
                    return Some(Err(e));
                }
            }
        }
        Some(Ok(()))
    }
}

impl<T, F> Iterator for PageIterator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, Error>,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.buffer.pop_front() {
            return Some(Ok(item));
        }
        match self.fill()? {
            Ok(()) => self.buffer.pop_front().map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

impl<T, F> std::iter::FusedIterator for PageIterator<T, F> where
    F: FnMut(Option<&str>) -> Result<Page<T>, Error>
{
}

impl<T, F> fmt::Debug for PageIterator<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIterator")
            .field("buffered", &self.buffer.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
