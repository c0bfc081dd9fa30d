//! A single page returned by a list endpoint.

use serde::{Deserialize, Serialize};

/// A page of results plus the continuation token for the next page.
///
/// Deserializes from the list-endpoint shape
/// `{"items": [...], "next_token": "..."}`; `next_cursor` and `nextToken`
/// are accepted as aliases for the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Opaque token for the next page. `None` or empty means this is the last page.
    #[serde(default, alias = "next_cursor", alias = "nextToken")]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// Creates a final page.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Returns `true` if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the token for the next page, treating an empty token as none.
    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns `true` if there are more pages available.
    pub fn has_next(&self) -> bool {
        self.next_token().is_some()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_token: None,
        }
    }
}
