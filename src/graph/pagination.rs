//! Cursor pagination.
//!
//! A pager starts with a `null` cursor, records each `nextCursor` the
//! backend returns and stops on `null`. Cursors are opaque; the only check
//! made on them is that one never comes back twice.
//!
//! ```ignore
//! let mut pager = CursorPager::new();
//! while let Some(query) = pager.next_query(|cursor| entity_search_page(search, cursor)) {
//!     let page = send(query)?;
//!     pager.advance(page.next_cursor)?;
//! }
//! ```

use std::collections::HashSet;

use super::{GraphError, GraphQuery, GraphResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PagerState {
    Start,
    At(String),
    Done,
}

/// Tracks where a paginated request loop is.
#[derive(Debug, Clone)]
pub struct CursorPager {
    state: PagerState,
    seen: HashSet<String>,
    pages: usize,
}

impl Default for CursorPager {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorPager {
    pub fn new() -> Self {
        Self {
            state: PagerState::Start,
            seen: HashSet::new(),
            pages: 0,
        }
    }

    /// Cursor for the next request: `Some(None)` for the first page,
    /// `None` once finished.
    pub fn cursor(&self) -> Option<Option<&str>> {
        match &self.state {
            PagerState::Start => Some(None),
            PagerState::At(cursor) => Some(Some(cursor.as_str())),
            PagerState::Done => None,
        }
    }

    /// Render the next request, or `None` when there are no more pages.
    pub fn next_query<F>(&self, render: F) -> Option<GraphQuery>
    where
        F: FnOnce(Option<&str>) -> GraphQuery,
    {
        self.cursor().map(render)
    }

    /// Record the `nextCursor` of the page just fetched.
    ///
    /// A repeated cursor finishes the pager and is reported as an error.
    pub fn advance(&mut self, next: Option<String>) -> GraphResult<()> {
        if self.is_done() {
            return Err(GraphError::Finished);
        }
        self.pages += 1;

        match next {
            None => {
                tracing::debug!(pages = self.pages, "pagination finished");
                self.state = PagerState::Done;
                Ok(())
            }
            Some(cursor) if self.seen.contains(&cursor) => {
                tracing::warn!(pages = self.pages, %cursor, "backend repeated a cursor");
                self.state = PagerState::Done;
                Err(GraphError::CursorRegressed { cursor })
            }
            Some(cursor) => {
                self.seen.insert(cursor.clone());
                self.state = PagerState::At(cursor);
                Ok(())
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }
}
