//! # Result Cursors
//!
//! Query and history results hold store-side resources until they are closed.
//! A [`Cursor`] owns a release hook that runs exactly once: either when
//! [`Cursor::close`] is called or when the cursor is dropped. Early returns through
//! `?` (for example a decode failure halfway through an iteration) therefore still
//! release the cursor.

use crate::ledger::LedgerError;
use std::fmt;

type Release = Box<dyn FnOnce() + Send>;

/// A forward-only, non-restartable sequence of ledger results.
pub struct Cursor<T> {
    items: Box<dyn Iterator<Item = Result<T, LedgerError>> + Send>,
    release: Option<Release>,
}

impl<T: Send + 'static> Cursor<T> {
    /// Wraps a lazy result sequence together with the hook that frees it.
    pub fn new<I>(items: I, release: impl FnOnce() + Send + 'static) -> Self
    where
        I: IntoIterator<Item = Result<T, LedgerError>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            items: Box::new(items.into_iter()),
            release: Some(Box::new(release)),
        }
    }

    /// A cursor over already materialised rows with nothing to release.
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self::new(rows.into_iter().map(Ok), || {})
    }
}

impl<T> Cursor<T> {
    /// Releases the cursor. Further iteration yields nothing.
    pub fn close(mut self) {
        self.release_now();
    }

    pub fn is_closed(&self) -> bool {
        self.release.is_none()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_closed() {
            return None;
        }
        self.items.next()
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("closed", &self.is_closed())
            .finish()
    }
}
