// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded forward/backward scans over a feed, and the amend vocabulary
//!
//! A scan reads a snapshot of the feed taken when it is created, so entries
//! appended afterwards are not visited and the base stays free for writes
//! while the scan is open. Abandoning a scan has no side effects.

use crate::error::BraidError;
use crate::view::{FeedView, View};
use braid_core::Encoding;
use std::fmt;

pub type Predicate<V> = Box<dyn Fn(&V) -> bool + Send + Sync>;
pub type MapFn<V> = Box<dyn FnOnce(V) -> Option<V> + Send>;

/// Index walk over the half-open window `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    reverse: bool,
    start: u64,
    end: u64,
    next: Option<u64>,
}

impl ScanCursor {
    pub fn new(len: u64, reverse: bool) -> Self {
        Self::bounded(0, len, reverse)
    }

    pub fn bounded(start: u64, end: u64, reverse: bool) -> Self {
        let mut cursor = Self {
            reverse,
            start,
            end,
            next: None,
        };
        cursor.restart();
        cursor
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn advance(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = if self.reverse {
            (current > self.start).then(|| current - 1)
        } else {
            current.checked_add(1).filter(|n| *n < self.end)
        };
        Some(current)
    }

    pub fn restart(&mut self) {
        self.next = if self.start >= self.end {
            None
        } else if self.reverse {
            Some(self.end - 1)
        } else {
            Some(self.start)
        };
    }
}

pub struct ScanConfig<V> {
    pub reverse: bool,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub predicate: Option<Predicate<V>>,
}

impl<V> Default for ScanConfig<V> {
    fn default() -> Self {
        Self {
            reverse: false,
            start: None,
            end: None,
            predicate: None,
        }
    }
}

impl<V> ScanConfig<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn predicate(mut self, f: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(f));
        self
    }

    fn cursor(&self, len: u64) -> ScanCursor {
        let end = self.end.map_or(len, |end| end.min(len));
        ScanCursor::bounded(self.start.unwrap_or(0), end, self.reverse)
    }
}

impl<V> fmt::Debug for ScanConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("reverse", &self.reverse)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Iterator yielding `(index, value)` for each matching entry
pub struct Scan<E: Encoding> {
    feed: FeedView<E>,
    cursor: ScanCursor,
    predicate: Option<Predicate<E::Value>>,
}

impl<E: Encoding + Default> Scan<E> {
    pub fn new(feed: FeedView<E>, config: ScanConfig<E::Value>) -> Self {
        let cursor = config.cursor(feed.len());
        tracing::trace!(?cursor, "scan started");
        Self {
            feed,
            cursor,
            predicate: config.predicate,
        }
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Rewind to the first index of the window
    pub fn restart(&mut self) {
        self.cursor.restart();
    }
}

impl<E: Encoding + Default> Iterator for Scan<E> {
    type Item = Result<(u64, E::Value), BraidError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.cursor.advance() {
            let value = match self.feed.get(index) {
                Ok(Some(value)) => value,
                Ok(None) => break,
                Err(source) => {
                    self.cursor = ScanCursor::new(0, false);
                    let location = format!("{}[{index}]", self.feed.name());
                    return Some(Err(BraidError::Corrupt { location, source }));
                }
            };
            let matched = self.predicate.as_ref().map_or(true, |p| p(&value));
            tracing::trace!(index, matched, "scan step");
            if matched {
                return Some(Ok((index, value)));
            }
        }
        None
    }
}

/// How `amend` picks and rewrites an entry
pub struct AmendConfig<V> {
    /// Replacement used when no `map` is given
    pub constant: Option<V>,
    pub predicate: Option<Predicate<V>>,
    /// Rewrites the matched entry; `None` drops the amendment
    pub map: Option<MapFn<V>>,
    /// Search newest first
    pub reverse: bool,
}

impl<V> Default for AmendConfig<V> {
    fn default() -> Self {
        Self {
            constant: None,
            predicate: None,
            map: None,
            reverse: true,
        }
    }
}

impl<V> AmendConfig<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(mut self, value: V) -> Self {
        self.constant = Some(value);
        self
    }

    pub fn predicate(mut self, f: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(f));
        self
    }

    pub fn map(mut self, f: impl FnOnce(V) -> Option<V> + Send + 'static) -> Self {
        self.map = Some(Box::new(f));
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Split into the search and the rewrite
    pub(crate) fn into_parts(self) -> (ScanConfig<V>, Replacement<V>) {
        let scan = ScanConfig {
            reverse: self.reverse,
            start: None,
            end: None,
            predicate: self.predicate,
        };
        let replacement = Replacement {
            constant: self.constant,
            map: self.map,
        };
        (scan, replacement)
    }
}

pub(crate) struct Replacement<V> {
    constant: Option<V>,
    map: Option<MapFn<V>>,
}

impl<V> Replacement<V> {
    pub(crate) fn apply(self, entry: V) -> Option<V> {
        match (self.map, self.constant) {
            (Some(map), _) => map(entry),
            (None, Some(constant)) => Some(constant),
            (None, None) => Some(entry),
        }
    }
}

impl<V> fmt::Debug for AmendConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmendConfig")
            .field("constant", &self.constant.is_some())
            .field("predicate", &self.predicate.is_some())
            .field("map", &self.map.is_some())
            .field("reverse", &self.reverse)
            .finish()
    }
}

/// Outcome of `amend`
#[derive(Debug, Clone, PartialEq)]
pub enum Amendment<V> {
    /// No entry matched the predicate
    NotFound,
    /// An entry matched but the replacement was empty, so nothing was
    /// appended. `value` is `None` when `map` rejected the entry.
    Dropped { source: u64, value: Option<V> },
    Appended { source: u64, value: V },
}

impl<V> Amendment<V> {
    /// The computed replacement, appended or not
    pub fn value(&self) -> Option<&V> {
        match self {
            Amendment::Appended { value, .. } => Some(value),
            Amendment::Dropped { value, .. } => value.as_ref(),
            Amendment::NotFound => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            Amendment::Appended { value, .. } => Some(value),
            Amendment::Dropped { value, .. } => value,
            Amendment::NotFound => None,
        }
    }

    pub fn is_appended(&self) -> bool {
        matches!(self, Amendment::Appended { .. })
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
