use std::fmt::{Debug, Formatter};

use slab::Slab;
use tracing::{debug, trace, warn};

pub use crate::chain::config::{ChainBuilder, Ownership};
pub use crate::chain::err::ChainError;
use crate::{Iter, Links};

pub mod config;
pub mod err;
pub mod iterator;

mod algorithms;

pub use crate::chain::algorithms::Comparator;

/// The `Chain` is a circular doubly-linked list with a built-in cursor.
///
/// Links live in a slab arena owned by the chain and refer to their
/// neighbours by arena key, so the cycle is expressed as key relationships
/// rather than owning pointers. Keys stay stable while a link is resident,
/// which is what lets the cursor follow its link through a sort.
///
/// The `Chain` contains:
/// - the arena `links`, whose length is the length of the chain;
/// - the cursor `link`, the current link;
/// - the origin `orig`, the reference point for [`reset`](Chain::reset) and
///   for positions given to [`part`](Chain::part);
/// - an optional link limit and the payload [`Ownership`] policy.
///
/// `link` and `orig` are `None` exactly when the chain is empty.
///
/// # Thread safety
///
/// A chain is not synchronized. It is `Send` when `T` is, since destructors
/// must be `Send` as well, but never `Sync`.
pub struct Chain<T> {
    pub(crate) links: Slab<Link<T>>,
    /// the cursor
    pub(crate) link: Option<usize>,
    /// the origin
    pub(crate) orig: Option<usize>,
    link_limit: Option<usize>,
    ownership: Ownership<T>,
}

pub(crate) struct Link<T> {
    pub(crate) next: usize,
    pub(crate) prev: usize,
    pub(crate) payload: Option<T>,
}

// private methods
impl<T> Chain<T> {
    pub(crate) fn from_parts(
        capacity: usize,
        link_limit: Option<usize>,
        ownership: Ownership<T>,
    ) -> Self {
        Self {
            links: Slab::with_capacity(capacity),
            link: None,
            orig: None,
            link_limit,
            ownership,
        }
    }

    pub(crate) fn next_key(&self, key: usize) -> usize {
        self.links[key].next
    }

    pub(crate) fn prev_key(&self, key: usize) -> usize {
        self.links[key].prev
    }

    pub(crate) fn connect(&mut self, prev: usize, next: usize) {
        self.links[prev].next = next;
        self.links[next].prev = prev;
    }

    /// Fails if `extra` more links would exceed the link limit.
    pub(crate) fn check_room(&self, extra: usize) -> Result<(), ChainError> {
        match self.link_limit {
            Some(limit) if self.len().saturating_add(extra) > limit => {
                warn!(len = self.len(), extra, limit, "link allocation refused");
                Err(ChainError::AllocationFailure { limit })
            }
            _ => Ok(()),
        }
    }

    /// Allocate a link after the cursor and move the cursor onto it.
    pub(crate) fn insert_link(&mut self, payload: Option<T>) -> Result<usize, ChainError> {
        self.check_room(1)?;
        Ok(self.splice_link(payload))
    }

    /// Like `insert_link`, for callers that already checked the link limit.
    pub(crate) fn splice_link(&mut self, payload: Option<T>) -> usize {
        let key = match self.link {
            None => {
                let entry = self.links.vacant_entry();
                let key = entry.key();
                entry.insert(Link {
                    next: key,
                    prev: key,
                    payload,
                });
                self.orig = Some(key);
                key
            }
            Some(current) => {
                let next = self.next_key(current);
                let key = self.links.insert(Link {
                    next,
                    prev: current,
                    payload,
                });
                self.connect(current, key);
                self.connect(key, next);
                #[cfg(debug_assertions)]
                {
                    self.assert_adjacent(current, key);
                    self.assert_adjacent(key, next);
                }
                key
            }
        };
        self.link = Some(key);
        key
    }

    /// Unlink and free the link under the cursor, moving the cursor (and the
    /// origin, if it was the removed link) to the predecessor.
    pub(crate) fn detach_current(&mut self) -> Result<Option<T>, ChainError> {
        let current = self.link.ok_or(ChainError::EmptyChain)?;
        let link = self.links.remove(current);
        if self.links.is_empty() {
            self.link = None;
            self.orig = None;
        } else {
            self.connect(link.prev, link.next);
            #[cfg(debug_assertions)]
            self.assert_adjacent(link.prev, link.next);
            self.link = Some(link.prev);
            if self.orig == Some(current) {
                self.orig = Some(link.prev);
            }
        }
        Ok(link.payload)
    }

    /// Unlink and free the origin link, moving the origin (and the cursor,
    /// if it was on the origin) to the successor.
    pub(crate) fn detach_origin(&mut self) -> Option<Option<T>> {
        let orig = self.orig?;
        let link = self.links.remove(orig);
        if self.links.is_empty() {
            self.link = None;
            self.orig = None;
        } else {
            self.connect(link.prev, link.next);
            self.orig = Some(link.next);
            if self.link == Some(orig) {
                self.link = Some(link.next);
            }
        }
        Some(link.payload)
    }

    /// Walk `offset` steps from `key` with wraparound, taking the shorter way
    /// around the cycle.
    pub(crate) fn seek_from(&self, mut key: usize, offset: isize) -> usize {
        let len = self.len();
        debug_assert!(len > 0, "Cannot seek in an empty chain");
        let steps = offset.rem_euclid(len as isize) as usize;
        if steps <= len - steps {
            for _ in 0..steps {
                key = self.next_key(key);
            }
        } else {
            for _ in 0..len - steps {
                key = self.prev_key(key);
            }
        }
        key
    }

    pub(crate) fn dispose(&mut self, payload: Option<T>) {
        if let Some(payload) = payload {
            self.ownership.dispose(payload);
        }
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: usize, next: usize) {
        assert_eq!(self.links[prev].next, next);
        assert_eq!(self.links[next].prev, prev);
    }
}

impl<T> Chain<T> {
    /// Create an empty chain that leaves payload ownership with the caller.
    #[inline]
    pub fn new() -> Self {
        Self::from_parts(0, None, Ownership::Borrowed)
    }

    /// Create an empty chain that owns its payloads and passes every payload
    /// it discards to `destructor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let freed = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&freed);
    /// let mut chain = Chain::with_destructor(move |_: Box<i32>| {
    ///     counter.fetch_add(1, Ordering::Relaxed);
    /// });
    ///
    /// chain.insert(Box::new(1)).unwrap();
    /// chain.insert(Box::new(2)).unwrap();
    /// chain.delete().unwrap();
    /// assert_eq!(freed.load(Ordering::Relaxed), 1);
    ///
    /// chain.destroy();
    /// assert_eq!(freed.load(Ordering::Relaxed), 2);
    /// ```
    pub fn with_destructor<F>(destructor: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        Self::from_parts(0, None, Ownership::Owned(Box::new(destructor)))
    }

    #[inline]
    pub fn builder() -> ChainBuilder<T> {
        ChainBuilder::new()
    }

    /// Release every link, disposing the payloads per the ownership policy.
    ///
    /// This is what dropping the chain does; it exists so the end of a
    /// chain's life can be spelled out at the call site.
    pub fn destroy(mut self) {
        debug!(len = self.len(), "destroying chain");
        self.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn link_limit(&self) -> Option<usize> {
        self.link_limit
    }

    #[inline]
    pub fn ownership(&self) -> &Ownership<T> {
        &self.ownership
    }

    /// Remove every link, disposing the payloads in forward order from the
    /// origin. The chain stays usable.
    ///
    /// Each link is unlinked before its payload is disposed, so a panicking
    /// destructor leaves the remaining links in a valid chain.
    pub fn clear(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        while let Some(payload) = self.detach_origin() {
            self.dispose(payload);
        }
        debug!(len, "cleared chain");
    }

    /// Insert `payload` in a new link after the cursor, and move the cursor
    /// to it.
    ///
    /// On an empty chain the new link becomes both cursor and origin.
    ///
    /// # Errors
    ///
    /// [`ChainError::AllocationFailure`] if the chain is at its link limit.
    /// The chain is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain = Chain::new();
    /// chain.insert(1).unwrap();
    /// assert!(chain.at_origin());
    /// chain.insert(2).unwrap();
    /// assert_eq!(chain.current(), Some(&2));
    /// assert!(!chain.at_origin());
    /// ```
    pub fn insert(&mut self, payload: T) -> Result<(), ChainError> {
        let key = self.insert_link(Some(payload))?;
        trace!(key, len = self.len(), "inserted link");
        Ok(())
    }

    /// Insert a vacant link (one without payload) after the cursor, and move
    /// the cursor to it. See [`trim`](Chain::trim).
    pub fn insert_empty(&mut self) -> Result<(), ChainError> {
        let key = self.insert_link(None)?;
        trace!(key, len = self.len(), "inserted vacant link");
        Ok(())
    }

    /// Remove the link under the cursor and dispose its payload. The cursor
    /// moves to the previous link.
    ///
    /// If the removed link was the origin, the new cursor link becomes the
    /// origin.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = (1..=3).collect();
    /// chain.reset().unwrap();
    /// chain.forward(1).unwrap();
    /// assert_eq!(chain.current(), Some(&2));
    /// chain.delete().unwrap();
    /// assert_eq!(chain.current(), Some(&1));
    /// assert_eq!(chain.len(), 2);
    /// ```
    pub fn delete(&mut self) -> Result<(), ChainError> {
        let payload = self.detach_current()?;
        trace!(len = self.len(), "deleted link");
        self.dispose(payload);
        Ok(())
    }

    /// Like [`delete`](Chain::delete), but hand the payload back to the
    /// caller instead of disposing it.
    pub fn take(&mut self) -> Result<Option<T>, ChainError> {
        let payload = self.detach_current()?;
        trace!(len = self.len(), "took link");
        Ok(payload)
    }

    /// Replace the payload of the link under the cursor, returning the old one.
    pub fn replace(&mut self, payload: Option<T>) -> Result<Option<T>, ChainError> {
        let current = self.link.ok_or(ChainError::EmptyChain)?;
        Ok(std::mem::replace(&mut self.links[current].payload, payload))
    }

    /// Remove every vacant link in a single pass from the origin.
    ///
    /// The surviving links keep their relative order. The origin becomes the
    /// first survivor in forward order from the old origin, and the cursor is
    /// left on the origin. If no link survives, the chain becomes empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain = Chain::new();
    /// chain.insert_empty().unwrap();
    /// chain.insert(1).unwrap();
    /// chain.insert_empty().unwrap();
    /// chain.insert(2).unwrap();
    /// chain.trim();
    /// assert_eq!(chain.len(), 2);
    /// assert_eq!(chain.current(), Some(&1));
    /// ```
    pub fn trim(&mut self) {
        let Some(orig) = self.orig else {
            return;
        };
        let len = self.len();
        let (mut front, mut back) = (None, None);
        let mut key = orig;
        for _ in 0..len {
            let next = self.next_key(key);
            if self.links[key].payload.is_none() {
                self.links.remove(key);
            } else {
                match back {
                    Some(back) => self.connect(back, key),
                    None => front = Some(key),
                }
                back = Some(key);
            }
            key = next;
        }
        match (front, back) {
            (Some(front), Some(back)) => {
                self.connect(back, front);
                self.orig = Some(front);
                self.link = Some(front);
            }
            _ => {
                self.orig = None;
                self.link = None;
            }
        }
        debug!(
            removed = len - self.len(),
            remaining = self.len(),
            "trimmed vacant links"
        );
    }

    /// Move the cursor `offset` links forward (positive) or backward
    /// (negative), wrapping around the chain.
    ///
    /// Moving by a multiple of the length leaves the cursor where it is.
    ///
    /// This operation should compute in *O*(min(*k*, *n* - *k*)) time, where
    /// *k* is `offset` modulo the length *n*.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = (1..=3).collect();
    /// chain.reset().unwrap();
    /// chain.move_by(2).unwrap();
    /// assert_eq!(chain.current(), Some(&3));
    /// chain.move_by(-4).unwrap();
    /// assert_eq!(chain.current(), Some(&2));
    /// ```
    pub fn move_by(&mut self, offset: isize) -> Result<(), ChainError> {
        let current = self.link.ok_or(ChainError::EmptyChain)?;
        self.link = Some(self.seek_from(current, offset));
        Ok(())
    }

    /// Move the cursor `steps` links forward, wrapping around the chain.
    pub fn forward(&mut self, steps: usize) -> Result<(), ChainError> {
        if self.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        self.move_by((steps % self.len()) as isize)
    }

    /// Move the cursor `steps` links backward, wrapping around the chain.
    pub fn rewind(&mut self, steps: usize) -> Result<(), ChainError> {
        if self.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        self.move_by(-((steps % self.len()) as isize))
    }

    /// Move the cursor back to the origin.
    pub fn reset(&mut self) -> Result<(), ChainError> {
        self.link = Some(self.orig.ok_or(ChainError::EmptyChain)?);
        Ok(())
    }

    /// Returns `true` if the cursor is on the origin (or if the chain is
    /// empty, where neither exists).
    #[inline]
    pub fn at_origin(&self) -> bool {
        self.link == self.orig
    }

    /// The payload under the cursor, or `None` if the chain is empty or the
    /// link is vacant.
    pub fn current(&self) -> Option<&T> {
        self.link.and_then(|key| self.links[key].payload.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        let key = self.link?;
        self.links[key].payload.as_mut()
    }

    /// The payload of the origin link.
    pub fn origin(&self) -> Option<&T> {
        self.orig.and_then(|key| self.links[key].payload.as_ref())
    }

    pub fn peek_next(&self) -> Option<&T> {
        let key = self.next_key(self.link?);
        self.links[key].payload.as_ref()
    }

    pub fn peek_prev(&self) -> Option<&T> {
        let key = self.prev_key(self.link?);
        self.links[key].payload.as_ref()
    }

    /// Iterate over every link from the origin, yielding `None` for vacant
    /// links.
    #[inline]
    pub fn links(&self) -> Links<'_, T> {
        Links::new(self)
    }

    /// Iterate over the payloads from the origin, skipping vacant links.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<T: Debug> Debug for Chain<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.links()).finish()
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
impl<T> Chain<T> {
    /// Check the cycle from the cursor in both directions.
    pub(crate) fn assert_circular(&self) {
        let Some(start) = self.link else {
            assert!(self.orig.is_none());
            assert!(self.links.is_empty());
            return;
        };
        let orig = self.orig.expect("non-empty chain without origin");
        let mut seen = std::collections::HashSet::new();
        let mut key = start;
        for _ in 0..self.len() {
            assert!(seen.insert(key), "link {} visited twice", key);
            assert_eq!(self.prev_key(self.next_key(key)), key);
            key = self.next_key(key);
        }
        assert_eq!(key, start, "forward walk did not close the cycle");
        assert!(seen.contains(&orig), "origin is not in the cycle");
        for _ in 0..self.len() {
            key = self.prev_key(key);
        }
        assert_eq!(key, start, "backward walk did not close the cycle");
    }
}
