use crate::chain::{Chain, ChainError};
use tracing::debug;

/// Payloads of a run of links detached from a chain, in forward order.
///
/// Links are arena cells of their chain, so moving a run into another chain
/// carries the payloads over and re-allocates the cells there.
pub(crate) struct DetachedLinks<T> {
    pub(crate) payloads: Vec<Option<T>>,
}

impl<T> Chain<T> {
    /// Detach `len` links starting at `front`, closing the chain across the
    /// gap.
    ///
    /// The cursor lands on the link before the run, and so does the origin
    /// if it was inside the run. Detaching every link empties the chain.
    pub(crate) fn detach_links(&mut self, front: usize, len: usize) -> DetachedLinks<T> {
        debug_assert!(len > 0, "Cannot detach links of length 0");
        debug_assert!(len <= self.len(), "Cannot detach more links than the chain holds");
        let before = self.prev_key(front);
        let mut payloads = Vec::with_capacity(len);
        let (mut key, mut orig_detached) = (front, false);
        for _ in 0..len {
            orig_detached |= self.orig == Some(key);
            let link = self.links.remove(key);
            payloads.push(link.payload);
            key = link.next;
        }
        if self.links.is_empty() {
            self.link = None;
            self.orig = None;
        } else {
            self.connect(before, key);
            self.link = Some(before);
            if orig_detached {
                self.orig = Some(before);
            }
        }
        DetachedLinks { payloads }
    }

    /// Splice detached links after the cursor, in order, leaving the cursor
    /// on the first of them. The link limit must already have been checked.
    pub(crate) fn attach_links(&mut self, detached: DetachedLinks<T>) {
        let mut first = None;
        for payload in detached.payloads {
            let key = self.splice_link(payload);
            first.get_or_insert(key);
        }
        if first.is_some() {
            self.link = first;
        }
    }

    /// Move the links from position `start` to position `end` (both
    /// inclusive) into `dest`.
    ///
    /// Positions are offsets from the origin with the same wraparound as
    /// [`move_by`](Chain::move_by), and the range is circular: `start == end`
    /// moves one link, and `start > end` wraps past the back of the chain.
    ///
    /// The moved links keep their order and are spliced after the cursor of
    /// `dest`, whose cursor ends on the first of them; an empty `dest` takes
    /// the first moved link as its origin. In this chain the cursor ends on the
    /// link just before the removed run, which also becomes the origin if the
    /// origin was removed.
    ///
    /// # Errors
    ///
    /// - [`ChainError::InvalidRange`] if this chain is empty;
    /// - [`ChainError::AllocationFailure`] if `dest` cannot take the run under
    ///   its link limit.
    ///
    /// Neither chain is modified on error. A chain cannot be partitioned into
    /// itself, which the borrow checker already rules out.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut source: Chain<i32> = (0..10).collect();
    /// let mut dest = Chain::new();
    ///
    /// source.part(&mut dest, 2, 5).unwrap();
    /// assert_eq!(source.iter().copied().collect::<Vec<_>>(), vec![0, 1, 6, 7, 8, 9]);
    /// assert_eq!(dest.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    /// assert_eq!(source.current(), Some(&1));
    /// assert_eq!(dest.current(), Some(&2));
    ///
    /// // A wrapping range takes the back and the front of the chain. The
    /// // origin went with it, so the link before the run takes its place.
    /// source.part(&mut dest, -1, 0).unwrap();
    /// assert_eq!(source.origin(), Some(&8));
    /// assert_eq!(source.iter().copied().collect::<Vec<_>>(), vec![8, 1, 6, 7]);
    /// assert_eq!(dest.iter().copied().collect::<Vec<_>>(), vec![2, 9, 0, 3, 4, 5]);
    /// ```
    pub fn part(&mut self, dest: &mut Chain<T>, start: isize, end: isize) -> Result<(), ChainError> {
        let len = self.len();
        let orig = self
            .orig
            .ok_or(ChainError::InvalidRange { start, end, len })?;
        let (first, last) = (
            start.rem_euclid(len as isize),
            end.rem_euclid(len as isize),
        );
        let count = (last - first).rem_euclid(len as isize) as usize + 1;
        dest.check_room(count)?;

        let front = self.seek_from(orig, first);
        let detached = self.detach_links(front, count);
        dest.attach_links(detached);
        debug!(
            start,
            end,
            moved = count,
            source_len = self.len(),
            dest_len = dest.len(),
            "partitioned chain"
        );
        Ok(())
    }
}
