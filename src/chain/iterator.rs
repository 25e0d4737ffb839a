use crate::chain::{Chain, ChainError};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

/// An iterator over every link of a [`Chain`], starting at the origin.
///
/// Vacant links are yielded as `None`. The iterator is fused and does not
/// wrap around.
pub struct Links<'a, T: 'a> {
    chain: &'a Chain<T>,
    front: usize,
    back: usize,
    len: usize,
}

impl<'a, T: 'a> Links<'a, T> {
    pub(crate) fn new(chain: &'a Chain<T>) -> Self {
        let (front, back) = match chain.orig {
            Some(orig) => (orig, chain.prev_key(orig)),
            None => (0, 0),
        };
        Self {
            chain,
            front,
            back,
            len: chain.len(),
        }
    }
}

impl<'a, T: 'a> Clone for Links<'a, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Links<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T: 'a> Iterator for Links<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let link = &self.chain.links[self.front];
        self.front = link.next;
        self.len -= 1;
        Some(link.payload.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Links<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let link = &self.chain.links[self.back];
        self.back = link.prev;
        self.len -= 1;
        Some(link.payload.as_ref())
    }
}

impl<'a, T: 'a> ExactSizeIterator for Links<'a, T> {}

impl<'a, T: 'a> FusedIterator for Links<'a, T> {}

/// An iterator over the payloads of a [`Chain`], starting at the origin and
/// skipping vacant links.
pub struct Iter<'a, T: 'a> {
    links: Links<'a, T>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(chain: &'a Chain<T>) -> Self {
        Self {
            links: Links::new(chain),
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.links.find_map(|payload| payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.links.len))
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(payload) = self.links.next_back()? {
                return Some(payload);
            }
        }
    }
}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// An owning iterator over the payloads of a [`Chain`], starting at the
/// origin and skipping vacant links.
///
/// Yielded payloads are handed to the caller and never reach the chain's
/// destructor; payloads left when the iterator is dropped are disposed as
/// usual.
pub struct IntoIter<T> {
    chain: Chain<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.chain).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(payload) = self.chain.detach_origin()? {
                return Some(payload);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.chain.len()))
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

impl<'a, T: 'a> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Chain<T> {
    /// Insert every item of `iter` after the cursor, in order, stopping at
    /// the first refused allocation.
    ///
    /// Items inserted before the failure stay in the chain.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), ChainError> {
        iter.into_iter().try_for_each(|item| self.insert(item))
    }
}

impl<T> FromIterator<T> for Chain<T> {
    /// Build a chain whose origin is the first item and whose cursor is on
    /// the last.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Chain::new();
        chain.extend(iter);
        chain
    }
}

impl<T> Extend<T> for Chain<T> {
    /// # Panics
    ///
    /// Panics if the chain reaches its link limit. Use
    /// [`Chain::try_extend`] to handle that case.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            panic!("cannot extend chain: {}", err);
        }
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for Chain<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}
