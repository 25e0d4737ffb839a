use crate::chain::Chain;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

mod part;
mod sort;

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.links().eq(other.links())
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T: PartialOrd> PartialOrd for Chain<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.links().partial_cmp(other.links())
    }
}

impl<T: Ord> Ord for Chain<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.links().cmp(other.links())
    }
}

impl<T: Hash> Hash for Chain<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for link in self.links() {
            link.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

/// An ordering over payloads, used by [`Chain::sort_with`].
///
/// Any `FnMut(&T, &T) -> Ordering` is a comparator. Implement the trait
/// directly for comparators that carry state of their own.
///
/// # Examples
///
/// ```
/// use cyclic_chain::{Chain, Comparator};
/// use std::cell::Cell;
/// use std::cmp::Ordering;
///
/// /// Orders by the first field, counting how often it is asked.
/// struct ByName<'a> {
///     calls: &'a Cell<usize>,
/// }
///
/// impl Comparator<(&'static str, u32)> for ByName<'_> {
///     fn compare(&mut self, a: &(&'static str, u32), b: &(&'static str, u32)) -> Ordering {
///         self.calls.set(self.calls.get() + 1);
///         a.0.cmp(b.0)
///     }
/// }
///
/// let calls = Cell::new(0);
/// let mut chain: Chain<(&str, u32)> = vec![("b", 1), ("a", 2), ("b", 0)].into_iter().collect();
/// chain.sort_with(ByName { calls: &calls });
/// assert!(calls.get() > 0);
/// assert_eq!(
///     chain.iter().copied().collect::<Vec<_>>(),
///     vec![("a", 2), ("b", 1), ("b", 0)]
/// );
/// ```
pub trait Comparator<T: ?Sized> {
    fn compare(&mut self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: FnMut(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&mut self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

impl<T> Chain<T> {
    /// Returns `true` if the `Chain` contains a payload equal to the given
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let chain: Chain<i32> = (0..3).collect();
    ///
    /// assert_eq!(chain.contains(&0), true);
    /// assert_eq!(chain.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Sort the chain.
    ///
    /// This sort is stable (i.e., does not reorder equal payloads).
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = vec![5, 2, 4, 3, 1].into_iter().collect();
    ///
    /// chain.sort();
    ///
    /// assert_eq!(chain.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_with(T::cmp);
    }

    /// Sort the chain with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal payloads). The
    /// comparator must define a total ordering, otherwise the resulting order
    /// is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = vec![5, 4, 1, 3, 2].into_iter().collect();
    /// chain.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    ///
    /// // reverse sorting
    /// chain.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.sort_with(compare);
    }

    /// Sorts the chain with a key extraction function.
    ///
    /// This sort is stable (i.e., does not reorder equal payloads).
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = vec![-5, 4, 1, -3, 2].into_iter().collect();
    ///
    /// chain.sort_by_key(|k| k.abs());
    /// assert_eq!(chain.into_iter().collect::<Vec<_>>(), vec![1, 2, -3, 4, -5]);
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        self.sort_with(|a: &T, b: &T| f(a).cmp(&f(b)));
    }

    /// Sort the chain with a [`Comparator`].
    ///
    /// This sort is stable (i.e., does not reorder equal payloads). Vacant
    /// links sort before every payload.
    ///
    /// After sorting, the origin is the first link in sorted order. The cursor
    /// stays on the link it was on, so it still sees the same payload. Chains
    /// with fewer than two links are left as they are.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is an iterative bottom-up merge sort that
    /// relinks the links in place. There is no recursion and no temporary
    /// storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_chain::Chain;
    ///
    /// let mut chain: Chain<i32> = vec![3, 1, 2].into_iter().collect();
    /// // the cursor is on 2, the last inserted payload
    /// chain.sort_with(|a: &i32, b: &i32| a.cmp(b));
    /// assert_eq!(chain.origin(), Some(&1));
    /// assert_eq!(chain.current(), Some(&2));
    /// ```
    pub fn sort_with<C>(&mut self, mut compare: C)
    where
        C: Comparator<T>,
    {
        sort::merge_sort(self, |a, b| match (a, b) {
            (Some(a), Some(b)) => compare.compare(a, b) == Ordering::Less,
            (None, Some(_)) => true,
            _ => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::chain::{Chain, ChainError, Comparator};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::cmp::Ordering;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn to_vec<T: Copy>(chain: &Chain<T>) -> Vec<T> {
        chain.iter().copied().collect()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Payload {
        id: usize,
        seq: usize,
    }

    #[test]
    fn sort_payload_ids() {
        init_tracing();
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&destroyed);
        let mut chain = Chain::with_destructor(move |p: Payload| sink.lock().unwrap().push(p.id));

        let ids = [11, 77, 97, 22, 88, 99, 33, 55, 44, 66];
        for (seq, &id) in ids.iter().enumerate() {
            chain.insert(Payload { id, seq }).unwrap();
        }
        chain.sort_by(|a, b| a.id.cmp(&b.id));
        chain.assert_circular();

        assert_eq!(chain.origin().map(|p| p.id), Some(11));
        chain.reset().unwrap();
        let mut visited = Vec::new();
        for _ in 0..ids.len() {
            visited.push(chain.current().map(|p| p.id).unwrap());
            chain.forward(1).unwrap();
        }
        assert_eq!(visited, vec![11, 22, 33, 44, 55, 66, 77, 88, 97, 99]);
        assert!(chain.at_origin());

        chain.destroy();
        assert_eq!(
            destroyed.lock().unwrap().as_slice(),
            &[11, 22, 33, 44, 55, 66, 77, 88, 97, 99]
        );
    }

    #[test]
    fn sort_stable() {
        let mut chain = Chain::new();
        let ids = [3, 1, 3, 2, 1, 3, 2];
        for (seq, &id) in ids.iter().enumerate() {
            chain.insert(Payload { id, seq }).unwrap();
        }
        chain.sort_by_key(|p| p.id);
        let sorted: Vec<_> = chain.iter().map(|p| (p.id, p.seq)).collect();
        assert_eq!(
            sorted,
            vec![(1, 1), (1, 4), (2, 3), (2, 6), (3, 0), (3, 2), (3, 5)]
        );
    }

    #[test]
    fn sort_cursor_follows_payload() {
        let mut chain: Chain<i32> = vec![40, 10, 30, 20].into_iter().collect();
        chain.reset().unwrap();
        chain.forward(2).unwrap();
        assert_eq!(chain.current(), Some(&30));
        chain.sort();
        assert_eq!(chain.current(), Some(&30));
        assert_eq!(chain.peek_prev(), Some(&20));
        assert_eq!(chain.peek_next(), Some(&40));
        chain.reset().unwrap();
        assert_eq!(chain.current(), Some(&10));
    }

    #[test]
    fn sort_vacant_links_first() {
        let mut chain = Chain::new();
        chain.insert(2).unwrap();
        chain.insert_empty().unwrap();
        chain.insert(1).unwrap();
        chain.insert_empty().unwrap();
        chain.sort();
        assert_eq!(
            chain.links().collect::<Vec<_>>(),
            vec![None, None, Some(&1), Some(&2)]
        );
        chain.assert_circular();
    }

    #[test]
    fn sort_trivial_chains() {
        let mut chain = Chain::<i32>::new();
        chain.sort();
        assert!(chain.is_empty());

        chain.insert(1).unwrap();
        chain.sort();
        assert_eq!(to_vec(&chain), vec![1]);
        assert!(chain.at_origin());
        chain.assert_circular();
    }

    #[test]
    fn sort_stateful_comparator() {
        struct Counting<'a> {
            calls: &'a mut usize,
        }
        impl Comparator<i32> for Counting<'_> {
            fn compare(&mut self, a: &i32, b: &i32) -> Ordering {
                *self.calls += 1;
                b.cmp(a)
            }
        }
        let mut calls = 0;
        let mut chain: Chain<i32> = (0..16).collect();
        chain.sort_with(Counting { calls: &mut calls });
        assert_eq!(to_vec(&chain), (0..16).rev().collect::<Vec<_>>());
        // n * log2(n) bounds the comparisons of a merge sort
        assert!(calls > 0 && calls <= 16 * 4);
    }

    #[test]
    fn sort_matches_vec_model() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for len in (0..40).chain([63, 64, 65, 100, 257]) {
            let mut model: Vec<(u8, usize)> =
                (0..len).map(|seq| (rng.random_range(0..8), seq)).collect();
            let mut chain: Chain<_> = model.iter().copied().collect();
            if len > 0 {
                chain.move_by(rng.random_range(0..len as i64) as isize).unwrap();
            }
            let cursor = chain.current().copied();

            chain.sort_by_key(|&(key, _)| key);
            model.sort_by_key(|&(key, _)| key);

            assert_eq!(to_vec(&chain), model);
            assert_eq!(chain.current().copied(), cursor);
            assert_eq!(chain.origin(), model.first());
            chain.assert_circular();
        }
    }

    #[test]
    fn part_range() {
        init_tracing();
        let mut source: Chain<i32> = (0..10).collect();
        let mut dest = Chain::new();
        source.part(&mut dest, 2, 5).unwrap();
        assert_eq!(source.len(), 6);
        assert_eq!(dest.len(), 4);
        assert_eq!(to_vec(&source), vec![0, 1, 6, 7, 8, 9]);
        assert_eq!(to_vec(&dest), vec![2, 3, 4, 5]);
        assert_eq!(source.current(), Some(&1));
        assert_eq!(dest.current(), Some(&2));
        assert!(dest.at_origin());
        source.assert_circular();
        dest.assert_circular();

        let all: HashSet<i32> = source.iter().chain(dest.iter()).copied().collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all, (0..10).collect());
    }

    #[test]
    fn part_single_link() {
        let mut source: Chain<i32> = (0..5).collect();
        let mut dest = Chain::new();
        source.part(&mut dest, 3, 3).unwrap();
        assert_eq!(to_vec(&source), vec![0, 1, 2, 4]);
        assert_eq!(to_vec(&dest), vec![3]);
        assert_eq!(source.current(), Some(&2));
        dest.assert_circular();
    }

    #[test]
    fn part_wrapping_range() {
        let mut source: Chain<i32> = (0..6).collect();
        let mut dest = Chain::new();
        source.part(&mut dest, 4, 1).unwrap();
        assert_eq!(to_vec(&dest), vec![4, 5, 0, 1]);
        // the origin was moved out, the link before the run replaces it
        assert_eq!(source.origin(), Some(&3));
        assert!(source.at_origin());
        assert_eq!(to_vec(&source), vec![3, 2]);
        source.assert_circular();

        // offsets wrap like `move_by`
        let mut source: Chain<i32> = (0..6).collect();
        let mut dest = Chain::new();
        source.part(&mut dest, 8, -3).unwrap();
        assert_eq!(to_vec(&dest), vec![2, 3]);
        assert_eq!(to_vec(&source), vec![0, 1, 4, 5]);
    }

    #[test]
    fn part_whole_chain() {
        let mut source: Chain<i32> = (0..4).collect();
        let mut dest = Chain::new();
        source.part(&mut dest, 1, 0).unwrap();
        assert!(source.is_empty());
        source.assert_circular();
        assert_eq!(to_vec(&dest), vec![1, 2, 3, 0]);
        dest.assert_circular();
    }

    #[test]
    fn part_into_non_empty() {
        let mut source: Chain<i32> = (0..5).collect();
        let mut dest: Chain<i32> = (10..13).collect();
        dest.reset().unwrap();
        source.part(&mut dest, 1, 2).unwrap();
        assert_eq!(to_vec(&dest), vec![10, 1, 2, 11, 12]);
        assert_eq!(dest.current(), Some(&1));
        assert_eq!(dest.origin(), Some(&10));
        dest.assert_circular();
    }

    #[test]
    fn part_errors() {
        let mut source = Chain::<i32>::new();
        let mut dest = Chain::new();
        assert_eq!(
            source.part(&mut dest, 0, 1),
            Err(ChainError::InvalidRange {
                start: 0,
                end: 1,
                len: 0
            })
        );

        let mut source: Chain<i32> = (0..5).collect();
        source.forward(2).unwrap();
        let mut dest = Chain::builder().link_limit(2).build();
        dest.insert(100).unwrap();
        assert_eq!(
            source.part(&mut dest, 0, 1),
            Err(ChainError::AllocationFailure { limit: 2 })
        );
        // neither chain changed
        assert_eq!(to_vec(&source), vec![0, 1, 2, 3, 4]);
        assert_eq!(source.current(), Some(&1));
        assert_eq!(to_vec(&dest), vec![100]);

        source.part(&mut dest, 4, 4).unwrap();
        assert_eq!(to_vec(&dest), vec![100, 4]);
    }

    #[test]
    fn part_matches_vec_model() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let len = rng.random_range(1..30_usize);
            let mut model: Vec<usize> = (0..len).collect();
            model.shuffle(&mut rng);
            let mut source: Chain<usize> = model.iter().copied().collect();
            let mut dest = Chain::new();
            let start = rng.random_range(-60..60_i64) as isize;
            let end = rng.random_range(-60..60_i64) as isize;

            source.part(&mut dest, start, end).unwrap();

            let first = start.rem_euclid(len as isize) as usize;
            let count = (end - start).rem_euclid(len as isize) as usize + 1;
            let moved: Vec<usize> = (0..count).map(|i| model[(first + i) % len]).collect();
            assert_eq!(to_vec(&dest), moved);
            assert_eq!(source.len() + dest.len(), len);
            assert_eq!(dest.current(), moved.first());
            source.assert_circular();
            dest.assert_circular();

            let mut rest: Vec<usize> = to_vec(&source);
            rest.extend(&moved);
            rest.sort_unstable();
            assert_eq!(rest, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn chain_eq_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(chain: &Chain<i32>) -> u64 {
            let mut hasher = DefaultHasher::new();
            chain.hash(&mut hasher);
            hasher.finish()
        }

        let a: Chain<i32> = (0..4).collect();
        let mut b: Chain<i32> = (0..4).collect();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(a.contains(&3));

        b.insert_empty().unwrap();
        assert_ne!(a, b);
        assert!(a < b);

        let c: Chain<i32> = (1..4).collect();
        assert!(a < c);
    }
}
