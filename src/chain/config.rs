use crate::chain::Chain;
use std::fmt;

/// Who is responsible for the payloads a [`Chain`] discards.
///
/// The policy is fixed when the chain is built.
pub enum Ownership<T> {
    /// The caller keeps ownership. Discarded payloads are dropped without any
    /// callback, which is a no-op for borrowed payloads such as `&U`.
    Borrowed,
    /// The chain owns its payloads, and passes every payload it discards
    /// (by `delete`, `clear`, `destroy` or drop) to the destructor.
    Owned(Box<dyn FnMut(T) + Send>),
}

impl<T> Ownership<T> {
    pub fn is_owned(&self) -> bool {
        matches!(self, Ownership::Owned(_))
    }

    pub(crate) fn dispose(&mut self, payload: T) {
        match self {
            Ownership::Borrowed => drop(payload),
            Ownership::Owned(destructor) => destructor(payload),
        }
    }
}

impl<T> Default for Ownership<T> {
    fn default() -> Self {
        Ownership::Borrowed
    }
}

impl<T> fmt::Debug for Ownership<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Borrowed => f.write_str("Borrowed"),
            Ownership::Owned(_) => f.write_str("Owned(..)"),
        }
    }
}

/// Configures a [`Chain`] before it is created.
///
/// # Examples
///
/// ```
/// use cyclic_chain::Chain;
///
/// let mut chain = Chain::builder().capacity(4).link_limit(2).build();
/// assert!(chain.insert(1).is_ok());
/// assert!(chain.insert(2).is_ok());
/// // The third link exceeds the limit and is refused.
/// assert!(chain.insert(3).is_err());
/// assert_eq!(chain.len(), 2);
/// ```
pub struct ChainBuilder<T> {
    capacity: usize,
    link_limit: Option<usize>,
    ownership: Ownership<T>,
}

impl<T> ChainBuilder<T> {
    pub fn new() -> Self {
        Self {
            capacity: 0,
            link_limit: None,
            ownership: Ownership::Borrowed,
        }
    }

    /// Number of links to allocate up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Maximum number of links the chain may hold. Inserting beyond it fails
    /// with [`ChainError::AllocationFailure`](crate::ChainError::AllocationFailure).
    pub fn link_limit(mut self, limit: usize) -> Self {
        self.link_limit = Some(limit);
        self
    }

    pub fn ownership(mut self, ownership: Ownership<T>) -> Self {
        self.ownership = ownership;
        self
    }

    /// Make the chain own its payloads, passing every discarded one to
    /// `destructor`.
    pub fn destructor<F>(self, destructor: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        self.ownership(Ownership::Owned(Box::new(destructor)))
    }

    pub fn build(self) -> Chain<T> {
        let capacity = match self.link_limit {
            Some(limit) => self.capacity.min(limit),
            None => self.capacity,
        };
        Chain::from_parts(capacity, self.link_limit, self.ownership)
    }
}

impl<T> Default for ChainBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChainBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("capacity", &self.capacity)
            .field("link_limit", &self.link_limit)
            .field("ownership", &self.ownership)
            .finish()
    }
}
