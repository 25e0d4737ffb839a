use std::fmt;

/// Errors returned by fallible [`Chain`](crate::Chain) operations.
///
/// Every failing call returns before touching the linking structure, so a
/// chain is always left exactly as it was when an error comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainError {
    /// The operation needs at least one link, but the chain is empty.
    EmptyChain,
    /// A new link could not be allocated because the chain already holds
    /// `limit` links.
    AllocationFailure { limit: usize },
    /// A partition range could not be resolved against a chain of `len` links.
    InvalidRange { start: isize, end: isize, len: usize },
}

impl ChainError {
    #[inline]
    pub fn is_empty_chain(&self) -> bool {
        matches!(self, ChainError::EmptyChain)
    }

    #[inline]
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, ChainError::AllocationFailure { .. })
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::EmptyChain => write!(f, "operation requires a non-empty chain"),
            ChainError::AllocationFailure { limit } => {
                write!(f, "cannot allocate a link: chain is limited to {} links", limit)
            }
            ChainError::InvalidRange { start, end, len } => write!(
                f,
                "range {}..={} cannot be resolved against a chain of length {}",
                start, end, len
            ),
        }
    }
}

impl std::error::Error for ChainError {}
