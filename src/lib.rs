//! This crate provides a circular doubly-linked list with a built-in cursor,
//! called a chain.
//!
//! The [`Chain`] keeps one current link, the cursor, and one distinguished
//! link, the origin. Links are inserted after the cursor and removed at the
//! cursor in constant time, and the cursor moves in either direction with
//! wraparound.
//!
//! Here is a quick example showing how the chain works.
//!
//! ```
//! use cyclic_chain::Chain;
//!
//! let mut chain = Chain::new();
//! chain.insert(1).unwrap(); // the first link is also the origin
//! chain.insert(2).unwrap();
//! chain.insert(3).unwrap();
//! assert_eq!(chain.current(), Some(&3));
//!
//! chain.forward(1).unwrap(); // wraps around to the origin
//! assert!(chain.at_origin());
//!
//! chain.move_by(-2).unwrap();
//! chain.delete().unwrap(); // removes 2, the cursor falls back to 1
//! assert_eq!(chain.current(), Some(&1));
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the chain is like the following graph:
//! ```text
//!     ┌──────────────────────────────────────────────────────────────┐
//!     ↓                                                              │
//! ╔═══════════╗           ╔═══════════╗                     ╔═══════════╗
//! ║   next    ║ ────────→ ║   next    ║ ──────→ ┄┄ ───────→ ║   next    ║ ─┘
//! ╟───────────╢           ╟───────────╢                     ╟───────────╢
//! ║   prev    ║ ←──────── ║   prev    ║ ←────── ┄┄ ←─────── ║   prev    ║ ─┐
//! ╟───────────╢           ╟───────────╢                     ╟───────────╢  │
//! ║ Option<T> ║           ║ Option<T> ║                     ║ Option<T> ║  │
//! ╚═══════════╝           ╚═══════════╝                     ╚═══════════╝  │
//!  slab[orig]                 slab[k]                         slab[link]   │
//!     ↑                                                                    │
//!     └────────────────────────────────────────────────────────────────────┘
//! ```
//! The `Chain` contains:
//! - a slab arena that owns every link;
//! - the arena key `link` of the cursor;
//! - the arena key `orig` of the origin.
//!
//! Each link holds the `next` and `prev` keys of its neighbours and an
//! optional payload. A link without payload is *vacant*, and vacant links can
//! be dropped in one pass with [`trim`].
//!
//! An empty chain has neither cursor nor origin. A chain with a single link
//! has that link as its own `next` and `prev`.
//!
//! # Ownership
//!
//! A chain either leaves its payloads to the caller, or owns them and hands
//! every payload it discards to a destructor given at creation, see
//! [`Ownership`] and [`ChainBuilder`]. A chain can also carry a link limit,
//! past which inserting fails with [`ChainError::AllocationFailure`].
//!
//! ```
//! use cyclic_chain::{Chain, ChainError};
//!
//! let mut chain = Chain::builder().link_limit(2).build();
//! chain.insert("a").unwrap();
//! chain.insert("b").unwrap();
//! assert_eq!(chain.insert("c"), Err(ChainError::AllocationFailure { limit: 2 }));
//! ```
//!
//! # Iteration
//!
//! Iterating over a chain is by the [`Links`] and [`Iter`] iterators. They
//! start at the origin and go around once (fused and non-cyclic). [`Links`]
//! yields every link, and `None` for the vacant ones; [`Iter`] yields the
//! payloads only.
//!
//! ## Examples
//!
//! ```
//! use cyclic_chain::Chain;
//!
//! let mut chain: Chain<i32> = (1..=2).collect();
//! chain.insert_empty().unwrap();
//! assert_eq!(chain.links().collect::<Vec<_>>(), vec![Some(&1), Some(&2), None]);
//!
//! let mut iter = chain.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), None);
//! assert_eq!(iter.next(), None); // Fused and non-cyclic
//! ```
//!
//! # Algorithms
//!
//! - [`sort_with`]: a stable in-place merge sort under a [`Comparator`];
//! - [`part`]: move a range of links into another chain;
//! - [`trim`]: remove every vacant link.
//!
//! ## Examples
//!
//! ```
//! use cyclic_chain::Chain;
//!
//! let mut chain: Chain<i32> = vec![4, 1, 3, 2, 0].into_iter().collect();
//! chain.sort();
//! assert_eq!(chain.origin(), Some(&0));
//!
//! let mut high = Chain::new();
//! chain.part(&mut high, 3, 4).unwrap();
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
//! assert_eq!(high.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
//! ```
//!
//! [`Chain`]: crate::Chain
//! [`Links`]: crate::Links
//! [`Iter`]: crate::Iter
//! [`trim`]: crate::Chain::trim
//! [`sort_with`]: crate::Chain::sort_with
//! [`part`]: crate::Chain::part

#[doc(inline)]
pub use chain::iterator::{IntoIter, Iter, Links};
#[doc(inline)]
pub use chain::{Chain, ChainBuilder, ChainError, Comparator, Ownership};

pub mod chain;
