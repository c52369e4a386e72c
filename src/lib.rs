//! Arena-backed circular sequence engine with in-place queue algorithms.
//!
//! This crate provides a sentinel-anchored circular doubly-linked list over
//! externally owned storage, plus a family of in-place algorithms on it:
//! reversal, block-wise reversal, duplicate-run elimination, monotonic
//! filtering, stable merge sort, and k-way merge. No element is ever copied
//! or reallocated by a structural operation; everything is index rewiring
//! over existing arena slots.
//!
//! # Design
//!
//! Storage is separated from structure:
//!
//! ```text
//! Storage (Arena/Slab) - owns the nodes, provides stable keys
//! Ring                 - coordinates keys, doesn't own data
//! Chain                - ordered rings sharing one storage, k-way merge
//! ```
//!
//! A [`Ring`] holds only the key of its sentinel node; every operation
//! takes the backing storage explicitly. This keeps the hot path free of
//! allocation (pre-size the arena at startup) and lets many rings exchange
//! elements in O(1) via `cut`/`splice`, which is what the k-way merge is
//! built on.
//!
//! # Quick Start
//!
//! ```
//! use ringseq::{Arena, Node, Ring};
//!
//! let mut arena: Arena<Node<u64>> = Arena::with_capacity(16);
//! let mut ring = Ring::try_new(&mut arena).unwrap();
//!
//! for v in [3, 1, 4, 1, 5] {
//!     ring.try_push_back(&mut arena, v).unwrap();
//! }
//!
//! ring.sort(&mut arena, false);
//! let sorted: Vec<_> = ring.iter(&arena).copied().collect();
//! assert_eq!(sorted, vec![1, 1, 3, 4, 5]);
//! ```
//!
//! When nothing needs to share storage, [`OwnedRing`] bundles the arena
//! and the ring behind a plain value-level API:
//!
//! ```
//! use ringseq::OwnedRing;
//!
//! let mut queue: OwnedRing<u64> = OwnedRing::with_capacity(8);
//! queue.push_back(1).unwrap();
//! queue.push_back(2).unwrap();
//! queue.push_back(3).unwrap();
//!
//! queue.reverse();
//! assert_eq!(queue.pop_front(), Some(3));
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a ring must use the storage it was created in, and
//! rings exchanging elements (`cut`, `splice`, [`Chain`]) must share one
//! storage instance. This is the caller's responsibility (same discipline
//! as the `slab` crate).
//!
//! # Storage Traits
//!
//! ```text
//! Storage<T>           - base trait: get, get_mut, remove
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert -> Result
//!     │
//!     └── UnboundedStorage<T> - growable, insert -> Key (infallible)
//! ```
//!
//! [`Arena`] is the built-in fixed-capacity backend; `try_push_*` hands the
//! value back in [`Full`] when it rejects an insertion. Growable storage
//! gets the infallible `push_*` surface instead.
//!
//! # Operations
//!
//! | Operation | Time | Notes |
//! |-----------|------|-------|
//! | push/pop front/back | O(1) | plus `front`/`back` accessors |
//! | `len` | O(n) | no cached count |
//! | `cut` / `splice` | O(1) | between rings in one storage |
//! | `reverse`, `reverse_in_groups` | O(n) | in place |
//! | `delete_duplicates` | O(n) | sorted input, whole runs deleted |
//! | `keep_non_dominated_*` | O(n) | one right-to-left pass |
//! | `sort` | O(n log n) | stable, both directions |
//! | `Chain::merge_all` | O(N log N) | N = total elements |
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod algo;
pub mod chain;
pub mod key;
pub mod owned;
pub mod ring;
pub mod storage;

pub use chain::{Chain, ChainEntry};
pub use key::Key;
pub use owned::OwnedRing;
pub use ring::{Iter, Node, Ring};
pub use storage::{Arena, BoundedStorage, Full, Storage, UnboundedStorage};
