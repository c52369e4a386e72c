//! Storage traits and the fixed-capacity arena.
//!
//! Rings do not own their nodes; nodes live in storage with stable keys,
//! and ring operations are key rewrites. This is what lets `cut` and
//! `splice` move elements between rings in O(1) without copying a node.
//!
//! # Storage Invariant
//!
//! A ring must always be used with the same storage instance it was created
//! in. Passing a different storage is a logic error the crate cannot detect
//! (same discipline as the `slab` crate).
//!
//! # Bounded vs Unbounded
//!
//! Insertion is split by capacity behavior:
//!
//! - [`BoundedStorage`] — fixed capacity, `try_insert -> Result<K, Full<T>>`
//! - [`UnboundedStorage`] — growable, `insert -> K` (infallible)
//!
//! [`Arena`] is bounded. `slab::Slab` (feature `slab`) is unbounded.

use std::marker::PhantomData;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// Implementations must provide stable keys (valid until explicitly
/// removed), O(1) access and removal, and slot reuse.
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Removes a value without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn remove_unchecked(&mut self, key: Self::Key) -> T;
}

/// Fixed-capacity storage with fallible insertion.
pub trait BoundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if every slot is occupied.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;
}

/// Growable storage with infallible insertion.
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage is full.
///
/// Contains the value that could not be inserted, allowing recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Arena - fixed capacity, slot vector + LIFO free list
// =============================================================================

enum Slot<T, K> {
    Occupied(T),
    /// Next entry in the free list, or `K::NONE`.
    Vacant(K),
}

/// Fixed-capacity slab with runtime-determined size.
///
/// Slots are allocated lazily up to the capacity fixed at construction;
/// removed slots are reused LIFO. Keys are slot indices and stay valid
/// until the slot is removed.
///
/// # Example
///
/// ```
/// use ringseq::{Arena, BoundedStorage, Storage};
///
/// let mut arena: Arena<u64> = Arena::with_capacity(100);
///
/// let key = arena.try_insert(42).unwrap();
/// assert_eq!(arena.get(key), Some(&42));
/// ```
pub struct Arena<T, K: Key = u32> {
    slots: Vec<Slot<T, K>>,
    free_head: K,
    len: usize,
    capacity: usize,
    _marker: PhantomData<K>,
}

impl<T, K: Key> Arena<T, K> {
    /// Creates an arena with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or not representable by the key type.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity < K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        Self {
            slots: Vec::with_capacity(capacity),
            free_head: K::NONE,
            len: 0,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }
}

impl<T, K: Key> Storage<T> for Arena<T, K> {
    type Key = K;

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        if matches!(slot, Slot::Vacant(_)) {
            return None;
        }

        let prev = core::mem::replace(slot, Slot::Vacant(self.free_head));
        self.free_head = key;
        self.len -= 1;

        match prev {
            Slot::Occupied(value) => Some(value),
            // Checked vacant above
            Slot::Vacant(_) => unreachable!(),
        }
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        // Safety: caller guarantees key is valid and occupied
        unsafe { self.get(key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        // Safety: caller guarantees key is valid and occupied
        unsafe { self.get_mut(key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: K) -> T {
        // Safety: caller guarantees key is valid and occupied
        unsafe { self.remove(key).unwrap_unchecked() }
    }
}

impl<T, K: Key> BoundedStorage<T> for Arena<T, K> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        let key = if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.slots[key.as_usize()];
            self.free_head = match *slot {
                Slot::Vacant(next) => next,
                // Free list only threads vacant slots
                Slot::Occupied(_) => unreachable!(),
            };
            *slot = Slot::Occupied(value);
            key
        } else if self.slots.len() < self.capacity {
            let key = K::from_usize(self.slots.len());
            self.slots.push(Slot::Occupied(value));
            key
        } else {
            return Err(Full(value));
        };

        self.len += 1;
        Ok(key)
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.get_mut(key)
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        // Safety: caller guarantees key is valid and occupied
        unsafe { self.get(key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        // Safety: caller guarantees key is valid and occupied
        unsafe { self.get_mut(key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: usize) -> T {
        self.remove(key)
    }
}

#[cfg(feature = "slab")]
impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        self.insert(value)
    }
}
