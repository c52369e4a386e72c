//! The circular sequence engine.
//!
//! A [`Ring`] is a circular doubly-linked list of arena slots anchored by a
//! sentinel node that carries no value. The sentinel's `next` is the first
//! element and its `prev` is the last; an empty ring's sentinel links to
//! itself both ways. Anchoring at a sentinel keeps insertion, removal,
//! `cut`, and `splice` branch-free at the boundaries.
//!
//! Nodes live in user-provided storage (see [`Storage`]); the ring only
//! holds the sentinel's key. All rings that need to exchange elements
//! (`cut`, `splice`, k-way merge) must share one storage instance.
//!
//! # Example
//!
//! ```
//! use ringseq::{Arena, Node, Ring};
//!
//! let mut arena: Arena<Node<&str>> = Arena::with_capacity(8);
//! let mut ring = Ring::try_new(&mut arena).unwrap();
//!
//! ring.try_push_back(&mut arena, "a").unwrap();
//! ring.try_push_back(&mut arena, "b").unwrap();
//! ring.try_push_front(&mut arena, "z").unwrap();
//!
//! assert_eq!(ring.len(&arena), 3);
//! assert_eq!(ring.pop_front(&mut arena), Some("z"));
//! assert_eq!(ring.pop_back(&mut arena), Some("b"));
//!
//! ring.release(&mut arena);
//! assert!(arena.is_empty());
//! ```

use std::marker::PhantomData;

use crate::{BoundedStorage, Full, Key, Storage, UnboundedStorage};

/// A node in the ring: a link pair plus an optional payload.
///
/// Element nodes carry `Some(value)`; each ring's sentinel is a node with
/// no payload. Only link fields are ever rewritten after construction.
#[derive(Debug)]
pub struct Node<T, K: Key = u32> {
    pub(crate) prev: K,
    pub(crate) next: K,
    pub(crate) value: Option<T>,
}

impl<T, K: Key> Node<T, K> {
    /// Creates an unlinked element node.
    #[inline]
    fn element(value: T) -> Self {
        Self {
            prev: K::NONE,
            next: K::NONE,
            value: Some(value),
        }
    }

    /// Creates an unlinked sentinel node.
    #[inline]
    fn sentinel() -> Self {
        Self {
            prev: K::NONE,
            next: K::NONE,
            value: None,
        }
    }

    /// Returns the payload of an element node.
    #[inline]
    pub(crate) fn into_value(self) -> T {
        debug_assert!(self.value.is_some());
        // Safety: only element nodes are unwrapped; sentinels never leave
        // the ring through a value-returning path
        unsafe { self.value.unwrap_unchecked() }
    }

    /// Returns a reference to the payload of an element node.
    #[inline]
    pub(crate) fn value_ref(&self) -> &T {
        debug_assert!(self.value.is_some());
        // Safety: see `into_value`
        unsafe { self.value.as_ref().unwrap_unchecked() }
    }
}

/// A circular doubly-linked sequence over external storage.
///
/// The ring holds only its sentinel's key; every operation takes the
/// backing storage explicitly. See the [module docs](self) for the layout
/// and the storage-sharing requirement.
///
/// A ring does not free its slots on drop (it cannot reach the storage);
/// call [`Ring::release`] to destroy it, or drop the whole storage.
#[derive(Debug)]
pub struct Ring<T, S, K: Key = u32>
where
    S: Storage<Node<T, K>, Key = K>,
{
    pub(crate) sentinel: K,
    pub(crate) _marker: PhantomData<(T, S)>,
}

// =============================================================================
// Construction
// =============================================================================

impl<T, S, K: Key> Ring<T, S, K>
where
    S: Storage<Node<T, K>, Key = K> + BoundedStorage<Node<T, K>>,
{
    /// Creates an empty ring, allocating its sentinel in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(()))` if the storage has no free slot for the
    /// sentinel. This is the only way creation can fail.
    pub fn try_new(storage: &mut S) -> Result<Self, Full<()>> {
        let sentinel = storage
            .try_insert(Node::sentinel())
            .map_err(|_| Full(()))?;

        // Safety: just inserted
        let node = unsafe { storage.get_unchecked_mut(sentinel) };
        node.prev = sentinel;
        node.next = sentinel;

        Ok(Self {
            sentinel,
            _marker: PhantomData,
        })
    }
}

impl<T, S, K: Key> Ring<T, S, K>
where
    S: Storage<Node<T, K>, Key = K> + UnboundedStorage<Node<T, K>>,
{
    /// Creates an empty ring, allocating its sentinel in `storage`.
    pub fn new(storage: &mut S) -> Self {
        let sentinel = storage.insert(Node::sentinel());

        // Safety: just inserted
        let node = unsafe { storage.get_unchecked_mut(sentinel) };
        node.prev = sentinel;
        node.next = sentinel;

        Self {
            sentinel,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// Base impl - traversal, primitives, removal
// =============================================================================

impl<T, S, K: Key> Ring<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Returns the sentinel's key.
    #[inline]
    pub(crate) fn sentinel(&self) -> K {
        self.sentinel
    }

    /// Returns the successor of `key` in the ring.
    #[inline]
    pub(crate) fn next_of(&self, storage: &S, key: K) -> K {
        // Safety: key reached by ring traversal (ring invariant)
        unsafe { storage.get_unchecked(key) }.next
    }

    /// Returns the predecessor of `key` in the ring.
    #[inline]
    pub(crate) fn prev_of(&self, storage: &S, key: K) -> K {
        // Safety: key reached by ring traversal (ring invariant)
        unsafe { storage.get_unchecked(key) }.prev
    }

    /// Key of the first element, or the sentinel if empty.
    #[inline]
    pub(crate) fn first(&self, storage: &S) -> K {
        self.next_of(storage, self.sentinel)
    }

    /// Key of the last element, or the sentinel if empty.
    #[inline]
    pub(crate) fn last(&self, storage: &S) -> K {
        self.prev_of(storage, self.sentinel)
    }

    /// Returns `true` if the ring has no elements.
    #[inline]
    pub fn is_empty(&self, storage: &S) -> bool {
        self.first(storage) == self.sentinel
    }

    /// Returns the number of elements.
    ///
    /// This walks the ring: O(n). The ring carries no cached count.
    pub fn len(&self, storage: &S) -> usize {
        let mut count = 0;
        let mut cur = self.first(storage);
        while cur != self.sentinel {
            count += 1;
            cur = self.next_of(storage, cur);
        }
        count
    }

    /// Returns a reference to the first element's value.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        K: 'a,
    {
        let first = self.first(storage);
        if first == self.sentinel {
            return None;
        }
        // Safety: first is a linked element (ring invariant)
        Some(unsafe { storage.get_unchecked(first) }.value_ref())
    }

    /// Returns a reference to the last element's value.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        K: 'a,
    {
        let last = self.last(storage);
        if last == self.sentinel {
            return None;
        }
        // Safety: last is a linked element (ring invariant)
        Some(unsafe { storage.get_unchecked(last) }.value_ref())
    }

    // ========================================================================
    // Primitives - the only operations that rewrite link fields
    // ========================================================================

    /// Links an existing node immediately after `anchor`. O(1).
    ///
    /// `anchor` must be in this ring (the sentinel counts); `node` must be
    /// allocated in `storage` and not linked anywhere.
    pub fn link_after(&mut self, storage: &mut S, anchor: K, node: K) {
        let next = self.next_of(storage, anchor);

        // Safety: node allocated per contract; anchor/next per ring invariant
        let n = unsafe { storage.get_unchecked_mut(node) };
        n.prev = anchor;
        n.next = next;
        unsafe { storage.get_unchecked_mut(anchor) }.next = node;
        unsafe { storage.get_unchecked_mut(next) }.prev = node;
    }

    /// Unlinks `node` from the ring. O(1).
    ///
    /// The slot stays allocated; its own link fields are stale until it is
    /// re-linked or removed from storage.
    pub fn unlink(&mut self, storage: &mut S, node: K) {
        debug_assert!(node != self.sentinel, "cannot unlink the sentinel");

        // Safety: node is linked in this ring (caller contract)
        let (prev, next) = {
            let n = unsafe { storage.get_unchecked(node) };
            (n.prev, n.next)
        };
        unsafe { storage.get_unchecked_mut(prev) }.next = next;
        unsafe { storage.get_unchecked_mut(next) }.prev = prev;
    }

    /// Detaches the closed range `[from, to]` into the empty ring `out`,
    /// preserving order. O(1).
    ///
    /// Both keys must be elements of this ring with `from` not after `to`;
    /// both rings must live in the same storage.
    pub fn cut(&mut self, storage: &mut S, from: K, to: K, out: &mut Self) {
        debug_assert!(out.is_empty(storage), "cut target must be empty");
        debug_assert!(from != self.sentinel && to != self.sentinel);

        // Safety: all keys are linked per ring invariant and caller contract
        let before = unsafe { storage.get_unchecked(from) }.prev;
        let after = unsafe { storage.get_unchecked(to) }.next;

        // Close the gap in this ring.
        unsafe { storage.get_unchecked_mut(before) }.next = after;
        unsafe { storage.get_unchecked_mut(after) }.prev = before;

        // Thread the range onto out's sentinel.
        let out_s = out.sentinel;
        let s = unsafe { storage.get_unchecked_mut(out_s) };
        s.next = from;
        s.prev = to;
        unsafe { storage.get_unchecked_mut(from) }.prev = out_s;
        unsafe { storage.get_unchecked_mut(to) }.next = out_s;
    }

    /// Moves all elements of `src` into this ring immediately after `at`,
    /// preserving order; `src` becomes empty. O(1).
    ///
    /// `at` may be the sentinel (insert at the front). Both rings must live
    /// in the same storage.
    pub fn splice(&mut self, storage: &mut S, src: &mut Self, at: K) {
        let src_s = src.sentinel;
        // Safety: sentinels are always allocated; links per ring invariant
        let (first, last) = {
            let s = unsafe { storage.get_unchecked(src_s) };
            (s.next, s.prev)
        };
        if first == src_s {
            return;
        }

        let after = self.next_of(storage, at);

        unsafe { storage.get_unchecked_mut(at) }.next = first;
        unsafe { storage.get_unchecked_mut(first) }.prev = at;
        unsafe { storage.get_unchecked_mut(last) }.next = after;
        unsafe { storage.get_unchecked_mut(after) }.prev = last;

        let s = unsafe { storage.get_unchecked_mut(src_s) };
        s.next = src_s;
        s.prev = src_s;
    }

    /// Moves all elements of `src` to the end of this ring; `src` becomes
    /// empty. O(1).
    pub fn splice_tail(&mut self, storage: &mut S, src: &mut Self) {
        let at = self.last(storage);
        self.splice(storage, src, at);
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes and returns the first element's value.
    ///
    /// Returns `None` if the ring is empty.
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let first = self.first(storage);
        if first == self.sentinel {
            return None;
        }
        self.unlink(storage, first);
        // Safety: first was a linked element, still allocated
        Some(unsafe { storage.remove_unchecked(first) }.into_value())
    }

    /// Removes and returns the last element's value.
    ///
    /// Returns `None` if the ring is empty.
    pub fn pop_back(&mut self, storage: &mut S) -> Option<T> {
        let last = self.last(storage);
        if last == self.sentinel {
            return None;
        }
        self.unlink(storage, last);
        // Safety: last was a linked element, still allocated
        Some(unsafe { storage.remove_unchecked(last) }.into_value())
    }

    /// Unlinks an element and frees its slot, dropping the value.
    #[inline]
    pub(crate) fn delete(&mut self, storage: &mut S, node: K) {
        self.unlink(storage, node);
        // Safety: node was a linked element, still allocated
        unsafe {
            storage.remove_unchecked(node);
        }
    }

    /// Removes every element, dropping the values. The sentinel stays.
    pub fn clear(&mut self, storage: &mut S) {
        while self.pop_front(storage).is_some() {}
    }

    /// Destroys the ring: removes every element, then frees the sentinel.
    pub fn release(self, storage: &mut S) {
        let mut ring = self;
        ring.clear(storage);
        storage.remove(ring.sentinel);
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns a double-ended iterator over element values, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter {
            storage,
            front: self.first(storage),
            back: self.last(storage),
            sentinel: self.sentinel,
            _marker: PhantomData,
        }
    }

    /// Checks the ring invariant: every node's neighbors point back at it.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn is_well_formed(&self, storage: &S) -> bool {
        let mut cur = self.sentinel;
        loop {
            let next = self.next_of(storage, cur);
            if self.prev_of(storage, next) != cur {
                return false;
            }
            cur = next;
            if cur == self.sentinel {
                return true;
            }
        }
    }
}

// =============================================================================
// Bounded storage impl - fallible insertion
// =============================================================================

impl<T, S, K: Key> Ring<T, S, K>
where
    S: BoundedStorage<Node<T, K>, Key = K>,
{
    /// Inserts a value at the front of the ring.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; no partial state is
    /// left behind (the slot is only occupied on success).
    #[inline]
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = storage
            .try_insert(Node::element(value))
            .map_err(|e| Full(e.0.into_value()))?;
        let sentinel = self.sentinel;
        self.link_after(storage, sentinel, key);
        Ok(key)
    }

    /// Inserts a value at the back of the ring.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_push_back(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = storage
            .try_insert(Node::element(value))
            .map_err(|e| Full(e.0.into_value()))?;
        let last = self.last(storage);
        self.link_after(storage, last, key);
        Ok(key)
    }
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<T, S, K: Key> Ring<T, S, K>
where
    S: UnboundedStorage<Node<T, K>, Key = K>,
{
    /// Inserts a value at the front of the ring.
    #[inline]
    pub fn push_front(&mut self, storage: &mut S, value: T) -> K {
        let key = storage.insert(Node::element(value));
        let sentinel = self.sentinel;
        self.link_after(storage, sentinel, key);
        key
    }

    /// Inserts a value at the back of the ring.
    #[inline]
    pub fn push_back(&mut self, storage: &mut S, value: T) -> K {
        let key = storage.insert(Node::element(value));
        let last = self.last(storage);
        self.link_after(storage, last, key);
        key
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Double-ended iterator over references to ring elements.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    sentinel: K,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.sentinel {
            return None;
        }

        // Safety: ring invariant guarantees front is a linked element
        let node = unsafe { self.storage.get_unchecked(self.front) };

        // Check if the cursors met in the middle
        if self.front == self.back {
            self.front = self.sentinel;
            self.back = self.sentinel;
        } else {
            self.front = node.next;
        }

        Some(node.value_ref())
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back == self.sentinel {
            return None;
        }

        // Safety: ring invariant guarantees back is a linked element
        let node = unsafe { self.storage.get_unchecked(self.back) };

        if self.front == self.back {
            self.front = self.sentinel;
            self.back = self.sentinel;
        } else {
            self.back = node.prev;
        }

        Some(node.value_ref())
    }
}
