//! OwnedRing - a ring that owns its storage.

use crate::{Arena, Full, Iter, Key, Node, Ring};

type Store<T, K> = Arena<Node<T, K>, K>;

/// A circular sequence that owns its storage.
///
/// This is a convenience wrapper around [`Ring`] + [`Arena`] for cases
/// where you don't need to share storage across multiple rings (sharing is
/// required by `cut`/`splice`/[`Chain`](crate::Chain); this wrapper covers
/// everything else).
///
/// # Example
///
/// ```
/// use ringseq::OwnedRing;
///
/// let mut queue: OwnedRing<String> = OwnedRing::with_capacity(8);
///
/// queue.push_back("c".to_string()).unwrap();
/// queue.push_back("b".to_string()).unwrap();
/// queue.push_back("a".to_string()).unwrap();
///
/// queue.sort(false);
/// let sorted: Vec<_> = queue.iter().cloned().collect();
/// assert_eq!(sorted, vec!["a", "b", "c"]);
///
/// assert_eq!(queue.pop_front().as_deref(), Some("a"));
/// ```
pub struct OwnedRing<T, K: Key = u32> {
    storage: Store<T, K>,
    ring: Ring<T, Store<T, K>, K>,
}

impl<T, K: Key> OwnedRing<T, K> {
    /// Creates an empty ring with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        // One extra slot for the sentinel
        let mut storage = Arena::with_capacity(capacity + 1);
        let ring = Ring::try_new(&mut storage).expect("fresh arena has room for the sentinel");
        Self { storage, ring }
    }

    /// Returns the number of elements. O(n).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len(&self.storage)
    }

    /// Returns `true` if the ring is empty. O(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty(&self.storage)
    }

    /// Returns the element capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity() - 1
    }

    /// Inserts a value at the front.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the ring is at capacity.
    #[inline]
    pub fn push_front(&mut self, value: T) -> Result<(), Full<T>> {
        self.ring.try_push_front(&mut self.storage, value).map(|_| ())
    }

    /// Inserts a value at the back.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the ring is at capacity.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), Full<T>> {
        self.ring.try_push_back(&mut self.storage, value).map(|_| ())
    }

    /// Removes and returns the front element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.ring.pop_front(&mut self.storage)
    }

    /// Removes and returns the back element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        self.ring.pop_back(&mut self.storage)
    }

    /// Returns a reference to the front element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.ring.front(&self.storage)
    }

    /// Returns a reference to the back element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.ring.back(&self.storage)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.ring.clear(&mut self.storage);
    }

    /// Returns a double-ended iterator over the elements, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, Store<T, K>, K> {
        self.ring.iter(&self.storage)
    }

    /// Reverses the ring in place. See [`Ring::reverse`].
    #[inline]
    pub fn reverse(&mut self) {
        self.ring.reverse(&mut self.storage);
    }

    /// Reverses each full block of `k` elements in place.
    /// See [`Ring::reverse_in_groups`].
    #[inline]
    pub fn reverse_in_groups(&mut self, k: usize) {
        self.ring.reverse_in_groups(&mut self.storage, k);
    }

    /// Swaps adjacent pairs of elements; a trailing odd element stays put.
    #[inline]
    pub fn swap_pairs(&mut self) {
        self.ring.reverse_in_groups(&mut self.storage, 2);
    }

    /// Removes and returns the middle element. See [`Ring::remove_middle`].
    #[inline]
    pub fn remove_middle(&mut self) -> Option<T> {
        self.ring.remove_middle(&mut self.storage)
    }

    /// Deletes every run of equal adjacent values, keeping no
    /// representative. See [`Ring::delete_duplicates`].
    #[inline]
    pub fn delete_duplicates(&mut self)
    where
        T: PartialEq,
    {
        self.ring.delete_duplicates(&mut self.storage);
    }

    /// Deletes every element with a strictly smaller value to its right.
    /// Returns the survivor count.
    #[inline]
    pub fn keep_non_dominated_ascending(&mut self) -> usize
    where
        T: Ord,
    {
        self.ring.keep_non_dominated_ascending(&mut self.storage)
    }

    /// Deletes every element with a strictly greater value to its right.
    /// Returns the survivor count.
    #[inline]
    pub fn keep_non_dominated_descending(&mut self) -> usize
    where
        T: Ord,
    {
        self.ring.keep_non_dominated_descending(&mut self.storage)
    }

    /// Sorts the ring with a stable merge sort. See [`Ring::sort`].
    #[inline]
    pub fn sort(&mut self, descending: bool)
    where
        T: Ord,
    {
        self.ring.sort(&mut self.storage, descending);
    }
}

impl<T, K: Key> Default for OwnedRing<T, K> {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}
