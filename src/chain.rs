//! A chain of sequences and the k-way merge over it.
//!
//! A [`Chain`] holds entries in order, each wrapping one [`Ring`] with a
//! cached element count. [`Chain::merge_all`] concatenates every entry's
//! ring into the first entry (O(1) splices) and sorts the result once,
//! which beats pairwise merging for many inputs. All entries must share
//! the chain's storage instance.

use crate::{Key, Node, Ring, Storage};

/// One sequence in a chain: a ring plus its cached element count.
///
/// The cache is taken when the entry is pushed and updated by
/// [`Chain::merge_all`]; it is not maintained across direct mutation of
/// the ring.
#[derive(Debug)]
pub struct ChainEntry<T, S, K: Key = u32>
where
    S: Storage<Node<T, K>, Key = K>,
{
    ring: Ring<T, S, K>,
    size: usize,
}

impl<T, S, K: Key> ChainEntry<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// The wrapped ring.
    #[inline]
    pub fn ring(&self) -> &Ring<T, S, K> {
        &self.ring
    }

    /// The cached element count.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// An ordered chain of sequences sharing one storage instance.
#[derive(Debug)]
pub struct Chain<T, S, K: Key = u32>
where
    S: Storage<Node<T, K>, Key = K>,
{
    entries: Vec<ChainEntry<T, S, K>>,
}

impl<T, S, K: Key> Chain<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty chain.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a ring to the chain, caching its current length.
    pub fn push(&mut self, storage: &S, ring: Ring<T, S, K>) {
        let size = ring.len(storage);
        self.entries.push(ChainEntry { ring, size });
    }

    /// Number of entries (not elements) in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the chain holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry, which holds every element after [`merge_all`].
    ///
    /// [`merge_all`]: Chain::merge_all
    #[inline]
    pub fn first(&self) -> Option<&ChainEntry<T, S, K>> {
        self.entries.first()
    }

    /// Merges every entry's ring into the first entry's ring and sorts the
    /// result. Returns the total element count.
    ///
    /// Each input is expected to already be sorted in the requested
    /// direction; the merge itself does not rely on that, it splices all
    /// entries into the first (O(1) each) and runs one sort over the
    /// concatenation. Afterwards the first entry holds everything and the
    /// rest are empty, with cached sizes updated to match.
    ///
    /// An empty chain returns 0; a single-entry chain returns its cached
    /// size without touching the ring.
    pub fn merge_all(&mut self, storage: &mut S, descending: bool) -> usize
    where
        T: Ord,
    {
        let Some((first, rest)) = self.entries.split_first_mut() else {
            return 0;
        };
        if rest.is_empty() {
            return first.size;
        }

        let mut total = first.size;
        for entry in rest {
            total += entry.size;
            first.ring.splice_tail(storage, &mut entry.ring);
            entry.size = 0;
        }

        first.ring.sort(storage, descending);
        first.size = total;
        total
    }

    /// Destroys the chain, releasing every entry's ring.
    pub fn release(self, storage: &mut S) {
        for entry in self.entries {
            entry.ring.release(storage);
        }
    }
}

impl<T, S, K: Key> Default for Chain<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}
