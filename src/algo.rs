//! In-place algorithms over [`Ring`].
//!
//! Everything here is link rewiring plus value comparison: no element is
//! ever copied, cloned, or reallocated, and no operation allocates beyond
//! what the ring already holds. Sorting temporarily detaches the elements
//! from the sentinel and works on a [`Key::NONE`]-terminated singly-linked
//! chain, then re-threads the `prev` links in one pass.
//!
//! | operation                      | time     | notes                        |
//! |--------------------------------|----------|------------------------------|
//! | `reverse`                      | O(n)     | link swap, no comparisons    |
//! | `reverse_in_groups(k)`         | O(n)     | partial tail block untouched |
//! | `remove_middle`                | O(n)     | lower middle on even lengths |
//! | `delete_duplicates`            | O(n)     | input must be sorted         |
//! | `keep_non_dominated_*`         | O(n)     | one right-to-left pass       |
//! | `sort(descending)`             | O(n log n) | stable merge sort          |

use crate::{Key, Node, Ring, Storage};

impl<T, S, K: Key> Ring<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Reverses the ring in place. O(n), no comparisons, no allocation.
    ///
    /// Walks every node including the sentinel and swaps its link pair.
    pub fn reverse(&mut self, storage: &mut S) {
        let mut cur = self.sentinel;
        loop {
            // Safety: cur reached by ring traversal
            let node = unsafe { storage.get_unchecked_mut(cur) };
            std::mem::swap(&mut node.prev, &mut node.next);
            // prev now holds the old successor
            cur = node.prev;
            if cur == self.sentinel {
                return;
            }
        }
    }

    /// Reverses the closed range `[first, last]` in place, a fused
    /// cut + reverse + splice-back. O(range length).
    fn reverse_range(&mut self, storage: &mut S, first: K, last: K) {
        let before = self.prev_of(storage, first);
        let after = self.next_of(storage, last);

        let mut cur = first;
        loop {
            // Safety: cur is in the range (caller contract)
            let node = unsafe { storage.get_unchecked_mut(cur) };
            let next = node.next;
            node.next = node.prev;
            node.prev = next;
            if cur == last {
                break;
            }
            cur = next;
        }

        // Stitch the reversed range back between its old neighbors.
        unsafe { storage.get_unchecked_mut(before) }.next = last;
        unsafe { storage.get_unchecked_mut(last) }.prev = before;
        unsafe { storage.get_unchecked_mut(first) }.next = after;
        unsafe { storage.get_unchecked_mut(after) }.prev = first;
    }

    /// Reverses each consecutive block of exactly `k` elements in place.
    ///
    /// A trailing block shorter than `k` is left untouched. `k <= 1` is a
    /// no-op, as is `k` larger than the ring. `k = 2` swaps adjacent pairs.
    pub fn reverse_in_groups(&mut self, storage: &mut S, k: usize) {
        if k <= 1 {
            return;
        }

        let mut first = self.first(storage);
        while first != self.sentinel {
            // Find the block's last element; bail on a partial block.
            let mut last = first;
            for _ in 1..k {
                last = self.next_of(storage, last);
                if last == self.sentinel {
                    return;
                }
            }
            let next_block = self.next_of(storage, last);
            self.reverse_range(storage, first, last);
            first = next_block;
        }
    }

    /// Removes the middle element and returns its value.
    ///
    /// Two cursors walk inward from both ends until they meet; for even
    /// lengths the lower middle (the last element of the first half) is
    /// removed. Returns `None` on an empty ring.
    pub fn remove_middle(&mut self, storage: &mut S) -> Option<T> {
        let mut h = self.first(storage);
        if h == self.sentinel {
            return None;
        }
        let mut t = self.last(storage);
        while h != t && self.next_of(storage, t) != h {
            h = self.next_of(storage, h);
            t = self.prev_of(storage, t);
        }

        self.unlink(storage, t);
        // Safety: t is a linked element of a non-empty ring
        Some(unsafe { storage.remove_unchecked(t) }.into_value())
    }

    /// Deletes every element that belongs to a run of equal adjacent
    /// values, keeping no representative. The ring must be sorted
    /// ascending for runs to be contiguous. Empty rings are a no-op.
    ///
    /// `[a, a, b, c, c]` becomes `[b]`.
    pub fn delete_duplicates(&mut self, storage: &mut S)
    where
        T: PartialEq,
    {
        let mut cur = self.first(storage);
        if cur == self.sentinel {
            return;
        }

        let mut run_open = false;
        let mut next = self.next_of(storage, cur);
        while next != self.sentinel {
            // Safety: cur/next are linked elements
            let equal = unsafe {
                storage.get_unchecked(cur).value_ref() == storage.get_unchecked(next).value_ref()
            };
            if equal {
                self.delete(storage, cur);
                run_open = true;
            } else if run_open {
                self.delete(storage, cur);
                run_open = false;
            }
            cur = next;
            next = self.next_of(storage, cur);
        }
        // A run still open at the end loses its last element too.
        if run_open {
            self.delete(storage, cur);
        }
    }

    /// Deletes every element with a strictly smaller value anywhere to its
    /// right, leaving an ascending sequence. Returns the survivor count.
    pub fn keep_non_dominated_ascending(&mut self, storage: &mut S) -> usize
    where
        T: Ord,
    {
        self.filter_dominated(storage, |cur, best| cur > best)
    }

    /// Deletes every element with a strictly greater value anywhere to its
    /// right, leaving a descending sequence. Returns the survivor count.
    pub fn keep_non_dominated_descending(&mut self, storage: &mut S) -> usize
    where
        T: Ord,
    {
        self.filter_dominated(storage, |cur, best| cur < best)
    }

    /// One right-to-left pass tracking the running extremum; the most
    /// recent survivor is always that extremum, so a single key suffices.
    fn filter_dominated<F>(&mut self, storage: &mut S, dominated: F) -> usize
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut best = self.last(storage);
        if best == self.sentinel {
            return 0;
        }

        let mut count = 1;
        let mut cur = self.prev_of(storage, best);
        while cur != self.sentinel {
            let prev = self.prev_of(storage, cur);
            // Safety: cur/best are linked elements
            let doomed = unsafe {
                dominated(
                    storage.get_unchecked(cur).value_ref(),
                    storage.get_unchecked(best).value_ref(),
                )
            };
            if doomed {
                self.delete(storage, cur);
            } else {
                best = cur;
                count += 1;
            }
            cur = prev;
        }
        count
    }

    /// Sorts the ring with a stable recursive merge sort. O(n log n) time,
    /// O(log n) stack, no allocation.
    ///
    /// Ties keep their original relative order in both directions. With
    /// `descending` set the result is largest-first.
    pub fn sort(&mut self, storage: &mut S, descending: bool)
    where
        T: Ord,
    {
        let head = self.first(storage);
        if head == self.sentinel || self.next_of(storage, head) == self.sentinel {
            return;
        }

        // Detach the elements as a NONE-terminated chain; only next links
        // are meaningful until re-threading below.
        let last = self.last(storage);
        // Safety: last is a linked element
        unsafe { storage.get_unchecked_mut(last) }.next = K::NONE;

        let sorted = Self::sort_chain(storage, head, descending);

        // Re-thread prev links and close the ring through the sentinel.
        let sentinel = self.sentinel;
        let mut prev = sentinel;
        let mut cur = sorted;
        while cur.is_some() {
            // Safety: cur is a chain element
            let node = unsafe { storage.get_unchecked_mut(cur) };
            node.prev = prev;
            prev = cur;
            cur = node.next;
        }
        // Safety: the sentinel is always allocated
        let s = unsafe { storage.get_unchecked_mut(sentinel) };
        s.next = sorted;
        s.prev = prev;
        unsafe { storage.get_unchecked_mut(prev) }.next = sentinel;
    }

    /// Sorts a NONE-terminated chain, returning its new head.
    fn sort_chain(storage: &mut S, head: K, descending: bool) -> K
    where
        T: Ord,
    {
        // Safety throughout: every key walked here came off the chain
        if unsafe { storage.get_unchecked(head) }.next.is_none() {
            return head;
        }

        // Slow/fast cursors: slow lands on the last element of the first
        // half, so the split is ceil/floor for odd lengths.
        let mut slow = head;
        let mut fast = unsafe { storage.get_unchecked(head) }.next;
        while fast.is_some() {
            fast = unsafe { storage.get_unchecked(fast) }.next;
            if fast.is_some() {
                slow = unsafe { storage.get_unchecked(slow) }.next;
                fast = unsafe { storage.get_unchecked(fast) }.next;
            }
        }

        let second = unsafe { storage.get_unchecked(slow) }.next;
        unsafe { storage.get_unchecked_mut(slow) }.next = K::NONE;

        let a = Self::sort_chain(storage, head, descending);
        let b = Self::sort_chain(storage, second, descending);
        Self::merge_chains(storage, a, b, descending)
    }

    /// Merges two sorted NONE-terminated chains. The second chain's
    /// element is taken only on a strict win, so ties keep the first
    /// chain ahead and the sort stays stable in both directions.
    fn merge_chains(storage: &mut S, mut a: K, mut b: K, descending: bool) -> K
    where
        T: Ord,
    {
        let mut head = K::NONE;
        let mut tail = K::NONE;

        while a.is_some() && b.is_some() {
            // Safety: a/b are chain elements
            let take_b = unsafe {
                let va = storage.get_unchecked(a).value_ref();
                let vb = storage.get_unchecked(b).value_ref();
                if descending {
                    vb > va
                } else {
                    vb < va
                }
            };

            let picked = if take_b {
                let n = b;
                b = unsafe { storage.get_unchecked(b) }.next;
                n
            } else {
                let n = a;
                a = unsafe { storage.get_unchecked(a) }.next;
                n
            };

            if tail.is_none() {
                head = picked;
            } else {
                unsafe { storage.get_unchecked_mut(tail) }.next = picked;
            }
            tail = picked;
        }

        // Append the exhausted side's remainder in one link.
        let rest = if a.is_some() { a } else { b };
        if tail.is_none() {
            return rest;
        }
        unsafe { storage.get_unchecked_mut(tail) }.next = rest;
        head
    }
}

#[cfg(test)]
mod tests {
    use crate::{Arena, Node, Ring};

    fn ring_of<T: std::fmt::Debug>(storage: &mut Arena<Node<T>>, items: Vec<T>) -> Ring<T, Arena<Node<T>>> {
        let mut ring = Ring::try_new(storage).unwrap();
        for item in items {
            ring.try_push_back(storage, item).unwrap();
        }
        ring
    }

    fn collect<T: Clone>(ring: &Ring<T, Arena<Node<T>>>, storage: &Arena<Node<T>>) -> Vec<T> {
        ring.iter(storage).cloned().collect()
    }

    // ========================================================================
    // reverse
    // ========================================================================

    #[test]
    fn reverse_reverses() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4]);

        ring.reverse(&mut arena);
        assert_eq!(collect(&ring, &arena), vec![4, 3, 2, 1]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn reverse_is_an_involution() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4, 5]);

        ring.reverse(&mut arena);
        ring.reverse(&mut arena);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn reverse_empty_and_single() {
        let mut arena = Arena::with_capacity(16);
        let mut empty: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        empty.reverse(&mut arena);
        assert!(empty.is_empty(&arena));
        assert!(empty.is_well_formed(&arena));

        let mut one = ring_of(&mut arena, vec![7u64]);
        one.reverse(&mut arena);
        assert_eq!(collect(&one, &arena), vec![7]);
    }

    // ========================================================================
    // reverse_in_groups
    // ========================================================================

    #[test]
    fn groups_of_two_swap_pairs() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4, 5]);

        ring.reverse_in_groups(&mut arena, 2);
        assert_eq!(collect(&ring, &arena), vec![2, 1, 4, 3, 5]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn groups_of_two_twice_is_identity() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4, 5, 6]);

        ring.reverse_in_groups(&mut arena, 2);
        ring.reverse_in_groups(&mut arena, 2);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn groups_of_three() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4, 5, 6, 7]);

        ring.reverse_in_groups(&mut arena, 3);
        // Trailing [7] is a partial block and stays put.
        assert_eq!(collect(&ring, &arena), vec![3, 2, 1, 6, 5, 4, 7]);
    }

    #[test]
    fn group_size_larger_than_ring_is_noop() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3]);

        ring.reverse_in_groups(&mut arena, 4);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3]);
    }

    #[test]
    fn group_size_equal_to_ring_reverses_it() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3]);

        ring.reverse_in_groups(&mut arena, 3);
        assert_eq!(collect(&ring, &arena), vec![3, 2, 1]);
    }

    #[test]
    fn degenerate_group_sizes_are_noops() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3]);

        ring.reverse_in_groups(&mut arena, 0);
        ring.reverse_in_groups(&mut arena, 1);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3]);

        let mut empty: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        empty.reverse_in_groups(&mut arena, 2);
        assert!(empty.is_empty(&arena));
    }

    // ========================================================================
    // remove_middle
    // ========================================================================

    #[test]
    fn remove_middle_odd_length() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4, 5]);

        assert_eq!(ring.remove_middle(&mut arena), Some(3));
        assert_eq!(collect(&ring, &arena), vec![1, 2, 4, 5]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn remove_middle_even_length_takes_lower() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3, 4]);

        assert_eq!(ring.remove_middle(&mut arena), Some(2));
        assert_eq!(collect(&ring, &arena), vec![1, 3, 4]);
    }

    #[test]
    fn remove_middle_small_rings() {
        let mut arena = Arena::with_capacity(16);

        let mut empty: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        assert_eq!(empty.remove_middle(&mut arena), None);

        let mut one = ring_of(&mut arena, vec![9u64]);
        assert_eq!(one.remove_middle(&mut arena), Some(9));
        assert!(one.is_empty(&arena));

        let mut two = ring_of(&mut arena, vec![1u64, 2]);
        assert_eq!(two.remove_middle(&mut arena), Some(1));
        assert_eq!(collect(&two, &arena), vec![2]);
    }

    #[test]
    fn remove_middle_frees_the_slot() {
        let mut arena = Arena::with_capacity(4);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3]);
        assert!(arena.is_full());

        ring.remove_middle(&mut arena);
        assert_eq!(arena.len(), 3);
    }

    // ========================================================================
    // delete_duplicates
    // ========================================================================

    #[test]
    fn duplicate_runs_are_fully_deleted() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(
            &mut arena,
            vec!["a", "a", "b", "c", "c"].into_iter().map(String::from).collect(),
        );

        ring.delete_duplicates(&mut arena);
        assert_eq!(collect(&ring, &arena), vec!["b".to_string()]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn trailing_run_is_flushed() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 2, 2]);

        ring.delete_duplicates(&mut arena);
        assert_eq!(collect(&ring, &arena), vec![1]);
    }

    #[test]
    fn all_duplicates_leaves_empty() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![5u64, 5, 5]);

        ring.delete_duplicates(&mut arena);
        assert!(ring.is_empty(&arena));
        assert_eq!(arena.len(), 1); // only the sentinel survives
    }

    #[test]
    fn distinct_values_are_untouched_and_idempotent() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![1u64, 2, 3]);

        ring.delete_duplicates(&mut arena);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3]);
        ring.delete_duplicates(&mut arena);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3]);
    }

    #[test]
    fn delete_duplicates_on_empty_is_ok() {
        let mut arena: Arena<Node<u64>> = Arena::with_capacity(4);
        let mut ring: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        ring.delete_duplicates(&mut arena);
        assert!(ring.is_empty(&arena));
    }

    // ========================================================================
    // monotonic filters
    // ========================================================================

    #[test]
    fn descending_filter_keeps_right_maxima() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![5u64, 1, 4, 2, 3]);

        let kept = ring.keep_non_dominated_descending(&mut arena);
        assert_eq!(kept, 3);
        assert_eq!(collect(&ring, &arena), vec![5, 4, 3]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn ascending_filter_keeps_right_minima() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![3u64, 1, 4, 1, 5]);

        let kept = ring.keep_non_dominated_ascending(&mut arena);
        assert_eq!(kept, 3);
        assert_eq!(collect(&ring, &arena), vec![1, 1, 5]);
    }

    #[test]
    fn filter_keeps_ties() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![4u64, 4, 4]);

        assert_eq!(ring.keep_non_dominated_descending(&mut arena), 3);
        assert_eq!(collect(&ring, &arena), vec![4, 4, 4]);
    }

    #[test]
    fn filter_examines_the_first_element() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![9u64, 1, 2]);

        assert_eq!(ring.keep_non_dominated_ascending(&mut arena), 2);
        assert_eq!(collect(&ring, &arena), vec![1, 2]);
    }

    #[test]
    fn filter_edge_sizes() {
        let mut arena = Arena::with_capacity(16);

        let mut empty: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        assert_eq!(empty.keep_non_dominated_ascending(&mut arena), 0);

        let mut one = ring_of(&mut arena, vec![7u64]);
        assert_eq!(one.keep_non_dominated_descending(&mut arena), 1);
        assert_eq!(collect(&one, &arena), vec![7]);
    }

    // ========================================================================
    // sort
    // ========================================================================

    #[test]
    fn sort_ascending() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(
            &mut arena,
            vec!["c", "b", "a"].into_iter().map(String::from).collect(),
        );

        ring.sort(&mut arena, false);
        assert_eq!(collect(&ring, &arena), vec!["a", "b", "c"]);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn sort_descending() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![3u64, 1, 4, 1, 5, 9, 2, 6]);

        ring.sort(&mut arena, true);
        assert_eq!(collect(&ring, &arena), vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn sort_matches_std_sort() {
        let mut items: Vec<u64> = (0..97).map(|i| (i * 37) % 101).collect();
        let mut arena = Arena::with_capacity(128);
        let mut ring = ring_of(&mut arena, items.clone());

        ring.sort(&mut arena, false);
        items.sort();
        assert_eq!(collect(&ring, &arena), items);
        assert!(ring.is_well_formed(&arena));
    }

    #[test]
    fn sort_is_idempotent() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![2u64, 3, 1]);

        ring.sort(&mut arena, false);
        ring.sort(&mut arena, false);
        assert_eq!(collect(&ring, &arena), vec![1, 2, 3]);
    }

    #[test]
    fn sort_small_rings_are_noops() {
        let mut arena = Arena::with_capacity(16);

        let mut empty: Ring<u64, _> = Ring::try_new(&mut arena).unwrap();
        empty.sort(&mut arena, false);
        assert!(empty.is_empty(&arena));
        assert!(empty.is_well_formed(&arena));

        let mut one = ring_of(&mut arena, vec![4u64]);
        one.sort(&mut arena, true);
        assert_eq!(collect(&one, &arena), vec![4]);
        assert!(one.is_well_formed(&arena));
    }

    #[derive(Clone, Debug)]
    struct Tagged {
        key: u32,
        tag: u32,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.key.cmp(&other.key)
        }
    }

    #[test]
    fn sort_is_stable_both_directions() {
        let items = vec![
            Tagged { key: 2, tag: 0 },
            Tagged { key: 1, tag: 1 },
            Tagged { key: 2, tag: 2 },
            Tagged { key: 1, tag: 3 },
            Tagged { key: 2, tag: 4 },
        ];

        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, items.clone());
        ring.sort(&mut arena, false);
        let tags: Vec<u32> = ring.iter(&arena).map(|t| t.tag).collect();
        assert_eq!(tags, vec![1, 3, 0, 2, 4]);
        ring.release(&mut arena);

        let mut ring = ring_of(&mut arena, items);
        ring.sort(&mut arena, true);
        let tags: Vec<u32> = ring.iter(&arena).map(|t| t.tag).collect();
        assert_eq!(tags, vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn sort_then_reverse_in_groups_composes() {
        let mut arena = Arena::with_capacity(16);
        let mut ring = ring_of(&mut arena, vec![4u64, 2, 1, 3]);

        ring.sort(&mut arena, false);
        ring.reverse_in_groups(&mut arena, 2);
        assert_eq!(collect(&ring, &arena), vec![2, 1, 4, 3]);
        assert!(ring.is_well_formed(&arena));
    }
}
