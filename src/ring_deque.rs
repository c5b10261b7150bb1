//! RingDeque: circular doubly-linked deque with a sentinel slot.
//!
//! Nodes live in a `SlotMap` arena and link to each other by `NodeKey`.
//! One slot is the sentinel: it holds no value, its `next` is the front
//! and its `prev` is the back. An empty deque is the sentinel linked to
//! itself.

use core::fmt;
use core::iter::FusedIterator;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct NodeKey;
}

#[derive(Debug)]
struct Node<T> {
    // `None` only for the sentinel.
    value: Option<T>,
    next: NodeKey,
    prev: NodeKey,
}

/// Misuse of a [`RingDeque`].
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DequeError {
    #[error("deque is empty")]
    Empty,
}

/// Double-ended queue backed by a circular ring with one sentinel.
///
/// `push_*`/`pop_*`/`front`/`back` are O(1); `reverse` is O(n).
pub struct RingDeque<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    sentinel: NodeKey,
    len: usize,
}

impl<T> RingDeque<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty deque with room for `capacity` values before the
    /// arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(capacity.saturating_add(1));
        let sentinel = nodes.insert_with_key(|k| Node {
            value: None,
            next: k,
            prev: k,
        });
        Self {
            nodes,
            sentinel,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_front(&mut self, value: T) {
        self.link_after(self.sentinel, value);
    }

    pub fn push_back(&mut self, value: T) {
        let back = self.nodes[self.sentinel].prev;
        self.link_after(back, value);
    }

    pub fn front(&self) -> Result<&T, DequeError> {
        let key = self.end_key(true)?;
        Ok(self.value_at(key))
    }

    pub fn back(&self) -> Result<&T, DequeError> {
        let key = self.end_key(false)?;
        Ok(self.value_at(key))
    }

    pub fn front_mut(&mut self) -> Result<&mut T, DequeError> {
        let key = self.end_key(true)?;
        Ok(self.value_at_mut(key))
    }

    pub fn back_mut(&mut self) -> Result<&mut T, DequeError> {
        let key = self.end_key(false)?;
        Ok(self.value_at_mut(key))
    }

    /// Removes the front value and hands it back.
    pub fn pop_front(&mut self) -> Result<T, DequeError> {
        let key = self.end_key(true)?;
        Ok(self.unlink(key))
    }

    /// Removes the back value and hands it back.
    pub fn pop_back(&mut self) -> Result<T, DequeError> {
        let key = self.end_key(false)?;
        Ok(self.unlink(key))
    }

    /// Reverses the order of the values.
    ///
    /// Values are moved front-first into the front of a fresh deque, which
    /// reverses them; the fresh deque then replaces `self` wholesale.
    pub fn reverse(&mut self) {
        log::trace!("reversing ring deque of {} values", self.len);
        let mut reversed = RingDeque::with_capacity(self.len);
        while let Ok(value) = self.pop_front() {
            reversed.push_front(value);
        }
        core::mem::swap(self, &mut reversed);
    }

    /// Drops every value, leaving only the sentinel.
    pub fn clear(&mut self) {
        log::trace!("clearing ring deque of {} values", self.len);
        let sentinel = self.sentinel;
        self.nodes.retain(|k, _| k == sentinel);
        let s = &mut self.nodes[sentinel];
        s.next = sentinel;
        s.prev = sentinel;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let s = &self.nodes[self.sentinel];
        Iter {
            deque: self,
            front: s.next,
            back: s.prev,
            remaining: self.len,
        }
    }

    /// Splices a new node holding `value` directly after `at`.
    ///
    /// `at` may be any slot of the ring, the sentinel included.
    fn link_after(&mut self, at: NodeKey, value: T) -> NodeKey {
        let next = self.nodes[at].next;
        let key = self.nodes.insert(Node {
            value: Some(value),
            next,
            prev: at,
        });
        self.nodes[at].next = key;
        self.nodes[next].prev = key;
        self.len += 1;
        key
    }

    /// Detaches `key` from the ring, frees its slot, and returns its value.
    ///
    /// `key` must be a live non-sentinel slot.
    fn unlink(&mut self, key: NodeKey) -> T {
        debug_assert!(key != self.sentinel, "the sentinel is never unlinked");
        let node = self
            .nodes
            .remove(key)
            .expect("unlinked node must be live in the arena");
        self.nodes[node.prev].next = node.next;
        self.nodes[node.next].prev = node.prev;
        self.len -= 1;
        node.value.expect("only the sentinel holds no value")
    }

    fn end_key(&self, front: bool) -> Result<NodeKey, DequeError> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        let s = &self.nodes[self.sentinel];
        Ok(if front { s.next } else { s.prev })
    }

    fn value_at(&self, key: NodeKey) -> &T {
        self.nodes[key]
            .value
            .as_ref()
            .expect("only the sentinel holds no value")
    }

    fn value_at_mut(&mut self, key: NodeKey) -> &mut T {
        self.nodes[key]
            .value
            .as_mut()
            .expect("only the sentinel holds no value")
    }

    /// Walks the ring both ways and checks link symmetry and `len`.
    #[cfg(test)]
    pub(crate) fn ring_is_consistent(&self) -> bool {
        if self.nodes.len() != self.len + 1 {
            return false;
        }
        for (key, node) in self.nodes.iter() {
            let Some(next) = self.nodes.get(node.next) else {
                return false;
            };
            let Some(prev) = self.nodes.get(node.prev) else {
                return false;
            };
            if next.prev != key || prev.next != key {
                return false;
            }
            if node.value.is_none() != (key == self.sentinel) {
                return false;
            }
        }
        // Exactly `len` steps return to the sentinel in both directions.
        let mut fwd = self.sentinel;
        let mut bwd = self.sentinel;
        for _ in 0..self.len {
            fwd = self.nodes[fwd].next;
            bwd = self.nodes[bwd].prev;
            if fwd == self.sentinel || bwd == self.sentinel {
                return false;
            }
        }
        self.nodes[fwd].next == self.sentinel && self.nodes[bwd].prev == self.sentinel
    }
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RingDeque<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for RingDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingDeque<T> {}

impl<T: fmt::Debug> fmt::Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RingDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut deque = RingDeque::with_capacity(iter.size_hint().0);
        deque.extend(iter);
        deque
    }
}

impl<T> Extend<T> for RingDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Front-to-back iterator over a [`RingDeque`].
pub struct Iter<'a, T> {
    deque: &'a RingDeque<T>,
    front: NodeKey,
    back: NodeKey,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front;
        self.front = self.deque.nodes[key].next;
        self.remaining -= 1;
        Some(self.deque.value_at(key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back;
        self.back = self.deque.nodes[key].prev;
        self.remaining -= 1;
        Some(self.deque.value_at(key))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a RingDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning front-to-back iterator over a [`RingDeque`].
pub struct IntoIter<T> {
    deque: RingDeque<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.deque.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len, Some(self.deque.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for RingDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn collect<T: Clone>(d: &RingDeque<T>) -> Vec<T> {
        d.iter().cloned().collect()
    }

    /// Invariant: a fresh deque is the sentinel linked to itself.
    #[test]
    fn new_deque_is_empty_ring() {
        let d: RingDeque<i32> = RingDeque::new();
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
        assert!(d.ring_is_consistent());
        let s = &d.nodes[d.sentinel];
        assert_eq!(s.next, d.sentinel);
        assert_eq!(s.prev, d.sentinel);
    }

    /// Invariant: ends of an empty deque report misuse instead of a value.
    #[test]
    fn empty_ends_are_errors() {
        let mut d: RingDeque<i32> = RingDeque::new();
        assert_eq!(d.front(), Err(DequeError::Empty));
        assert_eq!(d.back(), Err(DequeError::Empty));
        assert_eq!(d.front_mut(), Err(DequeError::Empty));
        assert_eq!(d.back_mut(), Err(DequeError::Empty));
        assert_eq!(d.pop_front(), Err(DequeError::Empty));
        assert_eq!(d.pop_back(), Err(DequeError::Empty));
        assert!(d.ring_is_consistent());
    }

    /// Invariant: pushes at both ends land next to the sentinel on the right side.
    #[test]
    fn push_both_ends() {
        let mut d = RingDeque::new();
        d.push_back(2);
        d.push_front(1);
        d.push_back(3);
        assert_eq!(collect(&d), vec![1, 2, 3]);
        assert_eq!(d.front(), Ok(&1));
        assert_eq!(d.back(), Ok(&3));
        assert_eq!(d.len(), 3);
        assert!(d.ring_is_consistent());
    }

    /// Invariant: popping the last value restores the self-linked sentinel.
    #[test]
    fn pop_to_empty_relinks_sentinel() {
        let mut d = RingDeque::new();
        d.push_back("only");
        assert_eq!(d.pop_back(), Ok("only"));
        assert!(d.is_empty());
        assert!(d.ring_is_consistent());
        let s = &d.nodes[d.sentinel];
        assert_eq!(s.next, d.sentinel);
        assert_eq!(s.prev, d.sentinel);
    }

    #[test]
    fn pops_from_both_ends() {
        let mut d: RingDeque<i32> = (1..=4).collect();
        assert_eq!(d.pop_front(), Ok(1));
        assert_eq!(d.pop_back(), Ok(4));
        assert_eq!(collect(&d), vec![2, 3]);
        assert!(d.ring_is_consistent());
    }

    #[test]
    fn front_and_back_mut_update_in_place() {
        let mut d: RingDeque<i32> = (1..=3).collect();
        *d.front_mut().unwrap() += 10;
        *d.back_mut().unwrap() += 20;
        assert_eq!(collect(&d), vec![11, 2, 23]);
    }

    /// Invariant: `[a, b, c]` reverses to `[c, b, a]`.
    #[test]
    fn reverse_three() {
        let mut d: RingDeque<char> = "abc".chars().collect();
        d.reverse();
        assert_eq!(collect(&d), vec!['c', 'b', 'a']);
        assert_eq!(d.front(), Ok(&'c'));
        assert_eq!(d.back(), Ok(&'a'));
        assert_eq!(d.len(), 3);
        assert!(d.ring_is_consistent());
    }

    #[test]
    fn reverse_empty_and_single() {
        let mut d: RingDeque<i32> = RingDeque::new();
        d.reverse();
        assert!(d.is_empty());
        assert!(d.ring_is_consistent());

        d.push_back(7);
        d.reverse();
        assert_eq!(collect(&d), vec![7]);
        assert!(d.ring_is_consistent());
    }

    /// Invariant: reversing leaves no stray nodes behind in the arena.
    #[test]
    fn reverse_does_not_leak_nodes() {
        let mut d: RingDeque<i32> = (0..10).collect();
        d.pop_front().unwrap();
        d.reverse();
        assert_eq!(d.nodes.len(), d.len() + 1);
        assert_eq!(collect(&d), (1..10).rev().collect::<Vec<_>>());
    }

    /// Invariant: every value is dropped exactly once by `clear` and by `Drop`,
    /// including on an empty deque.
    #[test]
    fn clear_and_drop_release_values_once() {
        struct Tracked(Rc<Cell<usize>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut d = RingDeque::new();
        for _ in 0..5 {
            d.push_back(Tracked(drops.clone()));
        }
        d.clear();
        assert_eq!(drops.get(), 5);
        assert!(d.is_empty());
        assert!(d.ring_is_consistent());

        for _ in 0..3 {
            d.push_front(Tracked(drops.clone()));
        }
        drop(d);
        assert_eq!(drops.get(), 8);

        let empty: RingDeque<Tracked> = RingDeque::new();
        drop(empty);
        assert_eq!(drops.get(), 8);
    }

    #[test]
    fn iter_is_double_ended_and_exact() {
        let d: RingDeque<i32> = (1..=5).collect();
        let mut it = d.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), vec![&2, &3, &4]);
        assert_eq!(d.iter().rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn into_iter_drains_front_to_back() {
        let d: RingDeque<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        let mut it = d.into_iter();
        assert_eq!(it.next_back().as_deref(), Some("z"));
        assert_eq!(it.collect::<Vec<_>>(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn clone_eq_and_debug() {
        let d: RingDeque<i32> = (1..=3).collect();
        let mut c = d.clone();
        assert_eq!(d, c);
        c.reverse();
        assert_ne!(d, c);
        assert_eq!(format!("{:?}", d), "[1, 2, 3]");
        assert_eq!(format!("{:?}", RingDeque::<i32>::new()), "[]");
    }

    /// Invariant: freed slots are reused without corrupting the ring.
    #[test]
    fn slot_reuse_keeps_ring_consistent() {
        let mut d = RingDeque::new();
        for round in 0..4 {
            for i in 0..8 {
                if i % 2 == 0 {
                    d.push_front(round * 10 + i);
                } else {
                    d.push_back(round * 10 + i);
                }
            }
            for _ in 0..5 {
                d.pop_back().unwrap();
            }
            assert!(d.ring_is_consistent());
        }
        assert_eq!(d.len(), 12);
    }
}
