//! ring-chain: two single-threaded containers built on slot arenas.
//!
//! Internal Design:
//!
//! Summary
//! - `RingDeque<T>`: a circular doubly-linked deque with one sentinel slot.
//!   O(1) push/pop/peek at both ends, O(n) `reverse`.
//! - `ChainMap<V>`: a separate-chaining map from `String` keys to values
//!   with load-factor driven doubling. O(1) average insert/get/remove.
//! - The two share no code beyond the arena crate.
//!
//! Storage
//! - Both containers keep their nodes in a `slotmap::SlotMap` and link
//!   them by key rather than by pointer. Links never dangle into freed
//!   memory, and the only `unsafe` is slotmap's own.
//! - Deque: the sentinel is an ordinary arena slot whose value is `None`.
//!   Its `next` is the front and its `prev` the back. Insertion and removal
//!   are one splice and one unlink primitive that treat the sentinel like
//!   any other slot, so there are no "neighbour of the sentinel" branches.
//! - Map: the bucket array holds chain heads; each entry stores its key,
//!   value, raw hash, and the key of the next entry in its chain. New
//!   entries are prepended.
//!
//! Growth and reversal
//! - `ChainMap` grows after an insert once `len / capacity` reaches the
//!   configured threshold. Bucket indices are recomputed from the stored
//!   raw hash; the hash function never runs during a rehash. The new head
//!   array and links are built in full before the map adopts them.
//! - `RingDeque::reverse` moves each front value to the front of a fresh
//!   deque and swaps that deque in as the final step.
//!
//! Hashing
//! - Keys are strings. Two strategies are available through
//!   [`StringHash`]: a plain byte sum and a position-weighted byte sum.
//!   The strategy is part of [`ChainMapConfig`] and fixed per map.
//! - Raw hashes wrap on overflow and may be negative; bucket selection
//!   adds the table size once to a negative remainder.
//!
//! Errors
//! - Peeking or popping an empty deque returns [`DequeError::Empty`].
//! - A zero table size or a non-positive/non-finite threshold is rejected
//!   at construction with [`MapError`].
//! - A missing key is `None`, never an error. Removing one is a no-op.
//!
//! Notes and non-goals
//! - Single-threaded; callers serialize access. Neither container locks.
//! - Dropping either container frees everything it owns, empty or not.
//! - Iteration order of `ChainMap` is bucket order and not part of the
//!   contract.

mod chain_map;
mod chain_map_proptest;
mod ring_deque;
mod ring_deque_proptest;
pub mod string_hash;

// Public surface
pub use chain_map::{
    ChainMap, ChainMapConfig, Iter as ChainMapIter, MapError, DEFAULT_LOAD_FACTOR_THRESHOLD,
    DEFAULT_TABLE_SIZE,
};
pub use ring_deque::{DequeError, IntoIter as RingDequeIntoIter, Iter as RingDequeIter, RingDeque};
pub use string_hash::StringHash;
