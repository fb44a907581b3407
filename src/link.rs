//! Link cells that other threads may peek at without locking
//!
//! Mutation of both containers is single-writer: it needs `&mut` access to the
//! container and to node storage. A few occupancy fields (the root slot of
//! each container, the designated child of a pairing node) are additionally
//! published with release stores so an observer can check "is this slot
//! empty?" with an acquire load while the writer keeps going.
//!
//! Observers get single-word visibility only. A value read through a
//! [`SlotWatch`] may already be stale by the time it is used.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::storage::NodeIndex;

const EMPTY: u64 = u64::MAX;

/// Optional node index stored in an atomic word.
///
/// Loads use `Acquire`, stores use `Release`. Nothing else in a container is
/// atomic.
pub struct AtomicLink<I> {
    raw: AtomicU64,
    _index: PhantomData<I>,
}

impl<I: NodeIndex> AtomicLink<I> {
    /// Creates an empty link.
    #[inline]
    pub const fn new() -> Self {
        AtomicLink {
            raw: AtomicU64::new(EMPTY),
            _index: PhantomData,
        }
    }

    /// Loads the current occupant.
    #[inline]
    pub fn get(&self) -> Option<I> {
        match self.raw.load(Ordering::Acquire) {
            EMPTY => None,
            raw => Some(I::from_raw(raw)),
        }
    }

    /// Publishes a new occupant (or clears the slot).
    ///
    /// # Panics
    ///
    /// Panics if `index` encodes to the reserved empty marker, which for
    /// `usize` indices is `usize::MAX` on 64-bit targets.
    #[inline]
    pub fn set(&self, index: Option<I>) {
        let raw = match index {
            Some(index) => {
                let raw = index.into_raw();
                assert_ne!(raw, EMPTY, "index collides with the empty marker");
                raw
            }
            None => EMPTY,
        };
        self.raw.store(raw, Ordering::Release);
    }

    /// Returns `true` if the slot is currently empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.load(Ordering::Acquire) == EMPTY
    }
}

impl<I: NodeIndex> Default for AtomicLink<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: NodeIndex> fmt::Debug for AtomicLink<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLink").field(&self.get()).finish()
    }
}

/// Read-only handle on a container's root slot.
///
/// Obtained from `watch()` on either container. Cloning is cheap and the
/// handle may be sent to other threads.
///
/// # Example
///
/// ```rust
/// use rust_cartesian_heaps::pairing::{PairingHeap, PairingNode};
///
/// let mut nodes = vec![PairingNode::new(4u32)];
/// let mut heap = PairingHeap::new();
/// let watch = heap.watch();
///
/// assert!(watch.is_empty());
/// heap.insert(&mut nodes, 0);
/// assert_eq!(watch.peek(), Some(0));
/// ```
pub struct SlotWatch<I> {
    slot: Arc<AtomicLink<I>>,
}

impl<I: NodeIndex> SlotWatch<I> {
    pub(crate) fn new(slot: &Arc<AtomicLink<I>>) -> Self {
        SlotWatch {
            slot: Arc::clone(slot),
        }
    }

    /// Returns `true` if the watched slot was empty at the time of the load.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slot.is_empty()
    }

    /// Returns the index occupying the watched slot at the time of the load.
    #[inline]
    pub fn peek(&self) -> Option<I> {
        self.slot.get()
    }
}

impl<I> Clone for SlotWatch<I> {
    fn clone(&self) -> Self {
        SlotWatch {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<I: NodeIndex> fmt::Debug for SlotWatch<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotWatch").field(&self.peek()).finish()
    }
}
