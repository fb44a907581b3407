//! Circular doubly-linked rings threaded through index-addressed storage.
//!
//! Each element embeds a [`RingLink`] holding the indices of its neighbours.
//! The elements themselves live wherever the caller keeps them (a `Vec`, a
//! slot map, a fixed pool). An [`Adapter`] tells the ring operations how to
//! reach the link of a given index, so one element can sit in several rings
//! by embedding several links.
//!
//! # Circular vs Linear Lists
//!
//! In a circular list:
//! - A single element points to itself (both `next` and `prev`)
//! - There is no head or tail - any element can be the "entry point"
//! - Splicing two rings together is O(1)
//! - Iteration wraps around (must track starting point)
//!
//! A linear list with a head and a tail is a ring plus a remembered entry
//! point: the tail is always `head.prev`.
//!
//! # Example
//!
//! ```rust
//! use index_ring::{RingLink, RingOps};
//!
//! let mut links = vec![RingLink::new(), RingLink::new(), RingLink::new()];
//! let ops = RingOps::new();
//!
//! ops.make_circular(&mut links, 0);
//! ops.insert_after(&mut links, 0, 1);
//! ops.insert_before(&mut links, 0, 2);
//!
//! assert_eq!(ops.count(&links, 0), 3);
//! assert_eq!(ops.iter(&links, 0).collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;

// =============================================================================
// RingLink
// =============================================================================

/// Link that lets an element be threaded into a circular list.
///
/// When unlinked, both `next` and `prev` are `None`.
/// When linked (even as a single element), both hold valid indices.
/// A single element in a ring points to itself.
pub struct RingLink<I> {
    next: Option<I>,
    prev: Option<I>,
}

impl<I: Copy> RingLink<I> {
    /// Creates a new unlinked `RingLink`.
    #[inline]
    pub const fn new() -> RingLink<I> {
        RingLink {
            next: None,
            prev: None,
        }
    }

    /// Checks whether the link is threaded into a ring.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some()
    }

    /// Forcibly unlinks this element without touching its neighbours.
    ///
    /// Only correct when the neighbours are about to be discarded or
    /// re-linked anyway, or when the element is alone in its ring.
    #[inline]
    pub fn force_unlink(&mut self) {
        self.next = None;
        self.prev = None;
    }

    /// Gets the next index.
    #[inline]
    pub fn next(&self) -> Option<I> {
        self.next
    }

    /// Gets the previous index.
    #[inline]
    pub fn prev(&self) -> Option<I> {
        self.prev
    }

    /// Sets the next index.
    #[inline]
    pub fn set_next(&mut self, next: Option<I>) {
        self.next = next;
    }

    /// Sets the previous index.
    #[inline]
    pub fn set_prev(&mut self, prev: Option<I>) {
        self.prev = prev;
    }
}

impl<I: Copy> Default for RingLink<I> {
    #[inline]
    fn default() -> Self {
        RingLink::new()
    }
}

impl<I: Copy> Clone for RingLink<I> {
    /// Cloning a link creates a new unlinked link.
    #[inline]
    fn clone(&self) -> Self {
        RingLink::new()
    }
}

impl<I: Copy> fmt::Debug for RingLink<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            write!(f, "RingLink(linked)")
        } else {
            write!(f, "RingLink(unlinked)")
        }
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Maps an element index to the [`RingLink`] embedded in that element.
///
/// Implement this for a view over your storage that projects the link field
/// you want to thread. Indexing an element the storage does not hold is
/// expected to panic.
pub trait Adapter<I: Copy + Eq> {
    /// Returns the link embedded in element `index`.
    fn link(&self, index: I) -> &RingLink<I>;

    /// Returns the link embedded in element `index`, mutably.
    fn link_mut(&mut self, index: I) -> &mut RingLink<I>;
}

impl Adapter<usize> for [RingLink<usize>] {
    #[inline]
    fn link(&self, index: usize) -> &RingLink<usize> {
        &self[index]
    }

    #[inline]
    fn link_mut(&mut self, index: usize) -> &mut RingLink<usize> {
        &mut self[index]
    }
}

impl Adapter<usize> for Vec<RingLink<usize>> {
    #[inline]
    fn link(&self, index: usize) -> &RingLink<usize> {
        &self[index]
    }

    #[inline]
    fn link_mut(&mut self, index: usize) -> &mut RingLink<usize> {
        &mut self[index]
    }
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating circular doubly-linked rings.
///
/// All operations except [`RingOps::count`] and iteration are O(1).
///
/// The caller must keep the ring invariants: an index passed as "linked"
/// really is part of a ring, and an index passed as "new" is not part of any
/// ring threaded through the same link field. Violations are caught by
/// `debug_assert!` in debug builds and leave the ring inconsistent otherwise.
#[derive(Clone, Copy, Default, Debug)]
pub struct RingOps;

impl RingOps {
    /// Creates a new `RingOps`.
    #[inline]
    pub const fn new() -> Self {
        RingOps
    }

    /// Checks if an element is linked.
    #[inline]
    pub fn is_linked<I, A>(&self, links: &A, index: I) -> bool
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        links.link(index).is_linked()
    }

    /// Checks if a linked element is the only member of its ring.
    #[inline]
    pub fn is_alone<I, A>(&self, links: &A, index: I) -> bool
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        links.link(index).next() == Some(index)
    }

    /// Gets the next index in the ring.
    #[inline]
    pub fn next<I, A>(&self, links: &A, index: I) -> Option<I>
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        links.link(index).next()
    }

    /// Gets the previous index in the ring.
    #[inline]
    pub fn prev<I, A>(&self, links: &A, index: I) -> Option<I>
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        links.link(index).prev()
    }

    /// Makes a single element into a ring of one.
    ///
    /// After this, `index.next == index` and `index.prev == index`.
    #[inline]
    pub fn make_circular<I, A>(&self, links: &mut A, index: I)
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        let link = links.link_mut(index);
        debug_assert!(!link.is_linked(), "element is already linked");
        link.set_next(Some(index));
        link.set_prev(Some(index));
    }

    /// Inserts `new` after `at`.
    ///
    /// `at` must be linked and `new` must not be.
    #[inline]
    pub fn insert_after<I, A>(&self, links: &mut A, at: I, new: I)
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        debug_assert!(links.link(at).is_linked(), "at is not linked");
        debug_assert!(!links.link(new).is_linked(), "new is already linked");

        let next = links.link(at).next().unwrap_or(at);

        links.link_mut(at).set_next(Some(new));
        let link = links.link_mut(new);
        link.set_prev(Some(at));
        link.set_next(Some(next));
        links.link_mut(next).set_prev(Some(new));
    }

    /// Inserts `new` before `at`.
    ///
    /// `at` must be linked and `new` must not be. Inserting before the entry
    /// point of a ring appends at its tail.
    #[inline]
    pub fn insert_before<I, A>(&self, links: &mut A, at: I, new: I)
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        debug_assert!(links.link(at).is_linked(), "at is not linked");
        debug_assert!(!links.link(new).is_linked(), "new is already linked");

        let prev = links.link(at).prev().unwrap_or(at);

        links.link_mut(at).set_prev(Some(new));
        let link = links.link_mut(new);
        link.set_next(Some(at));
        link.set_prev(Some(prev));
        links.link_mut(prev).set_next(Some(new));
    }

    /// Removes an element from its ring and marks it unlinked.
    ///
    /// Returns `true` if the element was the only member (the ring is now
    /// gone), `false` if other members remain.
    #[inline]
    pub fn remove<I, A>(&self, links: &mut A, index: I) -> bool
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        debug_assert!(links.link(index).is_linked(), "element is not linked");

        let next = links.link(index).next().unwrap_or(index);
        let prev = links.link(index).prev().unwrap_or(index);

        if next == index {
            links.link_mut(index).force_unlink();
            true
        } else {
            links.link_mut(prev).set_next(Some(next));
            links.link_mut(next).set_prev(Some(prev));
            links.link_mut(index).force_unlink();
            false
        }
    }

    /// Puts `new` in `old`'s position and unlinks `old`.
    ///
    /// `old` must be linked and `new` must not be. If `old` was alone, `new`
    /// ends up alone.
    #[inline]
    pub fn replace<I, A>(&self, links: &mut A, old: I, new: I)
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        debug_assert!(links.link(old).is_linked(), "old is not linked");
        debug_assert!(!links.link(new).is_linked(), "new is already linked");

        if self.is_alone(links, old) {
            links.link_mut(old).force_unlink();
            self.make_circular(links, new);
            return;
        }

        self.insert_before(links, old, new);
        self.remove(links, old);
    }

    /// Splices two rings together.
    ///
    /// Returns an entry point into the merged ring, or `None` if both were
    /// empty. If either is `None`, returns the other.
    ///
    /// The whole of ring `b` lands directly before `a`, so walking forward
    /// from `a` visits the rest of ring `a` first and ring `b` last.
    #[inline]
    pub fn splice<I, A>(&self, links: &mut A, a: Option<I>, b: Option<I>) -> Option<I>
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                // Before:
                //   Ring A: ... <-> a_prev <-> a <-> a_next <-> ... <-> a_prev
                //   Ring B: ... <-> b_prev <-> b <-> b_next <-> ... <-> b_prev
                //
                // After:
                //   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> a_next <-> ... <-> a_prev
                let a_prev = links.link(a).prev().unwrap_or(a);
                let b_prev = links.link(b).prev().unwrap_or(b);

                links.link_mut(a_prev).set_next(Some(b));
                links.link_mut(b).set_prev(Some(a_prev));

                links.link_mut(b_prev).set_next(Some(a));
                links.link_mut(a).set_prev(Some(b_prev));

                Some(a)
            }
        }
    }

    /// Counts the members of the ring containing `start`.
    ///
    /// This is O(n) - use sparingly.
    pub fn count<I, A>(&self, links: &A, start: I) -> usize
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        self.iter(links, start).count()
    }

    /// Iterates over the ring containing `start`, beginning at `start`.
    ///
    /// The iterator reads links lazily, so the ring must not change while it
    /// is alive; the borrow on `links` enforces that.
    pub fn iter<'a, I, A>(&self, links: &'a A, start: I) -> Iter<'a, I, A>
    where
        I: Copy + Eq,
        A: Adapter<I> + ?Sized,
    {
        debug_assert!(links.link(start).is_linked(), "element is not linked");
        Iter {
            links,
            start,
            next: Some(start),
        }
    }
}

/// Iterator over the members of one ring, in `next` order.
pub struct Iter<'a, I, A: ?Sized> {
    links: &'a A,
    start: I,
    next: Option<I>,
}

impl<'a, I, A> Iterator for Iter<'a, I, A>
where
    I: Copy + Eq,
    A: Adapter<I> + ?Sized,
{
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let current = self.next?;
        self.next = self
            .links
            .link(current)
            .next()
            .filter(|&next| next != self.start);
        Some(current)
    }
}

// =============================================================================
// Tests
// =============================================================================
