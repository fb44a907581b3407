//! Ordering predicates supplied by callers
//!
//! Both containers are parameterised by a [`Comparator`] rather than relying
//! on `Ord`, so the same key type can be kept min-first in one container and
//! max-first in another, or ordered by any projection of the key.
//!
//! The predicate must be a strict ordering: irreflexive (`less(a, a)` is
//! false) and transitive. Neither container promises any relative placement
//! of keys where neither `less(a, b)` nor `less(b, a)` holds.

/// Strict "a has priority over b" predicate.
///
/// Closures of type `Fn(&K, &K) -> bool` implement this trait directly.
///
/// # Example
///
/// ```rust
/// use rust_cartesian_heaps::compare::{Comparator, MaxFirst, MinFirst};
///
/// assert!(MinFirst.less(&1, &2));
/// assert!(MaxFirst.less(&2, &1));
///
/// let by_len = |a: &&str, b: &&str| a.len() < b.len();
/// assert!(by_len.less(&"ab", &"abc"));
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `a` must sit above `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Smallest key first (`a < b`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<K: Ord + ?Sized> Comparator<K> for MinFirst {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Largest key first (`a > b`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<K: Ord + ?Sized> Comparator<K> for MaxFirst {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}
