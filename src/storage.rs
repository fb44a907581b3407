//! Caller-owned node storage addressed by stable indices
//!
//! The containers in this crate never allocate nodes. Callers keep nodes in a
//! storage of their choice and hand the containers an index per node:
//!
//! - `Vec<N>` / `[N]`: plain pools indexed by `usize` (default)
//! - [`SlotMap`]: arena with generational [`NodeKey`]s, so a stale key fails
//!   the lookup instead of aliasing a reused slot
//!
//! # Design
//!
//! The [`NodeStorage`] trait abstracts over how a node is reached from its
//! index. Each backend provides:
//! - An `Index` type implementing [`NodeIndex`]
//! - `node` / `node_mut` lookups, which panic on indices the storage does not
//!   hold
//!
//! # Example
//!
//! ```rust,ignore
//! // Fixed pool (default)
//! let mut nodes: Vec<OrderedNode<u32>> = keys.into_iter().map(OrderedNode::new).collect();
//!
//! // Generational arena (requires the `arena-storage` feature)
//! #[cfg(feature = "arena-storage")]
//! let mut nodes: SlotMap<NodeKey, OrderedNode<u32, NodeKey>> = SlotMap::with_key();
//! ```

use std::fmt;
use std::hash::Hash;

#[cfg(feature = "arena-storage")]
use slotmap::{new_key_type, Key, KeyData, SlotMap};

/// Stable index of a node inside its storage.
///
/// Indices round-trip through a `u64` so link fields that must be observable
/// from other threads can live in an [`AtomicLink`](crate::link::AtomicLink).
/// `u64::MAX` is reserved as the empty marker and is never a valid index.
/// For `usize` this rules out `usize::MAX` on 64-bit targets; storing such an
/// index in a container root or child slot panics.
pub trait NodeIndex: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Encodes the index as a raw word.
    fn into_raw(self) -> u64;

    /// Decodes an index previously produced by [`NodeIndex::into_raw`].
    fn from_raw(raw: u64) -> Self;
}

impl NodeIndex for usize {
    #[inline]
    fn into_raw(self) -> u64 {
        self as u64
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        raw as usize
    }
}

/// Trait for node storage backends
///
/// Implementations map an index to the node stored under it. Looking up an
/// index the storage does not hold is a caller error and panics.
pub trait NodeStorage<N> {
    /// Index type used to address nodes
    type Index: NodeIndex;

    /// Get an immutable reference to a node
    ///
    /// # Panics
    ///
    /// Panics if `index` does not address a node in this storage.
    fn node(&self, index: Self::Index) -> &N;

    /// Get a mutable reference to a node
    ///
    /// # Panics
    ///
    /// Panics if `index` does not address a node in this storage.
    fn node_mut(&mut self, index: Self::Index) -> &mut N;
}

// ============================================================================
// Pool storage - slices and vectors indexed by position
// ============================================================================

impl<N> NodeStorage<N> for [N] {
    type Index = usize;

    #[inline]
    fn node(&self, index: usize) -> &N {
        &self[index]
    }

    #[inline]
    fn node_mut(&mut self, index: usize) -> &mut N {
        &mut self[index]
    }
}

impl<N> NodeStorage<N> for Vec<N> {
    type Index = usize;

    #[inline]
    fn node(&self, index: usize) -> &N {
        &self[index]
    }

    #[inline]
    fn node_mut(&mut self, index: usize) -> &mut N {
        &mut self[index]
    }
}

// ============================================================================
// SlotMap storage - arena with generational keys
// ============================================================================

#[cfg(feature = "arena-storage")]
new_key_type! {
    /// SlotMap key type for arena storage
    pub struct NodeKey;
}

#[cfg(feature = "arena-storage")]
impl NodeIndex for NodeKey {
    #[inline]
    fn into_raw(self) -> u64 {
        self.data().as_ffi()
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        KeyData::from_ffi(raw).into()
    }
}

/// SlotMap-based arena storage
///
/// Generational keys make a removed-then-reused slot distinguishable from the
/// node that used to live there, so a stale key panics on lookup.
///
/// # Feature Flag
/// Requires the `arena-storage` feature to be enabled.
#[cfg(feature = "arena-storage")]
impl<N> NodeStorage<N> for SlotMap<NodeKey, N> {
    type Index = NodeKey;

    #[inline]
    fn node(&self, index: NodeKey) -> &N {
        &self[index]
    }

    #[inline]
    fn node_mut(&mut self, index: NodeKey) -> &mut N {
        &mut self[index]
    }
}
