//! Common surface of the intrusive containers
//!
//! - [`IntrusiveHeap`]: insert / remove / top over caller-owned node storage,
//!   implemented by both [`CartesianTree`](crate::cartesian::CartesianTree)
//!   and [`PairingHeap`](crate::pairing::PairingHeap)
//! - [`LinkError`]: returned by the checked entry points
//!
//! The unchecked operations treat membership as a caller precondition, as
//! intrusive containers usually do. The checked variants look at the node's
//! own link state before touching the container. They cannot tell which
//! container a linked node belongs to.

use std::fmt;

use crate::storage::{NodeIndex, NodeStorage};

/// Error type for checked link operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The node is already linked into a container
    AlreadyLinked,
    /// The node is not linked into any container
    NotLinked,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::AlreadyLinked => {
                write!(f, "node is already linked into a container")
            }
            LinkError::NotLinked => {
                write!(f, "node is not linked into any container")
            }
        }
    }
}

impl std::error::Error for LinkError {}

/// Extremal-first container over caller-owned nodes
///
/// `K` is the key type stored in each node; the container's comparator
/// decides which key is extremal.
///
/// # Example
///
/// ```rust
/// use rust_cartesian_heaps::IntrusiveHeap;
/// use rust_cartesian_heaps::pairing::{PairingHeap, PairingNode};
///
/// fn drain<H>(heap: &mut H, nodes: &mut Vec<H::Node>) -> Vec<usize>
/// where
///     H: IntrusiveHeap<u32, Index = usize>,
/// {
///     let mut out = Vec::new();
///     while let Some(top) = heap.top() {
///         heap.remove(nodes, top);
///         out.push(top);
///     }
///     out
/// }
///
/// let mut nodes: Vec<_> = [7u32, 2, 5].into_iter().map(PairingNode::new).collect();
/// let mut heap = PairingHeap::new();
/// for id in 0..nodes.len() {
///     heap.insert(&mut nodes, id);
/// }
/// assert_eq!(drain(&mut heap, &mut nodes), vec![1, 2, 0]);
/// ```
pub trait IntrusiveHeap<K> {
    /// Index type used to address nodes
    type Index: NodeIndex;

    /// Node type the container threads its links through
    type Node;

    /// Returns true if the container holds no nodes
    fn is_empty(&self) -> bool;

    /// Returns the number of linked nodes
    fn len(&self) -> usize;

    /// Returns the extremal node without removing it
    ///
    /// # Time Complexity
    /// O(1) for all implementations
    fn top(&self) -> Option<Self::Index>;

    /// Links node `id` into the container
    ///
    /// The node must not be linked into any container.
    fn insert<S>(&mut self, nodes: &mut S, id: Self::Index)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized;

    /// Unlinks node `id`, which may be any member, not just the top
    ///
    /// The node must be linked into this container. Its links are reset.
    fn remove<S>(&mut self, nodes: &mut S, id: Self::Index)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized;

    /// Like [`IntrusiveHeap::insert`], but fails instead of corrupting the
    /// container when the node is already linked
    fn try_insert<S>(&mut self, nodes: &mut S, id: Self::Index) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized;

    /// Like [`IntrusiveHeap::remove`], but fails when the node is not linked
    fn try_remove<S>(&mut self, nodes: &mut S, id: Self::Index) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized;
}
