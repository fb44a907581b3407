//! Intrusive ordered containers over caller-owned nodes
//!
//! This crate provides two containers that keep an extremal element on top
//! and support removal of *any* member, not just the top one. Neither
//! container allocates per element: the caller owns the nodes (in a `Vec`, a
//! slice, or a slotmap with the `arena-storage` feature) and the containers
//! thread their links through them by index.
//!
//! # Features
//!
//! - **Cartesian Tree**: binary tree that is heap-ordered by key and
//!   in-order by insertion. O(1) top, O(1) amortized insert, O(height) remove
//! - **Pairing Heap**: heap-ordered multiway tree. O(1) top and insert,
//!   O(log n) amortized remove of any node
//!
//! Ordering is decided by a [`compare::Comparator`], so the same key type can
//! be kept min-first, max-first, or by any projection.
//!
//! # Example
//!
//! ```rust
//! use rust_cartesian_heaps::cartesian::{CartesianTree, OrderedNode};
//!
//! let mut nodes: Vec<_> = [5u32, 3, 8, 1, 4].into_iter().map(OrderedNode::new).collect();
//! let mut tree = CartesianTree::new();
//! for id in 0..nodes.len() {
//!     tree.insert(&mut nodes, id);
//! }
//!
//! // Smallest key on top, insertion order in-order.
//! assert_eq!(tree.top_key(&nodes), Some(&1));
//! let order: Vec<u32> = tree.iter(&nodes).map(|(_, key)| *key).collect();
//! assert_eq!(order, vec![5, 3, 8, 1, 4]);
//!
//! tree.remove(&mut nodes, 3);
//! assert_eq!(tree.top_key(&nodes), Some(&3));
//! ```

pub mod cartesian;
pub mod compare;
pub mod link;
pub mod pairing;
pub mod storage;
pub mod traits;

// Re-export the shared surface for convenience
pub use traits::{IntrusiveHeap, LinkError};
