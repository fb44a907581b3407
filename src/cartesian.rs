//! Cartesian tree over insertion order
//!
//! A cartesian tree keeps two views of the same set of nodes:
//! - the insertion-order list, threaded through a ring, and
//! - a binary tree whose in-order traversal equals that list and whose every
//!   parent dominates its subtree under the comparator.
//!
//! The first view gives O(1) oldest/newest access and O(1)-per-step
//! iteration; the second gives O(1) access to the extremal node and cheap
//! removal of arbitrary nodes. No balancing metadata is kept.
//!
//! - insert: walks up the right spine from the newest node, O(spine) worst
//!   case, amortized O(1) over any insertion sequence
//! - remove: iterative two-way merge of the removed node's subtrees, bounded
//!   by their combined height
//! - top: O(1)

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use index_ring::{Adapter, RingLink, RingOps};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::compare::{Comparator, MinFirst};
use crate::link::{AtomicLink, SlotWatch};
use crate::storage::{NodeIndex, NodeStorage};
use crate::traits::{IntrusiveHeap, LinkError};

const RING: RingOps = RingOps::new();

/// Element of a [`CartesianTree`]
///
/// Owns the caller's key and the tree's link fields. All links start empty
/// and are emptied again when the node is removed.
pub struct OrderedNode<K, I = usize> {
    key: K,
    parent: Option<I>,
    left: Option<I>,
    right: Option<I>,
    order: RingLink<I>,
}

impl<K, I: NodeIndex> OrderedNode<K, I> {
    /// Creates an unlinked node carrying `key`.
    pub fn new(key: K) -> Self {
        OrderedNode {
            key,
            parent: None,
            left: None,
            right: None,
            order: RingLink::new(),
        }
    }

    /// The caller's key or record.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Consumes the node and returns the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Parent in the tree, `None` for the root or an unlinked node.
    #[inline]
    pub fn parent(&self) -> Option<I> {
        self.parent
    }

    /// Root of the left subtree (nodes inserted before this one).
    #[inline]
    pub fn left(&self) -> Option<I> {
        self.left
    }

    /// Root of the right subtree (nodes inserted after this one).
    #[inline]
    pub fn right(&self) -> Option<I> {
        self.right
    }

    /// Returns `true` while the node is a member of a tree.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.order.is_linked()
    }

    /// Clears every link field.
    ///
    /// Calling this on a linked node detaches it without repairing its
    /// neighbours and leaves the owning tree inconsistent.
    pub fn reset(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.order.force_unlink();
    }
}

impl<K: fmt::Debug, I: NodeIndex> fmt::Debug for OrderedNode<K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedNode")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("linked", &self.order.is_linked())
            .finish()
    }
}

/// Projects the insertion-order link out of node storage.
struct OrderLinks<'a, S: ?Sized, K> {
    nodes: &'a mut S,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K, I, S> Adapter<I> for OrderLinks<'a, S, K>
where
    I: NodeIndex,
    S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
{
    #[inline]
    fn link(&self, index: I) -> &RingLink<I> {
        &self.nodes.node(index).order
    }

    #[inline]
    fn link_mut(&mut self, index: I) -> &mut RingLink<I> {
        &mut self.nodes.node_mut(index).order
    }
}

/// Where a subtree hangs: the tree root or one side of a parent.
#[derive(Debug, Clone, Copy)]
enum Slot<I> {
    Root,
    Left(I),
    Right(I),
}

/// Cartesian tree root handle
///
/// Holds the tree root and the head of the insertion-order ring. Nodes live
/// in caller-owned storage and are addressed by index.
///
/// # Example
///
/// ```rust
/// use rust_cartesian_heaps::cartesian::{CartesianTree, OrderedNode};
///
/// let mut nodes: Vec<_> = [5u32, 3, 8, 1].into_iter().map(OrderedNode::new).collect();
/// let mut tree = CartesianTree::new();
/// for id in 0..nodes.len() {
///     tree.insert(&mut nodes, id);
/// }
///
/// assert_eq!(tree.top_key(&nodes), Some(&1));
/// let order: Vec<u32> = tree.iter(&nodes).map(|(_, key)| *key).collect();
/// assert_eq!(order, vec![5, 3, 8, 1]);
///
/// tree.remove(&mut nodes, 1);
/// let order: Vec<u32> = tree.iter(&nodes).map(|(_, key)| *key).collect();
/// assert_eq!(order, vec![5, 8, 1]);
/// ```
pub struct CartesianTree<I = usize, C = MinFirst> {
    root: Arc<AtomicLink<I>>,
    head: Option<I>,
    len: usize,
    cmp: C,
}

impl<I: NodeIndex> CartesianTree<I, MinFirst> {
    /// Creates an empty tree keeping the smallest key on top.
    pub fn new() -> Self {
        Self::with_comparator(MinFirst)
    }
}

impl<I: NodeIndex> Default for CartesianTree<I, MinFirst> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: NodeIndex, C> CartesianTree<I, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        CartesianTree {
            root: Arc::new(AtomicLink::new()),
            head: None,
            len: 0,
            cmp,
        }
    }

    /// The comparator deciding which node sits on top.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns `true` if no node is linked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of linked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The extremal node, i.e. the tree root.
    #[inline]
    pub fn top(&self) -> Option<I> {
        self.root.get()
    }

    /// Observer handle on the root slot, usable from other threads.
    pub fn watch(&self) -> SlotWatch<I> {
        SlotWatch::new(&self.root)
    }

    /// The oldest linked node.
    #[inline]
    pub fn first(&self) -> Option<I> {
        self.head
    }

    /// The most recently inserted node, which is also the rightmost node of
    /// the tree.
    pub fn last<K, S>(&self, nodes: &S) -> Option<I>
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        self.head
            .map(|head| nodes.node(head).order.prev().unwrap_or(head))
    }

    /// Key of the extremal node.
    pub fn top_key<'a, K, S>(&self, nodes: &'a S) -> Option<&'a K>
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        self.top().map(|top| nodes.node(top).key())
    }

    /// Iterates over linked nodes in insertion order.
    pub fn iter<'a, K, S>(&self, nodes: &'a S) -> Iter<'a, K, I, S>
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        Iter {
            nodes,
            next: self.head,
            remaining: self.len,
            _key: PhantomData,
        }
    }

    /// Iterates over the tree in order (left subtree, node, right subtree).
    ///
    /// Always yields the same sequence as [`CartesianTree::iter`]; it walks
    /// the tree instead of the order ring, so each step costs up to the tree
    /// height.
    pub fn in_order<'a, K, S>(&self, nodes: &'a S) -> InOrder<'a, K, I, S>
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        InOrder {
            nodes,
            next: self.top().map(|root| leftmost(nodes, root)),
            _key: PhantomData,
        }
    }

    /// Links node `id` as the newest element.
    ///
    /// The node must not be linked into any tree. Its key must not change
    /// while it is linked.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not held by `nodes`.
    pub fn insert<K, S>(&mut self, nodes: &mut S, id: I)
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        debug_assert!(!nodes.node(id).is_linked(), "node is already linked");
        nodes.node_mut(id).reset();

        match (self.root.get(), self.head) {
            (Some(root), Some(head)) => {
                if self.less(nodes, id, root) {
                    trace!(?id, ?root, "cartesian insert: new root");
                    nodes.node_mut(id).left = Some(root);
                    nodes.node_mut(root).parent = Some(id);
                    self.root.set(Some(id));
                } else {
                    // The tail of the order ring is the rightmost node.
                    let mut pa = nodes.node(head).order.prev().unwrap_or(head);
                    let mut climbed = 0usize;
                    while self.less(nodes, id, pa) {
                        match nodes.node(pa).parent {
                            Some(up) => {
                                pa = up;
                                climbed += 1;
                            }
                            None => break,
                        }
                    }

                    let displaced = nodes.node(pa).right;
                    nodes.node_mut(pa).right = Some(id);
                    let node = nodes.node_mut(id);
                    node.left = displaced;
                    node.parent = Some(pa);
                    if let Some(displaced) = displaced {
                        nodes.node_mut(displaced).parent = Some(id);
                    }
                    trace!(?id, parent = ?pa, climbed, "cartesian insert: right spine");
                }
                RING.insert_before(&mut Self::order_links::<K, S>(nodes), head, id);
            }
            _ => {
                trace!(?id, "cartesian insert: first node");
                RING.make_circular(&mut Self::order_links::<K, S>(nodes), id);
                self.head = Some(id);
                self.root.set(Some(id));
            }
        }

        self.len += 1;
    }

    /// Checked [`CartesianTree::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AlreadyLinked`] if the node is a member of a tree.
    pub fn try_insert<K, S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        if nodes.node(id).is_linked() {
            return Err(LinkError::AlreadyLinked);
        }
        self.insert(nodes, id);
        Ok(())
    }

    /// Unlinks node `id`, wherever it sits, and resets its links.
    ///
    /// The node must be linked into this tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not held by `nodes`.
    pub fn remove<K, S>(&mut self, nodes: &mut S, id: I)
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        debug_assert!(nodes.node(id).is_linked(), "node is not linked");

        let node = nodes.node(id);
        let mut pa = node.parent;
        let mut left = node.left;
        let mut right = node.right;
        let mut slot = match pa {
            None => Slot::Root,
            Some(p) if nodes.node(p).left == Some(id) => Slot::Left(p),
            Some(p) => Slot::Right(p),
        };

        // Merge the two subtrees into the vacated slot. The winner keeps its
        // outer subtree; its inner slot is refilled on the next round.
        let mut rounds = 0usize;
        loop {
            match (left, right) {
                (None, rest) | (rest, None) => {
                    self.set_slot(nodes, slot, rest);
                    if let Some(rest) = rest {
                        nodes.node_mut(rest).parent = pa;
                    }
                    break;
                }
                (Some(l), Some(r)) => {
                    rounds += 1;
                    if self.less(nodes, r, l) {
                        self.set_slot(nodes, slot, Some(r));
                        nodes.node_mut(r).parent = pa;
                        slot = Slot::Left(r);
                        pa = Some(r);
                        right = nodes.node(r).left;
                    } else {
                        self.set_slot(nodes, slot, Some(l));
                        nodes.node_mut(l).parent = pa;
                        slot = Slot::Right(l);
                        pa = Some(l);
                        left = nodes.node(l).right;
                    }
                }
            }
        }

        let next = nodes.node(id).order.next();
        if RING.remove(&mut Self::order_links::<K, S>(nodes), id) {
            self.head = None;
        } else if self.head == Some(id) {
            self.head = next;
        }

        nodes.node_mut(id).reset();
        self.len -= 1;
        trace!(?id, rounds, len = self.len, "cartesian remove");
    }

    /// Checked [`CartesianTree::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotLinked`] if the node is not a member of a tree.
    pub fn try_remove<K, S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        if !nodes.node(id).is_linked() {
            return Err(LinkError::NotLinked);
        }
        self.remove(nodes, id);
        Ok(())
    }

    /// Checks every structural invariant of the tree.
    ///
    /// Verifies that in-order traversal matches insertion order, that no
    /// child beats its parent, that parent links mirror child links, and
    /// that the node count matches `len()`. O(n) with O(n) scratch space.
    pub fn verify_structure<K, S>(&self, nodes: &S) -> bool
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        let Some(head) = self.head else {
            return self.top().is_none() && self.len == 0;
        };
        let Some(root) = self.top() else {
            return false;
        };
        if nodes.node(root).parent.is_some() {
            return false;
        }

        let order: Vec<I> = self.iter(nodes).map(|(id, _)| id).collect();
        match order.last() {
            Some(&tail) if nodes.node(tail).order.next() == Some(head) => {}
            _ => return false,
        }

        let mut seen = FxHashSet::default();
        if !order.iter().all(|&id| seen.insert(id)) {
            return false;
        }

        let walked: Vec<I> = self.in_order(nodes).take(self.len + 1).collect();
        if walked != order {
            return false;
        }

        order.iter().all(|&id| {
            let node = nodes.node(id);
            [node.left, node.right]
                .into_iter()
                .flatten()
                .all(|child| self.dominates(nodes, id, child))
        })
    }

    /// `child` hangs below `parent` and does not beat it.
    fn dominates<K, S>(&self, nodes: &S, parent: I, child: I) -> bool
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        nodes.node(child).parent == Some(parent) && !self.less(nodes, child, parent)
    }

    #[inline]
    fn less<K, S>(&self, nodes: &S, a: I, b: I) -> bool
    where
        C: Comparator<K>,
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        self.cmp.less(nodes.node(a).key(), nodes.node(b).key())
    }

    fn set_slot<K, S>(&self, nodes: &mut S, slot: Slot<I>, occupant: Option<I>)
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        match slot {
            Slot::Root => self.root.set(occupant),
            Slot::Left(parent) => nodes.node_mut(parent).left = occupant,
            Slot::Right(parent) => nodes.node_mut(parent).right = occupant,
        }
    }

    #[inline]
    fn order_links<K, S>(nodes: &mut S) -> OrderLinks<'_, S, K>
    where
        S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
    {
        OrderLinks {
            nodes,
            _key: PhantomData,
        }
    }
}

impl<I: NodeIndex, C> fmt::Debug for CartesianTree<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartesianTree")
            .field("root", &self.top())
            .field("first", &self.head)
            .field("len", &self.len)
            .finish()
    }
}

impl<K, I: NodeIndex, C: Comparator<K>> IntrusiveHeap<K> for CartesianTree<I, C> {
    type Index = I;
    type Node = OrderedNode<K, I>;

    fn is_empty(&self) -> bool {
        CartesianTree::is_empty(self)
    }

    fn len(&self) -> usize {
        CartesianTree::len(self)
    }

    fn top(&self) -> Option<I> {
        CartesianTree::top(self)
    }

    fn insert<S>(&mut self, nodes: &mut S, id: I)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        CartesianTree::insert(self, nodes, id)
    }

    fn remove<S>(&mut self, nodes: &mut S, id: I)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        CartesianTree::remove(self, nodes, id)
    }

    fn try_insert<S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        CartesianTree::try_insert(self, nodes, id)
    }

    fn try_remove<S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        CartesianTree::try_remove(self, nodes, id)
    }
}

fn leftmost<K, I, S>(nodes: &S, mut id: I) -> I
where
    I: NodeIndex,
    S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
{
    while let Some(left) = nodes.node(id).left {
        id = left;
    }
    id
}

/// Insertion-order iterator, see [`CartesianTree::iter`]
pub struct Iter<'a, K, I, S: ?Sized> {
    nodes: &'a S,
    next: Option<I>,
    remaining: usize,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: 'a, I, S> Iterator for Iter<'a, K, I, S>
where
    I: NodeIndex,
    S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
{
    type Item = (I, &'a K);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        let nodes: &'a S = self.nodes;
        let node = nodes.node(current);
        self.next = node.order.next();
        self.remaining -= 1;
        Some((current, node.key()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, I, S> ExactSizeIterator for Iter<'a, K, I, S>
where
    I: NodeIndex,
    S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
{
}

/// Tree-walking iterator, see [`CartesianTree::in_order`]
pub struct InOrder<'a, K, I, S: ?Sized> {
    nodes: &'a S,
    next: Option<I>,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K, I, S> Iterator for InOrder<'a, K, I, S>
where
    I: NodeIndex,
    S: NodeStorage<OrderedNode<K, I>, Index = I> + ?Sized,
{
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let current = self.next?;
        let node = self.nodes.node(current);

        self.next = match node.right {
            Some(right) => Some(leftmost(self.nodes, right)),
            None => {
                // Climb while we are a right child; the first ancestor we
                // reach from its left side is the successor.
                let mut child = current;
                let mut pa = node.parent;
                while let Some(p) = pa {
                    let parent = self.nodes.node(p);
                    if parent.right != Some(child) {
                        break;
                    }
                    child = p;
                    pa = parent.parent;
                }
                pa
            }
        };

        Some(current)
    }
}
