//! Pairing Heap implementation
//!
//! A pairing heap is a heap-ordered multiway tree with:
//! - O(1) amortized insert
//! - O(log n) amortized removal of the top node
//! - O(log n) amortized removal of an arbitrary node
//!
//! Each node keeps its parent, one designated child, and a place in the ring
//! of its siblings. Removal promotes the removed node's children into its
//! sibling ring and folds the whole ring back into one tree with the
//! two-pass merge: pair neighbours left to right, then fold the winners right
//! to left.
//!
//! After a node's slot has been refilled, the occupant's own children are
//! folded the same way. This keeps the root down to a single child, so the
//! next removal of the top node starts from a short ring.

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

/// Element of a [`PairingHeap`]
///
/// Owns the caller's key and the heap's link fields. The designated-child
/// field is published atomically so that its occupancy can be peeked at
/// without holding the writer's borrow.
pub struct PairingNode<K, I = usize> {
    key: K,
    parent: Option<I>,
    child: AtomicLink<I>,
    sibling: RingLink<I>,
}

impl<K, I: NodeIndex> PairingNode<K, I> {
    /// Creates an unlinked node carrying `key`.
    pub fn new(key: K) -> Self {
        PairingNode {
            key,
            parent: None,
            child: AtomicLink::new(),
            sibling: RingLink::new(),
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

    /// Parent in the heap, `None` for the root or an unlinked node.
    #[inline]
    pub fn parent(&self) -> Option<I> {
        self.parent
    }

    /// Entry point of this node's child ring.
    #[inline]
    pub fn child(&self) -> Option<I> {
        self.child.get()
    }

    /// Returns `true` while the node is a member of a heap.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.sibling.is_linked()
    }

    /// Clears every link field.
    ///
    /// Calling this on a linked node detaches it without repairing its
    /// neighbours and leaves the owning heap inconsistent.
    pub fn reset(&mut self) {
        self.parent = None;
        self.child.set(None);
        self.sibling.force_unlink();
    }
}

impl<K: fmt::Debug, I: NodeIndex> fmt::Debug for PairingNode<K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingNode")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("child", &self.child.get())
            .field("linked", &self.sibling.is_linked())
            .finish()
    }
}

/// Projects the sibling link out of node storage.
struct SiblingLinks<'a, S: ?Sized, K> {
    nodes: &'a mut S,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K, I, S> Adapter<I> for SiblingLinks<'a, S, K>
where
    I: NodeIndex,
    S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
{
    #[inline]
    fn link(&self, index: I) -> &RingLink<I> {
        &self.nodes.node(index).sibling
    }

    #[inline]
    fn link_mut(&mut self, index: I) -> &mut RingLink<I> {
        &mut self.nodes.node_mut(index).sibling
    }
}

/// Pairing Heap
///
/// Holds only the root slot; nodes live in caller-owned storage and are
/// addressed by index.
///
/// # Example
///
/// ```rust
/// use rust_cartesian_heaps::pairing::{PairingHeap, PairingNode};
///
/// let mut nodes: Vec<_> = [5u32, 3, 8, 1].into_iter().map(PairingNode::new).collect();
/// let mut heap = PairingHeap::new();
/// for id in 0..nodes.len() {
///     heap.insert(&mut nodes, id);
/// }
///
/// assert_eq!(heap.top_key(&nodes), Some(&1));
/// heap.pop(&mut nodes);
/// heap.remove(&mut nodes, 2);
/// assert_eq!(heap.top_key(&nodes), Some(&3));
/// ```
pub struct PairingHeap<I = usize, C = MinFirst> {
    root: Arc<AtomicLink<I>>,
    len: usize,
    cmp: C,
}

impl<I: NodeIndex> PairingHeap<I, MinFirst> {
    /// Creates an empty heap keeping the smallest key on top.
    pub fn new() -> Self {
        Self::with_comparator(MinFirst)
    }
}

impl<I: NodeIndex> Default for PairingHeap<I, MinFirst> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: NodeIndex, C> PairingHeap<I, C> {
    /// Creates an empty heap ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        PairingHeap {
            root: Arc::new(AtomicLink::new()),
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
        self.root.is_empty()
    }

    /// Number of linked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The extremal node, i.e. the heap root.
    #[inline]
    pub fn top(&self) -> Option<I> {
        self.root.get()
    }

    /// Observer handle on the root slot, usable from other threads.
    pub fn watch(&self) -> SlotWatch<I> {
        SlotWatch::new(&self.root)
    }

    /// Key of the extremal node.
    pub fn top_key<'a, K, S>(&self, nodes: &'a S) -> Option<&'a K>
    where
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        self.top().map(|top| nodes.node(top).key())
    }

    /// Iterates over the direct children of `id`.
    pub fn children<'a, K, S>(&self, nodes: &'a S, id: I) -> Children<'a, K, I, S>
    where
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        let first = nodes.node(id).child();
        Children {
            nodes,
            first,
            next: first,
            _key: PhantomData,
        }
    }

    /// Links node `id` into the heap.
    ///
    /// The node must not be linked into any heap. Its key must not change
    /// while it is linked.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not held by `nodes`.
    pub fn insert<K, S>(&mut self, nodes: &mut S, id: I)
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        debug_assert!(!nodes.node(id).is_linked(), "node is already linked");
        nodes.node_mut(id).reset();

        match self.root.get() {
            None => {
                trace!(?id, "pairing insert: first node");
                RING.make_circular(&mut Self::siblings::<K, S>(nodes), id);
                self.root.set(Some(id));
            }
            Some(root) if self.less(nodes, id, root) => {
                trace!(?id, ?root, "pairing insert: new root");
                RING.make_circular(&mut Self::siblings::<K, S>(nodes), id);
                nodes.node_mut(root).parent = Some(id);
                nodes.node(id).child.set(Some(root));
                self.root.set(Some(id));
            }
            Some(root) => match nodes.node(root).child.get() {
                None => {
                    trace!(?id, ?root, "pairing insert: first child");
                    RING.make_circular(&mut Self::siblings::<K, S>(nodes), id);
                    nodes.node_mut(id).parent = Some(root);
                    nodes.node(root).child.set(Some(id));
                }
                Some(first) if self.less(nodes, id, first) => {
                    trace!(?id, ?first, "pairing insert: displaces first child");
                    let mut siblings = Self::siblings::<K, S>(nodes);
                    RING.replace(&mut siblings, first, id);
                    RING.make_circular(&mut siblings, first);
                    nodes.node_mut(first).parent = Some(id);
                    nodes.node(id).child.set(Some(first));
                    nodes.node_mut(id).parent = Some(root);
                    nodes.node(root).child.set(Some(id));
                }
                Some(first) => {
                    trace!(?id, ?first, "pairing insert: below first child");
                    Self::adopt(nodes, first, id);
                }
            },
        }

        self.len += 1;
    }

    /// Checked [`PairingHeap::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AlreadyLinked`] if the node is a member of a heap.
    pub fn try_insert<K, S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        if nodes.node(id).is_linked() {
            return Err(LinkError::AlreadyLinked);
        }
        self.insert(nodes, id);
        Ok(())
    }

    /// Unlinks node `id`, which may be the root or any interior node, and
    /// resets its links.
    ///
    /// The node must be linked into this heap.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not held by `nodes`.
    pub fn remove<K, S>(&mut self, nodes: &mut S, id: I)
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        debug_assert!(nodes.node(id).is_linked(), "node is not linked");

        let parent = nodes.node(id).parent;

        // Promote the children to this node's level, just before it.
        let promoted = nodes.node(id).child.get();
        if promoted.is_some() {
            nodes.node(id).child.set(None);
            RING.splice(&mut Self::siblings::<K, S>(nodes), Some(id), promoted);
        }

        let occupant = if next_sibling(nodes, id) == id {
            None
        } else {
            let successor = next_sibling(nodes, id);
            RING.remove(&mut Self::siblings::<K, S>(nodes), id);
            let merged = self.merge_siblings(nodes, successor);
            nodes.node_mut(merged).parent = parent;
            Some(merged)
        };

        match parent {
            None => self.root.set(occupant),
            Some(parent) => nodes.node(parent).child.set(occupant),
        }

        if let Some(occupant) = occupant {
            if let Some(first) = nodes.node(occupant).child.get() {
                let merged = self.merge_siblings(nodes, first);
                nodes.node_mut(merged).parent = Some(occupant);
                nodes.node(occupant).child.set(Some(merged));
            }
        }

        nodes.node_mut(id).reset();
        self.len -= 1;
        trace!(?id, ?occupant, len = self.len, "pairing remove");
    }

    /// Checked [`PairingHeap::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotLinked`] if the node is not a member of a heap.
    pub fn try_remove<K, S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        if !nodes.node(id).is_linked() {
            return Err(LinkError::NotLinked);
        }
        self.remove(nodes, id);
        Ok(())
    }

    /// Removes the extremal node and returns its index.
    pub fn pop<K, S>(&mut self, nodes: &mut S) -> Option<I>
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        let top = self.top()?;
        self.remove(nodes, top);
        Some(top)
    }

    /// Checks every structural invariant of the heap.
    ///
    /// Verifies that no child beats its parent, that parent links mirror the
    /// child rings, that sibling rings are consistent in both directions,
    /// that the root stands alone with at most one child, and that the node
    /// count matches `len()`. O(n) with O(n) scratch space.
    pub fn verify_structure<K, S>(&self, nodes: &S) -> bool
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        let Some(root) = self.top() else {
            return self.len == 0;
        };
        let root_node = nodes.node(root);
        if root_node.parent.is_some() || root_node.sibling.next() != Some(root) {
            return false;
        }
        if self.children(nodes, root).take(2).count() > 1 {
            return false;
        }

        let mut seen = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) || seen.len() > self.len {
                return false;
            }
            for child in self.children(nodes, id).take(self.len + 1) {
                let node = nodes.node(child);
                let ring_ok = node
                    .sibling
                    .next()
                    .is_some_and(|next| nodes.node(next).sibling.prev() == Some(child));
                if !ring_ok || node.parent != Some(id) || self.less(nodes, child, id) {
                    return false;
                }
                stack.push(child);
            }
        }

        seen.len() == self.len
    }

    /// Folds the sibling ring containing `start` into a single tree.
    ///
    /// Pass 1 pairs neighbours left to right beginning at `start`; an odd
    /// node out is carried over. Pass 2 folds the winners from the rightmost
    /// one leftwards. Returns the surviving node, alone in its ring. The
    /// caller fixes the survivor's parent link.
    fn merge_siblings<K, S>(&self, nodes: &mut S, start: I) -> I
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        if next_sibling(nodes, start) == start {
            return start;
        }

        let count = RING.count(&Self::siblings::<K, S>(nodes), start);

        let mut first_winner = start;
        let mut a = start;
        for pair in 0..count / 2 {
            let b = next_sibling(nodes, a);
            let after = next_sibling(nodes, b);
            let winner = self.link(nodes, a, b);
            if pair == 0 {
                first_winner = winner;
            }
            a = after;
        }

        // The ring now holds the winners, and the carried node if any, in
        // their ring order starting at the first winner.
        let winners = count - count / 2;
        let mut acc = prev_sibling(nodes, first_winner);
        for _ in 1..winners {
            let left = prev_sibling(nodes, acc);
            acc = self.link(nodes, left, acc);
        }

        trace!(count, winners, "pairing two-pass merge");
        acc
    }

    /// Pairwise merge of two ring neighbours: the left node wins only if it
    /// is strictly better. The loser leaves the ring and becomes the
    /// winner's first child.
    fn link<K, S>(&self, nodes: &mut S, left: I, right: I) -> I
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        let (winner, loser) = if self.less(nodes, left, right) {
            (left, right)
        } else {
            (right, left)
        };
        RING.remove(&mut Self::siblings::<K, S>(nodes), loser);
        Self::adopt(nodes, winner, loser);
        winner
    }

    /// Makes the unlinked node `child` the first child of `parent`.
    fn adopt<K, S>(nodes: &mut S, parent: I, child: I)
    where
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        nodes.node_mut(child).parent = Some(parent);
        let first = nodes.node(parent).child.get();
        let mut siblings = Self::siblings::<K, S>(nodes);
        match first {
            Some(first) => RING.insert_before(&mut siblings, first, child),
            None => RING.make_circular(&mut siblings, child),
        }
        nodes.node(parent).child.set(Some(child));
    }

    #[inline]
    fn less<K, S>(&self, nodes: &S, a: I, b: I) -> bool
    where
        C: Comparator<K>,
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        self.cmp.less(nodes.node(a).key(), nodes.node(b).key())
    }

    #[inline]
    fn siblings<K, S>(nodes: &mut S) -> SiblingLinks<'_, S, K>
    where
        S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
    {
        SiblingLinks {
            nodes,
            _key: PhantomData,
        }
    }
}

impl<I: NodeIndex, C> fmt::Debug for PairingHeap<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("root", &self.top())
            .field("len", &self.len)
            .finish()
    }
}

impl<K, I: NodeIndex, C: Comparator<K>> IntrusiveHeap<K> for PairingHeap<I, C> {
    type Index = I;
    type Node = PairingNode<K, I>;

    fn is_empty(&self) -> bool {
        PairingHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        PairingHeap::len(self)
    }

    fn top(&self) -> Option<I> {
        PairingHeap::top(self)
    }

    fn insert<S>(&mut self, nodes: &mut S, id: I)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        PairingHeap::insert(self, nodes, id)
    }

    fn remove<S>(&mut self, nodes: &mut S, id: I)
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        PairingHeap::remove(self, nodes, id)
    }

    fn try_insert<S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        PairingHeap::try_insert(self, nodes, id)
    }

    fn try_remove<S>(&mut self, nodes: &mut S, id: I) -> Result<(), LinkError>
    where
        S: NodeStorage<Self::Node, Index = Self::Index> + ?Sized,
    {
        PairingHeap::try_remove(self, nodes, id)
    }
}

#[inline]
fn next_sibling<K, I, S>(nodes: &S, id: I) -> I
where
    I: NodeIndex,
    S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
{
    nodes.node(id).sibling.next().unwrap_or(id)
}

#[inline]
fn prev_sibling<K, I, S>(nodes: &S, id: I) -> I
where
    I: NodeIndex,
    S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
{
    nodes.node(id).sibling.prev().unwrap_or(id)
}

/// Iterator over one node's children, see [`PairingHeap::children`]
pub struct Children<'a, K, I, S: ?Sized> {
    nodes: &'a S,
    first: Option<I>,
    next: Option<I>,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K, I, S> Iterator for Children<'a, K, I, S>
where
    I: NodeIndex,
    S: NodeStorage<PairingNode<K, I>, Index = I> + ?Sized,
{
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let current = self.next?;
        self.next = self
            .nodes
            .node(current)
            .sibling
            .next()
            .filter(|&next| Some(next) != self.first);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MaxFirst;

    fn nodes_of(keys: &[u32]) -> Vec<PairingNode<u32>> {
        keys.iter().copied().map(PairingNode::new).collect()
    }

    fn fill<C: Comparator<u32>>(
        heap: &mut PairingHeap<usize, C>,
        nodes: &mut Vec<PairingNode<u32>>,
    ) {
        for id in 0..nodes.len() {
            heap.insert(nodes, id);
        }
    }

    fn drain<C: Comparator<u32>>(
        heap: &mut PairingHeap<usize, C>,
        nodes: &mut Vec<PairingNode<u32>>,
    ) -> Vec<u32> {
        let mut keys = Vec::new();
        while let Some(top) = heap.pop(nodes) {
            keys.push(*nodes[top].key());
            assert!(heap.verify_structure(nodes));
        }
        keys
    }

    #[test]
    fn test_basic_operations() {
        let mut nodes = nodes_of(&[5, 3, 8, 1]);
        let mut heap = PairingHeap::new();
        assert!(heap.is_empty());

        fill(&mut heap, &mut nodes);
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.top(), Some(3));
        assert!(heap.verify_structure(&nodes));

        assert_eq!(heap.pop(&mut nodes), Some(3));
        assert_eq!(heap.top_key(&nodes), Some(&3));
        assert!(heap.verify_structure(&nodes));
    }

    #[test]
    fn test_remove_interior_node() {
        let mut nodes = nodes_of(&[5, 3, 8, 1]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);
        heap.pop(&mut nodes);

        heap.remove(&mut nodes, 2);
        assert_eq!(heap.top_key(&nodes), Some(&3));
        assert!(!nodes[2].is_linked());
        assert!(heap.verify_structure(&nodes));

        assert_eq!(drain(&mut heap, &mut nodes), vec![3, 5]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_insert_shapes() {
        let mut nodes = nodes_of(&[5, 3, 8, 1]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);

        // 1 -> 3 -> 5 -> 8
        assert_eq!(nodes[3].child(), Some(1));
        assert_eq!(nodes[1].child(), Some(0));
        assert_eq!(nodes[0].child(), Some(2));
        assert_eq!(nodes[2].parent(), Some(0));
        assert_eq!(nodes[3].parent(), None);
    }

    #[test]
    fn test_insert_displaces_first_child() {
        let mut nodes = nodes_of(&[1, 9, 4]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);

        // 4 beats 9 and takes its place under the root.
        assert_eq!(nodes[0].child(), Some(2));
        assert_eq!(nodes[2].parent(), Some(0));
        assert_eq!(nodes[2].child(), Some(1));
        assert_eq!(nodes[1].parent(), Some(2));
        assert!(heap.verify_structure(&nodes));
    }

    #[test]
    fn test_two_pass_merge_consolidates_children() {
        // Every later key lands below the first child, giving it a wide
        // child ring.
        let mut nodes = nodes_of(&[0, 1, 7, 3, 9, 2, 8, 5, 6, 4]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);
        assert_eq!(heap.children(&nodes, 1).count(), 8);

        heap.remove(&mut nodes, 1);
        assert!(heap.verify_structure(&nodes));
        assert_eq!(heap.children(&nodes, 0).count(), 1);
        assert_eq!(nodes[0].child().map(|c| *nodes[c].key()), Some(2));

        assert_eq!(
            drain(&mut heap, &mut nodes),
            vec![0, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    /// Root 0 with a single child 1, which holds the ring
    /// [7, 6, 5, 4, 3, 2] (newest first) with keys [10, 11, 2, 12, 5, 13].
    fn wide_interior_node() -> (PairingHeap, Vec<PairingNode<u32>>) {
        let mut nodes = nodes_of(&[0, 1, 13, 5, 12, 2, 11, 10]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);
        (heap, nodes)
    }

    fn child_ids(heap: &PairingHeap, nodes: &[PairingNode<u32>], id: usize) -> Vec<usize> {
        heap.children(nodes, id).collect()
    }

    #[test]
    fn test_loser_becomes_first_child() {
        let (heap, nodes) = wide_interior_node();

        assert_eq!(child_ids(&heap, &nodes, 0), vec![1]);
        assert_eq!(child_ids(&heap, &nodes, 1), vec![7, 6, 5, 4, 3, 2]);
        assert!(heap.verify_structure(&nodes));
    }

    #[test]
    fn test_two_pass_merge_folds_right_to_left() {
        let (heap, mut nodes) = wide_interior_node();

        // Pass 1 pairs (7, 6), (5, 4), (3, 2). Pass 2 links 5 with 3 first,
        // then 7 with that result.
        let merged = heap.merge_siblings(&mut nodes, 7);
        assert_eq!(merged, 5);
        assert_eq!(nodes[5].sibling.next(), Some(5));

        assert_eq!(child_ids(&heap, &nodes, 5), vec![7, 3, 4]);
        assert_eq!(child_ids(&heap, &nodes, 7), vec![6]);
        assert_eq!(child_ids(&heap, &nodes, 3), vec![2]);
        assert!(child_ids(&heap, &nodes, 4).is_empty());
        for id in [7, 3, 4] {
            assert_eq!(nodes[id].parent(), Some(5));
        }
        assert_eq!(nodes[6].parent(), Some(7));
        assert_eq!(nodes[2].parent(), Some(3));
    }

    #[test]
    fn test_interior_remove_repairs_occupant() {
        let (mut heap, mut nodes) = wide_interior_node();

        heap.remove(&mut nodes, 1);
        assert!(heap.verify_structure(&nodes));

        // 5 takes the vacated slot with losers 7, 3 and 4 below it; those
        // are folded again into a single subtree headed by 3.
        assert_eq!(child_ids(&heap, &nodes, 0), vec![5]);
        assert_eq!(nodes[5].parent(), Some(0));
        assert_eq!(child_ids(&heap, &nodes, 5), vec![3]);
        assert_eq!(nodes[3].parent(), Some(5));
        assert_eq!(child_ids(&heap, &nodes, 3), vec![4, 7, 2]);
        assert_eq!(child_ids(&heap, &nodes, 7), vec![6]);
        assert!(!nodes[1].is_linked());

        assert_eq!(drain(&mut heap, &mut nodes), vec![0, 2, 5, 10, 11, 12, 13]);
    }

    #[test]
    fn test_remove_in_insertion_order_empties_heap() {
        let mut nodes = nodes_of(&[6, 2, 9, 4, 4, 1, 7]);
        let mut heap = PairingHeap::new();
        fill(&mut heap, &mut nodes);

        for id in 0..nodes.len() {
            heap.remove(&mut nodes, id);
            assert!(heap.verify_structure(&nodes));
        }

        assert!(heap.is_empty());
        assert_eq!(heap.top(), None);
        assert!(nodes.iter().all(|node| !node.is_linked()));
        assert!(nodes.iter().all(|node| node.child().is_none()));
    }

    #[test]
    fn test_max_first_comparator() {
        let mut nodes = nodes_of(&[5, 3, 8, 1]);
        let mut heap = PairingHeap::with_comparator(MaxFirst);
        fill(&mut heap, &mut nodes);

        assert_eq!(drain(&mut heap, &mut nodes), vec![8, 5, 3, 1]);
    }

    #[test]
    fn test_closure_comparator() {
        let mut nodes: Vec<PairingNode<(u32, &str)>> = [(3, "c"), (1, "a"), (2, "b")]
            .into_iter()
            .map(PairingNode::new)
            .collect();
        let mut heap = PairingHeap::with_comparator(|a: &(u32, &str), b: &(u32, &str)| a.0 < b.0);
        for id in 0..nodes.len() {
            heap.insert(&mut nodes, id);
        }

        assert_eq!(heap.top_key(&nodes).map(|key| key.1), Some("a"));
    }

    #[test]
    fn test_checked_operations() {
        let mut nodes = nodes_of(&[1, 2]);
        let mut heap = PairingHeap::new();

        assert_eq!(heap.try_remove(&mut nodes, 1), Err(LinkError::NotLinked));
        assert_eq!(heap.try_insert(&mut nodes, 1), Ok(()));
        assert_eq!(
            heap.try_insert(&mut nodes, 1),
            Err(LinkError::AlreadyLinked)
        );
        assert_eq!(heap.try_remove(&mut nodes, 1), Ok(()));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_watch_tracks_root() {
        let mut nodes = nodes_of(&[2, 1]);
        let mut heap = PairingHeap::new();
        let watch = heap.watch();

        heap.insert(&mut nodes, 0);
        heap.insert(&mut nodes, 1);
        assert_eq!(watch.peek(), Some(1));

        heap.pop(&mut nodes);
        assert_eq!(watch.peek(), Some(0));
        heap.pop(&mut nodes);
        assert!(watch.is_empty());
    }
}
