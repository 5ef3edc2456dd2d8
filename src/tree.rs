use std::ops::Index;

use crate::round::Round;

/// Handle to a node of a [`SearchTree`].
///
/// Handles are checked: once a node is removed, its handle no longer resolves,
/// even if the slot has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    idx: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    round: Round,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Tree of alternative rounds.
///
/// Each node holds one round; its children are the alternatives for the next round
/// of the schedule, kept in the order they were found. The root holds the empty round.
///
/// Nodes live in an arena. Parent and sibling links are plain handles, and only the
/// arena owns nodes, so removing a subtree is a matter of vacating its slots.
#[derive(Debug)]
pub struct SearchTree {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    root: NodeId,
    live: usize,
    peak: usize,
    created: u64,
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTree {
    pub fn new() -> Self {
        let root = NodeId {
            idx: 0,
            generation: 0,
        };
        let slot = Slot {
            generation: 0,
            node: Some(Node::detached(Round::default(), None)),
        };
        Self {
            slots: vec![slot],
            vacant: Vec::new(),
            root,
            live: 1,
            peak: 1,
            created: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.idx)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.idx)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// `true` while `id` refers to a node still in the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn round(&self, id: NodeId) -> Option<&Round> {
        self.node(id).map(|node| &node.round)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev
    }

    /// Iterate over the children of `id`, in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first_child(id), move |&child| self.next_sibling(child))
    }

    /// Append a new last child holding `round` below `parent`.
    ///
    /// Returns `None` if `parent` is no longer in the tree.
    pub fn push_child(&mut self, parent: NodeId, round: Round) -> Option<NodeId> {
        let prev = self.node(parent)?.last_child;
        let mut node = Node::detached(round, Some(parent));
        node.prev = prev;

        let id = match self.vacant.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.node = Some(node);
                NodeId {
                    idx,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    idx: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        match prev.and_then(|prev| self.node_mut(prev)) {
            Some(prev) => prev.next = Some(id),
            None => {
                if let Some(parent) = self.node_mut(parent) {
                    parent.first_child = Some(id);
                }
            }
        }
        if let Some(parent) = self.node_mut(parent) {
            parent.last_child = Some(id);
        }

        self.live += 1;
        self.peak = self.peak.max(self.live);
        self.created += 1;
        Some(id)
    }

    /// Unlink `id` from its parent and siblings, then free it and its whole subtree.
    ///
    /// Removing the root only frees its descendants. Returns the number of nodes freed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root {
            let children: Vec<_> = self.children(id).collect();
            return children.into_iter().map(|child| self.remove(child)).sum();
        }
        let Some(node) = self.node(id) else {
            return 0;
        };
        let (parent, prev, next) = (node.parent, node.prev, node.next);

        match prev.and_then(|prev| self.node_mut(prev)) {
            Some(prev) => prev.next = next,
            None => {
                if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
                    parent.first_child = next;
                }
            }
        }
        match next.and_then(|next| self.node_mut(next)) {
            Some(next) => next.prev = prev,
            None => {
                if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
                    parent.last_child = prev;
                }
            }
        }

        self.free_subtree(id)
    }

    /// Move on from a fully explored node: return its next sibling, freeing `id` and its
    /// subtree if there is one.
    ///
    /// The last sibling is kept, since the caller is done with the whole level once
    /// it returns `None`; it goes when its parent is removed.
    pub fn advance(&mut self, id: NodeId) -> Option<NodeId> {
        let next = self.next_sibling(id)?;
        self.remove(id);
        Some(next)
    }

    /// Free `id` and every descendant without touching any links into the subtree.
    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.idx) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.vacant.push(id.idx);
            freed += 1;

            pending.extend(std::iter::successors(node.first_child, |&child| {
                self.node(child).and_then(|child| child.next)
            }));
        }
        self.live -= freed;
        freed
    }

    /// The rounds on the path from the root down to `id`, root excluded.
    pub fn path(&self, id: NodeId) -> Vec<&Round> {
        let mut rounds: Vec<_> = std::iter::successors(Some(id), |&id| self.parent(id))
            .filter(|&id| id != self.root)
            .filter_map(|id| self.round(id))
            .collect();
        rounds.reverse();
        rounds
    }

    /// The number of nodes currently in the tree, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// The most nodes the tree has held at once.
    pub fn peak_len(&self) -> usize {
        self.peak
    }

    /// The number of nodes ever added to the tree, root included.
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl Node {
    fn detached(round: Round, parent: Option<NodeId>) -> Self {
        Self {
            round,
            parent,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
        }
    }
}

impl Index<NodeId> for SearchTree {
    type Output = Round;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.round(id).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{group::Group, pool::GroupPool, round::RoundBuilder};

    fn rounds() -> Vec<Round> {
        RoundBuilder::new(&GroupPool::all(4, 2), 2).collect()
    }

    /// root -> [a -> [a0, a1], b, c -> [c0]]
    fn sample() -> (SearchTree, [NodeId; 6]) {
        let rounds = rounds();
        let mut tree = SearchTree::new();
        let root = tree.root();
        let a = tree.push_child(root, rounds[0].clone()).unwrap();
        let b = tree.push_child(root, rounds[1].clone()).unwrap();
        let c = tree.push_child(root, rounds[2].clone()).unwrap();
        let a0 = tree.push_child(a, rounds[1].clone()).unwrap();
        let a1 = tree.push_child(a, rounds[2].clone()).unwrap();
        let c0 = tree.push_child(c, rounds[0].clone()).unwrap();
        (tree, [a, b, c, a0, a1, c0])
    }

    #[test]
    fn new_tree_is_just_the_root() {
        let tree = SearchTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree[tree.root()].is_empty());
        assert_eq!(tree.children(tree.root()).count(), 0);
        assert!(tree.path(tree.root()).is_empty());
    }

    #[test]
    fn children_keep_insertion_order() {
        let (tree, [a, b, c, a0, a1, c0]) = sample();
        let children: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(children, [a, b, c]);
        assert_eq!(tree.children(a).collect::<Vec<_>>(), [a0, a1]);
        assert_eq!(tree.parent(c0), Some(c));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(c), None);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.created(), 7);
    }

    #[test]
    fn path_runs_from_root() {
        let rounds = rounds();
        let (tree, [a, _, _, _, a1, _]) = sample();
        assert_eq!(tree.path(a1), [&rounds[0], &rounds[2]]);
        assert_eq!(tree.path(a), [&rounds[0]]);
    }

    #[test]
    fn remove_frees_whole_subtree() {
        let (mut tree, [a, b, c, a0, a1, c0]) = sample();
        assert_eq!(tree.remove(a), 3);
        assert_eq!(tree.len(), 4);
        for gone in [a, a0, a1] {
            assert!(!tree.contains(gone));
            assert!(tree.round(gone).is_none());
        }
        assert_eq!(tree.children(tree.root()).collect::<Vec<_>>(), [b, c]);
        assert_eq!(tree.prev_sibling(b), None);
        assert!(tree.contains(c0));
        assert_eq!(tree.peak_len(), 7);
    }

    #[test]
    fn remove_middle_and_last_siblings() {
        let (mut tree, [a, b, c, ..]) = sample();
        assert_eq!(tree.remove(b), 1);
        assert_eq!(tree.next_sibling(a), Some(c));
        assert_eq!(tree.prev_sibling(c), Some(a));
        assert_eq!(tree.remove(c), 2);
        assert_eq!(tree.next_sibling(a), None);
        assert_eq!(tree.children(tree.root()).collect::<Vec<_>>(), [a]);
        // removing again is a no-op
        assert_eq!(tree.remove(c), 0);
    }

    #[test]
    fn stale_handles_do_not_resolve_after_reuse() {
        let rounds = rounds();
        let (mut tree, [a, b, ..]) = sample();
        tree.remove(b);
        let reused = tree.push_child(a, rounds[0].clone()).unwrap();
        assert!(!tree.contains(b));
        assert!(tree.contains(reused));
        assert!(tree.push_child(b, rounds[0].clone()).is_none());
        assert_eq!(tree.children(a).last(), Some(reused));
    }

    #[test]
    fn advance_frees_explored_siblings() {
        let (mut tree, [a, b, c, a0, a1, _]) = sample();
        assert_eq!(tree.advance(a), Some(b));
        assert!(!tree.contains(a) && !tree.contains(a0) && !tree.contains(a1));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.advance(b), Some(c));
        assert_eq!(tree.advance(c), None);
        assert!(tree.contains(c));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn removing_root_clears_descendants() {
        let (mut tree, _) = sample();
        assert_eq!(tree.remove(tree.root()), 6);
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(tree.root()));
        assert_eq!(tree.first_child(tree.root()), None);
    }

    #[test]
    fn rounds_are_owned_by_nodes() {
        let (tree, [a, ..]) = sample();
        let first: &Group = &tree[a][0];
        assert_eq!(first.to_vec(), vec![1, 2]);
    }
}
