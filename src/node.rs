//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and point at their parent by `NodeId`, so
//! the parent chain is always a finite, acyclic list back to the root: a node is
//! only ever allocated after its parent.
use crate::model::StateModel;
use std::hash::{Hash, Hasher};

/// Index of a node in a `SearchTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One vertex of the search tree.
///
/// Two nodes may hold equal states reached along different paths. Such nodes
/// compare and hash equal; only their `NodeId`s tell them apart.
#[derive(Clone, Debug)]
pub struct Node<S: StateModel> {
    pub state: S,
    pub parent: Option<NodeId>,
    /// Move that produced `state` from the parent's state. `None` at the root.
    pub mv: Option<S::Move>,
    pub depth: usize,
    pub g_cost: f64,
    pub f_cost: f64,
    /// Bumped whenever the node is re-parented, so older frontier entries for it
    /// can be recognised as stale.
    pub revision: u32,
}

impl<S: StateModel> Node<S> {
    pub fn root(state: S) -> Self {
        Node {
            state,
            parent: None,
            mv: None,
            depth: 0,
            g_cost: 0.0,
            f_cost: 0.0,
            revision: 0,
        }
    }

    /// Records path cost `g` and heuristic estimate `h`.
    pub fn update_f_cost(&mut self, g: f64, h: f64) {
        self.g_cost = g;
        self.f_cost = g + h;
    }
}

impl<S: StateModel> PartialEq for Node<S> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<S: StateModel> Eq for Node<S> {}

impl<S: StateModel> Hash for Node<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.hash(state);
    }
}

/// Arena holding every node generated by one search.
#[derive(Debug)]
pub struct SearchTree<S: StateModel> {
    nodes: Vec<Node<S>>,
}

impl<S: StateModel> SearchTree<S> {
    /// Creates a tree whose root (`NodeId(0)`) wraps `state`.
    pub fn new(state: S) -> Self {
        SearchTree {
            nodes: vec![Node::root(state)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Adds a node and returns its id. The node's parent must already be in the tree.
    pub fn allocate(&mut self, node: Node<S>) -> NodeId {
        debug_assert!(node.parent.map_or(true, |p| p.0 < self.nodes.len()));
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Moves an open node onto a new derivation of the same state.
    ///
    /// The stored state is replaced as well as the parent link, so the state's
    /// random stream always matches the path that now leads to it.
    pub fn reparent(&mut self, id: NodeId, successor: Node<S>) {
        let node = self.get_mut(id);
        let revision = node.revision + 1;
        *node = Node {
            revision,
            ..successor
        };
    }

    /// Applies every move, in `S::MOVES` order, to an independent clone of the
    /// node's state and wraps each state that actually changed as a child of `id`.
    ///
    /// Costs on the returned nodes are left at zero for the caller to fill in.
    pub fn successors(&self, id: NodeId) -> Vec<Node<S>> {
        let node = self.get(id);
        S::MOVES
            .iter()
            .filter_map(|&mv| {
                let mut next = node.state.clone();
                if !next.apply(mv) || next == node.state {
                    return None;
                }
                Some(Node {
                    state: next,
                    parent: Some(id),
                    mv: Some(mv),
                    depth: node.depth + 1,
                    g_cost: 0.0,
                    f_cost: 0.0,
                    revision: 0,
                })
            })
            .collect()
    }

    /// Ids from the root down to the immediate parent of `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::with_capacity(self.get(id).depth);
        let mut cursor = self.get(id).parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.get(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Successors whose state does not repeat a state on the path to `id`.
    ///
    /// This keeps a branch from walking back into its own history; other branches
    /// reaching the same state are the closed set's business.
    pub fn successors_excluding_ancestors(&self, id: NodeId) -> Vec<Node<S>> {
        let ancestors = self.ancestors(id);
        self.successors(id)
            .into_iter()
            .filter(|child| !ancestors.iter().any(|&a| self.get(a).state == child.state))
            .collect()
    }

    /// Root-to-`id` path, both ends included.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = self.ancestors(id);
        path.push(id);
        path
    }

    /// Moves along the path from the root to `id`, in order.
    pub fn moves_list(&self, id: NodeId) -> Vec<S::Move> {
        self.path(id)
            .into_iter()
            .filter_map(|n| self.get(n).mv)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Move, ThreesState};
    use crate::test_support::{GraphState, LOOP_GRAPH};
    use crate::utils::board_from_str_array;

    fn corner_state() -> ThreesState<4> {
        let board = board_from_str_array(&["1 . . .", ". . . .", ". . . .", ". . . ."]).unwrap();
        ThreesState::from_board(board, 17)
    }

    #[test]
    fn test_successors_skip_moves_without_change() {
        let tree = SearchTree::new(corner_state());
        let children = tree.successors(tree.root());
        let moves: Vec<Move> = children.iter().filter_map(|n| n.mv).collect();
        // Up and Left cannot move a tile sitting in the top-left corner.
        assert_eq!(moves, vec![Move::Right, Move::Down]);
        for child in &children {
            assert_eq!(child.parent, Some(tree.root()));
            assert_eq!(child.depth, 1);
            assert_ne!(child.state, tree.get(tree.root()).state);
        }
    }

    #[test]
    fn test_successors_do_not_touch_parent_state() {
        let tree = SearchTree::new(corner_state());
        let before = tree.get(tree.root()).state.clone();
        let _ = tree.successors(tree.root());
        assert_eq!(tree.get(tree.root()).state, before);
        assert_eq!(tree.get(tree.root()).state.next_tile(), before.next_tile());
    }

    #[test]
    fn test_ancestors_path_and_moves() {
        let mut tree = SearchTree::new(corner_state());
        let first = tree.successors(tree.root()).remove(0);
        let first_id = tree.allocate(first);
        let second = tree.successors(first_id).remove(0);
        let second_mv = second.mv;
        let second_id = tree.allocate(second);

        assert_eq!(second_id, NodeId(2));
        assert_eq!(tree.get(tree.root()).parent, None);
        assert_eq!(tree.ancestors(second_id), vec![tree.root(), first_id]);
        assert_eq!(tree.path(second_id), vec![tree.root(), first_id, second_id]);
        assert!(tree.ancestors(tree.root()).is_empty());

        let moves = tree.moves_list(second_id);
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0], Move::Right);
        assert_eq!(Some(moves[1]), second_mv);
    }

    #[test]
    fn test_successors_excluding_ancestors() {
        // 0 -Up-> 1 -Down-> 0: from node 1 the only way out returns to the root.
        let mut tree = SearchTree::new(GraphState::new(&LOOP_GRAPH, 0));
        let child = tree.successors(tree.root()).remove(0);
        let child_id = tree.allocate(child);

        assert_eq!(tree.successors(child_id).len(), 1);
        assert!(tree.successors_excluding_ancestors(child_id).is_empty());
    }

    #[test]
    fn test_reparent_bumps_revision() {
        let mut tree = SearchTree::new(corner_state());
        let mut children = tree.successors(tree.root());
        let id = tree.allocate(children.remove(0));
        let mut replacement = tree.successors(tree.root()).remove(0);
        replacement.update_f_cost(2.0, 3.0);

        tree.reparent(id, replacement);
        let node = tree.get(id);
        assert_eq!(node.revision, 1);
        assert_eq!(node.g_cost, 2.0);
        assert_eq!(node.f_cost, 5.0);
    }

    #[test]
    fn test_node_identity_is_the_state() {
        use std::collections::HashSet;

        let mut tree = SearchTree::new(GraphState::new(&LOOP_GRAPH, 0));
        let child = tree.successors(tree.root()).remove(0);
        let child_id = tree.allocate(child);

        // Same vertex reached again, one level deeper and at another cost.
        let mut again = tree.successors(child_id).remove(0);
        again.update_f_cost(9.0, 1.0);
        again.revision = 3;
        let root = tree.get(tree.root());
        assert_ne!(again.parent, root.parent);
        assert_eq!(&again, root);
        assert_ne!(&again, tree.get(child_id));

        let set: HashSet<Node<GraphState>> = [root.clone(), again].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
