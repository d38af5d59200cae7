use std::{cmp::Reverse, ops::Index};

use ordered_float::OrderedFloat;

use crate::mdp::Mdp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: Self = Self(0);
}

#[rustfmt::skip]
pub struct Node<M: Mdp> {
    pub state: M::State,
    pub parent: Option<(NodeId, M::Action)>, // back-reference, never owning
    pub children: Vec<(M::Action, NodeId)>,  // in expansion order
    pub visits: u32,                         // N(s)
    pub value_sum: f32,                      // sum of returns credited to s
}

impl<M: Mdp> Node<M> {
    fn new(state: M::State, parent: Option<(NodeId, M::Action)>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            value_sum: 0.0,
        }
    }

    /// Mean return, or zero for an unvisited node.
    #[inline]
    #[must_use]
    pub fn q(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f32
        }
    }

    #[inline]
    #[must_use]
    pub fn has_child(&self, action: &M::Action) -> bool {
        self.children.iter().any(|(a, _)| a == action)
    }
}

/// Search tree stored in an arena. The root always lives at [`NodeId::ROOT`].
pub struct Tree<M: Mdp> {
    nodes: Vec<Node<M>>,
}

impl<M: Mdp> Tree<M> {
    #[must_use]
    pub fn new(root_state: M::State) -> Self {
        Self {
            nodes: vec![Node::new(root_state, None)],
        }
    }

    #[must_use]
    pub fn root(&self) -> &Node<M> {
        &self[NodeId::ROOT]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<M>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn add_child(&mut self, parent: NodeId, action: M::Action, state: M::State) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(state, Some((parent, action.clone()))));
        self.nodes[parent.0].children.push((action, id));
        id
    }

    /// Child maximizing the UCT score, or `None` if `id` has no children.
    /// Ties go to the earliest child.
    #[must_use]
    pub fn select_child(&self, id: NodeId, c_uct: f32) -> Option<NodeId> {
        let node = &self[id];
        let log_visits = ((node.visits + 1) as f32).ln();
        node.children
            .iter()
            .map(|(_, child_id)| *child_id)
            // `min_by_key` keeps the first of equal elements.
            .min_by_key(|child_id| {
                let child = &self[*child_id];
                let exploration = (log_visits / (child.visits + 1) as f32).sqrt();
                Reverse(OrderedFloat(c_uct.mul_add(exploration, child.q())))
            })
    }

    /// Credit `value` to `leaf` and all of its ancestors.
    pub fn backpropagate(&mut self, leaf: NodeId, value: f32) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            node.value_sum += value;
            current = node.parent.as_ref().map(|(parent, _)| *parent);
        }
    }

    /// Actions leading from the root to `id`.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<M::Action> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some((parent, action)) = &self[current].parent {
            path.push(action.clone());
            current = *parent;
        }
        path.reverse();
        path
    }

    /// Most visited root action. Ties go to the earliest child.
    #[must_use]
    pub fn best_action(&self) -> Option<M::Action> {
        self.root()
            .children
            .iter()
            .min_by_key(|(_, child_id)| Reverse(self[*child_id].visits))
            .map(|(action, _)| action.clone())
    }
}

impl<M: Mdp> Index<NodeId> for Tree<M> {
    type Output = Node<M>;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeId, Tree};
    use crate::mdp::fixtures::{Corridor, LoopExit, Move};

    #[test]
    fn unvisited_q_is_zero() {
        let tree = Tree::<LoopExit>::new('A');
        assert_eq!(tree.root().visits, 0);
        assert_eq!(tree.root().q(), 0.0);
    }

    #[test]
    fn backpropagate_credits_every_ancestor() {
        let mut tree = Tree::<LoopExit>::new('A');
        let looped = tree.add_child(NodeId::ROOT, "loop", 'A');
        let exited = tree.add_child(looped, "exit", 'B');

        tree.backpropagate(exited, 2.0);
        tree.backpropagate(looped, 1.0);

        assert_eq!(tree[exited].visits, 1);
        assert_eq!(tree[looped].visits, 2);
        assert_eq!(tree.root().visits, 2);
        assert_eq!(tree.root().value_sum, 3.0);
        assert_eq!(tree[looped].q(), 1.5);
        assert_eq!(tree[exited].q(), 2.0);
    }

    #[test]
    fn path_follows_parents() {
        let mut tree = Tree::<LoopExit>::new('A');
        let first = tree.add_child(NodeId::ROOT, "loop", 'A');
        let second = tree.add_child(first, "loop", 'A');
        let third = tree.add_child(second, "exit", 'B');
        assert_eq!(tree.path(third), ["loop", "loop", "exit"]);
        assert!(tree.path(NodeId::ROOT).is_empty());
    }

    #[test]
    fn select_prefers_unvisited_then_first() {
        let mut tree = Tree::<Corridor>::new(0);
        assert_eq!(tree.select_child(NodeId::ROOT, 1.4), None);

        let left = tree.add_child(NodeId::ROOT, Move::Left, 0);
        let right = tree.add_child(NodeId::ROOT, Move::Right, 1);
        // Both unvisited: identical scores, so the first one wins.
        assert_eq!(tree.select_child(NodeId::ROOT, 1.4), Some(left));

        tree.backpropagate(left, 0.0);
        assert_eq!(tree.select_child(NodeId::ROOT, 1.4), Some(right));
    }

    #[test]
    fn select_without_exploration_is_greedy() {
        let mut tree = Tree::<LoopExit>::new('A');
        let looped = tree.add_child(NodeId::ROOT, "loop", 'A');
        let exited = tree.add_child(NodeId::ROOT, "exit", 'B');
        tree.backpropagate(looped, 3.0);
        tree.backpropagate(exited, 1.0);
        tree.backpropagate(exited, 1.0);
        assert_eq!(tree.select_child(NodeId::ROOT, 0.0), Some(looped));
    }

    #[test]
    fn best_action_is_most_visited() {
        let mut tree = Tree::<LoopExit>::new('A');
        assert_eq!(tree.best_action(), None);

        let looped = tree.add_child(NodeId::ROOT, "loop", 'A');
        let exited = tree.add_child(NodeId::ROOT, "exit", 'B');
        tree.backpropagate(exited, 0.0);
        tree.backpropagate(looped, 5.0);
        // Tie: first child wins.
        assert_eq!(tree.best_action(), Some("loop"));

        tree.backpropagate(exited, 0.0);
        assert_eq!(tree.best_action(), Some("exit"));
    }
}
