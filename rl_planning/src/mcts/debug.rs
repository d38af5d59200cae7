use std::fmt;

use super::{Node, Tree};
use crate::mdp::Mdp;

impl<M: Mdp> fmt::Debug for Node<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("state", &self.state)
            .field("visits", &self.visits)
            .field("q", &self.q())
            .field("children", &self.children.len())
            .finish()
    }
}

impl<M: Mdp> fmt::Debug for Tree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.len())
            .field("root", self.root())
            .finish()
    }
}

impl<M: Mdp> fmt::Display for Tree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.root())?;
        for (action, child) in &self.root().children {
            writeln!(f, "{action:?}\t{:?}", self[*child])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::mcts::{NodeId, Tree};
    use crate::mdp::fixtures::LoopExit;

    #[test]
    fn display_lists_root_children() {
        let mut tree = Tree::<LoopExit>::new('A');
        let looped = tree.add_child(NodeId::ROOT, "loop", 'A');
        tree.add_child(NodeId::ROOT, "exit", 'B');
        tree.backpropagate(looped, 4.0);

        let text = tree.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"loop\"\t"));
        assert!(lines[1].contains("q: 4.0"));
        assert!(lines[2].starts_with("\"exit\"\t"));
        assert!(format!("{tree:?}").contains("nodes: 3"));
    }
}
