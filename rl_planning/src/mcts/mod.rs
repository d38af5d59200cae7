use rand::{seq::SliceRandom, Rng};

use crate::{error::PlanError, mdp::Mdp};

pub mod debug;
pub mod node;

pub use node::{Node, NodeId, Tree};

#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MctsConfig {
    pub gamma: f32,     // discount applied to rollout rewards
    pub c_uct: f32,     // exploration constant
    pub rollouts: u32,  // simulations per search
    pub max_depth: u32, // cap on selection depth and rollout length
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            gamma: 0.95,
            c_uct: 1.4,
            rollouts: 200,
            max_depth: 200,
        }
    }
}

impl MctsConfig {
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] naming the first bad field.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(PlanError::invalid_config("gamma", self.gamma));
        }
        if !(self.c_uct >= 0.0) {
            return Err(PlanError::invalid_config("c_uct", self.c_uct));
        }
        if self.rollouts == 0 {
            return Err(PlanError::invalid_config("rollouts", self.rollouts));
        }
        if self.max_depth == 0 {
            return Err(PlanError::invalid_config("max_depth", self.max_depth));
        }
        Ok(())
    }
}

/// Monte Carlo Tree Search with UCT selection and random rollouts.
///
/// Expansion samples a single successor per action instead of branching
/// over the full transition distribution.
pub struct Mcts<M: Mdp, R: Rng> {
    mdp: M,
    config: MctsConfig,
    rng: R,
}

impl<M: Mdp, R: Rng> Mcts<M, R> {
    /// # Errors
    ///
    /// Fails if the config is invalid.
    pub fn new(mdp: M, config: MctsConfig, rng: R) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self { mdp, config, rng })
    }

    #[must_use]
    pub const fn config(&self) -> &MctsConfig {
        &self.config
    }

    #[must_use]
    pub const fn mdp(&self) -> &M {
        &self.mdp
    }

    /// Run the search from `root_state` and return the most visited root action.
    ///
    /// # Errors
    ///
    /// Fails if the root has no legal actions, or if the MDP produces an
    /// unusable transition set along the way.
    pub fn search(&mut self, root_state: M::State) -> Result<M::Action, PlanError> {
        let tree = self.build_tree(root_state)?;
        if let Some(action) = tree.best_action() {
            log::debug!(
                "search chose {action:?} after {} visits at the root",
                tree.root().visits
            );
            return Ok(action);
        }

        let root_state = &tree.root().state;
        let mut actions = Vec::new();
        self.mdp.populate_actions(root_state, &mut actions);
        let Some(action) = actions.into_iter().next() else {
            return Err(if self.mdp.is_terminal(root_state) {
                PlanError::terminal_state(root_state)
            } else {
                PlanError::no_actions(root_state)
            });
        };
        log::warn!("root {root_state:?} was never expanded, falling back to {action:?}");
        Ok(action)
    }

    /// Build a fresh search tree rooted at `root_state`.
    ///
    /// # Errors
    ///
    /// Fails if sampling a transition fails.
    pub fn build_tree(&mut self, root_state: M::State) -> Result<Tree<M>, PlanError> {
        let mut tree = Tree::new(root_state);
        let mut actions = Vec::new();
        for _ in 0..self.config.rollouts {
            let leaf = self.select(&tree);
            self.expand(&mut tree, leaf, &mut actions)?;
            let value = self.rollout(tree[leaf].state.clone(), &mut actions)?;
            tree.backpropagate(leaf, value);
        }
        Ok(tree)
    }

    fn select(&self, tree: &Tree<M>) -> NodeId {
        let mut node = NodeId::ROOT;
        for _ in 0..self.config.max_depth {
            let Some(child) = tree.select_child(node, self.config.c_uct) else {
                break;
            };
            node = child;
        }
        node
    }

    fn expand(
        &mut self,
        tree: &mut Tree<M>,
        leaf: NodeId,
        actions: &mut Vec<M::Action>,
    ) -> Result<(), PlanError> {
        let state = tree[leaf].state.clone();
        if self.mdp.is_terminal(&state) {
            return Ok(());
        }
        actions.clear();
        self.mdp.populate_actions(&state, actions);
        for action in actions.drain(..) {
            if tree[leaf].has_child(&action) {
                continue;
            }
            let (next_state, _) = self.mdp.sample(&state, &action, &mut self.rng)?;
            tree.add_child(leaf, action, next_state);
        }
        Ok(())
    }

    fn rollout(
        &mut self,
        mut state: M::State,
        actions: &mut Vec<M::Action>,
    ) -> Result<f32, PlanError> {
        let mut total_reward = 0.0;
        let mut discount = 1.0;
        for _ in 0..self.config.max_depth {
            if self.mdp.is_terminal(&state) {
                break;
            }
            actions.clear();
            self.mdp.populate_actions(&state, actions);
            let Some(action) = actions.choose(&mut self.rng) else {
                break;
            };
            let (next_state, reward) = self.mdp.sample(&state, action, &mut self.rng)?;
            total_reward += discount * reward;
            discount *= self.config.gamma;
            state = next_state;
        }
        Ok(total_reward)
    }
}
