use std::{fmt, hash::Hash};

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

use crate::error::PlanError;

/// One outcome of taking an action in a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S> {
    pub probability: f32,
    pub reward: f32,
    pub next_state: S,
}

impl<S> Transition<S> {
    #[must_use]
    pub const fn new(probability: f32, reward: f32, next_state: S) -> Self {
        Self {
            probability,
            reward,
            next_state,
        }
    }
}

/// A discrete Markov Decision Process consumed by the planners.
pub trait Mdp {
    type State: Clone + Eq + Hash + fmt::Debug;
    type Action: Clone + PartialEq + fmt::Debug;

    /// Push the legal actions of `state` into `actions`.
    /// Leaving it empty marks a dead-end or terminal state.
    fn populate_actions(&self, state: &Self::State, actions: &mut Vec<Self::Action>);

    /// Full outcome distribution of taking `action` in `state`.
    fn transitions(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<Transition<Self::State>>;

    fn is_terminal(&self, state: &Self::State) -> bool;

    fn initial_state(&self) -> Self::State;

    /// Draw a single successor and its reward, weighted by the transition
    /// probabilities. Uses exactly one draw from `rng`.
    ///
    /// # Errors
    ///
    /// Fails if the transition set is empty or its probabilities cannot
    /// be used as sampling weights.
    fn sample(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut impl Rng,
    ) -> Result<(Self::State, f32), PlanError> {
        let mut transitions = self.transitions(state, action);
        if transitions.is_empty() {
            return Err(PlanError::empty_transitions(state, action));
        }
        let weighted_index = WeightedIndex::new(transitions.iter().map(|t| t.probability))?;
        let Transition {
            reward, next_state, ..
        } = transitions.swap_remove(weighted_index.sample(rng));
        Ok((next_state, reward))
    }
}
