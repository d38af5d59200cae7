use std::{cmp::Reverse, collections::HashMap};

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::{error::PlanError, mdp::Mdp, schedule::LinearDecay};

pub mod observer;

pub use observer::{EpisodeObserver, EpisodeSummary, LogObserver};

#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RtdpConfig {
    pub gamma: f32,
    pub episodes: usize,
    pub max_steps: usize,                      // per episode
    pub epsilon_schedule: Option<LinearDecay>, // indexed by episode, greedy if `None`
}

impl Default for RtdpConfig {
    fn default() -> Self {
        Self {
            gamma: 0.95,
            episodes: 50,
            max_steps: 1_000,
            epsilon_schedule: None,
        }
    }
}

impl RtdpConfig {
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] naming the first bad field.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(PlanError::invalid_config("gamma", self.gamma));
        }
        if self.episodes == 0 {
            return Err(PlanError::invalid_config("episodes", self.episodes));
        }
        if self.max_steps == 0 {
            return Err(PlanError::invalid_config("max_steps", self.max_steps));
        }
        if let Some(schedule) = self.epsilon_schedule {
            let probability = 0.0..=1.0;
            if !probability.contains(&schedule.start) || !probability.contains(&schedule.end) {
                return Err(PlanError::invalid_config(
                    "epsilon_schedule",
                    format!("{schedule:?}"),
                ));
            }
        }
        Ok(())
    }
}

type Heuristic<S> = Box<dyn Fn(&S) -> f32>;

/// Real-Time Dynamic Programming: greedy trials from the initial state
/// with a Bellman backup at every visited state.
pub struct Rtdp<M: Mdp, R: Rng> {
    mdp: M,
    config: RtdpConfig,
    rng: R,
    heuristic: Option<Heuristic<M::State>>,
    values: HashMap<M::State, f32>, // V(s)
}

impl<M: Mdp, R: Rng> Rtdp<M, R> {
    /// # Errors
    ///
    /// Fails if the config is invalid.
    pub fn new(mdp: M, config: RtdpConfig, rng: R) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            mdp,
            config,
            rng,
            heuristic: None,
            values: HashMap::new(),
        })
    }

    /// Seed unvisited states with `heuristic` instead of zero.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: impl Fn(&M::State) -> f32 + 'static) -> Self {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RtdpConfig {
        &self.config
    }

    #[must_use]
    pub const fn mdp(&self) -> &M {
        &self.mdp
    }

    #[must_use]
    pub const fn values(&self) -> &HashMap<M::State, f32> {
        &self.values
    }

    /// Current estimate of `state`, initializing it on first access.
    pub fn value(&mut self, state: &M::State) -> f32 {
        if let Some(value) = self.values.get(state) {
            return *value;
        }
        let value = self.heuristic.as_ref().map_or(0.0, |h| h(state));
        self.values.insert(state.clone(), value);
        value
    }

    fn q_values(
        &mut self,
        state: &M::State,
        actions: &[M::Action],
    ) -> Result<Vec<f32>, PlanError> {
        actions
            .iter()
            .map(|action| {
                let transitions = self.mdp.transitions(state, action);
                if transitions.is_empty() {
                    return Err(PlanError::empty_transitions(state, action));
                }
                let mut q = 0.0;
                for t in transitions {
                    let next_value = self.value(&t.next_state);
                    q += t.probability * self.config.gamma.mul_add(next_value, t.reward);
                }
                Ok(q)
            })
            .collect()
    }

    /// Set `V(s)` to the best one-step lookahead value and return it.
    /// States without actions are worth zero.
    ///
    /// # Errors
    ///
    /// Fails if a legal action has no transitions.
    pub fn bellman_backup(&mut self, state: &M::State) -> Result<f32, PlanError> {
        let mut actions = Vec::new();
        self.mdp.populate_actions(state, &mut actions);
        let value = if actions.is_empty() {
            0.0
        } else {
            self.q_values(state, &actions)?
                .into_iter()
                .fold(f32::NEG_INFINITY, f32::max)
        };
        self.values.insert(state.clone(), value);
        Ok(value)
    }

    /// Epsilon-greedy over the one-step lookahead values.
    /// Greedy ties go to the earliest action.
    ///
    /// # Errors
    ///
    /// Fails if `state` has no legal actions or a legal action has no
    /// transitions.
    pub fn select_action(
        &mut self,
        state: &M::State,
        epsilon: f32,
    ) -> Result<M::Action, PlanError> {
        let mut actions = Vec::new();
        self.mdp.populate_actions(state, &mut actions);
        if actions.is_empty() {
            return Err(if self.mdp.is_terminal(state) {
                PlanError::terminal_state(state)
            } else {
                PlanError::no_actions(state)
            });
        }
        let q_values = self.q_values(state, &actions)?;

        let index = if self.rng.gen::<f32>() < epsilon {
            self.rng.gen_range(0..actions.len())
        } else {
            // `min_by_key` keeps the first of equal elements.
            q_values
                .iter()
                .enumerate()
                .min_by_key(|(_, q)| Reverse(OrderedFloat(**q)))
                .map_or(0, |(i, _)| i)
        };
        Ok(actions.swap_remove(index))
    }

    /// Run all trials, reporting each one to `observer`.
    ///
    /// # Errors
    ///
    /// Fails when a trial reaches a non-terminal state without actions,
    /// or when a legal action has no usable transitions.
    pub fn run(&mut self, observer: &mut impl EpisodeObserver) -> Result<(), PlanError> {
        for episode in 0..self.config.episodes {
            let epsilon = self
                .config
                .epsilon_schedule
                .map_or(0.0, |schedule| schedule.value(episode));
            let mut state = self.mdp.initial_state();
            let mut steps = 0;
            let mut total_reward = 0.0;

            while !self.mdp.is_terminal(&state) && steps < self.config.max_steps {
                self.bellman_backup(&state)?;
                let action = self.select_action(&state, epsilon)?;
                let (next_state, reward) = self.mdp.sample(&state, &action, &mut self.rng)?;
                total_reward += reward;
                state = next_state;
                steps += 1;
            }

            observer.on_episode(&EpisodeSummary {
                episode,
                steps,
                total_reward,
                epsilon,
            });
        }
        Ok(())
    }
}
