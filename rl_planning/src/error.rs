use rand_distr::WeightedError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("no actions available in non-terminal state {state}")]
    NoActions { state: String },
    #[error("cannot choose an action in terminal state {state}")]
    TerminalState { state: String },
    #[error("empty transition set for action {action} in state {state}")]
    EmptyTransitions { state: String, action: String },
    #[error("transition probabilities cannot be sampled: {0}")]
    InvalidProbabilities(#[from] WeightedError),
    #[error("invalid {name}: {value}")]
    InvalidConfig { name: &'static str, value: String },
}

impl PlanError {
    pub(crate) fn no_actions(state: &impl std::fmt::Debug) -> Self {
        Self::NoActions {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn terminal_state(state: &impl std::fmt::Debug) -> Self {
        Self::TerminalState {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn empty_transitions(
        state: &impl std::fmt::Debug,
        action: &impl std::fmt::Debug,
    ) -> Self {
        Self::EmptyTransitions {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        }
    }

    pub(crate) fn invalid_config(name: &'static str, value: impl std::fmt::Display) -> Self {
        Self::InvalidConfig {
            name,
            value: value.to_string(),
        }
    }
}
