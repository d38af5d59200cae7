#![warn(clippy::pedantic)]
#![warn(clippy::style)]
#![warn(clippy::nursery)]
// https://github.com/rust-lang/rust-clippy/issues/8538
#![allow(clippy::iter_with_drain)]
// Just let me cast in peace
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

pub mod error;
pub mod mcts;
pub mod mdp;
pub mod rtdp;
pub mod schedule;

pub use error::PlanError;
pub use mcts::{Mcts, MctsConfig};
pub use mdp::{Mdp, Transition};
pub use rtdp::{Rtdp, RtdpConfig};
pub use schedule::LinearDecay;
