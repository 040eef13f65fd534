//! Scheisskopf rule engine and turn-taking state machine for self-play experiments between bots.

pub mod action;
pub mod board;
pub mod card;
pub mod error;
pub mod experiment;
pub mod game;
pub mod percept;
pub mod policies;
pub mod policy;
pub mod stack;
pub mod visualize;

pub use crate::action::{CardSource, PlayerId, SwapDecision, TurnOutcome};
pub use crate::board::Board;
pub use crate::card::{Card, Suit, full_deck};
pub use crate::error::{GameError, InvalidAction};
pub use crate::experiment::{
    Experiment, ExperimentSummary, GameRecord, TurnStats, mix_seed, play_to_completion,
};
pub use crate::game::{Game, GameBuilder, GameConfig, GameStatus, TurnPhase};
pub use crate::percept::Percept;
pub use crate::policies::registry::{create_policy_from_spec, label_for_spec};
pub use crate::policies::{GreedyPolicy, HeuristicPolicy, HumanPolicy, RandomPolicy};
pub use crate::policy::Policy;
pub use crate::stack::CardStack;
pub use crate::visualize::{
    VisualOptions, describe_outcome, render_board, render_game, render_game_with_options,
};
