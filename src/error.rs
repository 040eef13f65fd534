use thiserror::Error;

use crate::action::PlayerId;
use crate::card::Card;

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player {0} is not seated at this board")]
    UnknownPlayer(PlayerId),
    #[error("attempted to pop from an empty card stack")]
    EmptyStack,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("game is already over")]
    GameOver,
    #[error("player {player} is stalled after {rejections} rejected actions")]
    Stalled { player: PlayerId, rejections: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("unrecognized policy spec: {0}")]
    UnknownPolicy(String),
    #[error("invalid card: {0}")]
    InvalidCard(String),
}

/// Policy decisions rejected by the rules. The board is left untouched when one is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("cannot pass while playable cards remain")]
    EmptyPlayWithPlayableCards,
    #[error("played cards must all share one rank")]
    MixedRanks,
    #[error("card {0} is not held in the selected pool")]
    CardNotHeld(Card),
    #[error("card {card} cannot be played on {}", describe_top(.pile_top))]
    CardNotPlayable { card: Card, pile_top: Option<Card> },
    #[error("cannot swap up card {up_card} for hand card {hand_card}")]
    IllegalSwap { up_card: Card, hand_card: Card },
    #[error("the opening play must contain at least one card")]
    EmptyOpeningPlay,
    #[error("down card index {0} is out of range")]
    DownCardIndex(usize),
}

fn describe_top(top: &Option<Card>) -> String {
    top.map(|card| card.to_string())
        .unwrap_or_else(|| String::from("an empty pile"))
}
