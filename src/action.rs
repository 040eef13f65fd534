use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Stable player identifier. Seats are numbered from 1.
pub type PlayerId = usize;

/// Pool a played card was taken from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CardSource {
    Hand,
    UpCards,
    DownCards,
}

/// Answer to the pregame prompt: exchange one up card for one hand card, or open the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SwapDecision {
    Swap { up_card: Card, hand_card: Card },
    /// Stop swapping and make the first play from hand. Must be non-empty.
    Play(Vec<Card>),
}

/// What a single call to `Game::take_turn` did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The game ended on this step.
    Finished { winner: PlayerId },
    /// A ten or four of a kind was on the pile; it went to the discard and `skipped` lost the turn.
    PileCleared { skipped: PlayerId, cleared: usize },
    /// Threes on the pile were discarded and `player` picked up the rest.
    ThreesPickup {
        player: PlayerId,
        threes: usize,
        picked_up: usize,
    },
    Swapped {
        player: PlayerId,
        up_card: Card,
        hand_card: Card,
    },
    Played {
        player: PlayerId,
        source: CardSource,
        cards: Vec<Card>,
        drawn: usize,
    },
    /// A revealed down card did not fit and the player took the pile.
    DownCardFailed {
        player: PlayerId,
        card: Card,
        picked_up: usize,
    },
    /// The player had nothing playable and took the pile.
    PickedUp { player: PlayerId, cards: usize },
}

impl TurnOutcome {
    /// Player whose action (or skipped turn) this step describes.
    pub fn player(&self) -> PlayerId {
        match self {
            TurnOutcome::Finished { winner } => *winner,
            TurnOutcome::PileCleared { skipped, .. } => *skipped,
            TurnOutcome::ThreesPickup { player, .. }
            | TurnOutcome::Swapped { player, .. }
            | TurnOutcome::Played { player, .. }
            | TurnOutcome::DownCardFailed { player, .. }
            | TurnOutcome::PickedUp { player, .. } => *player,
        }
    }
}
