use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::Card;

/// Notification broadcast to every policy after a state-changing event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Percept {
    /// `player` took the whole pile into their hand.
    Pickup { player: PlayerId },
    /// The pile was moved to the discard.
    Discard,
    Play { player: PlayerId, cards: Vec<Card> },
    /// `up_card` moved into the hand and `hand_card` became face up.
    Swap {
        player: PlayerId,
        up_card: Card,
        hand_card: Card,
    },
    Draw { player: PlayerId, count: usize },
}

impl Percept {
    pub fn kind(&self) -> &'static str {
        match self {
            Percept::Pickup { .. } => "PICKUP",
            Percept::Discard => "DISCARD",
            Percept::Play { .. } => "PLAY",
            Percept::Swap { .. } => "SWAP",
            Percept::Draw { .. } => "DRAW",
        }
    }
}
