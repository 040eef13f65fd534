use crate::action::SwapDecision;
use crate::card::Card;
use crate::percept::Percept;

/// Decision maker consulted by the engine at every choice point.
///
/// Inputs are copies of the board state; nothing a policy does with them reaches the board.
/// Returning an illegal choice is a contract violation: the engine rejects it without
/// changing the board or advancing the turn.
pub trait Policy {
    /// A non-empty, same-rank subset of `playable`, or `[]` exactly when `playable` is empty.
    fn choose_hand_cards(
        &mut self,
        hand: &[Card],
        up_cards: &[Card],
        playable: &[Card],
    ) -> Vec<Card>;

    /// Same contract as [`Policy::choose_hand_cards`], for the face-up cards.
    fn choose_up_cards(&mut self, up_cards: &[Card], playable: &[Card]) -> Vec<Card>;

    /// Called before the engine flips a random down card for this player.
    fn choose_down_card(&mut self) {}

    /// Pregame prompt: propose a swap between owned cards, or open with a legal hand play.
    fn choose_swap(
        &mut self,
        hand: &[Card],
        up_cards: &[Card],
        playable: &[Card],
    ) -> SwapDecision;

    /// Observer hook fired for every percept, including the player's own actions.
    fn update_knowledge(&mut self, _percept: &Percept) {}
}
