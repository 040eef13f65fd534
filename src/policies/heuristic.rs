use std::collections::HashMap;

use tracing::trace;

use crate::action::{PlayerId, SwapDecision};
use crate::card::{Card, SEVEN};
use crate::percept::Percept;
use crate::policies::greedy::productive_swap;
use crate::policies::{cards_of_rank, contains_rank, lowest_rank_group};
use crate::policy::Policy;

/// Greedy play with a few rank-specific preferences and a model of what others hold.
///
/// In plain English:
/// - Holding a 6 and a playable 7, lead the 7s: the opponent is then capped at 7 while
///   the 6 stays available to follow up.
/// - Otherwise shed the least valuable rank, exactly like the greedy policy.
/// - Percepts feed a model of the pile, the discard and every opponent's hand. Cards an
///   opponent picks up or swaps into their hand become known to us.
pub struct HeuristicPolicy {
    id: PlayerId,
    pile_model: Vec<Card>,
    discard_model: Vec<Card>,
    opponent_hands: HashMap<PlayerId, Vec<Card>>,
}

impl HeuristicPolicy {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            pile_model: Vec::new(),
            discard_model: Vec::new(),
            opponent_hands: HashMap::new(),
        }
    }

    /// Cards known to be in `player`'s hand.
    pub fn known_hand(&self, player: PlayerId) -> &[Card] {
        self.opponent_hands
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pile_model(&self) -> &[Card] {
        &self.pile_model
    }

    pub fn discard_model(&self) -> &[Card] {
        &self.discard_model
    }

    fn sevens_rule(hand: &[Card], playable: &[Card]) -> bool {
        contains_rank(playable, SEVEN) && contains_rank(hand, 6)
    }

    fn forget_card(&mut self, player: PlayerId, card: &Card) {
        if let Some(known) = self.opponent_hands.get_mut(&player) {
            if let Some(index) = known.iter().position(|held| held == card) {
                known.remove(index);
            }
        }
    }
}

impl Policy for HeuristicPolicy {
    fn choose_hand_cards(
        &mut self,
        hand: &[Card],
        _up_cards: &[Card],
        playable: &[Card],
    ) -> Vec<Card> {
        if Self::sevens_rule(hand, playable) {
            return cards_of_rank(SEVEN, playable);
        }
        lowest_rank_group(playable)
    }

    fn choose_up_cards(&mut self, _up_cards: &[Card], playable: &[Card]) -> Vec<Card> {
        lowest_rank_group(playable)
    }

    fn choose_swap(&mut self, hand: &[Card], up_cards: &[Card], playable: &[Card]) -> SwapDecision {
        productive_swap(hand, up_cards)
            .unwrap_or_else(|| SwapDecision::Play(lowest_rank_group(playable)))
    }

    fn update_knowledge(&mut self, percept: &Percept) {
        trace!(policy = self.id, kind = percept.kind(), "percept received");
        match percept {
            Percept::Play { player, cards } => {
                if *player != self.id {
                    for card in cards {
                        self.forget_card(*player, card);
                    }
                }
                self.pile_model.extend(cards.iter().copied());
            }
            Percept::Pickup { player } => {
                // Leading threes go to the discard before a forced pickup.
                while self.pile_model.last().is_some_and(|card| card.rank() == 3) {
                    if let Some(card) = self.pile_model.pop() {
                        self.discard_model.push(card);
                    }
                }
                let picked = std::mem::take(&mut self.pile_model);
                if *player != self.id {
                    self.opponent_hands.entry(*player).or_default().extend(picked);
                }
            }
            Percept::Discard => {
                self.discard_model.append(&mut self.pile_model);
            }
            Percept::Swap {
                player,
                up_card,
                hand_card,
            } => {
                if *player != self.id {
                    self.forget_card(*player, hand_card);
                    self.opponent_hands.entry(*player).or_default().push(*up_card);
                }
            }
            Percept::Draw { .. } => {}
        }
    }
}
