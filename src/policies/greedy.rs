use crate::action::SwapDecision;
use crate::card::Card;
use crate::policies::{best_card, lowest_rank_group, worst_card};
use crate::policy::Policy;

/// Always sheds the least valuable rank it can play, all copies at once.
///
/// In the pregame it swaps its best hand card for its worst up card for as long as that
/// improves the up cards, then opens with its lowest group.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

/// Swap that strictly improves the up cards, if any.
pub(crate) fn productive_swap(hand: &[Card], up_cards: &[Card]) -> Option<SwapDecision> {
    let best_hand = best_card(hand)?;
    let worst_up = worst_card(up_cards)?;
    best_hand.is_better_than(&worst_up).then_some(SwapDecision::Swap {
        up_card: worst_up,
        hand_card: best_hand,
    })
}

impl Policy for GreedyPolicy {
    fn choose_hand_cards(
        &mut self,
        _hand: &[Card],
        _up_cards: &[Card],
        playable: &[Card],
    ) -> Vec<Card> {
        lowest_rank_group(playable)
    }

    fn choose_up_cards(&mut self, _up_cards: &[Card], playable: &[Card]) -> Vec<Card> {
        lowest_rank_group(playable)
    }

    fn choose_swap(&mut self, hand: &[Card], up_cards: &[Card], playable: &[Card]) -> SwapDecision {
        productive_swap(hand, up_cards)
            .unwrap_or_else(|| SwapDecision::Play(lowest_rank_group(playable)))
    }
}
