use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::SwapDecision;
use crate::card::Card;
use crate::policy::Policy;

/// Baseline policy: a uniformly random playable rank, then a random non-empty subset of it.
pub struct RandomPolicy<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, playable: &[Card]) -> Vec<Card> {
        let Some(rank) = playable.choose(&mut self.rng).map(Card::rank) else {
            return Vec::new();
        };
        let mut chosen = Vec::new();
        for card in playable.iter().filter(|card| card.rank() == rank) {
            if chosen.is_empty() || self.rng.gen_bool(0.5) {
                chosen.push(*card);
            }
        }
        chosen
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn choose_hand_cards(
        &mut self,
        _hand: &[Card],
        _up_cards: &[Card],
        playable: &[Card],
    ) -> Vec<Card> {
        self.pick(playable)
    }

    fn choose_up_cards(&mut self, _up_cards: &[Card], playable: &[Card]) -> Vec<Card> {
        self.pick(playable)
    }

    fn choose_swap(&mut self, hand: &[Card], up_cards: &[Card], playable: &[Card]) -> SwapDecision {
        if !playable.is_empty() {
            return SwapDecision::Play(self.pick(playable));
        }
        match (up_cards.choose(&mut self.rng), hand.choose(&mut self.rng)) {
            (Some(up_card), Some(hand_card)) => SwapDecision::Swap {
                up_card: *up_card,
                hand_card: *hand_card,
            },
            _ => SwapDecision::Play(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::card::all_same_rank;

    fn cards(texts: &[&str]) -> Vec<Card> {
        texts
            .iter()
            .map(|text| text.parse().expect("valid card"))
            .collect()
    }

    #[test]
    fn picks_non_empty_same_rank_subsets() {
        let mut policy = RandomPolicy::new(StdRng::seed_from_u64(7));
        let playable = cards(&["5C", "5D", "5H", "9S", "KD"]);
        for _ in 0..200 {
            let chosen = policy.choose_hand_cards(&playable, &[], &playable);
            assert!(!chosen.is_empty());
            assert!(all_same_rank(&chosen));
            assert!(chosen.iter().all(|card| playable.contains(card)));
        }
    }

    #[test]
    fn passes_only_when_nothing_is_playable() {
        let mut policy = RandomPolicy::new(StdRng::seed_from_u64(7));
        assert!(policy.choose_up_cards(&cards(&["9S"]), &[]).is_empty());
    }

    #[test]
    fn opens_with_a_play_in_pregame() {
        let mut policy = RandomPolicy::new(StdRng::seed_from_u64(3));
        let hand = cards(&["4C", "8D", "JS"]);
        match policy.choose_swap(&hand, &cards(&["2C", "3D", "AS"]), &hand) {
            SwapDecision::Play(chosen) => assert_eq!(chosen.len(), 1),
            other => panic!("expected a play, got {other:?}"),
        }
    }
}
