pub mod greedy;
pub mod heuristic;
pub mod human;
pub mod random;
pub mod registry;

pub use greedy::GreedyPolicy;
pub use heuristic::HeuristicPolicy;
pub use human::HumanPolicy;
pub use random::RandomPolicy;

use crate::card::Card;

/// All cards of `rank`, in input order.
pub fn cards_of_rank(rank: u8, cards: &[Card]) -> Vec<Card> {
    cards
        .iter()
        .filter(|card| card.rank() == rank)
        .copied()
        .collect()
}

pub fn contains_rank(cards: &[Card], rank: u8) -> bool {
    cards.iter().any(|card| card.rank() == rank)
}

/// The most valuable card; the earliest one wins ties.
pub fn best_card(cards: &[Card]) -> Option<Card> {
    cards
        .iter()
        .copied()
        .reduce(|best, card| if card.is_better_than(&best) { card } else { best })
}

/// The least valuable card; the earliest one wins ties.
pub fn worst_card(cards: &[Card]) -> Option<Card> {
    cards
        .iter()
        .copied()
        .reduce(|worst, card| if worst.is_better_than(&card) { card } else { worst })
}

/// Every card sharing the rank of the least valuable card.
pub fn lowest_rank_group(cards: &[Card]) -> Vec<Card> {
    match worst_card(cards) {
        Some(worst) => cards_of_rank(worst.rank(), cards),
        None => Vec::new(),
    }
}
