use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const MIN_RANK: u8 = 2;
pub const MAX_RANK: u8 = 14;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;
pub const ACE: u8 = 14;
pub const SEVEN: u8 = 7;
pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 3;
pub const UP_CARD_COUNT: usize = 3;
pub const DOWN_CARD_COUNT: usize = 3;
pub const CARDS_PER_PLAYER: usize = HAND_SIZE + UP_CARD_COUNT + DOWN_CARD_COUNT;
pub const MAX_PLAYERS: usize = DECK_SIZE / CARDS_PER_PLAYER;

/// Suit of a standard playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Spades,
    Diamonds,
    Hearts,
}

impl Suit {
    /// Suits in the order the deck is built.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Diamonds, Suit::Hearts];

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'C' => Some(Suit::Clubs),
            'S' => Some(Suit::Spades),
            'D' => Some(Suit::Diamonds),
            'H' => Some(Suit::Hearts),
            _ => None,
        }
    }
}

/// A single physical card. Ranks run from 2 to 14 where 11..=14 are J, Q, K, A.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Ranks from outside the crate go through [`Card::try_new`] or `FromStr`.
    pub(crate) fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((MIN_RANK..=MAX_RANK).contains(&rank));
        Self { rank, suit }
    }

    /// Fallible constructor for ranks coming from outside the engine.
    pub fn try_new(rank: u8, suit: Suit) -> Result<Self, GameError> {
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(GameError::InvalidCard(format!("rank {rank} is out of range")));
        }
        Ok(Self { rank, suit })
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// 2, 3 and 10 are wild.
    #[inline]
    pub fn is_wild(&self) -> bool {
        is_wild_rank(self.rank)
    }

    /// Whether `self` may be placed on a pile whose top card is `top`.
    pub fn is_playable_on(&self, top: Option<&Card>) -> bool {
        let Some(top) = top else {
            return true;
        };
        if self.is_wild() {
            return true;
        }
        if top.rank == SEVEN {
            return self.rank <= SEVEN;
        }
        self.rank >= top.rank
    }

    /// Strategic worth of the card: normal ranks in ascending order, then 2, 10 and 3.
    pub fn value(&self) -> u8 {
        rank_value(self.rank)
    }

    pub fn is_better_than(&self, other: &Card) -> bool {
        self.value() > other.value()
    }

    /// Total order by strategic value, usable with `sort_by`.
    pub fn cmp_value(&self, other: &Card) -> Ordering {
        self.value().cmp(&other.value())
    }
}

#[inline]
pub fn is_wild_rank(rank: u8) -> bool {
    matches!(rank, 2 | 3 | 10)
}

/// Strategic value of a rank: 4 < 5 < ... < 9 < J < Q < K < A < 2 < 10 < 3.
pub fn rank_value(rank: u8) -> u8 {
    match rank {
        2 => ACE + 1,
        10 => ACE + 2,
        3 => ACE + 3,
        other => other,
    }
}

pub fn rank_label(rank: u8) -> String {
    match rank {
        JACK => String::from("J"),
        QUEEN => String::from("Q"),
        KING => String::from("K"),
        ACE => String::from("A"),
        other => other.to_string(),
    }
}

/// Parses `"2"`..`"10"` or a face letter (`J`, `Q`, `K`, `A`) into a rank.
pub fn parse_rank(text: &str) -> Option<u8> {
    match text.trim().to_ascii_uppercase().as_str() {
        "J" => Some(JACK),
        "Q" => Some(QUEEN),
        "K" => Some(KING),
        "A" => Some(ACE),
        other => other
            .parse::<u8>()
            .ok()
            .filter(|rank| (MIN_RANK..=10).contains(rank)),
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_label(self.rank), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut chars = text.chars();
        let suit_symbol = chars
            .next_back()
            .ok_or_else(|| GameError::InvalidCard(String::from("empty card text")))?;
        let suit = Suit::from_symbol(suit_symbol)
            .ok_or_else(|| GameError::InvalidCard(format!("unknown suit in '{text}'")))?;
        let rank = parse_rank(chars.as_str())
            .ok_or_else(|| GameError::InvalidCard(format!("unknown rank in '{text}'")))?;
        Ok(Card::new(rank, suit))
    }
}

/// Builds the 52-card deck in deterministic order (unshuffled): suit by suit, ranks ascending.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in MIN_RANK..=MAX_RANK {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Returns true when every card in the slice shares one rank. Empty slices are not same-rank.
pub fn all_same_rank(cards: &[Card]) -> bool {
    match cards.split_first() {
        Some((first, rest)) => rest.iter().all(|card| card.rank == first.rank),
        None => false,
    }
}
