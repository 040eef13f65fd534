use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::GameError;

/// LIFO container of cards. The last element of the backing vector is the top.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CardStack {
    cards: Vec<Card>,
}

impl CardStack {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Pushes cards in input order, so the last card of `cards` ends up on top.
    pub fn push_all<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
    }

    pub fn pop(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyStack)
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Up to `count` cards from the top, topmost first.
    pub fn top(&self, count: usize) -> impl Iterator<Item = &Card> {
        self.cards.iter().rev().take(count)
    }

    /// Removes every card, returning them bottom first.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Cards from bottom to top.
    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }
}

impl From<Vec<Card>> for CardStack {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

impl fmt::Display for CardStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, card) in self.cards.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}
