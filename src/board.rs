use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::action::PlayerId;
use crate::card::{
    CARDS_PER_PLAYER, Card, DOWN_CARD_COUNT, HAND_SIZE, UP_CARD_COUNT, all_same_rank, full_deck,
};
use crate::error::{GameError, InvalidAction};
use crate::stack::CardStack;

/// Cards owned by one seat.
#[derive(Clone, Debug)]
struct PlayerCards {
    id: PlayerId,
    hand: Vec<Card>,
    up_cards: Vec<Card>,
    down_cards: Vec<Card>,
}

impl PlayerCards {
    fn is_empty(&self) -> bool {
        self.hand.is_empty() && self.up_cards.is_empty() && self.down_cards.is_empty()
    }
}

/// All card collections on the table. Every card lives in exactly one of them.
#[derive(Clone, Debug)]
pub struct Board {
    deck: CardStack,
    pile: CardStack,
    discard: CardStack,
    players: Vec<PlayerCards>,
}

impl Board {
    /// Shuffles a fresh 52-card deck with `rng` and deals to `player_ids` in order.
    pub fn new<R: Rng + ?Sized>(player_ids: &[PlayerId], rng: &mut R) -> Result<Self, GameError> {
        let mut deck = full_deck();
        deck.shuffle(rng);
        Self::from_deck(player_ids, deck)
    }

    /// Deals from a prepared deck, given bottom first so the last card is drawn first.
    ///
    /// Each player in turn receives three down cards, three up cards and three hand cards,
    /// each popped from the top of the deck.
    pub fn from_deck(player_ids: &[PlayerId], deck: Vec<Card>) -> Result<Self, GameError> {
        if player_ids.is_empty() {
            return Err(GameError::InvalidConfiguration(String::from(
                "board needs at least one player",
            )));
        }
        let unique_ids: HashSet<PlayerId> = player_ids.iter().copied().collect();
        if unique_ids.len() != player_ids.len() {
            return Err(GameError::InvalidConfiguration(String::from(
                "player ids must be unique",
            )));
        }
        let unique_cards: HashSet<Card> = deck.iter().copied().collect();
        if unique_cards.len() != deck.len() {
            return Err(GameError::InvalidConfiguration(String::from(
                "deck contains duplicate cards",
            )));
        }
        if deck.len() < player_ids.len() * CARDS_PER_PLAYER {
            return Err(GameError::InvalidConfiguration(format!(
                "deck of {} cards cannot deal {} players",
                deck.len(),
                player_ids.len()
            )));
        }

        let mut deck = CardStack::from(deck);
        let mut players = Vec::with_capacity(player_ids.len());
        for &id in player_ids {
            let down_cards = deal(&mut deck, DOWN_CARD_COUNT)?;
            let up_cards = deal(&mut deck, UP_CARD_COUNT)?;
            let hand = deal(&mut deck, HAND_SIZE)?;
            players.push(PlayerCards {
                id,
                hand,
                up_cards,
                down_cards,
            });
        }

        Ok(Self {
            deck,
            pile: CardStack::new(),
            discard: CardStack::new(),
            players,
        })
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|player| player.id).collect()
    }

    pub fn peek_pile(&self) -> Option<Card> {
        self.pile.peek().copied()
    }

    pub fn peek_discard(&self) -> Option<Card> {
        self.discard.peek().copied()
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    pub fn pile_size(&self) -> usize {
        self.pile.len()
    }

    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    /// Pile contents, bottom first.
    pub fn view_pile(&self) -> Vec<Card> {
        self.pile.as_slice().to_vec()
    }

    /// Discard contents, bottom first.
    pub fn view_discard(&self) -> Vec<Card> {
        self.discard.as_slice().to_vec()
    }

    pub fn view_hand(&self, player: PlayerId) -> Result<Vec<Card>, GameError> {
        Ok(self.seat(player)?.hand.clone())
    }

    pub fn view_up_cards(&self, player: PlayerId) -> Result<Vec<Card>, GameError> {
        Ok(self.seat(player)?.up_cards.clone())
    }

    pub fn view_down_cards(&self, player: PlayerId) -> Result<Vec<Card>, GameError> {
        Ok(self.seat(player)?.down_cards.clone())
    }

    pub fn playable_hand_cards(&self, player: PlayerId) -> Result<Vec<Card>, GameError> {
        Ok(self.playable_in(&self.seat(player)?.hand))
    }

    pub fn playable_up_cards(&self, player: PlayerId) -> Result<Vec<Card>, GameError> {
        Ok(self.playable_in(&self.seat(player)?.up_cards))
    }

    /// First player, in seat order, who has shed every card.
    pub fn emptied_player(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|player| player.is_empty())
            .map(|player| player.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.emptied_player().is_some()
    }

    pub fn down_cards_playable(&self, player: PlayerId) -> Result<bool, GameError> {
        let seat = self.seat(player)?;
        Ok(seat.up_cards.is_empty() && seat.hand.is_empty())
    }

    pub fn up_cards_playable(&self, player: PlayerId) -> Result<bool, GameError> {
        let seat = self.seat(player)?;
        Ok(seat.hand.is_empty() && !seat.up_cards.is_empty())
    }

    /// True when the pile holds at least four cards and the top four share a rank.
    pub fn top_four_same(&self) -> bool {
        if self.pile.len() < 4 {
            return false;
        }
        let mut top = self.pile.top(4).map(Card::rank);
        let first = top.next();
        top.all(|rank| Some(rank) == first)
    }

    pub fn is_legal_swap(
        &self,
        up_card: &Card,
        hand_card: &Card,
        player: PlayerId,
    ) -> Result<bool, GameError> {
        let seat = self.seat(player)?;
        Ok(seat.up_cards.contains(up_card) && seat.hand.contains(hand_card))
    }

    pub fn is_legal_hand_card_play(
        &self,
        cards: &[Card],
        player: PlayerId,
    ) -> Result<bool, GameError> {
        legality(self.validate_hand_card_play(cards, player))
    }

    pub fn is_legal_up_card_play(
        &self,
        cards: &[Card],
        player: PlayerId,
    ) -> Result<bool, GameError> {
        legality(self.validate_up_card_play(cards, player))
    }

    /// Explains why a hand play is illegal. Passing (`[]`) is only allowed with nothing playable.
    pub fn validate_hand_card_play(
        &self,
        cards: &[Card],
        player: PlayerId,
    ) -> Result<(), GameError> {
        let seat = self.seat(player)?;
        self.validate_play(&seat.hand, cards)
    }

    pub fn validate_up_card_play(&self, cards: &[Card], player: PlayerId) -> Result<(), GameError> {
        let seat = self.seat(player)?;
        self.validate_play(&seat.up_cards, cards)
    }

    /// Moves `cards` from the hand to the pile (last card on top), then refills the hand.
    /// Returns the number of cards drawn.
    pub fn hand_to_pile(&mut self, player: PlayerId, cards: &[Card]) -> Result<usize, GameError> {
        let seat = self.seat_mut(player)?;
        seat.hand = remove_all(&seat.hand, cards)?;
        self.pile.push_all(cards.iter().copied());
        self.draw(player)
    }

    pub fn up_cards_to_pile(&mut self, player: PlayerId, cards: &[Card]) -> Result<(), GameError> {
        let seat = self.seat_mut(player)?;
        seat.up_cards = remove_all(&seat.up_cards, cards)?;
        self.pile.push_all(cards.iter().copied());
        Ok(())
    }

    /// Flips the down card at `index` onto the pile and returns it.
    pub fn down_card_to_pile(&mut self, player: PlayerId, index: usize) -> Result<Card, GameError> {
        let seat = self.seat_mut(player)?;
        if index >= seat.down_cards.len() {
            return Err(InvalidAction::DownCardIndex(index).into());
        }
        let card = seat.down_cards.remove(index);
        self.pile.push(card);
        Ok(card)
    }

    /// Moves the whole pile into the player's hand, top card first. Returns the count.
    pub fn pile_to_hand(&mut self, player: PlayerId) -> Result<usize, GameError> {
        self.seat(player)?;
        let cards = self.pile.take_all();
        let count = cards.len();
        let seat = self.seat_mut(player)?;
        seat.hand.extend(cards.into_iter().rev());
        trace!(player, count, "pile picked up");
        Ok(count)
    }

    /// Sends the pile to the discard; the pile's top card becomes the discard's top card.
    pub fn clear_pile(&mut self) -> usize {
        let cards = self.pile.take_all();
        let count = cards.len();
        self.discard.push_all(cards);
        count
    }

    /// Discards every leading 3 on the pile. Returns how many were removed.
    pub fn clear_threes(&mut self) -> Result<usize, GameError> {
        let mut cleared = 0;
        while self.pile.peek().is_some_and(|card| card.rank() == 3) {
            let card = self.pile.pop()?;
            self.discard.push(card);
            cleared += 1;
        }
        Ok(cleared)
    }

    /// Exchanges the first up card equal to `up_card` with the first hand card equal to
    /// `hand_card`.
    pub fn apply_swap(
        &mut self,
        up_card: &Card,
        hand_card: &Card,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let seat = self.seat_mut(player)?;
        let up_index = seat.up_cards.iter().position(|card| card == up_card);
        let hand_index = seat.hand.iter().position(|card| card == hand_card);
        let (Some(up_index), Some(hand_index)) = (up_index, hand_index) else {
            return Err(InvalidAction::IllegalSwap {
                up_card: *up_card,
                hand_card: *hand_card,
            }
            .into());
        };
        let up = seat.up_cards.remove(up_index);
        let hand = seat.hand.remove(hand_index);
        seat.hand.push(up);
        seat.up_cards.push(hand);
        Ok(())
    }

    /// Refills the hand to three cards while the deck lasts. Returns the number drawn.
    pub fn draw(&mut self, player: PlayerId) -> Result<usize, GameError> {
        let held = self.seat(player)?.hand.len();
        let count = HAND_SIZE.saturating_sub(held).min(self.deck.len());
        let drawn = deal(&mut self.deck, count)?;
        self.seat_mut(player)?.hand.extend(drawn);
        Ok(count)
    }

    /// Every card on the table, in no meaningful order.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.card_count());
        cards.extend_from_slice(self.deck.as_slice());
        cards.extend_from_slice(self.pile.as_slice());
        cards.extend_from_slice(self.discard.as_slice());
        for player in &self.players {
            cards.extend_from_slice(&player.hand);
            cards.extend_from_slice(&player.up_cards);
            cards.extend_from_slice(&player.down_cards);
        }
        cards
    }

    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.pile.len()
            + self.discard.len()
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.up_cards.len() + p.down_cards.len())
                .sum::<usize>()
    }

    fn seat(&self, player: PlayerId) -> Result<&PlayerCards, GameError> {
        self.players
            .iter()
            .find(|seat| seat.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    fn seat_mut(&mut self, player: PlayerId) -> Result<&mut PlayerCards, GameError> {
        self.players
            .iter_mut()
            .find(|seat| seat.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    fn playable_in(&self, pool: &[Card]) -> Vec<Card> {
        let top = self.pile.peek();
        pool.iter()
            .filter(|card| card.is_playable_on(top))
            .copied()
            .collect()
    }

    fn validate_play(&self, pool: &[Card], cards: &[Card]) -> Result<(), GameError> {
        if cards.is_empty() {
            if self.playable_in(pool).is_empty() {
                return Ok(());
            }
            return Err(InvalidAction::EmptyPlayWithPlayableCards.into());
        }
        if !all_same_rank(cards) {
            return Err(InvalidAction::MixedRanks.into());
        }
        remove_all(pool, cards)?;
        let top = self.pile.peek();
        if let Some(card) = cards.iter().find(|card| !card.is_playable_on(top)) {
            return Err(InvalidAction::CardNotPlayable {
                card: *card,
                pile_top: top.copied(),
            }
            .into());
        }
        Ok(())
    }
}

fn deal(deck: &mut CardStack, count: usize) -> Result<Vec<Card>, GameError> {
    let mut cards = Vec::with_capacity(count);
    for _ in 0..count {
        cards.push(deck.pop()?);
    }
    Ok(cards)
}

/// Copy of `pool` with the first match of each card removed; fails if any card is missing.
fn remove_all(pool: &[Card], cards: &[Card]) -> Result<Vec<Card>, GameError> {
    let mut remaining = pool.to_vec();
    for card in cards {
        let index = remaining
            .iter()
            .position(|held| held == card)
            .ok_or(InvalidAction::CardNotHeld(*card))?;
        remaining.remove(index);
    }
    Ok(remaining)
}

fn legality(result: Result<(), GameError>) -> Result<bool, GameError> {
    match result {
        Ok(()) => Ok(true),
        Err(GameError::InvalidAction(_)) => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn card(text: &str) -> Card {
        text.parse().expect("valid card")
    }

    fn cards(texts: &[&str]) -> Vec<Card> {
        texts.iter().map(|text| card(text)).collect()
    }

    fn board() -> Board {
        Board::from_deck(&[1, 2], full_deck()).expect("board")
    }

    #[test]
    fn deals_down_up_hand_from_the_top() {
        let board = board();
        assert_eq!(board.view_down_cards(1).unwrap(), cards(&["AH", "KH", "QH"]));
        assert_eq!(board.view_up_cards(1).unwrap(), cards(&["JH", "10H", "9H"]));
        assert_eq!(board.view_hand(1).unwrap(), cards(&["8H", "7H", "6H"]));
        assert_eq!(board.view_down_cards(2).unwrap(), cards(&["5H", "4H", "3H"]));
        assert_eq!(board.view_up_cards(2).unwrap(), cards(&["2H", "AD", "KD"]));
        assert_eq!(board.view_hand(2).unwrap(), cards(&["QD", "JD", "10D"]));
        assert_eq!(board.deck_size(), 52 - 18);
        assert_eq!(board.card_count(), 52);
    }

    #[test]
    fn rejects_unknown_players_and_short_decks() {
        let board = board();
        assert!(matches!(board.view_hand(3), Err(GameError::UnknownPlayer(3))));
        let short = full_deck().into_iter().take(17).collect();
        assert!(Board::from_deck(&[1, 2], short).is_err());
        assert!(Board::from_deck(&[1, 1], full_deck()).is_err());
    }

    #[test]
    fn views_are_copies() {
        let board = board();
        let mut hand = board.view_hand(1).unwrap();
        hand.clear();
        assert_eq!(board.view_hand(1).unwrap().len(), 3);
    }

    #[test]
    fn top_four_same_leaves_pile_untouched() {
        let mut board = board();
        board.pile.push_all(cards(&["9C", "8C", "8S", "8D", "8H"]));
        let before = board.pile.to_string();
        assert!(board.top_four_same());
        assert_eq!(board.pile.to_string(), before);

        board.pile.push(card("9S"));
        let before = board.pile.to_string();
        assert!(!board.top_four_same());
        assert_eq!(board.pile.to_string(), before);
    }

    #[test]
    fn clear_pile_keeps_top_card_on_top() {
        let mut board = board();
        board.pile.push_all(cards(&["4C", "5C", "10S"]));
        assert_eq!(board.clear_pile(), 3);
        assert!(board.pile.is_empty());
        assert_eq!(board.peek_discard(), Some(card("10S")));
        assert_eq!(board.discard_size(), 3);
    }

    #[test]
    fn clear_threes_drains_every_leading_three() {
        let mut board = board();
        board.pile.push_all(cards(&["3C", "9C", "3S", "3D"]));
        assert_eq!(board.clear_threes().unwrap(), 2);
        assert_eq!(board.peek_pile(), Some(card("9C")));
        assert_eq!(board.discard_size(), 2);
    }

    #[test]
    fn pile_to_hand_takes_everything() {
        let mut board = board();
        board.pile.push_all(cards(&["4C", "5C"]));
        assert_eq!(board.pile_to_hand(1).unwrap(), 2);
        assert!(board.peek_pile().is_none());
        assert_eq!(
            board.view_hand(1).unwrap(),
            cards(&["8H", "7H", "6H", "5C", "4C"])
        );
    }

    #[test]
    fn swap_moves_one_card_each_way_and_back() {
        let mut board = board();
        let up = card("JH");
        let hand = card("6H");
        assert!(board.is_legal_swap(&up, &hand, 1).unwrap());
        assert!(!board.is_legal_swap(&hand, &up, 1).unwrap());
        board.apply_swap(&up, &hand, 1).unwrap();
        assert_eq!(board.view_hand(1).unwrap(), cards(&["8H", "7H", "JH"]));
        assert_eq!(board.view_up_cards(1).unwrap(), cards(&["10H", "9H", "6H"]));

        board.apply_swap(&hand, &up, 1).unwrap();
        let mut hand_after = board.view_hand(1).unwrap();
        let mut up_after = board.view_up_cards(1).unwrap();
        hand_after.sort_by_key(|c| c.rank());
        up_after.sort_by_key(|c| c.rank());
        assert_eq!(hand_after, cards(&["6H", "7H", "8H"]));
        assert_eq!(up_after, cards(&["9H", "10H", "JH"]));
    }

    #[test]
    fn illegal_swap_leaves_board_unchanged() {
        let mut board = board();
        let err = board.apply_swap(&card("2C"), &card("6H"), 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidAction(InvalidAction::IllegalSwap { .. })
        ));
        assert_eq!(board.view_hand(1).unwrap(), cards(&["8H", "7H", "6H"]));
    }

    #[test]
    fn hand_play_refills_to_three() {
        let mut board = board();
        board.seat_mut(1).unwrap().hand = cards(&["8H"]);
        let drawn = board.hand_to_pile(1, &cards(&["8H"])).unwrap();
        assert_eq!(drawn, 3);
        assert_eq!(board.view_hand(1).unwrap().len(), 3);
        assert_eq!(board.peek_pile(), Some(card("8H")));
    }

    #[test]
    fn hand_play_without_deck_draws_nothing() {
        let deck: Vec<Card> = full_deck().into_iter().skip(52 - 18).collect();
        let mut board = Board::from_deck(&[1, 2], deck).unwrap();
        assert_eq!(board.deck_size(), 0);
        board.seat_mut(1).unwrap().hand = cards(&["8H"]);
        assert_eq!(board.hand_to_pile(1, &cards(&["8H"])).unwrap(), 0);
        assert!(board.view_hand(1).unwrap().is_empty());
    }

    #[test]
    fn hand_play_legality() {
        let mut board = board();
        board.seat_mut(1).unwrap().hand = cards(&["8H", "8C", "5D", "2S"]);
        board.pile.push(card("7D"));
        assert!(board.is_legal_hand_card_play(&cards(&["5D"]), 1).unwrap());
        assert!(board.is_legal_hand_card_play(&cards(&["2S"]), 1).unwrap());
        assert!(!board.is_legal_hand_card_play(&cards(&["8H", "8C"]), 1).unwrap());
        assert!(!board.is_legal_hand_card_play(&cards(&["5D", "2S"]), 1).unwrap());
        assert!(!board.is_legal_hand_card_play(&[], 1).unwrap());
        assert!(!board.is_legal_hand_card_play(&cards(&["5D", "5D"]), 1).unwrap());
        assert!(!board.is_legal_hand_card_play(&cards(&["4S"]), 1).unwrap());
        assert_eq!(board.playable_hand_cards(1).unwrap(), cards(&["5D", "2S"]));

        board.seat_mut(1).unwrap().hand = cards(&["8H", "9C"]);
        assert!(board.is_legal_hand_card_play(&[], 1).unwrap());
    }

    #[test]
    fn phase_predicates_follow_pools() {
        let mut board = board();
        assert!(!board.up_cards_playable(1).unwrap());
        assert!(!board.down_cards_playable(1).unwrap());
        board.seat_mut(1).unwrap().hand.clear();
        assert!(board.up_cards_playable(1).unwrap());
        board.seat_mut(1).unwrap().up_cards.clear();
        assert!(board.down_cards_playable(1).unwrap());
        assert!(!board.is_terminal());
        board.seat_mut(1).unwrap().down_cards.clear();
        assert_eq!(board.emptied_player(), Some(1));
    }

    #[test]
    fn down_card_to_pile_by_index() {
        let mut board = board();
        let card = board.down_card_to_pile(2, 1).unwrap();
        assert_eq!(card, Card::new(4, Suit::Hearts));
        assert_eq!(board.peek_pile(), Some(card));
        assert!(board.down_card_to_pile(2, 5).is_err());
    }
}
