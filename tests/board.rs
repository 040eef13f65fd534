mod common;

use common::{card, cards, stacked_deck};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scheisskopf::{Board, GameError, InvalidAction};

const P1: [&str; 9] = ["4C", "5C", "6C", "KC", "QC", "JC", "9D", "9S", "7D"];
const P2: [&str; 9] = ["4D", "5D", "6D", "KS", "QS", "JS", "3S", "3H", "2D"];

fn board() -> Board {
    Board::from_deck(&[1, 2], stacked_deck(&[P1, P2], &["8H", "8C"], true)).expect("board")
}

#[test]
fn deals_down_then_up_then_hand_for_each_player() -> Result<(), GameError> {
    let board = board();
    assert_eq!(board.view_down_cards(1)?, cards(&["4C", "5C", "6C"]));
    assert_eq!(board.view_up_cards(1)?, cards(&["KC", "QC", "JC"]));
    assert_eq!(board.view_hand(1)?, cards(&["9D", "9S", "7D"]));
    assert_eq!(board.view_hand(2)?, cards(&["3S", "3H", "2D"]));
    assert_eq!(board.deck_size(), 52 - 18);
    assert!(matches!(board.view_hand(3), Err(GameError::UnknownPlayer(3))));
    Ok(())
}

#[test]
fn seeded_shuffle_deals_a_fixed_opening() -> Result<(), GameError> {
    let board = Board::new(&[1, 2], &mut StdRng::seed_from_u64(42))?;
    assert_eq!(board.view_down_cards(1)?, cards(&["3D", "AC", "AH"]));
    assert_eq!(board.view_up_cards(1)?, cards(&["5H", "6D", "9H"]));
    assert_eq!(board.view_hand(1)?, cards(&["7S", "6H", "3C"]));
    assert_eq!(board.deck_size(), 52 - 18);
    Ok(())
}

#[test]
fn views_are_copies() -> Result<(), GameError> {
    let board = board();
    let mut hand = board.view_hand(1)?;
    hand.clear();
    assert_eq!(board.view_hand(1)?.len(), 3);
    Ok(())
}

#[test]
fn hand_play_refills_from_the_deck_top() -> Result<(), GameError> {
    let mut board = board();
    board.validate_hand_card_play(&cards(&["9D", "9S"]), 1)?;
    let drawn = board.hand_to_pile(1, &cards(&["9D", "9S"]))?;
    assert_eq!(drawn, 2);
    assert_eq!(board.view_hand(1)?, cards(&["7D", "8H", "8C"]));
    assert_eq!(board.peek_pile(), Some(card("9S")));
    assert_eq!(board.card_count(), 52);
    Ok(())
}

#[test]
fn leading_threes_are_drained_before_a_pickup() -> Result<(), GameError> {
    let mut board = board();
    board.hand_to_pile(1, &cards(&["7D"]))?;
    board.hand_to_pile(2, &cards(&["3S", "3H"]))?;
    assert_eq!(board.clear_threes()?, 2);
    assert_eq!(board.view_discard(), cards(&["3H", "3S"]));
    assert_eq!(board.pile_to_hand(1)?, 1);
    assert!(board.view_hand(1)?.contains(&card("7D")));
    assert!(board.peek_pile().is_none());
    Ok(())
}

#[test]
fn cleared_pile_keeps_its_top_on_the_discard() -> Result<(), GameError> {
    let mut board = board();
    board.hand_to_pile(1, &cards(&["7D"]))?;
    board.hand_to_pile(2, &cards(&["2D"]))?;
    assert_eq!(board.clear_pile(), 2);
    assert_eq!(board.peek_discard(), Some(card("2D")));
    assert_eq!(board.pile_size(), 0);
    Ok(())
}

#[test]
fn plays_are_checked_against_the_pool_and_the_pile() -> Result<(), GameError> {
    let mut board = board();
    assert!(board.is_legal_hand_card_play(&cards(&["9D", "9S"]), 1)?);
    assert!(!board.is_legal_hand_card_play(&cards(&["9D", "7D"]), 1)?);
    assert!(!board.is_legal_hand_card_play(&[], 1)?);
    assert!(matches!(
        board.validate_hand_card_play(&cards(&["AS"]), 1),
        Err(GameError::InvalidAction(InvalidAction::CardNotHeld(_)))
    ));

    board.hand_to_pile(1, &cards(&["7D"]))?;
    assert_eq!(board.playable_up_cards(1)?, Vec::new());
    assert!(board.is_legal_up_card_play(&[], 1)?);
    assert!(!board.is_legal_hand_card_play(&cards(&["9D"]), 1)?);
    Ok(())
}

#[test]
fn swaps_exchange_exactly_one_card_each_way() -> Result<(), GameError> {
    let mut board = board();
    assert!(board.is_legal_swap(&card("KC"), &card("7D"), 1)?);
    assert!(!board.is_legal_swap(&card("7D"), &card("KC"), 1)?);
    board.apply_swap(&card("KC"), &card("7D"), 1)?;
    assert_eq!(board.view_hand(1)?, cards(&["9D", "9S", "KC"]));
    assert_eq!(board.view_up_cards(1)?, cards(&["QC", "JC", "7D"]));
    Ok(())
}

#[test]
fn rejects_decks_that_cannot_deal() {
    let short = stacked_deck(&[P1], &[], false);
    assert!(matches!(
        Board::from_deck(&[1, 2], short),
        Err(GameError::InvalidConfiguration(_))
    ));
    let mut doubled = stacked_deck(&[P1, P2], &[], false);
    doubled.push(card("4C"));
    assert!(matches!(
        Board::from_deck(&[1, 2], doubled),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        Board::from_deck(&[1, 1], stacked_deck(&[P1, P2], &[], false)),
        Err(GameError::InvalidConfiguration(_))
    ));
}
