use std::fmt::Write;

use crate::action::{CardSource, PlayerId, TurnOutcome};
use crate::board::Board;
use crate::card::Card;
use crate::game::{Game, GameStatus};

/// Customize board rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    /// Show down cards face up (debugging only; they are concealed in play).
    pub reveal_down_cards: bool,
    pub show_pile_contents: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            reveal_down_cards: false,
            show_pile_contents: true,
        }
    }
}

pub fn render_game(game: &Game) -> String {
    render_game_with_options(game, VisualOptions::default())
}

pub fn render_game_with_options(game: &Game, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match game.status() {
        GameStatus::Ongoing => String::from("Ongoing"),
        GameStatus::Finished { winner } => format!("Finished (winner: Player {winner})"),
        GameStatus::Draw => String::from("Finished (draw)"),
    };
    let _ = writeln!(out, "Game status: {status}");
    let _ = writeln!(out, "Phase: {:?}", game.phase());
    out.push_str(&render_board_with_options(
        game.board(),
        Some(game.active_player()),
        options,
    ));
    out
}

pub fn render_board(board: &Board, active: Option<PlayerId>) -> String {
    render_board_with_options(board, active, VisualOptions::default())
}

pub fn render_board_with_options(
    board: &Board,
    active: Option<PlayerId>,
    options: VisualOptions,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Deck: {} cards", board.deck_size());
    if options.show_pile_contents {
        let _ = writeln!(out, "Pile: {}", format_cards(&board.view_pile()));
    } else {
        let _ = writeln!(
            out,
            "Pile: {} cards (top: {})",
            board.pile_size(),
            format_top(board.peek_pile())
        );
    }
    let _ = writeln!(
        out,
        "Discard: {} cards (top: {})",
        board.discard_size(),
        format_top(board.peek_discard())
    );
    for id in board.player_ids() {
        let current_tag = if active == Some(id) { " <- active" } else { "" };
        let _ = writeln!(out, "Player {id}{current_tag}");
        let hand = board.view_hand(id).unwrap_or_default();
        let up_cards = board.view_up_cards(id).unwrap_or_default();
        let down_cards = board.view_down_cards(id).unwrap_or_default();
        let _ = writeln!(out, "    Hand: {}", format_cards(&hand));
        let _ = writeln!(out, "    Up cards: {}", format_cards(&up_cards));
        if options.reveal_down_cards {
            let _ = writeln!(out, "    Down cards: {}", format_cards(&down_cards));
        } else {
            let _ = writeln!(out, "    Down cards: {} hidden", down_cards.len());
        }
    }
    out
}

pub fn describe_outcome(outcome: &TurnOutcome) -> String {
    match outcome {
        TurnOutcome::Finished { winner } => format!("Player {winner} has no cards left and wins"),
        TurnOutcome::PileCleared { skipped, cleared } => {
            format!("Pile of {cleared} cleared to the discard; player {skipped} is skipped")
        }
        TurnOutcome::ThreesPickup {
            player,
            threes,
            picked_up,
        } => format!(
            "{threes} three(s) discarded; player {player} picks up {picked_up} card(s)"
        ),
        TurnOutcome::Swapped {
            player,
            up_card,
            hand_card,
        } => format!("Player {player} swaps up card {up_card} for hand card {hand_card}"),
        TurnOutcome::Played {
            player,
            source,
            cards,
            drawn,
        } => {
            let from = match source {
                CardSource::Hand => "hand",
                CardSource::UpCards => "up cards",
                CardSource::DownCards => "down cards",
            };
            let mut text = format!("Player {player} plays {} from {from}", format_cards(cards));
            if *drawn > 0 {
                let _ = write!(text, " and draws {drawn}");
            }
            text
        }
        TurnOutcome::DownCardFailed {
            player,
            card,
            picked_up,
        } => format!(
            "Player {player} flips {card}, which does not fit; picks up {picked_up} card(s)"
        ),
        TurnOutcome::PickedUp { player, cards } => {
            format!("Player {player} cannot play and picks up {cards} card(s)")
        }
    }
}

fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return String::from("(empty)");
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_top(card: Option<Card>) -> String {
    card.map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::full_deck;
    use crate::game::GameBuilder;

    #[test]
    fn render_conceals_down_cards_by_default() {
        let game = GameBuilder::new()
            .with_specs(&["greedy", "random"])
            .expect("specs")
            .with_deck(full_deck())
            .with_first_player(2)
            .build()
            .expect("game");
        let text = render_game(&game);
        assert!(text.contains("Phase: Pregame"));
        assert!(text.contains("Player 2 <- active"));
        assert!(text.contains("Hand: 8H 7H 6H"));
        assert!(text.contains("Down cards: 3 hidden"));
        assert!(!text.contains("AH KH QH"));

        let revealed = render_game_with_options(
            &game,
            VisualOptions {
                reveal_down_cards: true,
                show_pile_contents: true,
            },
        );
        assert!(revealed.contains("Down cards: AH KH QH"));
    }

    #[test]
    fn describes_plays_and_pickups() {
        let played = TurnOutcome::Played {
            player: 1,
            source: CardSource::Hand,
            cards: vec!["7C".parse().expect("card"), "7D".parse().expect("card")],
            drawn: 2,
        };
        assert_eq!(
            describe_outcome(&played),
            "Player 1 plays 7C 7D from hand and draws 2"
        );
        let pickup = TurnOutcome::PickedUp {
            player: 2,
            cards: 5,
        };
        assert!(describe_outcome(&pickup).contains("picks up 5"));
    }
}
