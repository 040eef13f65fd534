use std::io::{self, BufRead, Write};

use crate::action::SwapDecision;
use crate::card::{Card, parse_rank};
use crate::policy::Policy;

/// Interactive policy that asks a person at the terminal for a rank and a count.
///
/// Input that does not name an available rank and count exactly resolves to `[]`; the
/// engine then rejects it unless nothing was playable.
pub struct HumanPolicy {
    name: String,
    input: Box<dyn BufRead>,
}

impl HumanPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_input(name, Box::new(io::BufReader::new(io::stdin())))
    }

    /// Reads answers from `input` instead of standard input.
    pub fn with_input(name: impl Into<String>, input: Box<dyn BufRead>) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    fn prompt(&mut self, question: &str) -> String {
        print!("{question}: ");
        if io::stdout().flush().is_err() {
            eprintln!("failed to flush stdout");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line.trim().to_string(),
            Err(_) => {
                eprintln!("failed to read input");
                String::new()
            }
        }
    }

    fn show(&self, label: &str, cards: &[Card]) {
        println!("  {label}: {}", format_cards(cards));
    }
}

impl Default for HumanPolicy {
    fn default() -> Self {
        Self::new("Human")
    }
}

/// Resolves `"<rank> [count]"` against `playable`. Count defaults to one.
pub fn resolve_selection(input: &str, playable: &[Card]) -> Vec<Card> {
    let mut tokens = input.split_whitespace();
    let Some(rank) = tokens.next().and_then(parse_rank) else {
        return Vec::new();
    };
    let count = match tokens.next() {
        Some(text) => match text.parse::<usize>() {
            Ok(count) => count,
            Err(_) => return Vec::new(),
        },
        None => 1,
    };
    if tokens.next().is_some() || count == 0 {
        return Vec::new();
    }
    let matching: Vec<Card> = playable
        .iter()
        .filter(|card| card.rank() == rank)
        .copied()
        .collect();
    if matching.len() < count {
        return Vec::new();
    }
    matching.into_iter().take(count).collect()
}

/// Resolves pregame input: `"swap <up card> <hand card>"` or a play as in [`resolve_selection`].
pub fn resolve_swap(input: &str, playable: &[Card]) -> SwapDecision {
    let mut tokens = input.split_whitespace();
    if tokens
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("swap"))
    {
        let up_card = tokens.next().and_then(|text| text.parse::<Card>().ok());
        let hand_card = tokens.next().and_then(|text| text.parse::<Card>().ok());
        if let (Some(up_card), Some(hand_card), None) = (up_card, hand_card, tokens.next()) {
            return SwapDecision::Swap { up_card, hand_card };
        }
        return SwapDecision::Play(Vec::new());
    }
    let play = input
        .trim()
        .strip_prefix("play")
        .unwrap_or(input)
        .trim_start();
    SwapDecision::Play(resolve_selection(play, playable))
}

fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return String::from("(none)");
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Policy for HumanPolicy {
    fn choose_hand_cards(
        &mut self,
        hand: &[Card],
        up_cards: &[Card],
        playable: &[Card],
    ) -> Vec<Card> {
        println!("\n=== {}'s turn (hand) ===", self.name);
        self.show("Hand", hand);
        self.show("Up cards", up_cards);
        self.show("Playable", playable);
        if playable.is_empty() {
            println!("Nothing playable; you pick up the pile.");
            return Vec::new();
        }
        let answer = self.prompt("Rank and count to play (e.g. '7 2')");
        resolve_selection(&answer, playable)
    }

    fn choose_up_cards(&mut self, up_cards: &[Card], playable: &[Card]) -> Vec<Card> {
        println!("\n=== {}'s turn (up cards) ===", self.name);
        self.show("Up cards", up_cards);
        self.show("Playable", playable);
        if playable.is_empty() {
            println!("Nothing playable; you pick up the pile.");
            return Vec::new();
        }
        let answer = self.prompt("Rank and count to play (e.g. 'K 1')");
        resolve_selection(&answer, playable)
    }

    fn choose_down_card(&mut self) {
        println!("\n=== {}'s turn (down cards) ===", self.name);
        println!("Flipping a random down card.");
    }

    fn choose_swap(&mut self, hand: &[Card], up_cards: &[Card], playable: &[Card]) -> SwapDecision {
        println!("\n=== {}'s pregame ===", self.name);
        self.show("Hand", hand);
        self.show("Up cards", up_cards);
        let answer = self.prompt("'swap <up> <hand>' or '<rank> <count>' to open");
        resolve_swap(&answer, playable)
    }
}
