#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scheisskopf::{Card, Percept, Policy, SwapDecision, full_deck};

pub fn card(text: &str) -> Card {
    text.parse().expect("valid card")
}

pub fn cards(texts: &[&str]) -> Vec<Card> {
    texts.iter().map(|text| card(text)).collect()
}

/// Builds a deck (bottom first) that deals `deals` in seat order, each given as
/// down cards, up cards, then hand cards. `draws` follow in draw order. With `fill`, the
/// remaining cards of a standard deck sit underneath.
pub fn stacked_deck(deals: &[[&str; 9]], draws: &[&str], fill: bool) -> Vec<Card> {
    let mut top_first: Vec<Card> = deals
        .iter()
        .flat_map(|deal| deal.iter().map(|text| card(text)))
        .collect();
    top_first.extend(draws.iter().map(|text| card(text)));
    if fill {
        for candidate in full_deck() {
            if !top_first.contains(&candidate) {
                top_first.push(candidate);
            }
        }
    }
    top_first.reverse();
    top_first
}

/// Policy that replays queued decisions and records every percept it sees.
#[derive(Default)]
pub struct ScriptedPolicy {
    pub swaps: VecDeque<SwapDecision>,
    pub plays: VecDeque<Vec<Card>>,
    pub percepts: Rc<RefCell<Vec<Percept>>>,
    pub down_card_prompts: Rc<RefCell<usize>>,
}

impl ScriptedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn swap(mut self, decision: SwapDecision) -> Self {
        self.swaps.push_back(decision);
        self
    }

    pub fn play(mut self, texts: &[&str]) -> Self {
        self.plays.push_back(cards(texts));
        self
    }

    pub fn percept_log(&self) -> Rc<RefCell<Vec<Percept>>> {
        Rc::clone(&self.percepts)
    }
}

impl Policy for ScriptedPolicy {
    fn choose_hand_cards(
        &mut self,
        _hand: &[Card],
        _up_cards: &[Card],
        _playable: &[Card],
    ) -> Vec<Card> {
        self.plays.pop_front().unwrap_or_default()
    }

    fn choose_up_cards(&mut self, _up_cards: &[Card], _playable: &[Card]) -> Vec<Card> {
        self.plays.pop_front().unwrap_or_default()
    }

    fn choose_down_card(&mut self) {
        *self.down_card_prompts.borrow_mut() += 1;
    }

    fn choose_swap(
        &mut self,
        _hand: &[Card],
        _up_cards: &[Card],
        _playable: &[Card],
    ) -> SwapDecision {
        self.swaps
            .pop_front()
            .unwrap_or_else(|| SwapDecision::Play(Vec::new()))
    }

    fn update_knowledge(&mut self, percept: &Percept) {
        self.percepts.borrow_mut().push(percept.clone());
    }
}
