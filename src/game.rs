use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::action::{CardSource, PlayerId, SwapDecision, TurnOutcome};
use crate::board::Board;
use crate::card::{Card, MAX_PLAYERS};
use crate::error::{GameError, InvalidAction};
use crate::percept::Percept;
use crate::policies::registry::create_policy_from_spec;
use crate::policy::Policy;

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;
pub const DEFAULT_STALL_LIMIT: usize = 8;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub seed: u64,
    /// Consecutive rejected actions after which `take_turn` reports a stall.
    pub stall_limit: usize,
    /// Seat that moves first; drawn from the game RNG when unset.
    pub first_player: Option<PlayerId>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            stall_limit: DEFAULT_STALL_LIMIT,
            first_player: None,
        }
    }
}

/// Builder that seats policies and enables deterministic deck injection for tests.
#[derive(Default)]
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
    policies: Vec<Box<dyn Policy>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Deal from `deck` (bottom first) instead of shuffling a fresh one.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Seats a policy. Seats are numbered 1, 2, ... in the order they are added.
    pub fn with_policy(mut self, policy: Box<dyn Policy>) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn with_policies<I>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Policy>>,
    {
        self.policies.extend(policies);
        self
    }

    /// Seats one policy per spec string (see `create_policy_from_spec`), seeded from the
    /// current game seed.
    pub fn with_specs<S: AsRef<str>>(mut self, specs: &[S]) -> Result<Self, GameError> {
        for spec in specs {
            let id = self.policies.len() + 1;
            let policy = create_policy_from_spec(spec.as_ref(), id, self.config.seed)?;
            self.policies.push(policy);
        }
        Ok(self)
    }

    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.config.first_player = Some(player);
        self
    }

    pub fn with_stall_limit(mut self, limit: usize) -> Self {
        self.config.stall_limit = limit;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Finished { winner: PlayerId },
    /// Stopped from outside, typically at a turn threshold.
    Draw,
}

/// Which kind of decision the active player faces.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    Pregame,
    Hand,
    UpCards,
    DownCards,
    Ended,
}

struct Seat {
    id: PlayerId,
    policy: Box<dyn Policy>,
}

/// Turn-taking state machine driving one game of Scheisskopf.
pub struct Game {
    config: GameConfig,
    board: Board,
    seats: Vec<Seat>,
    active: usize,
    in_pregame: bool,
    status: GameStatus,
    turns: usize,
    rejections: usize,
    rng: StdRng,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    /// Read-only access for renderers and drivers.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|seat| seat.id).collect()
    }

    pub fn active_player(&self) -> PlayerId {
        self.seats[self.active].id
    }

    pub fn in_pregame(&self) -> bool {
        self.in_pregame
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        !matches!(self.status, GameStatus::Ongoing)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Number of steps that changed the game (rejected actions are not counted).
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Consecutive rejected actions by the active player.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    pub fn phase(&self) -> TurnPhase {
        if self.is_ended() {
            return TurnPhase::Ended;
        }
        if self.in_pregame {
            return TurnPhase::Pregame;
        }
        let player = self.active_player();
        if self.board.down_cards_playable(player).unwrap_or(false) {
            TurnPhase::DownCards
        } else if self.board.up_cards_playable(player).unwrap_or(false) {
            TurnPhase::UpCards
        } else {
            TurnPhase::Hand
        }
    }

    /// Stops an unfinished game without a winner.
    pub fn declare_draw(&mut self) {
        if matches!(self.status, GameStatus::Ongoing) {
            info!(turns = self.turns, "game declared a draw");
            self.status = GameStatus::Draw;
        }
    }

    /// Performs exactly one game step: the end check, a pile trigger, or one player action.
    ///
    /// A policy decision that breaks the rules is returned as `GameError::InvalidAction`
    /// without touching the board or the turn order. After `stall_limit` such rejections in
    /// a row the game reports `GameError::Stalled` instead of asking again.
    pub fn take_turn(&mut self) -> Result<TurnOutcome, GameError> {
        if self.is_ended() {
            return Err(GameError::GameOver);
        }
        let player = self.active_player();
        if self.rejections >= self.config.stall_limit {
            return Err(GameError::Stalled {
                player,
                rejections: self.rejections,
            });
        }
        let result = self.step(player);
        match &result {
            Ok(outcome) => {
                self.turns += 1;
                self.rejections = 0;
                debug!(turn = self.turns, player, ?outcome, "turn applied");
            }
            Err(GameError::InvalidAction(reason)) => {
                self.rejections += 1;
                warn!(player, rejections = self.rejections, %reason, "policy action rejected");
            }
            Err(err) => warn!(player, %err, "turn failed"),
        }
        result
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            deck,
            policies,
        } = builder;
        if !(2..=MAX_PLAYERS).contains(&policies.len()) {
            return Err(GameError::InvalidConfiguration(format!(
                "players must be between 2 and {MAX_PLAYERS}, received {}",
                policies.len()
            )));
        }
        if config.stall_limit == 0 {
            return Err(GameError::InvalidConfiguration(String::from(
                "stall limit must be positive",
            )));
        }

        let seats: Vec<Seat> = policies
            .into_iter()
            .enumerate()
            .map(|(index, policy)| Seat {
                id: index + 1,
                policy,
            })
            .collect();
        let ids: Vec<PlayerId> = seats.iter().map(|seat| seat.id).collect();

        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = match deck {
            Some(deck) => Board::from_deck(&ids, deck)?,
            None => Board::new(&ids, &mut rng)?,
        };
        let active = match config.first_player {
            Some(first) => ids
                .iter()
                .position(|id| *id == first)
                .ok_or(GameError::UnknownPlayer(first))?,
            None => rng.gen_range(0..seats.len()),
        };

        Ok(Game {
            config,
            board,
            seats,
            active,
            in_pregame: true,
            status: GameStatus::Ongoing,
            turns: 0,
            rejections: 0,
            rng,
        })
    }

    fn step(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        if let Some(winner) = self.board.emptied_player() {
            self.advance();
            self.status = GameStatus::Finished { winner };
            info!(winner, turns = self.turns + 1, "game finished");
            return Ok(TurnOutcome::Finished { winner });
        }

        if let Some(top) = self.board.peek_pile() {
            if top.rank() == 10 || self.board.top_four_same() {
                let cleared = self.board.clear_pile();
                self.broadcast(Percept::Discard);
                self.advance();
                return Ok(TurnOutcome::PileCleared {
                    skipped: player,
                    cleared,
                });
            }
            if top.rank() == 3 {
                let threes = self.board.clear_threes()?;
                let picked_up = self.board.pile_to_hand(player)?;
                self.broadcast(Percept::Pickup { player });
                self.advance();
                return Ok(TurnOutcome::ThreesPickup {
                    player,
                    threes,
                    picked_up,
                });
            }
        }

        if self.in_pregame {
            return self.pregame_turn(player);
        }
        if self.board.down_cards_playable(player)? {
            self.down_card_turn(player)
        } else if self.board.up_cards_playable(player)? {
            self.up_card_turn(player)
        } else {
            self.hand_turn(player)
        }
    }

    fn pregame_turn(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        let hand = self.board.view_hand(player)?;
        let up_cards = self.board.view_up_cards(player)?;
        let playable = self.board.playable_hand_cards(player)?;
        let decision = self.seats[self.active]
            .policy
            .choose_swap(&hand, &up_cards, &playable);
        match decision {
            SwapDecision::Swap { up_card, hand_card } => {
                if !self.board.is_legal_swap(&up_card, &hand_card, player)? {
                    return Err(InvalidAction::IllegalSwap { up_card, hand_card }.into());
                }
                self.board.apply_swap(&up_card, &hand_card, player)?;
                self.broadcast(Percept::Swap {
                    player,
                    up_card,
                    hand_card,
                });
                self.advance();
                Ok(TurnOutcome::Swapped {
                    player,
                    up_card,
                    hand_card,
                })
            }
            SwapDecision::Play(cards) => {
                if cards.is_empty() {
                    return Err(InvalidAction::EmptyOpeningPlay.into());
                }
                let outcome = self.play_hand_cards(player, cards)?;
                self.in_pregame = false;
                Ok(outcome)
            }
        }
    }

    fn hand_turn(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        let hand = self.board.view_hand(player)?;
        let up_cards = self.board.view_up_cards(player)?;
        let playable = self.board.playable_hand_cards(player)?;
        let cards = self.seats[self.active]
            .policy
            .choose_hand_cards(&hand, &up_cards, &playable);
        if cards.is_empty() {
            if !playable.is_empty() {
                return Err(InvalidAction::EmptyPlayWithPlayableCards.into());
            }
            return self.pick_up_pile(player);
        }
        self.play_hand_cards(player, cards)
    }

    fn up_card_turn(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        let up_cards = self.board.view_up_cards(player)?;
        let playable = self.board.playable_up_cards(player)?;
        let cards = self.seats[self.active]
            .policy
            .choose_up_cards(&up_cards, &playable);
        if cards.is_empty() {
            if !playable.is_empty() {
                return Err(InvalidAction::EmptyPlayWithPlayableCards.into());
            }
            return self.pick_up_pile(player);
        }
        self.board.validate_up_card_play(&cards, player)?;
        self.board.up_cards_to_pile(player, &cards)?;
        self.broadcast(Percept::Play {
            player,
            cards: cards.clone(),
        });
        self.advance();
        Ok(TurnOutcome::Played {
            player,
            source: CardSource::UpCards,
            cards,
            drawn: 0,
        })
    }

    fn down_card_turn(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        self.seats[self.active].policy.choose_down_card();
        let prior_top = self.board.peek_pile();
        let count = self.board.view_down_cards(player)?.len();
        let index = (0..count)
            .choose(&mut self.rng)
            .ok_or(InvalidAction::DownCardIndex(0))?;
        let card = self.board.down_card_to_pile(player, index)?;
        self.broadcast(Percept::Play {
            player,
            cards: vec![card],
        });
        if !card.is_playable_on(prior_top.as_ref()) {
            let picked_up = self.board.pile_to_hand(player)?;
            self.broadcast(Percept::Pickup { player });
            self.advance();
            return Ok(TurnOutcome::DownCardFailed {
                player,
                card,
                picked_up,
            });
        }
        self.advance();
        Ok(TurnOutcome::Played {
            player,
            source: CardSource::DownCards,
            cards: vec![card],
            drawn: 0,
        })
    }

    fn play_hand_cards(
        &mut self,
        player: PlayerId,
        cards: Vec<Card>,
    ) -> Result<TurnOutcome, GameError> {
        self.board.validate_hand_card_play(&cards, player)?;
        let drawn = self.board.hand_to_pile(player, &cards)?;
        self.broadcast(Percept::Play {
            player,
            cards: cards.clone(),
        });
        self.broadcast(Percept::Draw {
            player,
            count: drawn,
        });
        self.advance();
        Ok(TurnOutcome::Played {
            player,
            source: CardSource::Hand,
            cards,
            drawn,
        })
    }

    fn pick_up_pile(&mut self, player: PlayerId) -> Result<TurnOutcome, GameError> {
        let cards = self.board.pile_to_hand(player)?;
        self.broadcast(Percept::Pickup { player });
        self.advance();
        Ok(TurnOutcome::PickedUp { player, cards })
    }

    fn broadcast(&mut self, percept: Percept) {
        trace!(kind = percept.kind(), "broadcasting percept");
        for seat in &mut self.seats {
            seat.policy.update_knowledge(&percept);
        }
    }

    fn advance(&mut self) {
        self.active = (self.active + 1) % self.seats.len();
    }
}
