//! Repeated self-play between policy specs, the way the experiment runner drives the engine.
//!
//! A game that reaches the turn threshold, or whose policies stall, counts as a draw.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::PlayerId;
use crate::error::GameError;
use crate::game::{Game, GameBuilder};
use crate::policies::registry::label_for_spec;

pub const DEFAULT_THRESHOLD: usize = 5000;

/// Result of driving one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub winner: Option<PlayerId>,
    /// Calls made to `take_turn`, rejected ones included.
    pub turns: usize,
    pub stalled: bool,
}

/// Calls `take_turn` until the game ends or `max_turns` calls have been made.
pub fn play_to_completion(game: &mut Game, max_turns: usize) -> Result<GameRecord, GameError> {
    let mut turns = 0usize;
    let mut stalled = false;
    while !game.is_ended() {
        if turns >= max_turns {
            game.declare_draw();
            break;
        }
        turns += 1;
        match game.take_turn() {
            Ok(_) | Err(GameError::InvalidAction(_)) => {}
            Err(GameError::Stalled { .. }) => {
                stalled = true;
                game.declare_draw();
            }
            Err(err) => return Err(err),
        }
    }
    Ok(GameRecord {
        winner: game.winner(),
        turns,
        stalled,
    })
}

/// Game-length statistics over a set of trials.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// Mean of the two middle values for an even number of games.
    pub median: f64,
}

impl TurnStats {
    pub fn from_turns(turns: &[usize]) -> Option<Self> {
        if turns.is_empty() {
            return None;
        }
        let mut sorted = turns.to_vec();
        sorted.sort_unstable();
        let len = sorted.len();
        let median = if len % 2 == 0 {
            (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
        } else {
            sorted[len / 2] as f64
        };
        Some(Self {
            min: sorted[0],
            max: sorted[len - 1],
            mean: sorted.iter().sum::<usize>() as f64 / len as f64,
            median,
        })
    }
}

/// Aggregate outcome of an experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub trials: usize,
    pub labels: Vec<String>,
    pub draws: usize,
    /// Wins indexed by seat (seat 1 at index 0).
    pub wins: Vec<usize>,
    pub turn_stats: Option<TurnStats>,
}

impl ExperimentSummary {
    pub fn draw_rate(&self) -> f64 {
        ratio(self.draws, self.trials)
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        let wins = player
            .checked_sub(1)
            .and_then(|index| self.wins.get(index))
            .copied()
            .unwrap_or(0);
        ratio(wins, self.trials)
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Plays `trials` games between the same seating of policy specs.
#[derive(Clone, Debug)]
pub struct Experiment {
    pub trials: usize,
    pub specs: Vec<String>,
    pub seed: u64,
    pub threshold: usize,
}

impl Experiment {
    pub fn new(specs: Vec<String>, trials: usize, seed: u64) -> Self {
        Self {
            trials,
            specs,
            seed,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn run(&self) -> Result<ExperimentSummary, GameError> {
        self.run_with_progress(|_, _| {})
    }

    /// Runs every trial, calling `on_trial` with the 1-based trial number after each game.
    pub fn run_with_progress<F>(&self, mut on_trial: F) -> Result<ExperimentSummary, GameError>
    where
        F: FnMut(usize, &GameRecord),
    {
        if self.trials == 0 {
            return Err(GameError::InvalidConfiguration(String::from(
                "experiment needs at least one trial",
            )));
        }
        if self.specs.iter().any(|spec| label_for_spec(spec) == "human") {
            return Err(GameError::InvalidConfiguration(String::from(
                "human players are not supported in experiments",
            )));
        }

        info!(
            players = ?self.specs,
            trials = self.trials,
            threshold = self.threshold,
            "running experiment"
        );
        let mut wins = vec![0usize; self.specs.len()];
        let mut draws = 0usize;
        let mut turns = Vec::with_capacity(self.trials);
        for trial in 1..=self.trials {
            let game_seed = mix_seed(self.seed, trial as u64, 0x5EED_15);
            let mut game = GameBuilder::new()
                .with_seed(game_seed)
                .with_specs(&self.specs)?
                .build()?;
            let record = play_to_completion(&mut game, self.threshold)?;
            debug!(trial, ?record, "trial finished");
            match record.winner {
                Some(winner) => {
                    if let Some(count) = wins.get_mut(winner - 1) {
                        *count += 1;
                    }
                }
                None => draws += 1,
            }
            turns.push(record.turns);
            on_trial(trial, &record);
        }

        Ok(ExperimentSummary {
            trials: self.trials,
            labels: self.specs.iter().map(|spec| label_for_spec(spec)).collect(),
            draws,
            wins,
            turn_stats: TurnStats::from_turns(&turns),
        })
    }
}

/// Derives independent per-trial seeds from one base seed.
pub fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
