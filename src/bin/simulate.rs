use std::error::Error;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scheisskopf::{
    GameBuilder, GameError, VisualOptions, describe_outcome, render_game_with_options,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;
const HUMAN_STALL_LIMIT: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play a single game of Scheisskopf between policies.")]
struct Args {
    /// Show the board and each step's outcome
    #[arg(long)]
    visualize: bool,

    /// Reveal down cards when visualizing
    #[arg(long)]
    reveal: bool,

    /// Seed for shuffling, the starting player and down-card flips
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Stop after the specified number of turns and call the game a draw
    #[arg(long = "max-turns")]
    max_turns: Option<usize>,

    /// Player specs: human[:name], random[:seed], greedy, heuristic (2-5 total)
    players: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scheisskopf=info")),
        )
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let players = if args.players.is_empty() {
        vec![String::from("human"), String::from("heuristic")]
    } else {
        args.players
    };
    let has_human = players
        .iter()
        .any(|spec| spec.to_ascii_lowercase().starts_with("human"));

    let mut builder = GameBuilder::new().with_seed(args.seed);
    if has_human {
        // People mistype; closed stdin still ends in a stall.
        builder = builder.with_stall_limit(HUMAN_STALL_LIMIT);
    }
    let mut game = builder.with_specs(&players)?.build()?;
    let options = VisualOptions {
        reveal_down_cards: args.reveal,
        ..VisualOptions::default()
    };

    println!(
        "Starting Scheisskopf with {} players: {}\n",
        players.len(),
        players.join(" vs ")
    );
    let mut turns = 0usize;
    while !game.is_ended() {
        if let Some(limit) = args.max_turns {
            if turns >= limit {
                println!("Max turn limit {limit} reached. Calling the game a draw.");
                game.declare_draw();
                break;
            }
        }
        if args.visualize {
            println!("{}", render_game_with_options(&game, options));
        }
        turns += 1;
        match game.take_turn() {
            Ok(outcome) => {
                if args.visualize || has_human {
                    println!("{}\n", describe_outcome(&outcome));
                }
            }
            Err(GameError::InvalidAction(reason)) => {
                println!("Rejected: {reason}. Try again.");
            }
            Err(err) => return Err(err.into()),
        }
    }

    match game.winner() {
        Some(winner) => println!("Game finished after {turns} turns. Winner: Player {winner}."),
        None => println!("Game stopped after {turns} turns without a winner."),
    }
    Ok(())
}
