use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use plotters::prelude::*;
use tracing_subscriber::EnvFilter;

use scheisskopf::experiment::DEFAULT_THRESHOLD;
use scheisskopf::{Experiment, ExperimentSummary};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(
    name = "experiment",
    about = "Run repeated self-play games and report win rates and game lengths."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 't', long = "trials", default_value_t = 1000)]
    trials: usize,

    /// Base RNG seed (deck, starting player and policy RNGs are derived from it)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Turn count after which a game is stopped and scored as a draw
    #[arg(long = "threshold", default_value_t = DEFAULT_THRESHOLD)]
    threshold: usize,

    /// Write a PNG bar chart of the win rates to this path
    #[arg(long = "chart")]
    chart: Option<PathBuf>,

    /// Player specs in seat order, e.g. greedy random
    players: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scheisskopf=warn")),
        )
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.players.len() < 2 {
        return Err("please provide at least two player specs (e.g., greedy random)".into());
    }

    println!("##############################");
    println!("RUNNING EXPERIMENT: {}", args.players.join(" vs. "));
    println!("Number of trials: {}", args.trials);
    println!("Draw threshold: {}", args.threshold);
    println!("##############################\n");

    let experiment = Experiment::new(args.players.clone(), args.trials, args.seed)
        .with_threshold(args.threshold);
    let tenth = (args.trials / 10).max(1);
    let summary = experiment.run_with_progress(|trial, _| {
        if trial < args.trials && trial % tenth == 0 {
            println!("Experiment progress: {}%", trial * 100 / args.trials);
        }
    })?;

    print_summary(&summary);

    if let Some(path) = &args.chart {
        render_bar_chart(path, &summary)?;
        println!("\nChart written to {}", path.display());
    }
    Ok(())
}

fn print_summary(summary: &ExperimentSummary) {
    println!("\n##############################");
    println!("SUMMARY STATISTICS:");
    println!("##############################");
    println!("Draw rate: {:.4}", summary.draw_rate());
    for (index, label) in summary.labels.iter().enumerate() {
        let player = index + 1;
        println!(
            "Player {player} ({label}) win rate: {:.4}",
            summary.win_rate(player)
        );
    }
    if let Some(stats) = summary.turn_stats {
        println!();
        println!("Least number of turns: {}", stats.min);
        println!("Greatest number of turns: {}", stats.max);
        println!("Average number of turns: {:.2}", stats.mean);
        println!("Median number of turns: {}", stats.median);
    }
}

fn render_bar_chart(out: &PathBuf, summary: &ExperimentSummary) -> Result<(), Box<dyn Error>> {
    let mut labels: Vec<String> = summary
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| format!("P{} {label}", index + 1))
        .collect();
    let mut values: Vec<f64> = (1..=summary.labels.len())
        .map(|player| summary.win_rate(player) * 100.0)
        .collect();
    labels.push(String::from("draw"));
    values.push(summary.draw_rate() * 100.0);

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Scheisskopf Win Rates", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), 0.0f64..100.0)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Rate (%)")
        .x_desc("Outcome")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| {
            if *idx < labels.len() {
                labels[*idx].clone()
            } else {
                idx.to_string()
            }
        })
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    for (i, value) in values.iter().enumerate() {
        let rect = Rectangle::new([(i, 0.0), (i + 1, *value)], BLUE.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
