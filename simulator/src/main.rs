//! House-edge report over every engine game.
//!
//! Runs the Monte Carlo harness and prints per-game RTP and house edge,
//! either as an aligned table or as JSON.

use anyhow::Context;
use clap::Parser;
use greenfelt_simulator::{seed_from_u64, simulate, GameReport, SimConfig};
use greenfelt_types::casino::GameType;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "greenfelt-simulator")]
#[command(about = "Estimate per-game return-to-player for the greenfelt engine")]
struct Args {
    /// Trials per game
    #[arg(long, default_value_t = 10_000)]
    trials: u64,

    /// Stake per trial, in chips
    #[arg(long, default_value_t = 10_000)]
    bet: u64,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulate a single game (e.g. "dice"); all games when omitted
    #[arg(long)]
    game: Option<String>,

    /// Emit the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SimConfig {
        trials: args.trials,
        bet: args.bet,
        seed: seed_from_u64(args.seed),
    };

    let games: Vec<GameType> = match &args.game {
        Some(id) => vec![id
            .parse()
            .with_context(|| format!("unknown game '{}'", id))?],
        None => GameType::all().to_vec(),
    };

    let mut reports = Vec::with_capacity(games.len());
    for game in games {
        info!(game = %game, trials = config.trials, "simulating");
        reports.push(simulate(game, &config));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&reports);
    }
    Ok(())
}

fn print_table(reports: &[GameReport]) {
    println!(
        "{:<10} {:>9} {:>8} {:>8} {:>8} {:>8} {:>10}",
        "game", "trials", "wins", "pushes", "losses", "rtp", "house edge"
    );
    for r in reports {
        println!(
            "{:<10} {:>9} {:>8} {:>8} {:>8} {:>7.2}% {:>9.2}%",
            r.game,
            r.trials,
            r.wins,
            r.pushes,
            r.losses,
            r.rtp * 100.0,
            r.house_edge * 100.0
        );
    }
}
