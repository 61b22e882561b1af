//! Plays one board with the engine in every seat.
use anyhow::{Context, Result};
use bridge_core::board::{Board, Position};
use bridge_core::deal::Deal;
use bridge_core::io::pbn::export_hand;
use bridge_engine::{Advisor, EngineConfig, EnginePlayer, Scheduler, Table, TableResult};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deal a board and let four engine seats bid and play it")]
struct Args {
    /// Board number; sets dealer and vulnerability
    #[arg(default_value_t = 1)]
    board: u32,

    /// YAML engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the deal and the simulations
    #[arg(short, long)]
    seed: Option<u64>,

    /// Monte Carlo trials per candidate bid
    #[arg(short, long)]
    trials: Option<u32>,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    think_ms: u64,

    /// Enable verbose logging (use -vv for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(trials) = args.trials {
        config.monte_carlo.trials = trials;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let config = load_config(&args)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(args.board as u64));
    let board = Board::new(args.board, Deal::random(&mut rng));

    info!("board {} seed {seed}", board.number);
    println!(
        "Board {}  Dealer {}  Vul {:?}",
        board.number, board.dealer, board.vulnerability
    );
    for seat in Position::ALL {
        println!("  {}: {}", seat, export_hand(board.hand(seat)));
    }

    let advisor = Advisor::from_config(&config.advisor).context("failed to build advisor")?;
    let mut player = EnginePlayer::new(config).context("failed to build engine")?;
    if let Some(advisor) = advisor {
        player = player.with_advisor(advisor);
    }

    let mut table = Table::new(board).context("invalid deal")?;
    let mut scheduler =
        Scheduler::new(&Position::ALL).with_think_time(Duration::from_millis(args.think_ms));
    scheduler.schedule(&table);
    let moves = scheduler.run(&mut table, &player)?;

    println!("Auction: {}", table.auction().render());
    match table.result() {
        Some(TableResult::PassedOut) => println!("Passed out"),
        Some(TableResult::Played(result)) => println!(
            "{} by {}: {} tricks ({:?}), score {:+}",
            result.contract,
            result.contract.declarer,
            result.declarer_tricks,
            result.result,
            result.score
        ),
        None => println!("Stopped after {moves} moves"),
    }
    Ok(())
}
