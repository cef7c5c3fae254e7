use std::io;

use anyhow::Context;
use clap::Parser;
use pocketmines_core::{Board, GameConfig, RejectionSampler};
use tracing_subscriber::filter::LevelFilter;

use session::{Session, SessionEnd};

mod command;
mod session;

#[derive(Parser, Debug)]
#[command(version, about = "Console minesweeper on a 5x5 board", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random, the same seed always hides mines in the same cells
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.tracing_level_filter())?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {}", seed);

    let board = Board::generate(GameConfig::default(), RejectionSampler::new(seed));
    let mut session = Session::new(board, io::stdin().lock(), io::stdout().lock());
    let end = session.run().context("Failed to talk to the terminal")?;

    match end {
        SessionEnd::Won | SessionEnd::Lost => log::debug!("Game finished: {:?}", end),
        SessionEnd::Abandoned => log::warn!("Game abandoned, seed {} can replay it", seed),
    }
    Ok(())
}

/// Sends `log` records from both crates to stderr so they never mix with the board on stdout.
fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Error initializing logger")
}
