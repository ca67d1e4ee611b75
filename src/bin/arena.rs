//! Plays engines against each other and reports the tally

use anyhow::Result;
use clap::Parser;
use flexi_logger::Logger;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use std::time::Duration;

use connect4_duel::{
    board::Piece,
    config::{SearchConfig, Strategy},
    *,
};

/// Pit two decision engines against each other
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Engine playing the AI piece
    #[arg(long, value_enum, default_value_t = Strategy::Minimax)]
    first: Strategy,

    /// Engine playing the player piece
    #[arg(long, value_enum, default_value_t = Strategy::Mcts)]
    second: Strategy,

    /// Number of games, the engines alternate who moves first
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Seconds each engine may think per move
    #[arg(long, default_value_t = 0.5)]
    time_budget: f64,

    /// Deepest minimax pass
    #[arg(long, default_value_t = 5)]
    max_depth: usize,

    /// Base seed for MCTS rollouts, offset per game
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Outcome {
    Win(Piece),
    Draw,
}

fn play_game(args: &Args, game: usize) -> Result<Outcome> {
    let configs = [args.first, args.second].map(|strategy| {
        let mut config = SearchConfig::for_strategy(strategy)
            .with_time_budget(Duration::from_secs_f64(args.time_budget))
            .with_max_depth(args.max_depth);
        if let Some(seed) = args.seed {
            config = config.with_seed(seed.wrapping_add(game as u64));
        }
        (strategy, config)
    });

    let mut board = create_initial_board();
    let mut turn = if game % 2 == 0 { Piece::Ai } else { Piece::Player };

    loop {
        let (strategy, config) = match turn {
            Piece::Ai => &configs[0],
            Piece::Player => &configs[1],
        };
        let decision = choose_move(&board, turn, *strategy, config)?;
        apply_move(&mut board, decision.column, turn)?;

        if has_won(&board, turn) {
            return Ok(Outcome::Win(turn));
        }
        if board.is_full() {
            return Ok(Outcome::Draw);
        }
        turn = turn.opponent();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("warn")?.start()?;

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games"),
    );

    let outcomes = (0..args.games)
        .into_par_iter()
        .map(|game| {
            let outcome = play_game(&args, game);
            progress.inc(1);
            outcome
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    let count = |target: Outcome| outcomes.iter().filter(|&&o| o == target).count();
    println!("{:?} wins: {}", args.first, count(Outcome::Win(Piece::Ai)));
    println!("{:?} wins: {}", args.second, count(Outcome::Win(Piece::Player)));
    println!("Draws: {}", count(Outcome::Draw));
    Ok(())
}
