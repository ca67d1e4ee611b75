use anyhow::Result;
use clap::Parser;
use flexi_logger::Logger;
use rand::Rng;

use std::io::{stdin, stdout, Write};
use std::time::Duration;

use connect4_duel::{
    board::{Board, Piece},
    config::{Pruning, SearchConfig, Strategy, WeightPreset},
    *,
};

mod display;
use display::display;

/// Play Connect 4 against a search engine
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Decision engine the computer plays with
    #[arg(long, value_enum, default_value_t = Strategy::Minimax)]
    strategy: Strategy,

    /// Seconds the engine may think per move
    #[arg(long, default_value_t = 5.0)]
    time_budget: f64,

    /// Deepest minimax pass
    #[arg(long, default_value_t = config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// UCT exploration constant
    #[arg(long, default_value_t = config::DEFAULT_EXPLORATION)]
    exploration: f64,

    /// Heuristic weights, defaults to the preset tuned for the chosen strategy
    #[arg(long, value_enum)]
    weights: Option<WeightPreset>,

    /// Cap on MCTS playouts per move
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Seed for MCTS rollouts
    #[arg(long)]
    seed: Option<u64>,

    /// Search every minimax branch instead of pruning
    #[arg(long)]
    no_pruning: bool,

    /// Let the computer move first
    #[arg(long, conflicts_with = "human_first")]
    ai_first: bool,

    /// Let the human move first
    #[arg(long)]
    human_first: bool,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::for_strategy(self.strategy)
            .with_time_budget(Duration::from_secs_f64(self.time_budget))
            .with_max_depth(self.max_depth)
            .with_exploration(self.exploration);
        if let Some(weights) = self.weights {
            config = config.with_weights(weights);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.no_pruning {
            config = config.with_pruning(Pruning::Disabled);
        }
        config
    }
}

fn read_human_move(board: &Board) -> Result<usize> {
    let stdin = stdin();
    loop {
        print!("Move input (1-{}) > ", WIDTH);
        stdout().flush().expect("Failed to flush to stdout!");
        let mut input_str = String::new();
        if stdin.read_line(&mut input_str)? == 0 {
            anyhow::bail!("input closed");
        }

        match input_str.trim().parse::<usize>() {
            Ok(column @ 1..=WIDTH) if is_valid_column(board, column - 1) => return Ok(column - 1),
            Ok(column @ 1..=WIDTH) => println!("Invalid move, column {} full", column),
            _ => println!("Invalid number: {}", input_str.trim()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("warn")?.start()?;
    let config = args.search_config();

    let mut board = create_initial_board();
    let mut turn = if args.ai_first {
        Piece::Ai
    } else if args.human_first {
        Piece::Player
    } else if rand::thread_rng().gen_bool(0.5) {
        Piece::Ai
    } else {
        Piece::Player
    };

    println!("Welcome to Connect 4\n");

    // game loop
    loop {
        display(&board).expect("Failed to draw board!");

        let column = match turn {
            Piece::Ai => {
                println!("AI is thinking...");
                stdout().flush().expect("Failed to flush to stdout!");

                let decision = choose_move(&board, Piece::Ai, args.strategy, &config)?;
                println!(
                    "Total nodes searched: {}, {:?}",
                    decision.nodes, decision.stats
                );
                println!("Best move: {}", decision.column + 1);
                decision.column
            }
            Piece::Player => read_human_move(&board)?,
        };

        if let Err(err) = apply_move(&mut board, column, turn) {
            println!("{}", err);
            // try the move again
            continue;
        }

        if has_won(&board, turn) {
            display(&board).expect("Failed to draw board!");
            match turn {
                Piece::Player => println!("Player wins!"),
                Piece::Ai => println!("AI wins!"),
            }
            break;
        }
        if board.is_full() {
            display(&board).expect("Failed to draw board!");
            println!("Draw!");
            break;
        }
        turn = turn.opponent();
    }
    Ok(())
}
