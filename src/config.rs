//! Tunable parameters shared by the decision engines

use clap::ValueEnum;

use std::time::Duration;

/// Wall-clock budget given to the time-bounded engines per move
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(5);
/// Deepest pass attempted by iterative deepening
pub const DEFAULT_MAX_DEPTH: usize = 9;
/// UCT exploration constant
pub const DEFAULT_EXPLORATION: f64 = 2.0;

/// Which decision engine to run
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    Greedy,
    Minimax,
    Mcts,
}

/// Named heuristic tunings, see [`crate::evaluator::Weights`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum WeightPreset {
    Minimax,
    Greedy,
}

/// Whether minimax cuts off branches that cannot change the result
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Pruning {
    AlphaBeta,
    Disabled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    pub time_budget: Duration,
    pub max_depth: usize,
    pub exploration: f64,
    pub weights: WeightPreset,
    /// Upper bound on MCTS playouts, independent of the time budget
    pub max_iterations: Option<u32>,
    /// Seed for MCTS rollouts, entropy is used when absent
    pub seed: Option<u64>,
    pub pruning: Pruning,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            max_depth: DEFAULT_MAX_DEPTH,
            exploration: DEFAULT_EXPLORATION,
            weights: WeightPreset::Minimax,
            max_iterations: None,
            seed: None,
            pruning: Pruning::AlphaBeta,
        }
    }
}

impl SearchConfig {
    /// Default configuration with the weight preset `strategy` was tuned with
    pub fn for_strategy(strategy: Strategy) -> Self {
        let weights = match strategy {
            Strategy::Greedy => WeightPreset::Greedy,
            Strategy::Minimax | Strategy::Mcts => WeightPreset::Minimax,
        };
        Self {
            weights,
            ..Self::default()
        }
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_weights(mut self, weights: WeightPreset) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }
}
