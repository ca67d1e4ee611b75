#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

    use std::time::Duration;

    use crate::{
        board::{Board, Cell, MoveError, Piece, NUM_WINDOWS, WINDOWS},
        choose_move,
        config::{Pruning, SearchConfig, Strategy, WeightPreset},
        evaluator::{self, Weights},
        greedy::GreedyEngine,
        mcts::MctsEngine,
        minimax::{MinimaxEngine, WIN_SCORE},
        EngineError, SearchStats, HEIGHT, WIDTH,
    };

    // builds a board from rows given bottom to top, 'A' for the AI, 'P' for the player
    fn board_from_rows(rows: &[&str]) -> Result<Board> {
        let mut board = Board::new();
        for row in rows {
            for (column, c) in row.chars().enumerate() {
                match c {
                    'A' => {
                        board.drop_piece(column, Piece::Ai)?;
                    }
                    'P' => {
                        board.drop_piece(column, Piece::Player)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(board)
    }

    // AI holds row 0 columns 0-2 with column 3 open, the player sits on top of it
    fn open_three() -> Result<Board> {
        board_from_rows(&["AAA....", "PP....."])
    }

    // a full grid without any four-in-a-row
    fn drawn_board() -> Result<Board> {
        board_from_rows(&[
            "AAPPAAP", "AAPPAAP", "AAPPAAP", "PPAAPPA", "AAPPAAP", "AAPPAAP",
        ])
    }

    fn minimax_config(depth: usize) -> SearchConfig {
        SearchConfig::for_strategy(Strategy::Minimax)
            .with_time_budget(Duration::from_secs(3600))
            .with_max_depth(depth)
    }

    fn mcts_config(iterations: u32, seed: u64) -> SearchConfig {
        SearchConfig::for_strategy(Strategy::Mcts)
            .with_time_budget(Duration::from_secs(3600))
            .with_max_iterations(iterations)
            .with_seed(seed)
    }

    #[test]
    pub fn window_table() {
        assert_eq!(NUM_WINDOWS, 69);
        for window in WINDOWS.iter() {
            assert!(window.iter().all(|&idx| idx < WIDTH * HEIGHT));
        }
        // bottom-left horizontal, vertical and both diagonals
        assert_eq!(WINDOWS[0], [0, 1, 2, 3]);
        assert!(WINDOWS.contains(&[0, 7, 14, 21]));
        assert!(WINDOWS.contains(&[0, 8, 16, 24]));
        assert!(WINDOWS.contains(&[21, 15, 9, 3]));
    }

    #[test]
    pub fn drop_stacks_pieces() -> Result<()> {
        let mut board = Board::new();
        for expected_row in 0..HEIGHT {
            assert_eq!(board.next_open_row(2), Some(expected_row));
            let height = board.height(2);
            let row = board.drop_piece(2, Piece::Ai)?;
            assert_eq!(row, expected_row);
            assert_eq!(board.height(2), height + 1);
        }
        assert_eq!(board.next_open_row(2), None);
        for _ in 0..3 {
            assert!(!board.is_valid_column(2));
        }
        assert_eq!(
            board.drop_piece(2, Piece::Player),
            Err(MoveError::ColumnFull { column: 2 })
        );
        assert_eq!(
            board.drop_piece(WIDTH, Piece::Player),
            Err(MoveError::OutOfRange { column: WIDTH })
        );
        assert!(!board.is_valid_column(WIDTH));
        Ok(())
    }

    #[test]
    #[should_panic]
    pub fn play_full_column_panics() {
        let mut board = Board::new();
        for _ in 0..=HEIGHT {
            board.play(0, Piece::Ai);
        }
    }

    #[test]
    pub fn copies_are_independent() -> Result<()> {
        let original = Board::from_moves("4453", Piece::Player)?;
        let snapshot = original;
        let mut copy = original;
        copy.play(0, Piece::Ai);

        assert_eq!(original, snapshot);
        assert_ne!(original, copy);
        assert_eq!(original.cell(0, 0), Cell::Empty);
        assert_eq!(copy.cell(0, 0), Cell::Ai);
        assert_eq!(original.changed_column(&copy), Some(0));
        Ok(())
    }

    #[test]
    pub fn from_moves_rejects_bad_input() {
        assert!(Board::from_moves("8", Piece::Ai).is_err());
        assert!(Board::from_moves("x", Piece::Ai).is_err());
        assert!(Board::from_moves("1111111", Piece::Ai).is_err());
    }

    #[test]
    pub fn detects_every_direction() -> Result<()> {
        let horizontal = board_from_rows(&["..PPPP."])?;
        let vertical = Board::from_moves("1212121", Piece::Ai)?;
        let positive = board_from_rows(&["APPP", ".APP", "..AP", "...A"])?;
        let negative = board_from_rows(&["PPPA", "PPA.", "PA..", "A..."])?;

        assert!(horizontal.has_four_in_row(Piece::Player));
        assert!(!horizontal.has_four_in_row(Piece::Ai));
        assert!(vertical.has_four_in_row(Piece::Ai));
        assert!(positive.has_four_in_row(Piece::Ai));
        assert!(negative.has_four_in_row(Piece::Ai));
        for board in [horizontal, vertical, positive, negative].iter() {
            assert!(board.is_terminal());
        }
        assert!(!Board::from_moves("121212", Piece::Ai)?.is_terminal());
        Ok(())
    }

    #[test]
    pub fn random_games_never_have_two_winners() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let mut board = Board::new();
            let mut piece = Piece::Player;
            while !board.is_terminal() {
                let column = board.valid_columns().choose(&mut rng).unwrap();
                board.play(column, piece);
                piece = piece.opponent();
                assert!(
                    !(board.has_four_in_row(Piece::Player) && board.has_four_in_row(Piece::Ai))
                );
            }
        }
    }

    #[test]
    pub fn full_board_is_a_draw() -> Result<()> {
        let board = drawn_board()?;
        assert!(board.is_full());
        assert!(board.is_terminal());
        assert_eq!(board.winner(), None);
        assert_eq!(board.valid_columns().count(), 0);

        let mut engine = MinimaxEngine::new(Piece::Ai, &minimax_config(4));
        assert_eq!(engine.evaluate(&board), 0);
        assert_eq!(engine.search(&board, 3, i64::MIN, i64::MAX, true), (None, 0));

        for strategy in [Strategy::Greedy, Strategy::Minimax, Strategy::Mcts].iter() {
            assert_eq!(
                choose_move(&board, Piece::Ai, *strategy, &SearchConfig::default()),
                Err(EngineError::NoLegalMoves)
            );
        }
        Ok(())
    }

    #[test]
    pub fn evaluator_presets() -> Result<()> {
        assert_eq!(Weights::from(WeightPreset::Minimax), Weights::MINIMAX);
        assert_eq!(Weights::from(WeightPreset::Greedy), Weights::GREEDY);

        let empty = Board::new();
        assert_eq!(evaluator::score(&empty, Piece::Ai, &Weights::MINIMAX), 0);

        // one center piece: center bonus only
        let center = board_from_rows(&["...A..."])?;
        assert_eq!(evaluator::score(&center, Piece::Ai, &Weights::MINIMAX), 3);
        assert_eq!(evaluator::score(&center, Piece::Player, &Weights::MINIMAX), 0);

        // two adjacent pieces on the bottom row, neither in the center
        let pair = board_from_rows(&["AA....."])?;
        assert_eq!(evaluator::score(&pair, Piece::Ai, &Weights::MINIMAX), 2);
        assert_eq!(evaluator::score(&pair, Piece::Ai, &Weights::GREEDY), 5);

        // an open three for the opponent is penalised
        let threat = board_from_rows(&["PPP...."])?;
        assert_eq!(evaluator::score(&threat, Piece::Ai, &Weights::MINIMAX), -4);
        assert_eq!(evaluator::score(&threat, Piece::Ai, &Weights::GREEDY), -80);
        Ok(())
    }

    #[test]
    pub fn evaluator_is_deterministic() -> Result<()> {
        let board = Board::from_moves("4435261", Piece::Ai)?;
        let first = evaluator::score(&board, Piece::Ai, &Weights::MINIMAX);
        for _ in 0..10 {
            assert_eq!(evaluator::score(&board, Piece::Ai, &Weights::MINIMAX), first);
        }
        Ok(())
    }

    #[test]
    pub fn greedy_ties_go_to_lowest_column() -> Result<()> {
        // with the center column full, columns 1, 2, 4 and 5 score the same
        let board = board_from_rows(&[
            "...A...", "...P...", "...A...", "...P...", "...A...", "...P...",
        ])?;
        let engine = GreedyEngine::new(WeightPreset::Greedy);
        let decision = engine.select_move(&board, Piece::Ai).unwrap();

        let scores: Vec<i32> = board
            .valid_columns()
            .map(|column| {
                let mut next = board;
                next.play(column, Piece::Ai);
                evaluator::score(&next, Piece::Ai, &Weights::GREEDY)
            })
            .collect();
        let best = *scores.iter().max().unwrap();
        let first_best = scores.iter().position(|&s| s == best).unwrap();

        assert_eq!(scores.iter().filter(|&&s| s == best).count(), 4);
        assert_eq!(decision.column, 1);
        assert_eq!(first_best, 1);
        assert_eq!(decision.nodes, WIDTH - 1);
        assert_eq!(decision.stats, SearchStats::Greedy { score: best });
        Ok(())
    }

    #[test]
    pub fn greedy_blocks_open_three() -> Result<()> {
        let board = board_from_rows(&["PPP...."])?;
        let engine = GreedyEngine::new(WeightPreset::Greedy);
        assert_eq!(engine.select_move(&board, Piece::Ai).unwrap().column, 3);
        Ok(())
    }

    #[test]
    pub fn greedy_takes_win() -> Result<()> {
        let engine = GreedyEngine::new(WeightPreset::Greedy);
        assert_eq!(engine.select_move(&open_three()?, Piece::Ai).unwrap().column, 3);
        Ok(())
    }

    #[test]
    pub fn minimax_completes_open_three() -> Result<()> {
        for depth in 1..=4 {
            let mut engine = MinimaxEngine::new(Piece::Ai, &minimax_config(depth));
            let decision = engine.select_move(&open_three()?).unwrap();
            assert_eq!(decision.column, 3);
            assert_eq!(decision.stats, SearchStats::Minimax { score: WIN_SCORE, depth });
        }
        Ok(())
    }

    #[test]
    pub fn minimax_blocks_open_three() -> Result<()> {
        let board = board_from_rows(&["PPP...A", "A......"])?;
        let mut engine = MinimaxEngine::new(Piece::Ai, &minimax_config(2));
        assert_eq!(engine.select_move(&board).unwrap().column, 3);
        Ok(())
    }

    #[test]
    pub fn minimax_prefers_center_on_empty_board() {
        let mut engine = MinimaxEngine::new(Piece::Ai, &minimax_config(4));
        let decision = engine.select_move(&Board::new()).unwrap();
        assert_eq!(decision.column, 3);
        assert!(decision.nodes > 0);
    }

    #[test]
    pub fn pruning_does_not_change_result() -> Result<()> {
        let positions = [
            Board::new(),
            Board::from_moves("4453", Piece::Player)?,
            Board::from_moves("44455362", Piece::Ai)?,
            open_three()?,
        ];
        for board in positions.iter() {
            for depth in 1..=4 {
                let mut pruned = MinimaxEngine::new(Piece::Ai, &minimax_config(depth));
                let mut full = MinimaxEngine::new(
                    Piece::Ai,
                    &minimax_config(depth).with_pruning(Pruning::Disabled),
                );
                let a = pruned.search(board, depth, i64::MIN, i64::MAX, true);
                let b = full.search(board, depth, i64::MIN, i64::MAX, true);
                assert_eq!(a, b);
                assert!(pruned.node_count <= full.node_count);
            }
        }
        Ok(())
    }

    #[test]
    pub fn minimax_handles_single_legal_column() -> Result<()> {
        // every column but the last is full
        let drawn = drawn_board()?;
        let mut board = Board::new();
        for row in 0..HEIGHT {
            for column in 0..WIDTH - 1 {
                let piece = match drawn.cell(row, column) {
                    Cell::Ai => Piece::Ai,
                    _ => Piece::Player,
                };
                board.drop_piece(column, piece)?;
            }
        }
        assert_eq!(board.valid_columns().collect::<Vec<_>>(), vec![WIDTH - 1]);

        for strategy in [Strategy::Greedy, Strategy::Minimax, Strategy::Mcts].iter() {
            let config = SearchConfig::for_strategy(*strategy)
                .with_time_budget(Duration::from_millis(200))
                .with_max_depth(3)
                .with_max_iterations(200)
                .with_seed(1);
            let decision = choose_move(&board, Piece::Ai, *strategy, &config)?;
            assert_eq!(decision.column, WIDTH - 1);
        }
        Ok(())
    }

    #[test]
    pub fn minimax_respects_time_budget() {
        let config = SearchConfig::for_strategy(Strategy::Minimax)
            .with_time_budget(Duration::from_millis(0))
            .with_max_depth(12);
        let mut engine = MinimaxEngine::new(Piece::Ai, &config);
        let decision = engine.select_move(&Board::new()).unwrap();

        // no pass starts, the lowest valid column is played
        assert_eq!(decision.column, 0);
        assert_eq!(decision.nodes, 0);
    }

    #[test]
    pub fn mcts_takes_forced_win() -> Result<()> {
        let board = open_three()?;
        let mut engine = MctsEngine::new(Piece::Ai, &mcts_config(5000, 7));
        let decision = engine.select_move(&board).unwrap();

        assert_eq!(decision.column, 3);
        match decision.stats {
            SearchStats::Mcts { iterations, mean, .. } => {
                assert_eq!(iterations, 5000);
                assert!((mean - 1.0).abs() < 1e-9);
            }
            stats => panic!("unexpected stats {:?}", stats),
        }

        let mut minimax = MinimaxEngine::new(Piece::Ai, &minimax_config(4));
        assert_eq!(minimax.select_move(&board).unwrap().column, decision.column);
        Ok(())
    }

    #[test]
    pub fn mcts_blocks_open_three() -> Result<()> {
        let board = board_from_rows(&["PPP...A", "A......"])?;
        let mut engine = MctsEngine::new(Piece::Ai, &mcts_config(10000, 11));
        assert_eq!(engine.select_move(&board).unwrap().column, 3);
        Ok(())
    }

    #[test]
    pub fn mcts_is_reproducible_with_seed() -> Result<()> {
        let board = Board::from_moves("4453", Piece::Player)?;
        let mut a = MctsEngine::new(Piece::Ai, &mcts_config(2000, 99));
        let mut b = MctsEngine::new(Piece::Ai, &mcts_config(2000, 99));
        assert_eq!(a.select_move(&board), b.select_move(&board));
        Ok(())
    }

    #[test]
    pub fn mcts_terminal_root_returns_valid_column() -> Result<()> {
        // the player has already won but columns remain open
        let board = board_from_rows(&["PPPP...", "AAA...."])?;
        let mut engine = MctsEngine::new(Piece::Ai, &mcts_config(100, 3));
        let decision = engine.select_move(&board).unwrap();

        assert_eq!(decision.column, 0);
        assert!(board.is_valid_column(decision.column));
        assert_eq!(decision.nodes, 1);
        Ok(())
    }

    #[test]
    pub fn choose_move_leaves_board_untouched() -> Result<()> {
        let board = Board::from_moves("4435", Piece::Player)?;
        let snapshot = board;
        for strategy in [Strategy::Greedy, Strategy::Minimax, Strategy::Mcts].iter() {
            let config = SearchConfig::for_strategy(*strategy)
                .with_time_budget(Duration::from_secs(60))
                .with_max_depth(3)
                .with_max_iterations(500)
                .with_seed(5);
            let decision = choose_move(&board, Piece::Ai, *strategy, &config)?;
            assert!(board.is_valid_column(decision.column));
            assert_eq!(board, snapshot);
        }
        Ok(())
    }
}
