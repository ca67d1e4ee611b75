//! The game board and win detection

use thiserror::Error;

use crate::{HEIGHT, WIDTH, WINDOW_LENGTH};

/// The number of distinct 4-cell windows on the board
pub const NUM_WINDOWS: usize = (WIDTH - WINDOW_LENGTH + 1) * HEIGHT
    + WIDTH * (HEIGHT - WINDOW_LENGTH + 1)
    + 2 * (WIDTH - WINDOW_LENGTH + 1) * (HEIGHT - WINDOW_LENGTH + 1);

/// Returns the cell indices of every horizontal, vertical and diagonal
/// window of `WINDOW_LENGTH` cells, shared by win detection and evaluation
pub const fn windows() -> [[usize; WINDOW_LENGTH]; NUM_WINDOWS] {
    // (column step, row step) for horizontal, vertical, positive and negative diagonals
    const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    let mut windows = [[0; WINDOW_LENGTH]; NUM_WINDOWS];
    let mut n = 0;
    let mut d = 0;
    while d < DIRECTIONS.len() {
        let (dx, dy) = DIRECTIONS[d];
        let mut row = 0;
        while row < HEIGHT as isize {
            let mut column = 0;
            while column < WIDTH as isize {
                let end_x = column + dx * (WINDOW_LENGTH as isize - 1);
                let end_y = row + dy * (WINDOW_LENGTH as isize - 1);
                if end_x < WIDTH as isize && end_y >= 0 && end_y < HEIGHT as isize {
                    let mut i = 0;
                    while i < WINDOW_LENGTH {
                        let x = column + dx * i as isize;
                        let y = row + dy * i as isize;
                        windows[n][i] = x as usize + WIDTH * y as usize;
                        i += 1;
                    }
                    n += 1;
                }
                column += 1;
            }
            row += 1;
        }
        d += 1;
    }
    windows
}

/// Precomputed window table
pub const WINDOWS: [[usize; WINDOW_LENGTH]; NUM_WINDOWS] = windows();

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Invalid move, column {column} out of range. Columns must be between 0 and {}", WIDTH - 1)]
    OutOfRange { column: usize },
    #[error("Invalid move, column {column} full")]
    ColumnFull { column: usize },
}

/// One of the two sides
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Piece {
    Player,
    Ai,
}

impl Piece {
    pub fn opponent(self) -> Self {
        match self {
            Piece::Player => Piece::Ai,
            Piece::Ai => Piece::Player,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Player,
    Ai,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::Player => Cell::Player,
            Piece::Ai => Cell::Ai,
        }
    }
}

/// A 6x7 Connect 4 grid
///
/// Boards are plain values: copying one and playing on the copy never
/// touches the original, which is how every search branch works.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Builds a board from a string of one-indexed columns, alternating
    /// pieces starting with `first`
    pub fn from_moves<S: AsRef<str>>(moves: S, first: Piece) -> anyhow::Result<Self> {
        let mut board = Self::new();
        let mut piece = first;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    board.drop_piece(column - 1, piece)?;
                    piece = piece.opponent();
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "could not parse '{}' as a valid move",
                        column_char
                    ))
                }
            }
        }
        Ok(board)
    }

    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// Number of pieces stacked in `column`
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// Lowest empty row of `column`, or `None` if the column is full
    pub fn next_open_row(&self, column: usize) -> Option<usize> {
        match self.heights.get(column) {
            Some(&height) if height < HEIGHT => Some(height),
            _ => None,
        }
    }

    pub fn is_valid_column(&self, column: usize) -> bool {
        self.next_open_row(column).is_some()
    }

    /// Playable columns in ascending order
    pub fn valid_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| self.is_valid_column(column))
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }

    /// Drops `piece` into the lowest empty row of `column`, returning that row
    pub fn drop_piece(&mut self, column: usize, piece: Piece) -> Result<usize, MoveError> {
        if column >= WIDTH {
            return Err(MoveError::OutOfRange { column });
        }
        let row = self
            .next_open_row(column)
            .ok_or(MoveError::ColumnFull { column })?;

        self.cells[column + WIDTH * row] = piece.into();
        self.heights[column] += 1;
        self.num_moves += 1;
        Ok(row)
    }

    /// Plays a move that the caller has already validated
    ///
    /// # Panics
    /// Panics if `column` is out of range or full: search code only ever
    /// plays columns taken from [`Board::valid_columns`].
    pub fn play(&mut self, column: usize, piece: Piece) -> usize {
        assert!(
            self.is_valid_column(column),
            "engine attempted to play invalid column {}",
            column
        );
        let row = self.heights[column];
        self.cells[column + WIDTH * row] = piece.into();
        self.heights[column] += 1;
        self.num_moves += 1;
        row
    }

    /// The cells of a window, in board order
    pub fn window(&self, window: &[usize; WINDOW_LENGTH]) -> [Cell; WINDOW_LENGTH] {
        let mut cells = [Cell::Empty; WINDOW_LENGTH];
        for (cell, &idx) in cells.iter_mut().zip(window.iter()) {
            *cell = self.cells[idx];
        }
        cells
    }

    /// Scans every direction for four consecutive cells of `piece`
    pub fn has_four_in_row(&self, piece: Piece) -> bool {
        let target = Cell::from(piece);
        WINDOWS
            .iter()
            .any(|window| window.iter().all(|&idx| self.cells[idx] == target))
    }

    pub fn winner(&self) -> Option<Piece> {
        [Piece::Player, Piece::Ai]
            .into_iter()
            .find(|&piece| self.has_four_in_row(piece))
    }

    /// A position is terminal once either side has won or no column is open
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// The column in which two boards differ, if any
    pub fn changed_column(&self, other: &Board) -> Option<usize> {
        (0..WIDTH).find(|&column| {
            (0..HEIGHT).any(|row| self.cell(row, column) != other.cell(row, column))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
