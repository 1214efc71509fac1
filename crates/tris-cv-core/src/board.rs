use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of the playing grid.
pub const GRID_SIZE: usize = 3;

/// Content of one grid cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    /// Circle mark.
    PlayerA,
    /// Cross mark.
    PlayerB,
}

impl CellValue {
    /// Console symbol: `O`, `X`, or a blank.
    pub fn symbol(self) -> char {
        match self {
            CellValue::Empty => ' ',
            CellValue::PlayerA => 'O',
            CellValue::PlayerB => 'X',
        }
    }

    pub fn player(self) -> Option<Player> {
        match self {
            CellValue::Empty => None,
            CellValue::PlayerA => Some(Player::A),
            CellValue::PlayerB => Some(Player::B),
        }
    }
}

/// One of the two sides.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Plays circles.
    A,
    /// Plays crosses.
    B,
}

impl Player {
    pub fn cell(self) -> CellValue {
        match self {
            Player::A => CellValue::PlayerA,
            Player::B => CellValue::PlayerB,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cell().symbol())
    }
}

/// A grid position, `row` and `col` in `0..3`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Move {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 3×3 row-major grid; every cell always holds a value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[CellValue; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: [[CellValue; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[CellValue; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// # Panics
    /// If `m` lies outside the grid.
    #[inline]
    pub fn get(&self, m: Move) -> CellValue {
        self.cells[m.row][m.col]
    }

    /// # Panics
    /// If `m` lies outside the grid.
    #[inline]
    pub fn set(&mut self, m: Move, value: CellValue) {
        self.cells[m.row][m.col] = value;
    }

    /// Copy of the board with one extra cell assigned.
    pub fn with_move(&self, m: Move, value: CellValue) -> Self {
        let mut next = *self;
        next.set(m, value);
        next
    }

    /// All positions in row-major order.
    pub fn positions() -> impl Iterator<Item = Move> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Move { row, col }))
    }

    /// Empty positions in row-major order.
    pub fn empty_cells(&self) -> Vec<Move> {
        Self::positions()
            .filter(|&m| self.get(m) == CellValue::Empty)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c != CellValue::Empty)
    }

    pub fn count(&self, value: CellValue) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == value).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        write!(f, "------")
    }
}
