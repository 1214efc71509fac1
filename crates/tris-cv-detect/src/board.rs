use serde::{Deserialize, Serialize};
use tris_cv_core::{Board, GrayImageView, Move, GRID_SIZE};

use crate::classify::{classify_cell, CellClassification};
use crate::ClassifierParams;

/// Board read from one rectified frame, plus the per-cell measurements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardReading {
    pub board: Board,
    /// Row-major, `cells[row * 3 + col]`.
    pub cells: [CellClassification; GRID_SIZE * GRID_SIZE],
}

impl BoardReading {
    pub fn cell(&self, m: Move) -> &CellClassification {
        &self.cells[m.row * GRID_SIZE + m.col]
    }
}

/// Classify all nine cells of a rectified board.
///
/// The board is rebuilt from scratch; nothing is carried over from earlier
/// frames.
pub fn read_board(rect: &GrayImageView<'_>, params: &ClassifierParams) -> BoardReading {
    let cells: [CellClassification; GRID_SIZE * GRID_SIZE] =
        std::array::from_fn(|i| classify_cell(rect, i / GRID_SIZE, i % GRID_SIZE, params));
    let mut board = Board::new();
    for (m, c) in Board::positions().zip(&cells) {
        board.set(m, c.value);
    }
    BoardReading { board, cells }
}

/// [`read_board`] without the measurements.
pub fn build_board(rect: &GrayImageView<'_>, params: &ClassifierParams) -> Board {
    read_board(rect, params).board
}
