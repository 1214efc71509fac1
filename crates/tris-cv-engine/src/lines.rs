//! The eight winning lines and their products.

use serde::{Deserialize, Serialize};
use tris_cv_core::{Board, CellValue, Move, Player};

use crate::PlayerEncoding;

/// Rows, then columns, then the `↘` and `↗` diagonals.
pub const LINES: [[Move; 3]; 8] = [
    [Move::new(0, 0), Move::new(0, 1), Move::new(0, 2)],
    [Move::new(1, 0), Move::new(1, 1), Move::new(1, 2)],
    [Move::new(2, 0), Move::new(2, 1), Move::new(2, 2)],
    [Move::new(0, 0), Move::new(1, 0), Move::new(2, 0)],
    [Move::new(0, 1), Move::new(1, 1), Move::new(2, 1)],
    [Move::new(0, 2), Move::new(1, 2), Move::new(2, 2)],
    [Move::new(0, 0), Move::new(1, 1), Move::new(2, 2)],
    [Move::new(2, 0), Move::new(1, 1), Move::new(0, 2)],
];

/// A completed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine {
    pub player: Player,
    pub cells: [Move; 3],
}

/// Product of the codes of the three cells of `line`.
pub fn line_product(board: &Board, encoding: &PlayerEncoding, line: &[Move; 3]) -> u64 {
    line.iter()
        .map(|&m| u64::from(encoding.code(board.get(m))))
        .product()
}

/// First completed line in [`LINES`] order.
pub fn find_winning_line(board: &Board, encoding: &PlayerEncoding) -> Option<WinningLine> {
    LINES.iter().find_map(|line| {
        let product = line_product(board, encoding, line);
        [Player::A, Player::B]
            .into_iter()
            .find(|&p| product == encoding.completed(p))
            .map(|player| WinningLine {
                player,
                cells: *line,
            })
    })
}

/// Empty cells that would complete a line for `player`, one per open two,
/// in [`LINES`] order. A cell shared by two open lines appears twice.
pub fn open_lines(board: &Board, encoding: &PlayerEncoding, player: Player) -> Vec<Move> {
    let target = encoding.open_two(player);
    LINES
        .iter()
        .filter(|line| line_product(board, encoding, line) == target)
        .filter_map(|line| line.iter().copied().find(|&m| board.get(m) == CellValue::Empty))
        .collect()
}
