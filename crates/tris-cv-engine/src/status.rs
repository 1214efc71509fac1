use serde::{Deserialize, Serialize};
use tris_cv_core::Board;

use crate::{find_winning_line, PlayerEncoding, WinningLine};

/// Where a game stands after a board reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won(WinningLine),
    /// Board full without a completed line.
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

pub fn evaluate(board: &Board, encoding: &PlayerEncoding) -> GameStatus {
    match find_winning_line(board, encoding) {
        Some(line) => GameStatus::Won(line),
        None if board.is_full() => GameStatus::Draw,
        None => GameStatus::Playing,
    }
}
