use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tris_cv_core::{Board, Move, Player};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{line_product, PlayerEncoding, LINES};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("no empty cell left to play")]
    NoLegalMove,
}

/// Why a move was picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReason {
    Win,
    Block,
    Random,
}

/// Engine's answer for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(rename = "move")]
    pub mv: Move,
    pub reason: MoveReason,
}

/// First empty cell (row-major) that completes a line for `player`.
///
/// Each empty cell is filled hypothetically and the lines through it are
/// checked for a completed product.
pub fn winning_move(board: &Board, encoding: &PlayerEncoding, player: Player) -> Option<Move> {
    let target = encoding.completed(player);
    board.empty_cells().into_iter().find(|&m| {
        let tried = board.with_move(m, player.cell());
        LINES
            .iter()
            .filter(|line| line.contains(&m))
            .any(|line| line_product(&tried, encoding, line) == target)
    })
}

/// Pick the computer's next move: its own win, else a block of the human's
/// win, else a uniformly random empty cell.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(board, encoding, rng)))]
pub fn decide<R: Rng + ?Sized>(
    board: &Board,
    encoding: &PlayerEncoding,
    computer: Player,
    human: Player,
    rng: &mut R,
) -> Result<Decision, EngineError> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Err(EngineError::NoLegalMove);
    }

    let decision = if let Some(mv) = winning_move(board, encoding, computer) {
        Decision {
            mv,
            reason: MoveReason::Win,
        }
    } else if let Some(mv) = winning_move(board, encoding, human) {
        Decision {
            mv,
            reason: MoveReason::Block,
        }
    } else {
        let mv = *empty.choose(rng).ok_or(EngineError::NoLegalMove)?;
        Decision {
            mv,
            reason: MoveReason::Random,
        }
    };
    debug!("{computer} plays {} ({:?})", decision.mv, decision.reason);
    Ok(decision)
}

/// [`decide`] without the reason.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    encoding: &PlayerEncoding,
    computer: Player,
    human: Player,
    rng: &mut R,
) -> Result<Move, EngineError> {
    decide(board, encoding, computer, human, rng).map(|d| d.mv)
}
