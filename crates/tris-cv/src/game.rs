//! Turn bookkeeping between frames.

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, TrisConfig};
use crate::core::{Board, Player};
use crate::engine::{decide, evaluate, Decision, EngineError, GameStatus, PlayerEncoding};

/// What happened on one observed frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based turn counter.
    pub turn: usize,
    /// Player whose turn the frame was.
    pub player: Player,
    /// The board as read from the frame.
    pub board: Board,
    pub status: GameStatus,
    /// Move suggested when the frame was the computer's turn.
    pub decision: Option<Decision>,
}

/// Whose turn it is and whether the game has ended.
///
/// The board itself is not stored: every frame is read from scratch and
/// handed to [`MatchState::observe`].
#[derive(Clone, Debug)]
pub struct MatchState {
    encoding: PlayerEncoding,
    computer: Option<Player>,
    turn: Player,
    turns: usize,
    outcome: Option<GameStatus>,
}

impl MatchState {
    pub fn new(encoding: PlayerEncoding, computer: Option<Player>, first: Player) -> Self {
        Self {
            encoding,
            computer,
            turn: first,
            turns: 0,
            outcome: None,
        }
    }

    pub fn from_config(cfg: &TrisConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.encoding()?, cfg.computer, cfg.first_player()))
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn encoding(&self) -> &PlayerEncoding {
        &self.encoding
    }

    /// Final status once a win or draw has been observed.
    pub fn outcome(&self) -> Option<GameStatus> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Evaluate a freshly read board.
    ///
    /// A finished board ends the game without changing the turn. Otherwise,
    /// on the computer's turn, the engine suggests a move, and the turn
    /// passes to the other player.
    pub fn observe<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> TurnReport {
        self.turns += 1;
        let player = self.turn;
        let mut status = evaluate(board, &self.encoding);
        let mut decision = None;

        if !status.is_over() && self.computer == Some(player) {
            match decide(board, &self.encoding, player, player.other(), rng) {
                Ok(d) => decision = Some(d),
                Err(EngineError::NoLegalMove) => status = GameStatus::Draw,
            }
        }

        match status {
            GameStatus::Won(line) => {
                info!("{} wins on {:?}", line.player, line.cells);
                self.outcome = Some(status);
            }
            GameStatus::Draw => {
                info!("draw");
                self.outcome = Some(status);
            }
            GameStatus::Playing => self.turn = player.other(),
        }

        TurnReport {
            turn: self.turns,
            player,
            board: *board,
            status,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellValue::*, Move};
    use crate::engine::MoveReason;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn turns_alternate_and_computer_suggests() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = MatchState::new(PlayerEncoding::default(), Some(Player::A), Player::A);

        let board = Board::from_rows([[PlayerA, PlayerA, Empty], [Empty, PlayerB, Empty], [Empty; 3]]);
        let report = state.observe(&board, &mut rng);
        assert_eq!(report.player, Player::A);
        assert_eq!(report.board, board);
        let d = report.decision.expect("computer move");
        assert_eq!((d.mv, d.reason), (Move::new(0, 2), MoveReason::Win));
        assert_eq!(state.turn(), Player::B);

        let report = state.observe(&board, &mut rng);
        assert_eq!(report.player, Player::B);
        assert!(report.decision.is_none());
        assert_eq!(state.turn(), Player::A);
        assert!(!state.is_over());
    }

    #[test]
    fn win_ends_the_match_without_switching() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = MatchState::new(PlayerEncoding::default(), Some(Player::B), Player::A);
        let board = Board::from_rows([[PlayerA; 3], [PlayerB, PlayerB, Empty], [Empty; 3]]);
        let report = state.observe(&board, &mut rng);
        assert!(matches!(report.status, GameStatus::Won(l) if l.player == Player::A));
        assert_eq!(state.turn(), Player::A);
        assert!(state.is_over());
        assert_eq!(report.turn, 1);
    }

    #[test]
    fn full_board_is_a_draw() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = MatchState::new(PlayerEncoding::default(), None, Player::B);
        let board = Board::from_rows([
            [PlayerA, PlayerB, PlayerA],
            [PlayerA, PlayerB, PlayerB],
            [PlayerB, PlayerA, PlayerA],
        ]);
        assert_eq!(state.observe(&board, &mut rng).status, GameStatus::Draw);
        assert_eq!(state.outcome(), Some(GameStatus::Draw));
    }
}
