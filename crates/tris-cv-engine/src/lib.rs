//! Tic-tac-toe decisions on a symbolic board.
//!
//! Cells are encoded as numbers (empty = 1, the two players as coprime codes
//! greater than one), so the product of a line tells its content: the cube
//! of a player's code is a completed line and the square is two marks plus
//! an empty cell. Win detection, blocking and [`open_lines`] are all built
//! on those products.
//!
//! ```
//! use tris_cv_core::{Board, CellValue::*, Move, Player};
//! use tris_cv_engine::{choose_move, PlayerEncoding};
//!
//! let board = Board::from_rows([
//!     [PlayerA, PlayerA, Empty],
//!     [Empty, PlayerB, Empty],
//!     [Empty, Empty, Empty],
//! ]);
//! let mut rng = rand::rng();
//! let mv = choose_move(&board, &PlayerEncoding::default(), Player::A, Player::B, &mut rng).unwrap();
//! assert_eq!(mv, Move::new(0, 2));
//! ```

mod encoding;
mod lines;
mod moves;
mod status;

pub use encoding::{EncodingError, PlayerEncoding, EMPTY_CODE};
pub use lines::{find_winning_line, line_product, open_lines, WinningLine, LINES};
pub use moves::{choose_move, decide, winning_move, Decision, EngineError, MoveReason};
pub use status::{evaluate, GameStatus};
