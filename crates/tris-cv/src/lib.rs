//! Camera tic-tac-toe: read a paper board from frames and pick moves.
//!
//! This crate provides:
//! - re-exports of the underlying crates (`core`, `detect`, `engine`),
//! - the flat JSON [`TrisConfig`] and the turn bookkeeping in [`game`],
//! - (feature `image`) frame preparation, the per-frame pipeline, board
//!   annotations and the frame loop on top of the `image` crate.
//!
//! ## Quickstart
//!
//! ```no_run
//! use tris_cv::frame::{load_rgb, prepare_frame};
//! use tris_cv::pipeline::process_frame;
//! use tris_cv::TrisConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = TrisConfig::default();
//! let raw = load_rgb("board.jpg".as_ref())?;
//! let frame = prepare_frame(&raw, cfg.frame_width, cfg.frame_height, cfg.rotate);
//! let analysis = process_frame(&frame, &cfg)?;
//! println!("{}", analysis.reading.board);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `tris_cv::core`: images, homography, Otsu, board model.
//! - `tris_cv::detect`: rectifier, cell classifier, board reader.
//! - `tris_cv::engine`: line products, win detection, move choice.
//! - `tris_cv::session` (feature `image`): the frame loop.

pub use tris_cv_core as core;
pub use tris_cv_detect as detect;
pub use tris_cv_engine as engine;

pub use tris_cv_core::{Board, CellValue, Move, Player};
pub use tris_cv_engine::{GameStatus, PlayerEncoding};

pub mod config;
pub mod game;

#[cfg(feature = "image")]
pub mod frame;
#[cfg(feature = "image")]
pub mod pipeline;
#[cfg(feature = "image")]
pub mod render;
#[cfg(feature = "image")]
pub mod session;

pub use config::{ConfigError, RenderStyle, TrisConfig};
pub use game::{MatchState, TurnReport};
