//! Core types and utilities for camera-based tic-tac-toe.
//!
//! Lightweight grayscale images, a 4-point homography with perspective
//! warping, Otsu thresholding, and the symbolic board model. Nothing here
//! depends on a concrete image decoding crate.

mod board;
mod corners;
mod homography;
mod image;
mod logger;
mod threshold;

pub use board::{Board, CellValue, Move, Player, GRID_SIZE};
pub use corners::Corners;
pub use homography::{homography_from_4pt, warp_perspective_gray, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};
pub use threshold::{otsu_binarize, otsu_threshold, Polarity};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, init_tracing_with_level};

pub use logger::{default_directives, init_with_level, level_for_verbosity};
