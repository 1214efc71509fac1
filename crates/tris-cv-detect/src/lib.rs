//! Board rectification and cell classification.
//!
//! The pipeline for one frame:
//! - [`rectify`] finds the board as the largest bright blob, approximates its
//!   outline with a quadrilateral and warps it onto a canonical square,
//! - [`read_board`] cuts the square into 3×3 cells and classifies each one as
//!   empty, circle or cross.
//!
//! Everything works on [`tris_cv_core::GrayImageView`]; decoding and colour
//! conversion live in the `tris-cv` facade crate.

mod board;
mod classify;
mod contour;
mod error;
mod filter;
mod hough;
mod params;
mod rectify;

pub use board::{build_board, read_board, BoardReading};
pub use classify::{classify, classify_cell, CellClassification};
pub use error::DetectionError;
pub use filter::bilateral_filter;
pub use hough::{detect_circles, Circle};
pub use params::{
    BilateralParams, CellGeometry, CellRoi, ClassifierParams, HoughParams, RectifierParams,
};
pub use rectify::{locate_corners, order_corners, rectify, warp_to_square, Rectification};
