//! Synthetic photographs of a paper board.
#![allow(dead_code)]

use image::{Rgb, RgbImage};
use nalgebra::Point2;
use tris_cv::core::{homography_from_4pt, warp_perspective_gray, CellValue, Corners, GrayImage};
use tris_cv::TrisConfig;

pub const SIDE: usize = 240;
const CELL: usize = SIDE / 3;
const PAPER: u8 = 230;
const INK: u8 = 20;

/// Where the board corners land in the frame: bottom-right, top-right,
/// top-left, bottom-left.
pub const FRAME_CORNERS: [(f32, f32); 4] = [(226.0, 222.0), (218.0, 18.0), (16.0, 12.0), (10.0, 230.0)];

/// Config tuned for the synthetic frames.
pub fn config() -> TrisConfig {
    TrisConfig {
        frame_width: SIDE as u32,
        frame_height: SIDE as u32,
        cell_inset: 8,
        bilateral_diameter: 5,
        min_dist: 20.0,
        param2: 15,
        min_radius: 10,
        max_radius: 34,
        ..TrisConfig::default()
    }
}

fn paint(img: &mut GrayImage, row: usize, col: usize, inside: impl Fn(f32, f32) -> bool) {
    let cx = (col * CELL + CELL / 2) as f32;
    let cy = (row * CELL + CELL / 2) as f32;
    for y in row * CELL..(row + 1) * CELL {
        for x in col * CELL..(col + 1) * CELL {
            if inside(x as f32 - cx, y as f32 - cy) {
                img.set(x, y, INK);
            }
        }
    }
}

/// Canonical top-down board with grid lines and marks.
pub fn canonical(cells: [[CellValue; 3]; 3]) -> GrayImage {
    let mut img = GrayImage::filled(SIDE, SIDE, PAPER);
    // Grid lines stop short of the border so the paper stays one blob.
    for k in [CELL, 2 * CELL] {
        for t in 10..SIDE - 10 {
            for w in k - 1..=k + 1 {
                img.set(w, t, INK);
                img.set(t, w, INK);
            }
        }
    }
    let s = 2f32.sqrt();
    for (row, line) in cells.iter().enumerate() {
        for (col, cell) in line.iter().enumerate() {
            match cell {
                CellValue::Empty => {}
                CellValue::PlayerA => paint(&mut img, row, col, |u, v| {
                    (22.0..=27.0).contains(&u.hypot(v))
                }),
                CellValue::PlayerB => paint(&mut img, row, col, |u, v| {
                    let a = (u - v).abs() / s <= 3.0 && (u + v).abs() / s <= 26.0;
                    let b = (u + v).abs() / s <= 3.0 && (u - v).abs() / s <= 26.0;
                    a || b
                }),
            }
        }
    }
    img
}

/// The board seen in perspective on a dark table.
pub fn photograph(cells: [[CellValue; 3]; 3]) -> RgbImage {
    let board = canonical(cells);
    let frame_corners = FRAME_CORNERS.map(|(x, y)| Point2::new(x, y));
    let square = Corners::of_square(SIDE as f32, SIDE as f32);
    let h_board_from_frame =
        homography_from_4pt(&frame_corners, square.points()).expect("homography");
    let gray = warp_perspective_gray(&board.view(), &h_board_from_frame, SIDE, SIDE);
    RgbImage::from_fn(SIDE as u32, SIDE as u32, |x, y| {
        let v = gray.get(x as usize, y as usize);
        Rgb([v, v, v])
    })
}

/// A frame without any board in it.
pub fn empty_table() -> RgbImage {
    RgbImage::from_pixel(SIDE as u32, SIDE as u32, Rgb([60, 60, 60]))
}
