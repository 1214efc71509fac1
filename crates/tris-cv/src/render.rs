//! Board annotations and render sinks.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::config::RenderStyle;
use crate::core::{CellValue, Corners, Move, GRID_SIZE};
use crate::detect::{BoardReading, CellGeometry};
use crate::engine::GameStatus;
use crate::game::TurnReport;

/// Opacity of the cell overlays.
pub const OVERLAY_ALPHA: f32 = 0.3;

const STATUS_OK: Rgb<u8> = Rgb([0, 200, 0]);
const STATUS_FAILED: Rgb<u8> = Rgb([220, 0, 0]);

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to prepare output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Where annotated frames go.
pub trait RenderSink {
    fn show(&mut self, frame: &RgbImage, board: &RgbImage) -> Result<(), RenderError>;
}

/// Writes `frame_0001.png`, `frame_0002.png`, ... with the raw frame stacked
/// over the board.
#[derive(Clone, Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: usize,
}

impl PngSequenceSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| RenderError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl RenderSink for PngSequenceSink {
    fn show(&mut self, frame: &RgbImage, board: &RgbImage) -> Result<(), RenderError> {
        self.written += 1;
        let path = self.dir.join(format!("frame_{:04}.png", self.written));
        compose_canvas(frame, board)
            .save(&path)
            .map_err(|source| RenderError::Encode { path, source })
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn show(&mut self, _frame: &RgbImage, _board: &RgbImage) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Raw frame on top, board below.
pub fn compose_canvas(frame: &RgbImage, board: &RgbImage) -> RgbImage {
    let width = frame.width().max(board.width());
    let mut canvas = RgbImage::new(width, frame.height() + board.height());
    image::imageops::replace(&mut canvas, frame, 0, 0);
    image::imageops::replace(&mut canvas, board, 0, frame.height() as i64);
    canvas
}

/// Draw the reference grid, detected circles, cell overlays and, when a turn
/// report is given, the winning line and the suggested computer move.
pub fn annotate_board(
    img: &mut RgbImage,
    reading: &BoardReading,
    geometry: &CellGeometry,
    report: Option<&TurnReport>,
    style: &RenderStyle,
) {
    let weight = style.line_weight.max(1) as f32;

    for (i, cell) in reading.cells.iter().enumerate() {
        let rect = geometry.cell_rect(i / GRID_SIZE, i % GRID_SIZE);
        let color = match cell.value {
            CellValue::Empty => continue,
            CellValue::PlayerA => style.overlay_color_1,
            CellValue::PlayerB => style.overlay_color_2,
        };
        blend_rect(
            img,
            rect.x as i64,
            rect.y as i64,
            rect.width as u32,
            rect.height as u32,
            Rgb(color),
            OVERLAY_ALPHA,
        );
        for c in &cell.circles {
            let cx = cell.roi.x as f32 + c.center.x;
            let cy = cell.roi.y as f32 + c.center.y;
            draw_ring(img, cx, cy, c.radius, weight, Rgb(style.circle_color));
        }
    }

    draw_grid(img, geometry, weight, Rgb(style.line_color));

    let Some(report) = report else {
        return;
    };
    if let GameStatus::Won(line) = report.status {
        let (x0, y0) = cell_centre(geometry, line.cells[0]);
        let (x1, y1) = cell_centre(geometry, line.cells[2]);
        draw_segment(img, x0, y0, x1, y1, 3.0 * weight, Rgb(style.line_color));
    }
    if let Some(d) = report.decision {
        let rect = geometry.cell_rect(d.mv.row, d.mv.col);
        let pad = rect.width.min(rect.height) as f32 * 0.25;
        let (x0, y0) = (rect.x as f32 + pad, rect.y as f32 + pad);
        let (x1, y1) = (
            (rect.x + rect.width) as f32 - pad,
            (rect.y + rect.height) as f32 - pad,
        );
        let color = Rgb(style.overlay_color_2);
        draw_segment(img, x0, y0, x1, y1, 2.0 * weight, color);
        draw_segment(img, x0, y1, x1, y0, 2.0 * weight, color);
    }
}

/// Outline the detected board quad on the raw frame.
pub fn draw_quad(img: &mut RgbImage, corners: &Corners, style: &RenderStyle) {
    let weight = style.line_weight.max(1) as f32;
    let p = corners.points();
    for i in 0..4 {
        let (a, b) = (p[i], p[(i + 1) % 4]);
        draw_segment(img, a.x, a.y, b.x, b.y, weight, Rgb(style.line_color));
    }
}

/// Green band along the bottom edge when the frame was read, red otherwise.
pub fn draw_status_bar(img: &mut RgbImage, ok: bool) {
    let h = (img.height() / 40).max(4).min(img.height());
    let color = if ok { STATUS_OK } else { STATUS_FAILED };
    fill_rect(img, 0, (img.height() - h) as i64, img.width(), h, color);
}

fn cell_centre(geometry: &CellGeometry, m: Move) -> (f32, f32) {
    let r = geometry.cell_rect(m.row, m.col);
    (
        r.x as f32 + r.width as f32 / 2.0,
        r.y as f32 + r.height as f32 / 2.0,
    )
}

fn draw_grid(img: &mut RgbImage, g: &CellGeometry, weight: f32, color: Rgb<u8>) {
    let left = g.margin_x as f32;
    let top = g.margin_y as f32;
    let right = left + (GRID_SIZE * g.cell_width) as f32;
    let bottom = top + (GRID_SIZE * g.cell_height) as f32;
    for k in 0..=GRID_SIZE {
        let x = left + (k * g.cell_width) as f32;
        let y = top + (k * g.cell_height) as f32;
        draw_segment(img, x, top, x, bottom, weight, color);
        draw_segment(img, left, y, right, y, weight, color);
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(img: &mut RgbImage, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
    for yy in y..y + h as i64 {
        for xx in x..x + w as i64 {
            put(img, xx, yy, color);
        }
    }
}

fn blend_rect(img: &mut RgbImage, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>, alpha: f32) {
    for yy in y.max(0)..(y + h as i64).min(img.height() as i64) {
        for xx in x.max(0)..(x + w as i64).min(img.width() as i64) {
            let p = img.get_pixel_mut(xx as u32, yy as u32);
            for c in 0..3 {
                let v = alpha * color[c] as f32 + (1.0 - alpha) * p[c] as f32;
                p[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Thick segment: every pixel within `width / 2` of the segment.
fn draw_segment(img: &mut RgbImage, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgb<u8>) {
    let half = (width / 2.0).max(0.5);
    let min_x = (x0.min(x1) - half).floor() as i64;
    let max_x = (x0.max(x1) + half).ceil() as i64;
    let min_y = (y0.min(y1) - half).floor() as i64;
    let max_y = (y0.max(y1) + half).ceil() as i64;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len2 = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32 - x0, y as f32 - y0);
            let t = if len2 > 0.0 {
                ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let d = (px - t * dx).hypot(py - t * dy);
            if d <= half {
                put(img, x, y, color);
            }
        }
    }
}

fn draw_ring(img: &mut RgbImage, cx: f32, cy: f32, r: f32, width: f32, color: Rgb<u8>) {
    let half = (width / 2.0).max(0.5);
    let reach = (r + half).ceil() as i64;
    let (ix, iy) = (cx.round() as i64, cy.round() as i64);
    for y in iy - reach..=iy + reach {
        for x in ix - reach..=ix + reach {
            let d = (x as f32 - cx).hypot(y as f32 - cy);
            if (d - r).abs() <= half {
                put(img, x, y, color);
            }
        }
    }
}
