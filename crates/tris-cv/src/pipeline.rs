//! One pass of the vision pipeline: prepared frame in, board reading out.

use image::{GrayImage, Rgb, RgbImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::TrisConfig;
use crate::core::{self, Homography};
use crate::detect::{self, BoardReading, DetectionError, Rectification};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("board detection failed: {0}")]
    Detection(#[from] DetectionError),
}

/// Result of analysing one frame.
#[derive(Clone, Debug)]
pub struct FrameAnalysis {
    pub rectification: Rectification,
    /// Colour frame warped with the same homography as the grayscale board.
    pub board_image: RgbImage,
    pub reading: BoardReading,
}

/// Convert an `image::GrayImage` into the lightweight core view type.
pub fn gray_view(img: &GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

pub fn to_gray(frame: &RgbImage) -> GrayImage {
    image::imageops::grayscale(frame)
}

/// Resample `src` into a `width × height` image; `h` maps output pixels into
/// `src`. Samples outside `src` are black.
pub fn warp_rgb(src: &RgbImage, h: &Homography, width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let p = h.apply(nalgebra::Point2::new(x as f32, y as f32));
        sample_rgb(src, p.x, p.y)
    })
}

fn sample_rgb(src: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let px = |xx: i64, yy: i64| -> [f32; 3] {
        if xx < 0 || yy < 0 || xx >= src.width() as i64 || yy >= src.height() as i64 {
            return [0.0; 3];
        }
        let p = src.get_pixel(xx as u32, yy as u32);
        [p[0] as f32, p[1] as f32, p[2] as f32]
    };
    let (p00, p10, p01, p11) = (px(x0, y0), px(x0 + 1, y0), px(x0, y0 + 1), px(x0 + 1, y0 + 1));
    let mut out = [0u8; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

/// Rectify a prepared frame and classify its nine cells.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(frame, cfg), fields(width = frame.width(), height = frame.height()))
)]
pub fn process_frame(frame: &RgbImage, cfg: &TrisConfig) -> Result<FrameAnalysis, PipelineError> {
    let gray = to_gray(frame);
    let params = cfg.rectifier_params();
    let rectification = detect::rectify(&gray_view(&gray), &params)?;
    let reading = detect::read_board(&rectification.rect.view(), &cfg.classifier_params());
    let board_image = warp_rgb(
        frame,
        &rectification.h_img_from_rect,
        params.output_width as u32,
        params.output_height as u32,
    );
    Ok(FrameAnalysis {
        rectification,
        board_image,
        reading,
    })
}

/// Classify cells on a fixed grid over the prepared frame, without looking
/// for the board outline. Used to line the camera up with the paper.
pub fn read_fixed_grid(frame: &RgbImage, cfg: &TrisConfig) -> BoardReading {
    let gray = to_gray(frame);
    detect::read_board(&gray_view(&gray), &cfg.classifier_params())
}
