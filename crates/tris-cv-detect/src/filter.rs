//! Bilateral smoothing.

use tris_cv_core::{GrayImage, GrayImageView};

use crate::BilateralParams;

/// Edge-preserving bilateral filter over a circular window of
/// `params.diameter` pixels. Borders replicate the nearest pixel.
pub fn bilateral_filter(src: &GrayImageView<'_>, params: &BilateralParams) -> GrayImage {
    let radius = (params.diameter / 2) as i32;
    if radius == 0 || src.width == 0 || src.height == 0 {
        return GrayImage {
            width: src.width,
            height: src.height,
            data: src.data.to_vec(),
        };
    }

    let sc = params.sigma_color.max(1e-3);
    let ss = params.sigma_space.max(1e-3);
    let color_coeff = -0.5 / (sc * sc);
    let space_coeff = -0.5 / (ss * ss);

    let color_lut: Vec<f32> = (0..256)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut window = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = dx * dx + dy * dy;
            if r2 > radius * radius {
                continue;
            }
            window.push((dx, dy, (r2 as f32 * space_coeff).exp()));
        }
    }

    let w = src.width as i32;
    let h = src.height as i32;
    let mut out = vec![0u8; src.width * src.height];

    for y in 0..h {
        for x in 0..w {
            let center = src.get(x as usize, y as usize) as i32;
            let mut sum = 0.0f32;
            let mut wsum = 0.0f32;
            for &(dx, dy, ws) in &window {
                let sx = (x + dx).clamp(0, w - 1) as usize;
                let sy = (y + dy).clamp(0, h - 1) as usize;
                let v = src.get(sx, sy) as i32;
                let wt = ws * color_lut[(v - center).unsigned_abs() as usize];
                sum += wt * v as f32;
                wsum += wt;
            }
            out[y as usize * src.width + x as usize] = (sum / wsum).round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage {
        width: src.width,
        height: src.height,
        data: out,
    }
}
