//! Global thresholding: Otsu threshold selection and binary masks.

use crate::{GrayImage, GrayImageView};

/// Otsu threshold of a set of intensities.
///
/// Pixels `<= t` form the dark class. Returns `None` when all samples share
/// one intensity, since there is nothing to separate.
pub fn otsu_threshold(samples: &[u8]) -> Option<u8> {
    let (&first, rest) = samples.split_first()?;
    let (mut min_v, mut max_v) = (first, first);
    for &v in rest {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return None;
    }

    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return Some(((min_v as u16 + max_v as u16) / 2) as u8);
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = min_v;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    Some(best_t)
}

/// Which side of the threshold becomes foreground (255).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Pixels brighter than the threshold.
    Bright,
    /// Pixels at or below the threshold.
    Dark,
}

/// Binarize with an automatically selected Otsu threshold.
///
/// A constant image yields an all-zero mask.
pub fn otsu_binarize(src: &GrayImageView<'_>, polarity: Polarity) -> GrayImage {
    let Some(t) = otsu_threshold(src.data) else {
        return GrayImage::filled(src.width, src.height, 0);
    };
    let data = src
        .data
        .iter()
        .map(|&v| {
            let fg = match polarity {
                Polarity::Bright => v > t,
                Polarity::Dark => v <= t,
            };
            if fg {
                255
            } else {
                0
            }
        })
        .collect();
    GrayImage {
        width: src.width,
        height: src.height,
        data,
    }
}
