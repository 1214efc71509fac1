//! Gradient-voting circular Hough transform on binary masks.

use std::f32::consts::PI;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tris_cv_core::GrayImageView;

use crate::HoughParams;

const ARC_SECTORS: usize = 36;

/// Half width of the ring used for radius support: 10% of the radius, at
/// least 1.5 px, so hand-drawn circles still fall inside.
fn ring_half_width(radius: f32) -> f32 {
    (0.1 * radius).max(1.5)
}

/// A detected circle in mask pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
    /// Accumulator votes at the centre.
    pub votes: u32,
    /// Fraction of angular sectors touched by the supporting ring.
    pub coverage: f32,
}

#[derive(Clone, Copy, Debug)]
struct EdgePoint {
    x: f32,
    y: f32,
    ux: f32,
    uy: f32,
}

fn sobel_edges(mask: &GrayImageView<'_>, min_magnitude: f32) -> Vec<EdgePoint> {
    let (w, h) = (mask.width, mask.height);
    let mut out = Vec::new();
    if w < 3 || h < 3 {
        return out;
    }
    let px = |x: usize, y: usize| mask.get(x, y) as f32;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = (px(x + 1, y - 1) + 2.0 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x - 1, y) + px(x - 1, y + 1));
            let gy = (px(x - 1, y + 1) + 2.0 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x, y - 1) + px(x + 1, y - 1));
            let mag = gx.hypot(gy);
            if mag >= min_magnitude && mag > 0.0 {
                out.push(EdgePoint {
                    x: x as f32,
                    y: y as f32,
                    ux: gx / mag,
                    uy: gy / mag,
                });
            }
        }
    }
    out
}

/// Detect circles in a binary mask.
///
/// Every edge pixel votes along both directions of its gradient for each
/// radius in range. Accumulator peaks above `param2` are centre candidates,
/// strongest first. A candidate becomes a circle when its best ring touches
/// at least `min_arc_coverage` of the angular sectors and it is at least
/// `min_dist` away from every circle already accepted.
pub fn detect_circles(mask: &GrayImageView<'_>, params: &HoughParams) -> Vec<Circle> {
    let (w, h) = (mask.width, mask.height);
    let max_radius = if params.max_radius == 0 {
        (w.min(h) / 2) as u32
    } else {
        params.max_radius
    };
    let min_radius = params.min_radius.max(1);
    if w == 0 || h == 0 || min_radius > max_radius {
        return Vec::new();
    }

    let edges = sobel_edges(mask, params.param1);
    if edges.is_empty() {
        return Vec::new();
    }

    let mut acc = vec![0u32; w * h];
    for e in &edges {
        for sign in [1.0f32, -1.0] {
            for r in min_radius..=max_radius {
                let r = sign * r as f32;
                let cx = (e.x + r * e.ux).round();
                let cy = (e.y + r * e.uy).round();
                if cx < 0.0 || cy < 0.0 || cx >= w as f32 || cy >= h as f32 {
                    continue;
                }
                acc[cy as usize * w + cx as usize] += 1;
            }
        }
    }

    let mut peaks = accumulator_peaks(&acc, w, h, params.param2);
    peaks.sort_by(|a, b| b.2.cmp(&a.2));

    let mut circles: Vec<Circle> = Vec::new();
    for (x, y, votes) in peaks {
        let center = Point2::new(x as f32, y as f32);
        if circles
            .iter()
            .any(|c| (c.center - center).norm() < params.min_dist)
        {
            continue;
        }
        let Some((radius, coverage)) = best_ring(&edges, center, min_radius, max_radius) else {
            continue;
        };
        if coverage >= params.min_arc_coverage {
            circles.push(Circle {
                center,
                radius,
                votes,
                coverage,
            });
        }
    }
    circles
}

/// 3×3 local maxima with more than `threshold` votes. Plateaus keep their
/// raster-first cell.
fn accumulator_peaks(acc: &[u32], w: usize, h: usize, threshold: u32) -> Vec<(usize, usize, u32)> {
    let mut out = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = acc[y * w + x];
            if v <= threshold {
                continue;
            }
            let mut is_peak = true;
            'nbr: for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let n = acc[ny as usize * w + nx as usize];
                    let before = dy < 0 || (dy == 0 && dx < 0);
                    if n > v || (before && n == v) {
                        is_peak = false;
                        break 'nbr;
                    }
                }
            }
            if is_peak {
                out.push((x, y, v));
            }
        }
    }
    out
}

/// Radius with the most edge support around `center`, and the fraction of
/// angular sectors that support touches.
fn best_ring(
    edges: &[EdgePoint],
    center: Point2<f32>,
    min_radius: u32,
    max_radius: u32,
) -> Option<(f32, f32)> {
    let polar: Vec<(f32, f32)> = edges
        .iter()
        .map(|e| {
            let dx = e.x - center.x;
            let dy = e.y - center.y;
            (dx.hypot(dy), dy.atan2(dx))
        })
        .collect();

    let mut best: Option<(u32, usize)> = None;
    for r in min_radius..=max_radius {
        let count = polar
            .iter()
            .filter(|(d, _)| (d - r as f32).abs() <= ring_half_width(r as f32))
            .count();
        if count > 0 && best.is_none_or(|(_, c)| count > c) {
            best = Some((r, count));
        }
    }
    let (radius, _) = best?;
    let radius = radius as f32;
    let tol = ring_half_width(radius);

    let mut sectors = [false; ARC_SECTORS];
    for &(d, theta) in &polar {
        if (d - radius).abs() <= tol {
            let s = (((theta + PI) / (2.0 * PI)) * ARC_SECTORS as f32) as usize;
            sectors[s.min(ARC_SECTORS - 1)] = true;
        }
    }
    let coverage = sectors.iter().filter(|&&s| s).count() as f32 / ARC_SECTORS as f32;
    Some((radius, coverage))
}
