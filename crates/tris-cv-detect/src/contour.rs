//! Blob extraction, boundary tracing and polygon approximation.

use std::collections::VecDeque;

use nalgebra::Point2;
use tris_cv_core::GrayImage;

/// 8-neighbourhood offsets, clockwise on screen starting east.
const DIRS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;

/// Largest 8-connected foreground component of a binary mask.
#[derive(Clone, Debug)]
pub(crate) struct Blob {
    /// Pixel count.
    pub area: usize,
    /// First pixel of the blob in raster order (top-most, then left-most).
    pub start: (usize, usize),
    /// Per-pixel membership, row-major.
    pub member: Vec<bool>,
}

pub(crate) fn largest_blob(mask: &GrayImage) -> Option<Blob> {
    let (w, h) = (mask.width, mask.height);
    let mut label = vec![0u32; w * h];
    let mut next = 0u32;
    let mut best: Option<(u32, usize, (usize, usize))> = None;
    let mut queue = VecDeque::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if mask.data[idx] == 0 || label[idx] != 0 {
                continue;
            }
            next += 1;
            label[idx] = next;
            queue.push_back((x, y));
            let mut area = 0usize;

            while let Some((cx, cy)) = queue.pop_front() {
                area += 1;
                for (dx, dy) in DIRS {
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if mask.data[nidx] != 0 && label[nidx] == 0 {
                        label[nidx] = next;
                        queue.push_back((nx as usize, ny as usize));
                    }
                }
            }

            if best.is_none_or(|(_, a, _)| area > a) {
                best = Some((next, area, (x, y)));
            }
        }
    }

    let (id, area, start) = best?;
    Some(Blob {
        area,
        start,
        member: label.iter().map(|&l| l == id).collect(),
    })
}

/// Outer boundary of a blob by Moore-neighbour tracing, clockwise on screen
/// starting at the blob's raster-first pixel.
pub(crate) fn trace_outer_boundary(blob: &Blob, width: usize, height: usize) -> Vec<Point2<f32>> {
    let inside = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && x < width as i32
            && y < height as i32
            && blob.member[y as usize * width + x as usize]
    };

    let start = (blob.start.0 as i32, blob.start.1 as i32);
    let mut contour = vec![Point2::new(start.0 as f32, start.1 as f32)];
    let mut current = start;
    let mut back = WEST;
    let mut first_dir: Option<usize> = None;
    let max_steps = 4 * blob.area + 8;

    for _ in 0..max_steps {
        let found = (0..8)
            .map(|k| (back + k) % 8)
            .find(|&d| inside(current.0 + DIRS[d].0, current.1 + DIRS[d].1));
        let Some(d) = found else {
            // isolated pixel
            break;
        };

        if current == start {
            match first_dir {
                Some(fd) if fd == d => break,
                None => first_dir = Some(d),
                _ => {}
            }
        }

        current = (current.0 + DIRS[d].0, current.1 + DIRS[d].1);
        back = if d % 2 == 0 { (d + 6) % 8 } else { (d + 5) % 8 };
        if current != start {
            contour.push(Point2::new(current.0 as f32, current.1 as f32));
        }
    }

    contour
}

/// Length of the closed polyline.
pub(crate) fn closed_perimeter(pts: &[Point2<f32>]) -> f32 {
    if pts.len() < 2 {
        return 0.0;
    }
    pts.iter()
        .zip(pts.iter().cycle().skip(1))
        .map(|(a, b)| (b - a).norm())
        .sum()
}

fn point_segment_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < 1e-12 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Douglas–Peucker on the open chain `pts[first..=last]`; pushes the kept
/// vertices except `pts[last]`.
fn simplify_chain(pts: &[Point2<f32>], first: usize, last: usize, eps: f32, out: &mut Vec<Point2<f32>>) {
    let mut keep = vec![false; last - first + 1];
    keep[0] = true;
    let mut stack = vec![(first, last)];

    while let Some((i, j)) = stack.pop() {
        if j <= i + 1 {
            continue;
        }
        let (mut best, mut best_d) = (i, -1.0f32);
        for k in i + 1..j {
            let d = point_segment_distance(pts[k], pts[i], pts[j]);
            if d > best_d {
                best = k;
                best_d = d;
            }
        }
        if best_d > eps {
            keep[best - first] = true;
            stack.push((i, best));
            stack.push((best, j));
        }
    }

    out.extend(
        keep.iter()
            .enumerate()
            .take(last - first)
            .filter(|(_, &k)| k)
            .map(|(i, _)| pts[first + i]),
    );
}

/// Closed-polygon Douglas–Peucker approximation.
///
/// The contour is split at its first point and the point farthest from it;
/// both halves are simplified independently.
pub(crate) fn approx_polygon(contour: &[Point2<f32>], eps: f32) -> Vec<Point2<f32>> {
    let n = contour.len();
    if n < 3 {
        return contour.to_vec();
    }

    let anchor = contour[0];
    let far = (1..n)
        .max_by(|&a, &b| {
            (contour[a] - anchor)
                .norm_squared()
                .total_cmp(&(contour[b] - anchor).norm_squared())
        })
        .unwrap_or(1);

    // second half wraps back to the anchor
    let mut ring = contour.to_vec();
    ring.push(anchor);

    let mut out = Vec::new();
    simplify_chain(&ring, 0, far, eps, &mut out);
    simplify_chain(&ring, far, n, eps, &mut out);
    out
}
