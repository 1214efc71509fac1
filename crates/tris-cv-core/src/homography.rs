use crate::{sample_bilinear_u8, GrayImage, GrayImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

/// Planar projective transform acting on homogeneous image points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

/// Similarity that moves the centroid to the origin and scales the mean
/// distance to sqrt(2).
fn hartley_normalize4(pts: &[Point2<f32>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let cx = pts.iter().map(|p| p.x as f64).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y as f64).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| (p.x as f64 - cx).hypot(p.y as f64 - cy))
        .sum::<f64>()
        / 4.0;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);

    let out = pts.map(|p| {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        Point2::new(v[0], v[1])
    });
    (out, t)
}

/// True when some three of the (normalised) points are collinear.
fn has_collinear_triple(pts: &[Point2<f64>; 4]) -> bool {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES.iter().any(|&[i, j, k]| {
        let (a, b, c) = (pts[i], pts[j], pts[k]);
        let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        cross.abs() < 1e-9
    })
}

/// Compute H such that `dst ~ H * src` from exactly 4 point correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// for degenerate configurations (three collinear points, repeated points).
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    let (src_n, t_src) = hartley_normalize4(src);
    let (dst_n, t_dst) = hartley_normalize4(dst);
    if has_collinear_triple(&src_n) || has_collinear_triple(&dst_n) {
        return None;
    }

    // With h33 = 1 every correspondence (x, y) -> (u, v) gives two rows:
    //   [x y 1 0 0 0 -ux -uy] h = u
    //   [0 0 0 x y 1 -vx -vy] h = v
    let mut rows = [0.0f64; 64];
    let mut rhs = [0.0f64; 8];
    for (k, (s, d)) in src_n.iter().zip(dst_n.iter()).enumerate() {
        let (x, y, u, v) = (s.x, s.y, d.x, d.y);
        rows[16 * k..16 * (k + 1)].copy_from_slice(&[
            x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, //
            0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y,
        ]);
        rhs[2 * k] = u;
        rhs[2 * k + 1] = v;
    }
    let a = SMatrix::<f64, 8, 8>::from_row_slice(&rows);
    let b = SVector::<f64, 8>::from_column_slice(&rhs);

    let h8 = a.lu().solve(&b).filter(|h| h.iter().all(|c| c.is_finite()))?;
    let hn = Matrix3::from_fn(|r, c| if r == 2 && c == 2 { 1.0 } else { h8[3 * r + c] });

    // H = T_dst^-1 * Hn * T_src, then fix the scale so h33 = 1.
    let h = t_dst.try_inverse()? * hn * t_src;
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(Homography::new(h / s))
}

/// Warp into an `out_w × out_h` image: each destination pixel `(x, y)` is
/// mapped into the source through `h_src_from_dst` and sampled bilinearly.
///
/// Pixel coordinates are used directly (no half-pixel shift), so the identity
/// homography reproduces the source.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(src, h_src_from_dst))
)]
pub fn warp_perspective_gray(
    src: &GrayImageView<'_>,
    h_src_from_dst: &Homography,
    out_w: usize,
    out_h: usize,
) -> GrayImage {
    let mut out = vec![0u8; out_w * out_h];

    for y in 0..out_h {
        for x in 0..out_w {
            let p = h_src_from_dst.apply(Point2::new(x as f32, y as f32));
            out[y * out_w + x] = sample_bilinear_u8(src, p.x, p.y);
        }
    }

    GrayImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn four_point_solve_recovers_known_transform() {
        let ground_truth = Homography::new(Matrix3::new(
            0.9, 0.08, 40.0, //
            -0.03, 1.05, 25.0, //
            0.0008, -0.0003, 1.0,
        ));
        let square = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(300.0, 0.0),
            Point2::new(300.0, 300.0),
            Point2::new(0.0, 300.0),
        ];
        let img = square.map(|p| ground_truth.apply(p));

        let h = homography_from_4pt(&square, &img).expect("solvable");
        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(150.0, 75.0),
            Point2::new(290.0, 210.0),
        ] {
            assert_abs_diff_eq!(h.apply(p), ground_truth.apply(p), epsilon = 1e-2);
        }
    }

    #[test]
    fn inverse_maps_back() {
        let src = [
            Point2::new(12.0_f32, 9.0),
            Point2::new(180.0, 20.0),
            Point2::new(170.0, 160.0),
            Point2::new(5.0, 150.0),
        ];
        let dst = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ];
        let h = homography_from_4pt(&src, &dst).expect("solvable");
        let inv = h.inverse().expect("invertible");
        for (s, d) in src.iter().zip(dst.iter()) {
            assert_abs_diff_eq!(h.apply(*s), *d, epsilon = 1e-3);
            assert_abs_diff_eq!(inv.apply(*d), *s, epsilon = 1e-3);
        }
    }

    #[test]
    fn collinear_points_are_rejected() {
        let line = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 3.0),
        ];
        let square = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(homography_from_4pt(&line, &square).is_none());
    }

    #[test]
    fn identity_warp_reproduces_source() {
        let data: Vec<u8> = (0..32 * 32).map(|i| ((i * 7) % 251) as u8).collect();
        let img = GrayImage {
            width: 32,
            height: 32,
            data,
        };
        let out = warp_perspective_gray(&img.view(), &Homography::identity(), 32, 32);
        assert_eq!(out, img);
    }
}
