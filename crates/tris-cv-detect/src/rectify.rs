use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tris_cv_core::{
    homography_from_4pt, otsu_binarize, warp_perspective_gray, Corners, GrayImage, GrayImageView,
    Homography, Polarity,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::contour::{approx_polygon, closed_perimeter, largest_blob, trace_outer_boundary};
use crate::filter::bilateral_filter;
use crate::{DetectionError, RectifierParams};

/// A perspective-corrected board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rectification {
    /// Canonical `output_width × output_height` board image.
    #[serde(skip)]
    pub rect: GrayImage,
    /// Board corners in the source frame.
    pub corners: Corners,
    /// Maps rectified pixel coordinates into the source frame.
    pub h_img_from_rect: Homography,
}

/// Locate the board and warp it onto the canonical square.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, params), fields(width = frame.width, height = frame.height))
)]
pub fn rectify(
    frame: &GrayImageView<'_>,
    params: &RectifierParams,
) -> Result<Rectification, DetectionError> {
    let corners = locate_corners(frame, params)?;
    let (rect, h_img_from_rect) =
        warp_to_square(frame, &corners, params.output_width, params.output_height)?;
    Ok(Rectification {
        rect,
        corners,
        h_img_from_rect,
    })
}

/// Find the four board corners in a raw frame.
///
/// Smooth, binarize (bright = board), keep the largest blob, trace its
/// outline, approximate it with a polygon and order its first four vertices.
pub fn locate_corners(
    frame: &GrayImageView<'_>,
    params: &RectifierParams,
) -> Result<Corners, DetectionError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(DetectionError::EmptyFrame {
            width: frame.width,
            height: frame.height,
        });
    }

    let smoothed = bilateral_filter(frame, &params.bilateral);
    let mask = otsu_binarize(&smoothed.view(), Polarity::Bright);

    let blob = largest_blob(&mask).ok_or(DetectionError::NoForeground)?;
    let contour = trace_outer_boundary(&blob, mask.width, mask.height);
    let eps = params.epsilon_frac * closed_perimeter(&contour);
    let poly = approx_polygon(&contour, eps);
    debug!(
        "board blob: area={} contour={} vertices={}",
        blob.area,
        contour.len(),
        poly.len()
    );

    let quad: [Point2<f32>; 4] = match poly.get(..4) {
        Some(&[a, b, c, d]) => [a, b, c, d],
        _ => return Err(DetectionError::TooFewVertices { found: poly.len() }),
    };

    let corners = order_corners(&quad)?;

    let area_frac = corners.area() / (frame.width * frame.height) as f32;
    if area_frac < params.min_area_frac {
        return Err(DetectionError::BoardTooSmall {
            area_frac,
            min_area_frac: params.min_area_frac,
        });
    }

    debug!("board corners: {:?}", corners.points());
    Ok(corners)
}

/// Assign the quad vertices to bottom-right, top-right, top-left and
/// bottom-left.
///
/// Vertices are sorted by angle around their centroid, which walks the quad
/// clockwise on screen (y points down), and the walk starts at the vertex
/// with the smallest `x + y` (ties go to the smaller `y`). Any convex quad
/// orders this way however strong the perspective; coincident vertices, or
/// one sitting on the centroid, give `DegenerateQuad`.
pub fn order_corners(quad: &[Point2<f32>; 4]) -> Result<Corners, DetectionError> {
    const MIN_SEPARATION: f32 = 1e-3;

    let cx = quad.iter().map(|p| p.x).sum::<f32>() / 4.0;
    let cy = quad.iter().map(|p| p.y).sum::<f32>() / 4.0;
    let centroid = Point2::new(cx, cy);

    for (i, p) in quad.iter().enumerate() {
        if nalgebra::distance(p, &centroid) < MIN_SEPARATION
            || quad[i + 1..]
                .iter()
                .any(|q| nalgebra::distance(p, q) < MIN_SEPARATION)
        {
            return Err(DetectionError::DegenerateQuad);
        }
    }

    let mut ring = *quad;
    ring.sort_by(|a, b| {
        let ta = (a.y - cy).atan2(a.x - cx);
        let tb = (b.y - cy).atan2(b.x - cx);
        ta.total_cmp(&tb)
    });

    let start = (0..4)
        .min_by(|&i, &j| {
            let (a, b) = (ring[i], ring[j]);
            (a.x + a.y)
                .total_cmp(&(b.x + b.y))
                .then(a.y.total_cmp(&b.y))
        })
        .unwrap_or(0);
    ring.rotate_left(start);

    let [tl, tr, br, bl] = ring;
    Ok(Corners([br, tr, tl, bl]))
}

/// Warp the region bounded by `corners` onto a `width × height` image.
///
/// Returns the warped image and the homography mapping its pixels back into
/// `frame`.
pub fn warp_to_square(
    frame: &GrayImageView<'_>,
    corners: &Corners,
    width: usize,
    height: usize,
) -> Result<(GrayImage, Homography), DetectionError> {
    let dst = Corners::of_square(width as f32, height as f32);
    let h_img_from_rect =
        homography_from_4pt(dst.points(), corners.points()).ok_or(DetectionError::Homography)?;
    let rect = warp_perspective_gray(frame, &h_img_from_rect, width, height);
    Ok((rect, h_img_from_rect))
}
