//! Per-cell occupancy test and circle/cross discrimination.

use log::debug;
use serde::{Deserialize, Serialize};
use tris_cv_core::{otsu_binarize, CellValue, GrayImageView, Polarity};

use crate::hough::{detect_circles, Circle};
use crate::{CellRoi, ClassifierParams};

/// Everything the classifier measured for one cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellClassification {
    pub value: CellValue,
    /// Fraction of the cell ROI covered by ink after inverted Otsu.
    pub occupancy: f32,
    /// Circles found in the ink mask, in ROI coordinates. Empty cells skip
    /// the circle search.
    pub circles: Vec<Circle>,
    /// Region that was inspected, in rectified-image pixels.
    pub roi: CellRoi,
}

/// Classify the cell at `(row, col)` of a rectified board.
pub fn classify(
    rect: &GrayImageView<'_>,
    row: usize,
    col: usize,
    params: &ClassifierParams,
) -> CellValue {
    classify_cell(rect, row, col, params).value
}

/// Classify the cell at `(row, col)` and keep the intermediate measurements.
///
/// The ROI is binarized with Otsu so that ink (pixels at or below the
/// threshold) becomes foreground. Occupancy at or below `empty_threshold`
/// means an empty cell. Otherwise any detected circle makes it a circle
/// mark, and no circle makes it a cross.
pub fn classify_cell(
    rect: &GrayImageView<'_>,
    row: usize,
    col: usize,
    params: &ClassifierParams,
) -> CellClassification {
    let roi = params.geometry.roi(row, col);
    let patch = rect.crop(roi.x, roi.y, roi.width, roi.height);
    let mask = otsu_binarize(&patch.view(), Polarity::Dark);

    let area = roi.area();
    let occupancy = if area == 0 {
        0.0
    } else {
        mask.count_nonzero() as f32 / area as f32
    };

    if occupancy <= params.empty_threshold {
        return CellClassification {
            value: CellValue::Empty,
            occupancy,
            circles: Vec::new(),
            roi,
        };
    }

    let circles = detect_circles(&mask.view(), &params.hough);
    let value = if circles.is_empty() {
        CellValue::PlayerB
    } else {
        CellValue::PlayerA
    };
    debug!(
        "cell ({row}, {col}): occupancy={occupancy:.3} circles={} -> {:?}",
        circles.len(),
        value
    );

    CellClassification {
        value,
        occupancy,
        circles,
        roi,
    }
}
