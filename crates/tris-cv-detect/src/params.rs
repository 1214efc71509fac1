use serde::{Deserialize, Serialize};

use tris_cv_core::GRID_SIZE;

/// Edge-preserving smoothing applied before board binarization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BilateralParams {
    /// Neighbourhood diameter in pixels; `0` disables the filter.
    pub diameter: usize,
    /// Intensity sigma (0..255 scale).
    pub sigma_color: f32,
    /// Spatial sigma in pixels.
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            diameter: 30,
            sigma_color: 75.0,
            sigma_space: 100.0,
        }
    }
}

/// Rectifier configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectifierParams {
    /// Width of the rectified board image.
    pub output_width: usize,
    /// Height of the rectified board image.
    pub output_height: usize,
    #[serde(default)]
    pub bilateral: BilateralParams,
    /// Polygon approximation tolerance as a fraction of the contour perimeter.
    pub epsilon_frac: f32,
    /// Smallest accepted board quad, as a fraction of the frame area.
    pub min_area_frac: f32,
}

impl Default for RectifierParams {
    fn default() -> Self {
        Self {
            output_width: 480,
            output_height: 480,
            bilateral: BilateralParams::default(),
            epsilon_frac: 0.05,
            min_area_frac: 0.1,
        }
    }
}

/// Placement of the 3×3 cells inside the rectified image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGeometry {
    pub margin_x: usize,
    pub margin_y: usize,
    pub cell_width: usize,
    pub cell_height: usize,
    /// Pixels trimmed from every side of a cell before classification, so
    /// printed grid lines do not count as marks.
    #[serde(default)]
    pub inset: usize,
}

impl CellGeometry {
    /// Cells tiling a `width × height` rectified board with no margins.
    pub fn for_canonical(width: usize, height: usize) -> Self {
        Self {
            margin_x: 0,
            margin_y: 0,
            cell_width: width / GRID_SIZE,
            cell_height: height / GRID_SIZE,
            inset: 0,
        }
    }

    /// Region of interest `(x, y, w, h)` for a cell, before clipping.
    pub fn roi(&self, row: usize, col: usize) -> CellRoi {
        let w = self.cell_width.saturating_sub(2 * self.inset);
        let h = self.cell_height.saturating_sub(2 * self.inset);
        CellRoi {
            x: self.margin_x + col * self.cell_width + self.inset,
            y: self.margin_y + row * self.cell_height + self.inset,
            width: w,
            height: h,
        }
    }

    /// Outer bounds `(x, y, w, h)` of the cell, ignoring the inset.
    pub fn cell_rect(&self, row: usize, col: usize) -> CellRoi {
        CellRoi {
            x: self.margin_x + col * self.cell_width,
            y: self.margin_y + row * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::for_canonical(480, 480)
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRoi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRoi {
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Circular Hough transform settings, named after the usual gradient
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoughParams {
    /// Minimum distance between accepted circle centres.
    pub min_dist: f32,
    /// Gradient magnitude needed for a pixel to count as an edge.
    pub param1: f32,
    /// Accumulator votes a centre needs (strictly more than this).
    pub param2: u32,
    pub min_radius: u32,
    /// `0` means half of the smaller mask side.
    pub max_radius: u32,
    /// Fraction of the 36 angular sectors the best ring must touch.
    pub min_arc_coverage: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            min_dist: 50.0,
            param1: 100.0,
            param2: 20,
            min_radius: 20,
            max_radius: 70,
            min_arc_coverage: 0.75,
        }
    }
}

/// Cell classifier configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub geometry: CellGeometry,
    /// Occupancy at or below this is an empty cell.
    pub empty_threshold: f32,
    pub hough: HoughParams,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            geometry: CellGeometry::default(),
            empty_threshold: 0.03,
            hough: HoughParams::default(),
        }
    }
}
