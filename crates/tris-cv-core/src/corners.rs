use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Board corners in image space.
///
/// Order: bottom-right, top-right, top-left, bottom-left. The rectifier maps
/// them onto the matching corners of the canonical square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corners(pub [Point2<f32>; 4]);

impl Corners {
    pub const BOTTOM_RIGHT: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const TOP_LEFT: usize = 2;
    pub const BOTTOM_LEFT: usize = 3;

    /// Destination corners of a `width × height` square, in corner order.
    pub fn of_square(width: f32, height: f32) -> Self {
        Self([
            Point2::new(width, height),
            Point2::new(width, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, height),
        ])
    }

    pub fn points(&self) -> &[Point2<f32>; 4] {
        &self.0
    }

    /// Shoelace area of the quadrilateral.
    pub fn area(&self) -> f32 {
        let p = &self.0;
        let mut twice = 0.0f32;
        for i in 0..4 {
            let a = p[i];
            let b = p[(i + 1) % 4];
            twice += a.x * b.y - b.x * a.y;
        }
        0.5 * twice.abs()
    }
}
