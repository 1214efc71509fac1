/// Reasons the board quadrilateral could not be extracted from a frame.
///
/// All variants are recoverable: the frame is skipped and the next capture
/// is tried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("empty frame ({width}x{height})")]
    EmptyFrame { width: usize, height: usize },
    #[error("no foreground blob after binarization")]
    NoForeground,
    #[error("board outline approximated with {found} vertices (need >= 4)")]
    TooFewVertices { found: usize },
    #[error("board quad covers {area_frac:.3} of the frame (min {min_area_frac:.3})")]
    BoardTooSmall { area_frac: f32, min_area_frac: f32 },
    #[error("board quad has coincident corners")]
    DegenerateQuad,
    #[error("perspective transform could not be solved")]
    Homography,
}
