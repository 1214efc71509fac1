//! Flat JSON configuration for the frame loop.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Player;
use crate::detect::{BilateralParams, CellGeometry, ClassifierParams, HoughParams, RectifierParams};
use crate::engine::{EncodingError, PlayerEncoding};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Colours (RGB) and stroke width used for annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub line_color: [u8; 3],
    pub circle_color: [u8; 3],
    /// Overlay of circle cells.
    pub overlay_color_1: [u8; 3],
    /// Overlay of cross cells.
    pub overlay_color_2: [u8; 3],
    pub line_weight: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        TrisConfig::default().render_style()
    }
}

/// Everything the frame loop needs, loaded once at start.
///
/// Every key is optional in the JSON file; missing keys take the defaults
/// below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrisConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Rotate frames by 180° (camera mounted upside down).
    pub rotate: bool,
    pub margin_x: usize,
    pub margin_y: usize,
    /// Pixels trimmed from each side of a cell before classification.
    pub cell_inset: usize,
    pub line_color: [u8; 3],
    pub circle_color: [u8; 3],
    pub overlay_color_1: [u8; 3],
    pub overlay_color_2: [u8; 3],
    pub line_weight: u32,
    pub empty_threshold: f32,
    pub min_dist: f32,
    pub param1: f32,
    pub param2: u32,
    pub min_radius: u32,
    pub max_radius: u32,
    pub min_arc_coverage: f32,
    pub bilateral_diameter: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
    pub approx_epsilon_frac: f32,
    pub min_area_frac: f32,
    pub player_a_code: u32,
    pub player_b_code: u32,
    /// Side played by the program; `null` for two human players.
    pub computer: Option<Player>,
    pub human_starts: bool,
}

impl Default for TrisConfig {
    fn default() -> Self {
        let rect = RectifierParams::default();
        let hough = HoughParams::default();
        Self {
            frame_width: 480,
            frame_height: 480,
            rotate: false,
            margin_x: 0,
            margin_y: 0,
            cell_inset: 8,
            line_color: [0, 255, 0],
            circle_color: [255, 0, 255],
            overlay_color_1: [0, 0, 255],
            overlay_color_2: [255, 0, 0],
            line_weight: 2,
            empty_threshold: ClassifierParams::default().empty_threshold,
            min_dist: hough.min_dist,
            param1: hough.param1,
            param2: hough.param2,
            min_radius: hough.min_radius,
            max_radius: hough.max_radius,
            min_arc_coverage: hough.min_arc_coverage,
            bilateral_diameter: rect.bilateral.diameter,
            sigma_color: rect.bilateral.sigma_color,
            sigma_space: rect.bilateral.sigma_space,
            approx_epsilon_frac: rect.epsilon_frac,
            min_area_frac: rect.min_area_frac,
            player_a_code: 2,
            player_b_code: 3,
            computer: Some(Player::B),
            human_starts: true,
        }
    }
}

impl TrisConfig {
    /// Read and validate a JSON config file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size {}x{} must be non-zero",
                self.frame_width, self.frame_height
            )));
        }
        if !(0.0..=1.0).contains(&self.empty_threshold) {
            return Err(ConfigError::Invalid(format!(
                "empty_threshold {} outside [0, 1]",
                self.empty_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_arc_coverage) {
            return Err(ConfigError::Invalid(format!(
                "min_arc_coverage {} outside [0, 1]",
                self.min_arc_coverage
            )));
        }
        if self.max_radius != 0 && self.min_radius > self.max_radius {
            return Err(ConfigError::Invalid(format!(
                "min_radius {} exceeds max_radius {}",
                self.min_radius, self.max_radius
            )));
        }
        if self.approx_epsilon_frac <= 0.0 {
            return Err(ConfigError::Invalid(
                "approx_epsilon_frac must be positive".to_string(),
            ));
        }
        let geometry = self.classifier_params().geometry;
        if geometry.cell_width <= 2 * self.cell_inset || geometry.cell_height <= 2 * self.cell_inset
        {
            return Err(ConfigError::Invalid(format!(
                "cell_inset {} leaves nothing of a {}x{} cell",
                self.cell_inset, geometry.cell_width, geometry.cell_height
            )));
        }
        self.encoding()?;
        Ok(())
    }

    pub fn rectifier_params(&self) -> RectifierParams {
        RectifierParams {
            output_width: self.frame_width as usize,
            output_height: self.frame_height as usize,
            bilateral: BilateralParams {
                diameter: self.bilateral_diameter,
                sigma_color: self.sigma_color,
                sigma_space: self.sigma_space,
            },
            epsilon_frac: self.approx_epsilon_frac,
            min_area_frac: self.min_area_frac,
        }
    }

    /// Cells tile the rectified square: `frame_width / 3 × frame_height / 3`.
    pub fn classifier_params(&self) -> ClassifierParams {
        let base = CellGeometry::for_canonical(self.frame_width as usize, self.frame_height as usize);
        ClassifierParams {
            geometry: CellGeometry {
                margin_x: self.margin_x,
                margin_y: self.margin_y,
                inset: self.cell_inset,
                ..base
            },
            empty_threshold: self.empty_threshold,
            hough: HoughParams {
                min_dist: self.min_dist,
                param1: self.param1,
                param2: self.param2,
                min_radius: self.min_radius,
                max_radius: self.max_radius,
                min_arc_coverage: self.min_arc_coverage,
            },
        }
    }

    pub fn encoding(&self) -> Result<PlayerEncoding, EncodingError> {
        PlayerEncoding::new(self.player_a_code, self.player_b_code)
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            line_color: self.line_color,
            circle_color: self.circle_color,
            overlay_color_1: self.overlay_color_1,
            overlay_color_2: self.overlay_color_2,
            line_weight: self.line_weight,
        }
    }

    /// Player whose mark is expected on the first observed frame.
    pub fn first_player(&self) -> Player {
        match self.computer {
            Some(computer) if !self.human_starts => computer,
            Some(computer) => computer.other(),
            None => Player::A,
        }
    }
}
