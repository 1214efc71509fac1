//! Frame sources and frame preparation.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbImage};

#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Something that yields camera frames.
pub trait FrameSource {
    /// Next frame; `Ok(None)` means no more frames and ends the loop.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError>;
}

/// Ordered list of image files replayed as frames.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tif"];

impl ImageSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    /// All image files in `dir`, sorted by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FrameError> {
        let dir = dir.as_ref();
        let io_err = |source| FrameError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_image {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self::new(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        Ok(Some(load_rgb(path)?))
    }
}

/// Decode an image file into RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage, FrameError> {
    let reader = ImageReader::open(path).map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let img = reader.decode().map_err(|source| FrameError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Centre-crop to a square, resize to `width × height` and optionally rotate
/// by 180°.
pub fn prepare_frame(raw: &RgbImage, width: u32, height: u32, rotate: bool) -> RgbImage {
    let side = raw.width().min(raw.height());
    let x = (raw.width() - side) / 2;
    let y = (raw.height() - side) / 2;
    let square = imageops::crop_imm(raw, x, y, side, side).to_image();
    let resized = if square.dimensions() == (width, height) {
        square
    } else {
        imageops::resize(&square, width, height, FilterType::Triangle)
    };
    if rotate {
        imageops::rotate180(&resized)
    } else {
        resized
    }
}
