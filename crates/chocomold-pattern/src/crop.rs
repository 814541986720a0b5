//! Crop selection conversion
//!
//! Crop windows are drawn on a raster preview of the document. A selection
//! is a square in preview pixels; this module maps it into the document's
//! view box.

use crate::import::Frame;
use chocomold_core::constants::CROP_SKIP_RELATIVE_EPSILON;
use chocomold_core::{CropRectangle, Error, Result};
use serde::{Deserialize, Serialize};

/// Square selection in preview-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSelection {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Pixel dimensions of the preview image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl CropSelection {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    /// Map the selection into document coordinates
    pub fn to_crop_rectangle(&self, frame: &Frame, image: &ImageSize) -> Result<CropRectangle> {
        if !(image.width > 0.0 && image.height > 0.0) {
            return Err(Error::invalid_parameter(
                "image_size",
                "preview dimensions must be positive",
            ));
        }
        if frame.is_empty() {
            return Err(Error::invalid_parameter(
                "frame",
                "could not determine the document size for cropping",
            ));
        }
        if !(self.size > 0.0) {
            return Err(Error::invalid_parameter("size", "selection must not be empty"));
        }

        let scale_x = frame.width / image.width;
        let scale_y = frame.height / image.height;
        let min_x = frame.min_x + self.x * scale_x;
        let min_y = frame.min_y + self.y * scale_y;
        Ok(CropRectangle::new(
            min_x,
            min_y,
            min_x + self.size * scale_x,
            min_y + self.size * scale_y,
        ))
    }
}

/// True when the window matches the whole frame on every edge, within
/// `max(dimension, 1) * 0.001` per axis. Clipping can then be skipped.
pub fn covers_frame(rect: &CropRectangle, frame: &Frame) -> bool {
    let eps_x = frame.width.max(1.0) * CROP_SKIP_RELATIVE_EPSILON;
    let eps_y = frame.height.max(1.0) * CROP_SKIP_RELATIVE_EPSILON;
    let fb = frame.bounds();

    (rect.min_x - fb.min_x).abs() <= eps_x
        && (rect.max_x - fb.max_x).abs() <= eps_x
        && (rect.min_y - fb.min_y).abs() <= eps_y
        && (rect.max_y - fb.max_y).abs() <= eps_y
}
