//! Width and height of a rendering surface in device pixels.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Validated surface size. Both sides are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub struct Extent {
    width: f64,
    height: f64,
}

#[derive(Serialize, Deserialize)]
struct RawExtent {
    width: f64,
    height: f64,
}

impl Extent {
    /// Returns `FolioError::InvalidDimensions` unless both sides are finite and > 0.
    pub fn new(width: f64, height: f64) -> Result<Self, FolioError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(FolioError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    /// Integer pixel sizes as reported by CLI flags and `canvas.width`.
    pub fn from_pixels(width: usize, height: usize) -> Result<Self, FolioError> {
        Self::new(width as f64, height as f64)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Clamps a point into `[0, width] x [0, height]`.
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        point.clamp(DVec2::ZERO, self.size())
    }

    /// Whether `point` lies in the closed rectangle.
    pub fn contains(&self, point: DVec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl TryFrom<RawExtent> for Extent {
    type Error = FolioError;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        Extent::new(raw.width, raw.height)
    }
}

impl From<Extent> for RawExtent {
    fn from(e: Extent) -> Self {
        RawExtent {
            width: e.width,
            height: e.height,
        }
    }
}
