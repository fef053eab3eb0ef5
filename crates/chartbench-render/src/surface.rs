use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SurfaceId = Uuid;

/// The pixel box an engine instance renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceBox {
    pub id: SurfaceId,
    pub width_px: u32,
    pub height_px: u32,
}

impl SurfaceBox {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            width_px,
            height_px,
        }
    }

    /// Round fractional layout pixels to whole device pixels.
    pub fn from_layout(width: f64, height: f64) -> Self {
        Self::new(to_px(width), to_px(height))
    }

    /// Update the pixel box. Returns `true` if it changed.
    pub fn resize(&mut self, width_px: u32, height_px: u32) -> bool {
        if self.width_px == width_px && self.height_px == height_px {
            return false;
        }
        self.width_px = width_px;
        self.height_px = height_px;
        true
    }

    pub fn resize_layout(&mut self, width: f64, height: f64) -> bool {
        self.resize(to_px(width), to_px(height))
    }

    pub fn is_empty(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }
}

fn to_px(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
