use serde::{Deserialize, Serialize};

/// Bounding box of the two-panel container in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A container anchored at the viewport origin.
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Convert a viewport X coordinate to one relative to the container.
    pub fn relative_x(&self, viewport_x: f64) -> f64 {
        viewport_x - self.left
    }
}
