//! Bounding extents of annotated bodies

use serde::{Deserialize, Serialize};

/// Extents of a body in meters: `x` is depth (thickness), `y` width, `z` height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Scale {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn depth(&self) -> f32 {
        self.x
    }

    pub fn width(&self) -> f32 {
        self.y
    }

    pub fn height(&self) -> f32 {
        self.z
    }

    /// All extents are finite and strictly positive
    pub fn is_positive(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl From<[f32; 3]> for Scale {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}
