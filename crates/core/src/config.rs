//! View configuration: the window-space projection shared by a scene.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::error::GgError;

/// Size and depth range of the drawing surface.
///
/// Coordinates are window pixels with the origin at the top-left corner and
/// +Y pointing down, matching how primitives are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parses a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Config` on malformed JSON or non-positive sizes.
    pub fn from_json(json: &str) -> Result<Self, GgError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GgError::Config(e.to_string()))?;
        if config.width <= 0.0 || config.height <= 0.0 {
            return Err(GgError::Config(format!(
                "width and height must be positive, got {}x{}",
                config.width, config.height
            )));
        }
        Ok(config)
    }

    /// Orthographic projection mapping `(0, 0)..(width, height)` onto clip
    /// space with the origin at the top-left.
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(0.0, self.width, self.height, 0.0, self.near, self.far)
    }

    /// Camera transform; scenes are drawn without one.
    pub fn view(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            near: 0.0,
            far: 1.0,
        }
    }
}
