//! Compositor geometry and typography constants.
//!
//! The defaults reproduce the editor's fixed 800x800 surface. A config can be
//! loaded from JSON so hosts can tune it without recompiling:
//!
//! ```json
//! { "surfaceSize": 1024, "jpegQuality": 90 }
//! ```
//!
//! Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest grid spacing that is drawn.
pub const MIN_GRID_CELL: f32 = 4.0;

/// Fixed parameters of the raster compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CompositorConfig {
    /// Side length of the square drawing surface, in pixels.
    pub surface_size: u32,

    /// Spacing of the alignment grid.
    pub grid_cell: f32,

    /// Grid stroke color (hex) and its alpha.
    pub grid_color: String,
    pub grid_alpha: u8,

    /// How far the logo origin moves up when the caption is shown.
    pub caption_lift: f32,

    /// Vertical distance of the caption baseline below the surface center.
    pub caption_drop: f32,

    /// Horizontal inset of left/right aligned captions.
    pub caption_margin: f32,

    /// Caption drop shadow.
    pub shadow_blur: f32,
    pub shadow_offset: f32,
    pub shadow_opacity: f32,

    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,

    /// Load the host's fonts for caption rendering.
    pub load_system_fonts: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            surface_size: 800,
            grid_cell: 50.0,
            grid_color: "#000000".to_string(),
            grid_alpha: 0x20,
            caption_lift: 50.0,
            caption_drop: 150.0,
            caption_margin: 50.0,
            shadow_blur: 10.0,
            shadow_offset: 2.0,
            shadow_opacity: 0.3,
            jpeg_quality: 95,
            load_system_fonts: true,
        }
    }
}

impl CompositorConfig {
    /// Returns a copy with every value forced into a usable range.
    pub fn sanitized(mut self) -> Self {
        self.surface_size = self.surface_size.clamp(16, 8192);
        self.grid_cell = if self.grid_cell.is_finite() {
            self.grid_cell.max(MIN_GRID_CELL)
        } else {
            50.0
        };
        self.shadow_blur = self.shadow_blur.max(0.0);
        self.shadow_opacity = self.shadow_opacity.clamp(0.0, 1.0);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }

    /// Horizontal and vertical center of the surface.
    pub fn center(&self) -> f32 {
        self.surface_size as f32 / 2.0
    }

    /// Deserializes a config from JSON. The result is sanitized.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
