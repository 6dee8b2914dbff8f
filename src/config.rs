//! Backdrop configuration.
//!
//! Everything here is appearance or window plumbing. Behavioral constants
//! (particle counts, smoothing factor, pixel-ratio cap, spin rate) are fixed
//! and live next to the code that uses them.
//!
//! Configs can be built in code or parsed from JSON handed over by the page:
//!
//! ```ignore
//! let config = BackdropConfig::from_json(r#"{ "point_size": 0.08, "seed": 42 }"#)?;
//! let config = BackdropConfig::new().with_palette(&[0xFFFFFF, 0x00FFAA]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::{Palette, PORTFOLIO_HEX};

/// Appearance and host settings for a [`Backdrop`](crate::Backdrop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Particle colors as `0xRRGGBB` sRGB values.
    pub palette: Vec<u32>,
    /// Sprite size in world units, attenuated with distance.
    pub point_size: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera distance from the field center along +Z.
    pub camera_distance: f32,
    pub near: f32,
    pub far: f32,
    /// RGBA clear color behind the particles. Ignored when `transparent`.
    pub clear_color: [f64; 4],
    /// Clear to fully transparent so whatever is behind the surface shows
    /// through.
    pub transparent: bool,
    /// MSAA samples per pixel, 1 (off) or 4.
    pub sample_count: u32,
    /// Fixed RNG seed for a reproducible field. Random when `None`.
    pub seed: Option<u64>,
    /// Logical width below which a window host reports a compact viewport.
    pub compact_breakpoint: f32,
    /// Title of the native window.
    pub title: String,
    /// Initial logical size of the native window.
    pub window_size: (u32, u32),
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            palette: PORTFOLIO_HEX.to_vec(),
            point_size: 0.05,
            fov_degrees: 75.0,
            camera_distance: 5.0,
            near: 0.1,
            far: 1000.0,
            clear_color: [0.02, 0.02, 0.05, 1.0],
            transparent: false,
            sample_count: 4,
            seed: None,
            compact_breakpoint: 768.0,
            title: "Backdrop".to_string(),
            window_size: (1280, 720),
        }
    }
}

impl BackdropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the palette from `0xRRGGBB` sRGB values.
    pub fn with_palette(mut self, hex: &[u32]) -> Self {
        self.palette = hex.to_vec();
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Use a fixed seed so every start produces the same field.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_clear_color(mut self, rgba: [f64; 4]) -> Self {
        self.clear_color = rgba;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_sample_count(mut self, samples: u32) -> Self {
        self.sample_count = samples;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_compact_breakpoint(mut self, width: f32) -> Self {
        self.compact_breakpoint = width;
        self
    }

    /// Check that the config can drive a renderer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(ConfigError::InvalidPointSize(self.point_size));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidCamera("fov must be between 0 and 180 degrees"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::InvalidCamera("clip planes must satisfy 0 < near < far"));
        }
        if !(self.camera_distance > self.near && self.camera_distance < self.far) {
            return Err(ConfigError::InvalidCamera("camera distance must lie between near and far"));
        }
        if !matches!(self.sample_count, 1 | 4) {
            return Err(ConfigError::InvalidSampleCount(self.sample_count));
        }
        Ok(())
    }

    /// Color the surface is cleared to each frame.
    pub fn background(&self) -> [f64; 4] {
        if self.transparent {
            [0.0; 4]
        } else {
            self.clear_color
        }
    }

    /// Decoded palette.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Palette::from_srgb_hex(&self.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BackdropConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette().unwrap(), Palette::portfolio());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BackdropConfig::from_json(r#"{ "point_size": 0.08, "seed": 42 }"#).unwrap();
        assert_eq!(config.point_size, 0.08);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fov_degrees, 75.0);
        assert_eq!(config.palette, PORTFOLIO_HEX.to_vec());
    }

    #[test]
    fn test_from_json_rejects_empty_palette() {
        let err = BackdropConfig::from_json(r#"{ "palette": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette));
    }

    #[test]
    fn test_from_json_reports_syntax_errors() {
        let err = BackdropConfig::from_json("{ point_size: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_invalid_values() {
        let bad_size = BackdropConfig::new().with_point_size(0.0);
        assert!(matches!(bad_size.validate(), Err(ConfigError::InvalidPointSize(_))));

        let mut bad_planes = BackdropConfig::new();
        bad_planes.near = 10.0;
        bad_planes.far = 1.0;
        assert!(matches!(bad_planes.validate(), Err(ConfigError::InvalidCamera(_))));
    }

    #[test]
    fn test_antialiasing_defaults_on() {
        let config = BackdropConfig::default();
        assert_eq!(config.sample_count, 4);

        let off = BackdropConfig::from_json(r#"{ "sample_count": 1 }"#).unwrap();
        assert_eq!(off.sample_count, 1);

        let err = BackdropConfig::new().with_sample_count(3).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSampleCount(3)));
    }

    #[test]
    fn test_background() {
        let opaque = BackdropConfig::new().with_clear_color([0.1, 0.2, 0.3, 1.0]);
        assert_eq!(opaque.background(), [0.1, 0.2, 0.3, 1.0]);

        let clear = opaque.with_transparent(true);
        assert_eq!(clear.background(), [0.0; 4]);
        assert!(BackdropConfig::from_json(r#"{ "transparent": true }"#)
            .unwrap()
            .transparent);
    }

    #[test]
    fn test_json_round_trip_keeps_builder_values() {
        let config = BackdropConfig::new()
            .with_palette(&[0x112233])
            .with_seed(7)
            .with_title("Portfolio");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BackdropConfig::from_json(&json).unwrap(), config);
    }
}
