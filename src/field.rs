//! Particle field generation.
//!
//! The field is a fixed cloud of points inside a cube centered on the origin.
//! It is built once when the backdrop starts and never changes afterwards;
//! all motion on screen comes from rotating the whole field.
//!
//! # Example
//!
//! ```ignore
//! use backdrop::field::{Palette, ParticleBuffer};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let field = ParticleBuffer::generate(3000, &Palette::portfolio(), &mut rng);
//! assert_eq!(field.len(), 3000);
//! ```

use glam::Vec3;
use rand::Rng;

use crate::error::ConfigError;

/// Side length of the cube particles are scattered in.
pub const FIELD_EXTENT: f32 = 15.0;

/// Reference palette as sRGB hex: light gray, deep purple, deep red.
pub const PORTFOLIO_HEX: [u32; 3] = [0xD1D1D1, 0x7F3ACE, 0xE53E3E];

/// An ordered, non-empty set of linear RGB colors particles are painted with.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Build a palette from linear RGB colors.
    pub fn new(colors: Vec<Vec3>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Build a palette from `0xRRGGBB` sRGB values.
    ///
    /// Components are decoded to linear space so the sRGB surface encodes
    /// them back to the authored hex on screen.
    pub fn from_srgb_hex(hex: &[u32]) -> Result<Self, ConfigError> {
        Self::new(hex.iter().map(|&h| srgb_hex_to_linear(h)).collect())
    }

    /// The three-color palette of the portfolio page.
    pub fn portfolio() -> Self {
        Self {
            colors: PORTFOLIO_HEX.iter().map(|&h| srgb_hex_to_linear(h)).collect(),
        }
    }

    /// Palette entries in order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Number of entries (K).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether `color` is exactly one of the palette entries.
    pub fn contains(&self, color: Vec3) -> bool {
        self.colors.iter().any(|&c| c == color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::portfolio()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

/// Static position and color data for every particle in the field.
///
/// Both arrays are flat `[x, y, z, x, y, z, ...]` / `[r, g, b, ...]` so they
/// can be uploaded to vertex buffers as-is.
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl ParticleBuffer {
    /// Scatter `count` particles uniformly in the field cube.
    ///
    /// Each coordinate is `(u - 0.5) * FIELD_EXTENT` for an independent
    /// uniform `u` in `[0, 1)`. Each particle copies one palette entry chosen
    /// uniformly at random; colors carry no spatial correlation.
    pub fn generate<R: Rng + ?Sized>(count: usize, palette: &Palette, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);

        for _ in 0..count {
            for _ in 0..3 {
                positions.push((rng.gen::<f32>() - 0.5) * FIELD_EXTENT);
            }

            let color = palette.colors[rng.gen_range(0..palette.colors.len())];
            colors.extend_from_slice(&color.to_array());
        }

        Self { positions, colors }
    }

    /// Number of particles (N).
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat position array, `3 * len()` floats.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat color array, `3 * len()` floats.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Iterate `(position, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| (Vec3::from_slice(p), Vec3::from_slice(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_positions_inside_cube() {
        let mut rng = SmallRng::seed_from_u64(1);
        let field = ParticleBuffer::generate(3000, &Palette::portfolio(), &mut rng);

        let half = FIELD_EXTENT / 2.0;
        assert!(field.positions().iter().all(|&c| (-half..=half).contains(&c)));
    }

    #[test]
    fn test_colors_come_from_palette() {
        let palette = Palette::portfolio();
        let mut rng = SmallRng::seed_from_u64(2);
        let field = ParticleBuffer::generate(1500, &palette, &mut rng);

        for (_, color) in field.iter() {
            assert!(palette.contains(color), "color {:?} not in palette", color);
        }
    }

    #[test]
    fn test_buffer_lengths_match() {
        let mut rng = SmallRng::seed_from_u64(3);
        let field = ParticleBuffer::generate(1500, &Palette::portfolio(), &mut rng);

        assert_eq!(field.len(), 1500);
        assert_eq!(field.positions().len(), 3 * 1500);
        assert_eq!(field.colors().len(), 3 * 1500);
    }

    #[test]
    fn test_every_palette_entry_is_used() {
        let palette = Palette::portfolio();
        let mut rng = SmallRng::seed_from_u64(4);
        let field = ParticleBuffer::generate(3000, &palette, &mut rng);

        for &entry in palette.colors() {
            assert!(field.iter().any(|(_, c)| c == entry));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let palette = Palette::portfolio();
        let a = ParticleBuffer::generate(100, &palette, &mut SmallRng::seed_from_u64(9));
        let b = ParticleBuffer::generate(100, &palette, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.colors(), b.colors());
    }

    #[test]
    fn test_empty_field() {
        let mut rng = SmallRng::seed_from_u64(5);
        let field = ParticleBuffer::generate(0, &Palette::portfolio(), &mut rng);
        assert!(field.is_empty());
        assert_eq!(field.iter().count(), 0);
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(Palette::new(Vec::new()), Err(ConfigError::EmptyPalette)));
        assert!(matches!(Palette::from_srgb_hex(&[]), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_srgb_decoding() {
        let white = srgb_hex_to_linear(0xFFFFFF);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);

        let black = srgb_hex_to_linear(0x000000);
        assert_eq!(black, Vec3::ZERO);

        // Mid gray decodes well below 0.5 in linear space
        let gray = srgb_hex_to_linear(0x808080);
        assert!(gray.x > 0.2 && gray.x < 0.23);
    }
}
