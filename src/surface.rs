//! Planet surface texture generator.
//!
//! Blends two palette colors through the sine-product fractal field, giving
//! each body a distinct mottled surface driven only by its palette and a
//! seed — no external image required. This is the fallback path for bodies
//! whose photographic texture is missing or still loading, so generation has
//! to stay cheap enough to run speculatively.

use crate::{
    color::{lerp, parse_hex},
    generator::{TextureBuffer, TextureError, TextureGenerator, validate_size},
    noise::SineField,
};

// --- tuning constants -------------------------------------------------------

/// Lower bound of the blend factor. Lifting the floor off zero keeps every
/// pixel visibly mixed and raises contrast across the map.
const BLEND_FLOOR: f64 = 0.3;

/// Span of the blend factor above [`BLEND_FLOOR`].
const BLEND_SPAN: f64 = 0.7;

// ----------------------------------------------------------------------------

/// Configures the appearance of a [`SurfaceGenerator`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SurfaceConfig {
    /// Base color as a hex string (`#RGB` or `#RRGGBB`, `#` optional).
    pub primary: String,
    /// Accent color blended over the base, same formats.
    pub secondary: String,
    /// Phase offset for the fractal field. Any finite value; derive it from a
    /// stable per-body attribute (the reference scenes use the body's
    /// relative size times a small constant) so regenerating the same body is
    /// visually identical.
    pub seed: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            primary: "#9ca3af".into(),
            secondary: "#60a5fa".into(),
            seed: 7.0,
        }
    }
}

/// Procedural planet surface generator.
///
/// Drives [`TextureGenerator::generate`] using a [`SurfaceConfig`]. Construct
/// via [`SurfaceGenerator::new`] and call `generate` directly, or spawn a
/// [`crate::async_gen::PendingTexture::surface`] task for non-blocking
/// generation.
pub struct SurfaceGenerator {
    config: SurfaceConfig,
}

impl SurfaceGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: SurfaceConfig) -> Self {
        Self { config }
    }
}

impl TextureGenerator for SurfaceGenerator {
    fn generate(&self, size: u32) -> Result<TextureBuffer, TextureError> {
        validate_size(size)?;
        let c = &self.config;
        let primary = parse_hex(&c.primary)?;
        let secondary = parse_hex(&c.secondary)?;
        let field = SineField::new(c.seed);

        let w = size as usize;
        let mut pixels = vec![0u8; w * w * 4];

        for y in 0..w {
            for x in 0..w {
                let sample = field.get(x as f64, y as f64);
                // The field may overshoot [0, 1] by a float epsilon; clamp
                // before using it as a blend factor.
                let t = (BLEND_FLOOR + BLEND_SPAN * sample).clamp(0.0, 1.0);

                let i = (y * w + x) * 4;
                pixels[i] = lerp(primary.r, secondary.r, t);
                pixels[i + 1] = lerp(primary.g, secondary.g, t);
                pixels[i + 2] = lerp(primary.b, secondary.b, t);
                pixels[i + 3] = 255;
            }
        }

        Ok(TextureBuffer { pixels, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mercury(seed: f64) -> SurfaceGenerator {
        SurfaceGenerator::new(SurfaceConfig {
            primary: "#9ca3af".into(),
            secondary: "#60a5fa".into(),
            seed,
        })
    }

    #[test]
    fn output_is_deterministic() {
        let a = mercury(4.9).generate(32).unwrap();
        let b = mercury(4.9).generate(32).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn output_is_square_rgba_and_opaque() {
        let map = mercury(7.0).generate(48).unwrap();
        assert_eq!(map.size, 48);
        assert_eq!(map.pixels.len(), 48 * 48 * 4);
        assert!(map.pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn every_pixel_is_a_blend_of_the_two_palette_colors() {
        let map = mercury(7.0).generate(4).unwrap();
        assert_eq!(map.pixels.len(), 64);

        let primary = [0x9c, 0xa3, 0xaf];
        let secondary = [0x60, 0xa5, 0xfa];
        for px in map.pixels.chunks_exact(4) {
            for ch in 0..3 {
                let lo = primary[ch].min(secondary[ch]);
                let hi = primary[ch].max(secondary[ch]);
                assert!(
                    (lo..=hi).contains(&px[ch]),
                    "channel {ch} escaped the palette span: {px:?}"
                );
            }
            // For this palette and seed every blend factor stays strictly
            // inside (0, 1), so no pixel collapses to a raw endpoint.
            assert_ne!(&px[..3], &primary);
            assert_ne!(&px[..3], &secondary);
        }
    }

    #[test]
    fn different_seeds_give_different_surfaces() {
        let a = mercury(4.9).generate(32).unwrap();
        let b = mercury(6.65).generate(32).unwrap();
        assert_ne!(a.pixels, b.pixels);
    }

    #[test]
    fn malformed_colors_are_rejected() {
        let generator = SurfaceGenerator::new(SurfaceConfig {
            primary: "notacolor".into(),
            secondary: "#fff".into(),
            seed: 1.0,
        });
        assert!(matches!(
            generator.generate(256),
            Err(TextureError::InvalidColor { .. })
        ));
    }

    #[test]
    fn zero_size_is_rejected() {
        let generator = SurfaceGenerator::new(SurfaceConfig {
            primary: "#fff".into(),
            secondary: "#000".into(),
            seed: 1.0,
        });
        assert!(matches!(
            generator.generate(0),
            Err(TextureError::ZeroSize)
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SurfaceConfig {
            primary: "#22d3ee".into(),
            secondary: "#84cc16".into(),
            seed: 13.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SurfaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.primary, config.primary);
        assert_eq!(back.secondary, config.secondary);
        assert_eq!(back.seed, config.seed);
    }
}
