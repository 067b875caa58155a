//! Planetary ring texture generator.
//!
//! Produces a face-on annulus of semi-transparent bands whose opacity falls
//! off toward the outer edge, approximating the density falloff of a real
//! ring system. This is a cheap visual heuristic, not a particle simulation;
//! the result is meant to be mapped onto a flat annulus (or thin torus) in
//! the scene.

use crate::{
    color::parse_hex,
    generator::{TextureBuffer, TextureError, TextureGenerator, validate_size},
};

// --- tuning constants -------------------------------------------------------

/// Inner edge of the band, as a fraction of the half-size.
const INNER_EDGE: f64 = 0.3;

/// Outer edge of the band, as a fraction of the half-size.
const OUTER_EDGE: f64 = 0.48;

// ----------------------------------------------------------------------------

/// Configures the appearance of a [`RingGenerator`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RingConfig {
    /// Ring color as a hex string (`#RGB` or `#RRGGBB`, `#` optional).
    pub color: String,
    /// Opacity at the inner edge of the band. A visual tuning knob: the
    /// default keeps even the densest band below ~63% opacity so the parent
    /// body stays visible through it.
    pub max_alpha: u8,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            max_alpha: 160,
        }
    }
}

/// Procedural ring system generator.
///
/// Drives [`TextureGenerator::generate`] using a [`RingConfig`]. Construct
/// via [`RingGenerator::new`] and call `generate` directly, or spawn a
/// [`crate::async_gen::PendingTexture::ring`] task for non-blocking
/// generation.
pub struct RingGenerator {
    config: RingConfig,
}

impl RingGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: RingConfig) -> Self {
        Self { config }
    }
}

impl TextureGenerator for RingGenerator {
    fn generate(&self, size: u32) -> Result<TextureBuffer, TextureError> {
        validate_size(size)?;
        let c = &self.config;
        let color = parse_hex(&c.color)?;

        let center = f64::from(size) / 2.0;
        let inner = center * INNER_EDGE;
        let outer = center * OUTER_EDGE;

        let w = size as usize;
        // Everything outside the band stays fully transparent.
        let mut pixels = vec![0u8; w * w * 4];

        for y in 0..w {
            let dy = y as f64 - center;
            for x in 0..w {
                let dx = x as f64 - center;
                let radius = dx.hypot(dy);
                if radius < inner || radius >= outer {
                    continue;
                }

                // Density falls linearly from the inner edge to zero at the
                // outer edge.
                let falloff = 1.0 - (radius - inner) / (outer - inner);
                let alpha = (falloff * f64::from(c.max_alpha))
                    .round()
                    .clamp(0.0, 255.0) as u8;

                let i = (y * w + x) * 4;
                pixels[i] = color.r;
                pixels[i + 1] = color.g;
                pixels[i + 2] = color.b;
                pixels[i + 3] = alpha;
            }
        }

        Ok(TextureBuffer { pixels, size })
    }
}
