//! Glow / halo sprite generator.
//!
//! Produces a radial gradient that is opaque at the center and fades to fully
//! transparent at the edge, used for sun flares and planetary halos. Callers
//! typically render the sprite on a camera-facing quad with additive
//! blending, so the gradient encodes both color temperature (inner → outer)
//! and falloff (alpha per stop).

use crate::{
    color::{ColorRgb, lerp, parse_hex},
    generator::{TextureBuffer, TextureError, TextureGenerator, validate_size},
};

// --- gradient stops ---------------------------------------------------------

/// Normalized radius of the mid color stop.
const MID_STOP: f64 = 0.35;

/// Normalized radius of the outer color stop.
const OUTER_STOP: f64 = 0.7;

/// Alpha at the mid stop.
const MID_ALPHA: u8 = 0xbb;

/// Alpha at the outer stop.
const OUTER_ALPHA: u8 = 0x55;

// ----------------------------------------------------------------------------

/// Configures the appearance of a [`GlowGenerator`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlowConfig {
    /// Color at the center, rendered at full opacity.
    pub inner: String,
    /// Color at 35% of the radius.
    pub mid: String,
    /// Color at 70% of the radius.
    pub outer: String,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            inner: "#ffd15c".into(),
            mid: "#ff8a00".into(),
            outer: "#ff2d00".into(),
        }
    }
}

/// Procedural glow sprite generator.
///
/// Drives [`TextureGenerator::generate`] using a [`GlowConfig`]. Construct
/// via [`GlowGenerator::new`] and call `generate` directly, or spawn a
/// [`crate::async_gen::PendingTexture::glow`] task for non-blocking
/// generation.
pub struct GlowGenerator {
    config: GlowConfig,
}

impl GlowGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GlowConfig) -> Self {
        Self { config }
    }
}

impl TextureGenerator for GlowGenerator {
    fn generate(&self, size: u32) -> Result<TextureBuffer, TextureError> {
        validate_size(size)?;
        let c = &self.config;

        // Four stops, ending on transparent black — the same endpoint a
        // canvas radial gradient reaches for `#00000000`.
        let stops: [(f64, ColorRgb, u8); 4] = [
            (0.0, parse_hex(&c.inner)?, 255),
            (MID_STOP, parse_hex(&c.mid)?, MID_ALPHA),
            (OUTER_STOP, parse_hex(&c.outer)?, OUTER_ALPHA),
            (1.0, ColorRgb { r: 0, g: 0, b: 0 }, 0),
        ];

        let center = f64::from(size) / 2.0;
        let w = size as usize;
        let mut pixels = vec![0u8; w * w * 4];

        for y in 0..w {
            let dy = y as f64 - center;
            for x in 0..w {
                let dx = x as f64 - center;
                // Corners lie beyond the gradient radius; they take the final
                // (fully transparent) stop by extension.
                let t = (dx.hypot(dy) / center).min(1.0);
                let rgba = gradient_at(&stops, t);

                let i = (y * w + x) * 4;
                pixels[i..i + 4].copy_from_slice(&rgba);
            }
        }

        Ok(TextureBuffer { pixels, size })
    }
}

/// Evaluate a stop list at normalized radius `t` in `[0, 1]` with straight
/// (non-premultiplied) RGBA interpolation between neighboring stops.
fn gradient_at(stops: &[(f64, ColorRgb, u8)], t: f64) -> [u8; 4] {
    for pair in stops.windows(2) {
        let (p0, c0, a0) = pair[0];
        let (p1, c1, a1) = pair[1];
        if t <= p1 {
            let local = (t - p0) / (p1 - p0);
            return [
                lerp(c0.r, c1.r, local),
                lerp(c0.g, c1.g, local),
                lerp(c0.b, c1.b, local),
                lerp(a0, a1, local),
            ];
        }
    }
    let (_, c, a) = stops[stops.len() - 1];
    [c.r, c.g, c.b, a]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(map: &TextureBuffer, x: u32, y: u32) -> [u8; 4] {
        let w = map.size as usize;
        let i = (y as usize * w + x as usize) * 4;
        map.pixels[i..i + 4].try_into().unwrap()
    }

    #[test]
    fn output_is_deterministic() {
        let generator = GlowGenerator::new(GlowConfig::default());
        let a = generator.generate(64).unwrap();
        let b = generator.generate(64).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn center_is_the_inner_color_at_full_opacity() {
        let map = GlowGenerator::new(GlowConfig::default()).generate(128).unwrap();
        assert_eq!(map.pixels.len(), 128 * 128 * 4);
        // Size is even, so the pixel at (size/2, size/2) sits exactly on the
        // gradient center.
        assert_eq!(pixel_at(&map, 64, 64), [0xff, 0xd1, 0x5c, 0xff]);
    }

    #[test]
    fn corners_are_fully_transparent() {
        let map = GlowGenerator::new(GlowConfig::default()).generate(128).unwrap();
        for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127)] {
            assert_eq!(pixel_at(&map, x, y), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn alpha_fades_monotonically_from_center_to_edge() {
        let map = GlowGenerator::new(GlowConfig::default()).generate(128).unwrap();
        let mut previous = u8::MAX;
        for x in 64..128 {
            let alpha = pixel_at(&map, x, 64)[3];
            assert!(
                alpha <= previous,
                "alpha rose from {previous} to {alpha} at x={x}"
            );
            previous = alpha;
        }
        assert_eq!(pixel_at(&map, 64, 64)[3], 255);
        // The last texel center sits just inside the gradient radius, so it
        // is nearly (not exactly) transparent.
        assert!(pixel_at(&map, 127, 64)[3] <= 8);
    }

    #[test]
    fn stop_alphas_appear_at_their_radii() {
        let map = GlowGenerator::new(GlowConfig::default()).generate(256).unwrap();
        let center = 128u32;
        let radius = 128.0;
        // One texel inside each stop radius keeps the sample in the segment
        // leading up to the stop.
        let near_mid = pixel_at(&map, center + (MID_STOP * radius) as u32 - 1, center)[3];
        assert!(
            near_mid > MID_ALPHA && near_mid < 255,
            "alpha just inside the mid stop was {near_mid}"
        );
        let near_outer = pixel_at(&map, center + (OUTER_STOP * radius) as u32 - 1, center)[3];
        assert!(
            near_outer > OUTER_ALPHA && near_outer < MID_ALPHA,
            "alpha just inside the outer stop was {near_outer}"
        );
    }

    #[test]
    fn malformed_color_is_rejected() {
        let generator = GlowGenerator::new(GlowConfig {
            inner: "#ffd15c".into(),
            mid: "nope".into(),
            outer: "#ff2d00".into(),
        });
        assert!(matches!(
            generator.generate(64),
            Err(TextureError::InvalidColor { .. })
        ));
    }
}
