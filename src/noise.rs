//! Deterministic sine-product fractal field.
//!
//! The field is a fixed sum of five octaves; octave `i` contributes
//!
//! ```text
//! amp_i · sin((x + seed) · freq_i) · cos((y − seed) · freq_i)
//! ```
//!
//! with `amp` starting at 0.5 and halving, `freq` starting at 0.02 and
//! doubling. The sum is remapped from its nominal `[-1, 1]` range to `[0, 1]`
//! via `(v + 1) / 2`.
//!
//! A closed-form sine basis instead of lattice noise keeps a full 512×512
//! sample pass cheap enough to run synchronously on first render, while still
//! producing organic mottling rather than flat bands. The trade-off is that
//! the field is not seamless at texture edges; the sine basis reduces seam
//! visibility but does not eliminate it.

/// Number of octaves summed per sample.
const OCTAVES: u32 = 5;

/// Amplitude of the first octave; halves every octave.
const BASE_AMPLITUDE: f64 = 0.5;

/// Spatial frequency of the first octave; doubles every octave.
const BASE_FREQUENCY: f64 = 0.02;

/// A seeded 2-D scalar field, sampled per pixel by the surface generator.
///
/// The sampler holds no mutable state: [`get`](Self::get) is a pure function
/// of `(x, y, seed)`, so regenerating a texture for the same body (after a
/// window resize, say) is visually identical.
pub struct SineField {
    /// Phase offset applied to both axes, with opposite signs, so bodies
    /// sharing a palette still get distinct surfaces. Any finite value works;
    /// callers usually derive it from a stable per-body attribute.
    pub seed: f64,
}

impl SineField {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// Sample the field at pixel coordinates.
    ///
    /// Nominally in `[0, 1]`. The octave sum can overshoot by a small float
    /// epsilon, so clamp before using the value as a blend factor.
    pub fn get(&self, x: f64, y: f64) -> f64 {
        let mut v = 0.0;
        let mut amp = BASE_AMPLITUDE;
        let mut freq = BASE_FREQUENCY;
        for _ in 0..OCTAVES {
            v += amp * ((x + self.seed) * freq).sin() * ((y - self.seed) * freq).cos();
            amp *= 0.5;
            freq *= 2.0;
        }
        (v + 1.0) / 2.0
    }
}
