//! Core trait and data types shared by all texture generators.

use std::sync::OnceLock;

use bevy::{
    asset::{Assets, RenderAssetUsages},
    image::{Image, ImageAddressMode, ImageSampler, ImageSamplerDescriptor},
    prelude::Handle,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};

/// Error returned for invalid generation input.
#[derive(Debug)]
pub enum TextureError {
    /// `size` was zero, which is not a valid wgpu texture size.
    ZeroSize,
    /// `size` exceeded [`MAX_SIZE`].
    SizeTooLarge { size: u32, max: u32 },
    /// A palette entry was not a valid `#RGB` / `#RRGGBB` hex color.
    InvalidColor { input: String },
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::ZeroSize => write!(f, "texture size must be non-zero"),
            TextureError::SizeTooLarge { size, max } => {
                write!(f, "texture size {size} exceeds MAX_SIZE={max}")
            }
            TextureError::InvalidColor { input } => {
                write!(f, "{input:?} is not a valid hex color")
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// Raw pixel output of a [`TextureGenerator`].
///
/// Square, row-major RGBA8; `pixels.len() == size * size * 4`. Surface maps
/// are fully opaque, ring and glow maps carry their silhouette in the alpha
/// channel. The buffer has no lifecycle beyond the generation call that
/// produced it — the caller owns it outright and typically uploads it via
/// [`buffer_to_image`] or [`buffer_to_image_sprite`] and drops the raw bytes.
pub struct TextureBuffer {
    /// RGBA8 pixels, row-major.
    pub pixels: Vec<u8>,
    /// Edge length in texels.
    pub size: u32,
}

/// Trait for procedural texture configuration structs.
///
/// Each struct that drives a specific texture type (surface, ring, glow)
/// provides an implementation that turns its configuration into a
/// fully-populated [`TextureBuffer`].
pub trait TextureGenerator {
    /// Generate a square RGBA8 pixel buffer at the given edge length.
    ///
    /// Fails on a zero or oversized `size` and on malformed palette colors;
    /// there are no other failure modes, and generation never fails partway.
    fn generate(&self, size: u32) -> Result<TextureBuffer, TextureError>;
}

/// Maximum allowed texture edge length.
///
/// Capped at 4096 to bound peak memory usage. A single RGBA map at 8192 is
/// ~268 MB before mipmaps; with four concurrent background tasks that tops
/// 1 GB on top of whatever the application itself holds. At 4096 the base
/// level is ~67 MB per task.
pub const MAX_SIZE: u32 = 4096;

/// Size guard for texture generators.
///
/// Call at the top of every [`TextureGenerator::generate`] implementation.
#[inline]
pub fn validate_size(size: u32) -> Result<(), TextureError> {
    if size == 0 {
        return Err(TextureError::ZeroSize);
    }
    if size > MAX_SIZE {
        return Err(TextureError::SizeTooLarge {
            size,
            max: MAX_SIZE,
        });
    }
    Ok(())
}

/// Upload a [`TextureBuffer`] into [`Assets<Image>`] with a repeat-wrapping
/// sampler.
///
/// Use this for surface maps wrapped around sphere geometry. Takes `buffer`
/// by value to move the pixel data directly into the `Image` asset, avoiding
/// an extra copy of up to W × H × 4 bytes.
pub fn buffer_to_image(buffer: TextureBuffer, images: &mut Assets<Image>) -> Handle<Image> {
    images.add(make_image(buffer, ImageAddressMode::Repeat))
}

/// Upload a [`TextureBuffer`] into [`Assets<Image>`] with a clamp-to-edge
/// sampler.
///
/// Use this for ring and glow sprites, where the texture must not tile and
/// the alpha silhouette must not bleed across edges. For surface maps use
/// [`buffer_to_image`] instead.
pub fn buffer_to_image_sprite(buffer: TextureBuffer, images: &mut Assets<Image>) -> Handle<Image> {
    images.add(make_image(buffer, ImageAddressMode::ClampToEdge))
}

/// Average a 2×2 block of RGBA8 pixels.
///
/// RGB is decoded from sRGB, averaged in linear light, and re-encoded —
/// averaging in non-linear space makes mipmaps artificially dark. Alpha is
/// already linear and is averaged directly.
fn average_block(pixels: &[[u8; 4]]) -> [u8; 4] {
    let n = pixels.len() as f32;
    let mut r = 0.0f32;
    let mut g = 0.0f32;
    let mut b = 0.0f32;
    let mut a = 0u32;
    for p in pixels {
        r += srgb_to_linear(p[0]);
        g += srgb_to_linear(p[1]);
        b += srgb_to_linear(p[2]);
        a += u32::from(p[3]);
    }
    [
        linear_to_srgb(r / n),
        linear_to_srgb(g / n),
        linear_to_srgb(b / n),
        (a / pixels.len() as u32) as u8,
    ]
}

/// Recursively downsamples a base RGBA8 image to generate all mipmap levels.
///
/// Appends each successive level (half the edge length) directly onto `data`
/// using a 2×2 box filter. Odd edge lengths are handled by clamping the
/// source 2×2 block to the actual image boundary.
///
/// Returns the expanded buffer and the total number of mip levels (including
/// level 0).
fn generate_mipmaps(mut data: Vec<u8>, base_size: u32) -> (Vec<u8>, u32) {
    let mut mip_level_count = 1u32;
    let mut current = base_size as usize;
    let mut prev_offset = 0usize;

    while current > 1 {
        let next = current.max(2) / 2;
        let next_offset = data.len();

        data.resize(next_offset + next * next * 4, 0);

        for y in 0..next {
            for x in 0..next {
                let dst_idx = next_offset + (y * next + x) * 4;
                let sx = x * 2;
                let sy = y * 2;

                let mut pixels = [[0u8; 4]; 4];
                let mut count = 0usize;

                for dy in 0..2usize {
                    if sy + dy >= current {
                        continue;
                    }
                    for dx in 0..2usize {
                        if sx + dx >= current {
                            continue;
                        }
                        let src_idx = prev_offset + ((sy + dy) * current + (sx + dx)) * 4;
                        pixels[count] = [
                            data[src_idx],
                            data[src_idx + 1],
                            data[src_idx + 2],
                            data[src_idx + 3],
                        ];
                        count += 1;
                    }
                }

                let avg = average_block(&pixels[..count]);
                data[dst_idx] = avg[0];
                data[dst_idx + 1] = avg[1];
                data[dst_idx + 2] = avg[2];
                data[dst_idx + 3] = avg[3];
            }
        }

        prev_offset = next_offset;
        current = next;
        mip_level_count += 1;
    }

    (data, mip_level_count)
}

fn make_image(buffer: TextureBuffer, address_mode: ImageAddressMode) -> Image {
    let TextureBuffer { pixels, size } = buffer;
    // Pass base-level data directly — its length equals size² * 4, which is
    // exactly what Image::new expects.
    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    let base_data = image.data.take().unwrap();
    let (mip_data, mip_level_count) = generate_mipmaps(base_data, size);
    image.texture_descriptor.mip_level_count = mip_level_count;
    image.data = Some(mip_data);
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        // wgpu requires all filter modes to be Linear when anisotropy_clamp > 1.
        mag_filter: bevy::image::ImageFilterMode::Linear,
        min_filter: bevy::image::ImageFilterMode::Linear,
        mipmap_filter: bevy::image::ImageFilterMode::Linear,
        anisotropy_clamp: 4,
        ..Default::default()
    });
    image
}

/// Decode an sRGB u8 value to linear-light f32.
fn srgb_to_linear(v: u8) -> f32 {
    static LUT: OnceLock<[f32; 256]> = OnceLock::new();
    LUT.get_or_init(|| {
        std::array::from_fn(|i| {
            let c = i as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    })[v as usize]
}

/// Convert a linear-light `f32` in `[0, 1]` to an sRGB-encoded `u8`.
///
/// Uses a 4096-entry lookup table (built once via [`OnceLock`]) to avoid
/// calling `f32::powf` millions of times per mip chain. The input is
/// quantised to the nearest 1/4095 step before the lookup; the step is
/// ~0.000244, which keeps the maximum output error well below one count in
/// u8.
///
/// A 256-entry table would be insufficient: the sRGB curve is steep near
/// zero and the first non-zero bin (linear ≈ 1/255) maps to sRGB ≈ 13,
/// making output values 1–12 unreachable. 4096 bins avoid that gap.
#[inline]
fn linear_to_srgb(linear: f32) -> u8 {
    const N: usize = 4096;
    static LUT: OnceLock<[u8; N]> = OnceLock::new();
    let lut = LUT.get_or_init(|| {
        std::array::from_fn(|i| {
            let c = i as f32 / (N - 1) as f32;
            let encoded = if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            };
            (encoded * 255.0).round() as u8
        })
    });
    lut[(linear.clamp(0.0, 1.0) * (N - 1) as f32).round() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_guard_rejects_zero_and_oversize() {
        assert!(matches!(validate_size(0), Err(TextureError::ZeroSize)));
        assert!(matches!(
            validate_size(MAX_SIZE + 1),
            Err(TextureError::SizeTooLarge { .. })
        ));
        assert!(validate_size(1).is_ok());
        assert!(validate_size(MAX_SIZE).is_ok());
    }

    #[test]
    fn mip_chain_has_expected_levels_and_length() {
        let base = vec![128u8; 8 * 8 * 4];
        let (data, levels) = generate_mipmaps(base, 8);
        // 8 → 4 → 2 → 1
        assert_eq!(levels, 4);
        assert_eq!(data.len(), (64 + 16 + 4 + 1) * 4);
    }

    #[test]
    fn mip_average_preserves_uniform_blocks() {
        // A uniform color must survive the sRGB round trip unchanged.
        let block = [[200u8, 100, 50, 160]; 4];
        assert_eq!(average_block(&block), [200, 100, 50, 160]);
    }

    #[test]
    fn srgb_transfer_round_trips_endpoints() {
        assert_eq!(linear_to_srgb(srgb_to_linear(0)), 0);
        assert_eq!(linear_to_srgb(srgb_to_linear(255)), 255);
    }
}
