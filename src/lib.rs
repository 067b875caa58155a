//! `bevy_celestial_texture` — procedural celestial-body textures for Bevy.
//!
//! # Architecture
//! Every generator implements [`TextureGenerator`], which produces a
//! [`TextureBuffer`] (a square, row-major RGBA8 pixel map). Call
//! [`buffer_to_image`] / [`buffer_to_image_sprite`] to upload a buffer into
//! [`bevy::asset::Assets<Image>`].
//!
//! Three generators cover the bodies of a space scene:
//! [`SurfaceGenerator`](surface::SurfaceGenerator) blends two palette colors
//! through a deterministic fractal field ([`SineField`]) into a mottled
//! planet map; [`RingGenerator`](ring::RingGenerator) draws an alpha-banded
//! ring annulus; [`GlowGenerator`](glow::GlowGenerator) fills a radial
//! gradient sprite for flares and halos.
//!
//! Generation is synchronous, side-effect-free, and deterministic — the same
//! config and size always produce byte-identical pixels — so a fallback
//! texture can be generated speculatively while a photographic texture is
//! still in flight, and regenerated later with identical results. For bursts
//! of bodies, [`async_gen`] moves the pixel math onto a bounded thread pool.

pub mod async_gen;
pub mod color;
pub mod generator;
pub mod glow;
pub mod noise;
pub mod ring;
pub mod surface;

pub use color::ColorRgb;
pub use generator::{
    TextureBuffer, TextureError, TextureGenerator, buffer_to_image, buffer_to_image_sprite,
};
pub use noise::SineField;

use bevy::prelude::*;

/// Bevy plugin — registers the async-generation polling system.
pub struct CelestialTexturePlugin;

impl Plugin for CelestialTexturePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, async_gen::poll_texture_tasks);
    }
}
