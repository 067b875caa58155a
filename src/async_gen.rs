//! Async texture generation system.
//!
//! The generators themselves are synchronous and cheap enough to call
//! speculatively, but a burst of bodies entering the scene can still add up.
//! This module offloads the pixel math to a private, bounded [`rayon`] thread
//! pool so it does not stall the main thread. The pool is limited to
//! [`MAX_GENERATION_THREADS`] concurrent tasks; excess requests are queued
//! and run in order rather than spawning unbounded OS threads. When a task
//! finishes the buffer is uploaded to [`Assets<Image>`] and the entity
//! receives the [`TextureReady`] component.
//!
//! # Usage
//! ```rust,ignore
//! // Surface maps — poll_texture_tasks uploads them with buffer_to_image
//! // (repeat sampler), ready to wrap around sphere geometry.
//! commands.spawn(PendingTexture::surface(SurfaceConfig::default(), 512));
//!
//! // Ring and glow sprites — uploaded with buffer_to_image_sprite
//! // (clamp-to-edge sampler) so the alpha silhouette does not bleed.
//! commands.spawn(PendingTexture::ring(RingConfig::default(), 1024));
//! commands.spawn(PendingTexture::glow(GlowConfig::default(), 512));
//!
//! // Later, query for TextureReady to consume the handle.
//! ```

/// Maximum number of texture generation tasks that run concurrently.
///
/// Additional tasks are queued inside the rayon pool rather than spawning new
/// OS threads, bounding both CPU and memory usage.
const MAX_GENERATION_THREADS: usize = 4;

/// Returns the library-private rayon thread pool used for texture generation.
///
/// Isolated from the application's global rayon pool so texture work does not
/// starve unrelated parallel workloads and the concurrency cap is enforced
/// regardless of the calling application's rayon configuration.
fn gen_pool() -> &'static rayon::ThreadPool {
    static POOL: OnceLock<rayon::ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(MAX_GENERATION_THREADS)
            .thread_name(|i| format!("texture-gen-{i}"))
            .build()
            .expect("failed to build texture generation thread pool")
    })
}

use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use bevy::{
    asset::{Assets, Handle},
    ecs::{
        component::Component,
        entity::Entity,
        system::{Commands, Query, ResMut},
    },
    image::Image,
};

use crate::{
    generator::{
        TextureBuffer, TextureError, TextureGenerator, buffer_to_image, buffer_to_image_sprite,
    },
    glow::{GlowConfig, GlowGenerator},
    ring::{RingConfig, RingGenerator},
    surface::{SurfaceConfig, SurfaceGenerator},
};

/// Spawned onto an entity to request background texture generation.
///
/// Each constructor submits `generate()` to the private [`gen_pool`] rayon
/// pool (capped at [`MAX_GENERATION_THREADS`] concurrent tasks). Because
/// `generate()` is a monolithic blocking loop with no yield points, using
/// Bevy's `AsyncComputeTaskPool` would starve other tasks on that executor;
/// a dedicated pool avoids the problem while bounding OS thread and memory
/// usage. [`poll_texture_tasks`] non-blockingly checks for completion each
/// frame using [`mpsc::Receiver::try_recv`].
///
/// Dropping `PendingTexture` (e.g. when the entity is despawned) sets an
/// atomic cancellation flag. Tasks that have not yet started will see the
/// flag and exit without doing any work, preventing zombie tasks from
/// saturating the thread pool when bodies are rapidly spawned and destroyed.
#[derive(Component)]
pub struct PendingTexture {
    // Wrapped in Mutex so the struct is Sync, which Bevy's Component bound requires.
    pub(crate) rx: std::sync::Mutex<mpsc::Receiver<Result<TextureBuffer, TextureError>>>,
    /// Set to `true` on drop; the background task checks this before starting.
    cancelled: Arc<AtomicBool>,
    /// `true` for ring/glow sprites that need a clamp-to-edge sampler.
    is_sprite: bool,
}

impl Drop for PendingTexture {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Shared constructor body: creates the channel + cancellation flag, spawns the
/// task, and returns a `PendingTexture`. The closure `f` is the generator call.
fn spawn_task<F>(f: F, is_sprite: bool) -> PendingTexture
where
    F: FnOnce() -> Result<TextureBuffer, TextureError> + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let (tx, rx) = mpsc::sync_channel(1);
    gen_pool().spawn(move || {
        // Skip the entire computation if the entity was already despawned.
        if !flag.load(Ordering::Relaxed) {
            tx.send(f()).ok();
        }
    });
    PendingTexture {
        rx: std::sync::Mutex::new(rx),
        cancelled,
        is_sprite,
    }
}

impl PendingTexture {
    /// Spawn a surface map generation task at `size × size` texels.
    pub fn surface(config: SurfaceConfig, size: u32) -> Self {
        let generator = SurfaceGenerator::new(config);
        spawn_task(move || generator.generate(size), false)
    }

    /// Spawn a ring sprite generation task at `size × size` texels.
    ///
    /// [`poll_texture_tasks`] uploads the result with
    /// [`buffer_to_image_sprite`](crate::generator::buffer_to_image_sprite)
    /// automatically, giving a clamp-to-edge sampler.
    pub fn ring(config: RingConfig, size: u32) -> Self {
        let generator = RingGenerator::new(config);
        spawn_task(move || generator.generate(size), true)
    }

    /// Spawn a glow sprite generation task at `size × size` texels.
    ///
    /// [`poll_texture_tasks`] uploads the result with
    /// [`buffer_to_image_sprite`](crate::generator::buffer_to_image_sprite)
    /// automatically, giving a clamp-to-edge sampler.
    pub fn glow(config: GlowConfig, size: u32) -> Self {
        let generator = GlowGenerator::new(config);
        spawn_task(move || generator.generate(size), true)
    }
}

/// Added to the entity by [`poll_texture_tasks`] when generation is complete.
#[derive(Component)]
pub struct TextureReady(pub Handle<Image>);

/// Bevy system — polls pending generation tasks and uploads finished buffers.
pub fn poll_texture_tasks(
    mut commands: Commands,
    tasks: Query<(Entity, &PendingTexture)>,
    mut images: ResMut<Assets<Image>>,
) {
    for (entity, pending) in &tasks {
        let poll = pending
            .rx
            .lock()
            .expect("texture thread poisoned")
            .try_recv();
        match poll {
            Ok(Ok(buffer)) => {
                let handle = if pending.is_sprite {
                    buffer_to_image_sprite(buffer, &mut images)
                } else {
                    buffer_to_image(buffer, &mut images)
                };
                commands
                    .entity(entity)
                    .remove::<PendingTexture>()
                    .insert(TextureReady(handle));
            }
            Ok(Err(e)) => {
                bevy::log::error!("Texture generation failed: {e}");
                commands.entity(entity).remove::<PendingTexture>();
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                bevy::log::error!("Texture generation thread panicked");
                commands.entity(entity).remove::<PendingTexture>();
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }
    }
}
