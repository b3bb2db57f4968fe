//! The particle trait and the per-frame context handed to each particle.

use std::fmt::Debug;

use glam::Vec2;

use crate::MotesRng;
use crate::geometry::Bounds;
use crate::surface::Surface;

/// How other particles should treat a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborRole {
    #[default]
    Regular,
    /// Chased by the rest of the flock.
    Attractor,
}

/// Snapshot of a particle taken at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vec2,
    pub role: NeighborRole,
}

/// Everything a particle needs while it draws and moves.
pub struct FrameContext<'a> {
    pub surface: &'a mut dyn Surface,
    /// Every particle alive at the start of the frame, itself included.
    pub neighbors: &'a [Neighbor],
    pub rng: &'a mut MotesRng,
}

/// Handed to particles when the pointer moves.
pub struct PointerContext<'a> {
    pub rng: &'a mut MotesRng,
    spawned: &'a mut Vec<Box<dyn Particle>>,
}

impl<'a> PointerContext<'a> {
    pub fn new(rng: &'a mut MotesRng, spawned: &'a mut Vec<Box<dyn Particle>>) -> Self {
        Self { rng, spawned }
    }

    /// Queue a new particle; it joins the engine once the dispatch finishes.
    pub fn spawn(&mut self, particle: Box<dyn Particle>) {
        self.spawned.push(particle);
    }
}

/// A single animated object managed by the engine.
pub trait Particle: Debug {
    /// Called when the particle joins an engine and whenever the surface is resized.
    fn set_bounds(&mut self, bounds: Bounds);

    /// Draw and move the particle. Returning `false` removes it from the engine.
    ///
    /// `dt` is 1.0 when the loop runs exactly at the target frame rate.
    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool;

    /// React to the pointer at `at`. Most particles flee it.
    fn pointer(&mut self, _at: Vec2, _ctx: &mut PointerContext<'_>) {}

    /// Position and role as seen by the other particles.
    fn neighbor(&self) -> Neighbor;
}
