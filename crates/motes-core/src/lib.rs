//! Core types for the motes terminal backdrop.
//!
//! This crate holds everything the particle animations share: geometry and
//! colour primitives, the [`Surface`] drawing abstraction, the [`Particle`]
//! trait and the [`ParticleEngine`] frame loop that moves, draws and culls a
//! collection of particles every tick.

mod animation;
mod color;
mod engine;
mod geometry;
mod particle;
mod surface;

pub use animation::{AnimationKind, AnimationParseError, ParticleCounts};
pub use color::{ColorParseError, ColorTheme, Paint, Rgb};
pub use engine::{EngineSettings, ParticleEngine};
pub use geometry::{Bounds, random_angle, random_between};
pub use glam::Vec2;
pub use particle::{FrameContext, Neighbor, NeighborRole, Particle, PointerContext};
pub use surface::{Surface, SurfaceEffect};

/// Random number generator used by every particle and the engine.
pub type MotesRng = rand::rngs::StdRng;
