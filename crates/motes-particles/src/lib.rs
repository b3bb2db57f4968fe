//! Particle backdrop animations for the motes terminal app.
//!
//! This crate provides the six particle types (metaballs, mesh, flocking
//! chasers, waving flag dots, parallax hexagons and exploding squares), the
//! pixel [`Raster`] they draw into, and the [`Backdrop`] menu that swaps
//! between them.

pub mod animations;
mod backdrop;
mod noise;
mod raster;

pub use backdrop::{Backdrop, BackdropSettings};
pub use noise::NoiseField;
pub use raster::Raster;
