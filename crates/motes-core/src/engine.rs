//! The particle engine: a frame loop that draws, moves and culls particles.

use glam::Vec2;
use rand::SeedableRng;
use tracing::debug;

use crate::MotesRng;
use crate::color::Rgb;
use crate::geometry::Bounds;
use crate::particle::{FrameContext, Neighbor, Particle, PointerContext};
use crate::surface::Surface;

/// Engine behaviour switches.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Keep looping after a frame. When false every `start` renders a single frame.
    pub animate: bool,
    /// Stop the loop once every particle has been culled.
    pub stop_when_no_particles: bool,
    /// Erase the surface before each frame.
    pub clear_every_frame: bool,
    /// Erase with this colour instead of a transparent clear.
    pub background: Option<Rgb>,
    /// Fixed bounds handed to particles; surface-sized when `None`.
    pub bounds: Option<Bounds>,
    /// Frame rate `dt` is normalised against.
    pub target_fps: u32,
    /// Forward pointer moves to particles.
    pub point_events: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            animate: true,
            stop_when_no_particles: true,
            clear_every_frame: true,
            background: None,
            bounds: None,
            target_fps: 60,
            point_events: false,
        }
    }
}

/// Owns the particle collection and advances it one frame per [`tick`](Self::tick).
#[derive(Debug)]
pub struct ParticleEngine {
    settings: EngineSettings,
    particles: Vec<Box<dyn Particle>>,
    animating: bool,
    /// Timestamp of the previous frame in milliseconds.
    last_ms: Option<f64>,
    width: u32,
    height: u32,
    bounds: Bounds,
    /// Erase on the next tick even when not animating.
    pending_erase: bool,
    rng: MotesRng,
}

impl ParticleEngine {
    pub fn new(settings: EngineSettings, seed: u64) -> Self {
        let bounds = settings.bounds.unwrap_or(Bounds::from_size(0.0, 0.0));
        Self {
            settings,
            particles: Vec::new(),
            animating: false,
            last_ms: None,
            width: 0,
            height: 0,
            bounds,
            pending_erase: false,
            rng: MotesRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Box<dyn Particle>] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn rng_mut(&mut self) -> &mut MotesRng {
        &mut self.rng
    }

    /// Record a new surface size and push fresh bounds to every particle.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.bounds = self
            .settings
            .bounds
            .unwrap_or(Bounds::from_size(width as f32, height as f32));
        for p in &mut self.particles {
            p.set_bounds(self.bounds);
        }
    }

    /// Add a particle at the end, or at the front when `at_beginning` is set.
    pub fn add_particle(&mut self, mut particle: Box<dyn Particle>, at_beginning: bool) {
        particle.set_bounds(self.bounds);
        if at_beginning {
            self.particles.insert(0, particle);
        } else {
            self.particles.push(particle);
        }
    }

    /// Start (or resume) the loop. The next frame gets `dt = 1`.
    pub fn start(&mut self) {
        debug!(particles = self.particles.len(), "engine start");
        self.animating = true;
        self.last_ms = None;
    }

    /// Stop the loop and drop every particle. The surface is erased on the next tick.
    pub fn stop(&mut self) {
        debug!(particles = self.particles.len(), "engine stop");
        self.animating = false;
        self.particles.clear();
        self.last_ms = None;
        self.pending_erase = true;
    }

    /// Stop the loop but keep the particles where they are.
    pub fn pause(&mut self) {
        debug!("engine pause");
        self.animating = false;
    }

    /// Run one frame at `now_ms`. Returns whether the loop wants another frame.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
        if !self.animating {
            if self.pending_erase {
                self.erase(surface);
                self.pending_erase = false;
            }
            return false;
        }

        let frame_ms = 1000.0 / self.settings.target_fps.max(1) as f64;
        let prev = self.last_ms.unwrap_or(now_ms - frame_ms);
        let dt = ((now_ms - prev) / frame_ms).max(0.0) as f32;
        self.last_ms = Some(now_ms);

        let (width, height) = surface.size();
        if width != self.width || height != self.height {
            self.set_size(width, height);
        }

        if self.settings.clear_every_frame || self.pending_erase {
            self.erase(surface);
            self.pending_erase = false;
        }

        let neighbors: Vec<Neighbor> = self.particles.iter().map(|p| p.neighbor()).collect();
        let mut frame = FrameContext {
            surface,
            neighbors: &neighbors,
            rng: &mut self.rng,
        };
        self.particles.retain_mut(|p| p.update(dt, &mut frame));

        let keep_going = self.settings.animate
            && !(self.settings.stop_when_no_particles && self.particles.is_empty());
        if !keep_going {
            debug!("engine loop finished");
            self.animating = false;
        }
        keep_going
    }

    /// Forward a pointer position to every particle, then adopt anything they spawned.
    pub fn pointer(&mut self, x: f32, y: f32) {
        if !self.settings.point_events {
            return;
        }
        let at = Vec2::new(x, y);
        let mut spawned = Vec::new();
        {
            let mut ctx = PointerContext::new(&mut self.rng, &mut spawned);
            for p in &mut self.particles {
                p.pointer(at, &mut ctx);
            }
        }
        for p in spawned {
            self.add_particle(p, false);
        }
    }

    fn erase(&self, surface: &mut dyn Surface) {
        match self.settings.background {
            Some(color) => surface.fill(color),
            None => surface.clear(),
        }
    }
}
