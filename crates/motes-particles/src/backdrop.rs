//! The animation menu: one engine, one active animation at a time.

use std::sync::Arc;

use motes_core::{
    AnimationKind, Bounds, ColorTheme, EngineSettings, MotesRng, Particle, ParticleCounts,
    ParticleEngine, Rgb, Surface, SurfaceEffect, Vec2,
};
use rand::{RngCore, seq::SliceRandom};
use tracing::{debug, info};

use crate::animations::{
    Chaser, ChaserSettings, Flag, FlagSettings, Mesh, MeshSettings, Metaball, MetaballSettings,
    Parallax, ParallaxSettings, Square, SquareSettings, points_grid,
};
use crate::noise::NoiseField;

/// Knobs for a [`Backdrop`].
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropSettings {
    /// Frame rate the simulation speed is normalised to.
    pub fps: u32,
    /// Multiplier applied to every spatial setting of the particles.
    pub scale: f32,
    /// Colour particles are composited over.
    pub background: Rgb,
    /// Foreground colour for the particles.
    pub color: Rgb,
    pub counts: ParticleCounts,
    pub seed: u64,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            scale: 0.15,
            background: Rgb::BLACK,
            color: ColorTheme::default().rgb(),
            counts: ParticleCounts::default(),
            seed: 0,
        }
    }
}

/// Switches between animations on a shared [`ParticleEngine`].
///
/// Selecting the running animation again turns it off and pauses; selecting
/// another one tears the old one down and populates the new one.
#[derive(Debug)]
pub struct Backdrop {
    settings: BackdropSettings,
    engine: ParticleEngine,
    active: Option<AnimationKind>,
    effect: SurfaceEffect,
}

impl Backdrop {
    pub fn new(settings: BackdropSettings) -> Self {
        let engine = ParticleEngine::new(
            EngineSettings {
                target_fps: settings.fps,
                point_events: true,
                ..Default::default()
            },
            settings.seed,
        );
        Self {
            settings,
            engine,
            active: None,
            effect: SurfaceEffect::None,
        }
    }

    pub fn settings(&self) -> &BackdropSettings {
        &self.settings
    }

    pub fn engine(&self) -> &ParticleEngine {
        &self.engine
    }

    /// The animation whose menu entry is lit, if any.
    pub fn active(&self) -> Option<AnimationKind> {
        self.active
    }

    pub fn effect(&self) -> SurfaceEffect {
        self.effect
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_animating()
    }

    pub fn color(&self) -> Rgb {
        self.settings.color
    }

    /// Foreground colour used the next time an animation is set up.
    pub fn set_color(&mut self, color: Rgb) {
        self.settings.color = color;
    }

    pub fn background(&self) -> Rgb {
        self.settings.background
    }

    /// Pixel size of the surface; particles are laid out inside it.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if self.engine.size() != (width, height) {
            self.engine.set_size(width, height);
        }
    }

    /// Menu click on `kind`. Returns whether `kind` is active afterwards.
    pub fn select(&mut self, kind: AnimationKind) -> bool {
        if self.active == Some(kind) {
            info!(animation = %kind, "animation deselected");
            self.active = None;
            self.engine.pause();
            return false;
        }
        self.active = Some(kind);
        self.setup(kind);
        true
    }

    /// Set the active animation up again, picking up colour changes.
    pub fn restart(&mut self) {
        if let Some(kind) = self.active {
            self.setup(kind);
        }
    }

    /// With `random`, select an animation at random; otherwise resume.
    ///
    /// A random pick that lands on the active animation resumes it rather
    /// than switching it off.
    pub fn start(&mut self, random: bool) {
        if !random {
            self.engine.start();
            return;
        }
        let Some(&kind) = AnimationKind::ALL.choose(self.engine.rng_mut()) else {
            return;
        };
        if self.active == Some(kind) {
            self.engine.start();
        } else {
            self.select(kind);
        }
    }

    /// Resume a paused animation. Does nothing when nothing is loaded.
    pub fn resume(&mut self) {
        if !self.engine.is_empty() {
            self.engine.start();
        }
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Drop every particle and clear the surface on the next tick.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.active = None;
        self.effect = SurfaceEffect::None;
    }

    pub fn pointer(&mut self, x: f32, y: f32) {
        self.engine.pointer(x, y);
    }

    /// Draw one frame onto `surface`. Returns whether the animation continues.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
        let (width, height) = surface.size();
        self.set_size(width, height);
        surface.set_effect(self.effect);
        self.engine.tick(now_ms, surface)
    }

    fn setup(&mut self, kind: AnimationKind) {
        self.engine.stop();
        self.effect = kind.effect();
        let particles = self.populate(kind);
        info!(animation = %kind, particles = particles.len(), "animation selected");
        for p in particles {
            self.engine.add_particle(p, false);
        }
        self.engine.start();
    }

    fn populate(&mut self, kind: AnimationKind) -> Vec<Box<dyn Particle>> {
        let canvas = self.engine.bounds();
        let k = self.settings.scale;
        let color = self.settings.color;
        let counts = self.settings.counts;
        let rng = self.engine.rng_mut();
        debug!(%kind, width = canvas.width(), height = canvas.height(), "populating");

        match kind {
            AnimationKind::Metaball => {
                let settings = MetaballSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                many(counts.metaball, rng, |rng| {
                    Metaball::new(settings.clone(), canvas, rng)
                })
            }
            AnimationKind::Mesh => {
                let settings = MeshSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                many(counts.mesh, rng, |rng| Mesh::new(settings.clone(), canvas, rng))
            }
            AnimationKind::Chaser => {
                let settings = ChaserSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                let mut flock = many(counts.chaser, rng, |rng| {
                    Chaser::new(settings.clone(), canvas, rng)
                });
                flock.extend(many(counts.rabbits, rng, |rng| {
                    let mut rabbit = Chaser::new(settings.clone(), canvas, rng);
                    rabbit.set_as_rabbit(true, rng);
                    rabbit
                }));
                flock
            }
            AnimationKind::Flag => {
                let settings = FlagSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                let field = Arc::new(NoiseField::new(rng.next_u32()));
                flag_grid(&settings, canvas)
                    .into_iter()
                    .map(|home| {
                        let dot = FlagSettings {
                            position: Some(home),
                            ..settings.clone()
                        };
                        Box::new(Flag::new(dot, canvas, field.clone())) as Box<dyn Particle>
                    })
                    .collect()
            }
            AnimationKind::Parallax => {
                let settings = ParallaxSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                many(counts.parallax, rng, |rng| {
                    Parallax::new(settings.clone(), canvas, rng)
                })
            }
            AnimationKind::Square => {
                let settings = SquareSettings {
                    color,
                    ..Default::default()
                }
                .scaled(k);
                many(counts.square, rng, |rng| {
                    Square::new(settings.clone(), canvas, rng)
                })
            }
        }
    }
}

fn many<P, F>(count: usize, rng: &mut MotesRng, mut build: F) -> Vec<Box<dyn Particle>>
where
    P: Particle + 'static,
    F: FnMut(&mut MotesRng) -> P,
{
    (0..count)
        .map(|_| Box::new(build(rng)) as Box<dyn Particle>)
        .collect()
}

/// Home positions covering `canvas`.
fn flag_grid(settings: &FlagSettings, canvas: Bounds) -> Vec<Vec2> {
    let offset = Vec2::new(canvas.left, canvas.top);
    points_grid(
        canvas.width(),
        canvas.height(),
        settings.radius,
        settings.margin,
    )
    .into_iter()
    .map(|p| p + offset)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Raster;

    fn backdrop() -> Backdrop {
        let mut b = Backdrop::new(BackdropSettings {
            seed: 42,
            ..Default::default()
        });
        b.set_size(160, 80);
        b
    }

    #[test]
    fn test_select_populates_and_starts() {
        let mut b = backdrop();
        assert!(b.select(AnimationKind::Mesh));
        assert_eq!(b.active(), Some(AnimationKind::Mesh));
        assert_eq!(b.engine().len(), 50);
        assert!(b.is_running());
        assert_eq!(b.effect(), SurfaceEffect::None);
    }

    #[test]
    fn test_population_sizes() {
        let mut b = backdrop();
        b.select(AnimationKind::Metaball);
        assert_eq!(b.engine().len(), 100);
        b.select(AnimationKind::Chaser);
        assert_eq!(b.engine().len(), 103);
        b.select(AnimationKind::Parallax);
        assert_eq!(b.engine().len(), 30);
        b.select(AnimationKind::Square);
        assert_eq!(b.engine().len(), 20);
    }

    #[test]
    fn test_flag_fills_grid() {
        let mut b = backdrop();
        b.select(AnimationKind::Flag);
        // radius 1.5, margin 0.75: pitch 3.75 gives 42 x 20 dots.
        assert_eq!(b.engine().len(), 42 * 20);
    }

    #[test]
    fn test_metaball_installs_goo_and_switching_drops_it() {
        let mut b = backdrop();
        let mut raster = Raster::new(160, 80);
        b.select(AnimationKind::Metaball);
        assert_eq!(b.effect(), SurfaceEffect::Goo);
        b.tick(0.0, &mut raster);
        assert_eq!(raster.effect(), SurfaceEffect::Goo);

        b.select(AnimationKind::Square);
        b.tick(16.0, &mut raster);
        assert_eq!(raster.effect(), SurfaceEffect::None);
    }

    #[test]
    fn test_selecting_active_kind_pauses() {
        let mut b = backdrop();
        b.select(AnimationKind::Mesh);
        assert!(!b.select(AnimationKind::Mesh));
        assert_eq!(b.active(), None);
        assert!(!b.is_running());
        // Particles stay so the animation can resume.
        assert_eq!(b.engine().len(), 50);
        b.resume();
        assert!(b.is_running());
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut b = backdrop();
        b.select(AnimationKind::Metaball);
        b.stop();
        assert_eq!(b.active(), None);
        assert_eq!(b.effect(), SurfaceEffect::None);
        assert!(b.engine().is_empty());
        b.resume();
        assert!(!b.is_running());
    }

    #[test]
    fn test_random_start_selects_something() {
        let mut b = backdrop();
        b.start(true);
        assert!(b.active().is_some());
        assert!(b.is_running());

        // Landing on the active kind resumes instead of toggling off.
        for _ in 0..20 {
            b.pause();
            b.start(true);
            assert!(b.active().is_some());
            assert!(b.is_running());
        }
    }

    #[test]
    fn test_restart_picks_up_new_colour() {
        let mut b = backdrop();
        b.select(AnimationKind::Square);
        b.set_color(Rgb(255, 0, 0));
        b.restart();
        assert_eq!(b.active(), Some(AnimationKind::Square));
        assert_eq!(b.color(), Rgb(255, 0, 0));
        assert_eq!(b.engine().len(), 20);
    }

    #[test]
    fn test_tick_draws_into_raster() {
        let mut b = backdrop();
        let mut raster = Raster::new(160, 80);
        b.select(AnimationKind::Parallax);
        assert!(b.tick(0.0, &mut raster));
        let drawn = (0..80)
            .flat_map(|y| (0..160).map(move |x| (x, y)))
            .any(|(x, y)| raster.pixel(x, y).is_some_and(|p| p[3] > 0.0));
        assert!(drawn);
    }

    #[test]
    fn test_pointer_bursts_squares() {
        let mut b = Backdrop::new(BackdropSettings {
            seed: 7,
            scale: 1.0,
            ..Default::default()
        });
        b.set_size(800, 400);
        b.select(AnimationKind::Square);
        let before = b.engine().len();
        // Sweep the pointer across every spawn position until one square is hit.
        let mut raster = Raster::new(800, 400);
        let mut now = 0.0;
        for _ in 0..400 {
            b.tick(now, &mut raster);
            now += 1000.0 / 60.0;
            for y in (0..400).step_by(20) {
                for x in (0..800).step_by(20) {
                    b.pointer(x as f32, y as f32);
                }
            }
            if b.engine().len() > before {
                return;
            }
        }
        panic!("no square burst");
    }
}
