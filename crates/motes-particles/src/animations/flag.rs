//! Grid of dots rippling on a shared noise field ("waving dots").

use std::sync::Arc;

use motes_core::{
    Bounds, FrameContext, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb, Vec2,
};

use super::{flee, recover};
use crate::noise::NoiseField;

/// Tunables for a [`Flag`] dot.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSettings {
    /// Home position; canvas centre when `None`.
    pub position: Option<Vec2>,
    /// Resting velocity the dot recovers to.
    pub velocity: Vec2,
    pub color: Rgb,
    pub radius: f32,
    /// Noise time advanced per update.
    pub timestep: f32,
    /// Largest drawn offset from the home position.
    pub intensity: f32,
    /// Spatial frequency divisor; bigger values make broader waves.
    pub divisor: f32,
    /// Gap between neighbouring dots in the grid.
    pub margin: f32,
    pub start_time: f32,
    pub point_event_distance: f32,
    pub point_event_multiplier: f32,
    pub point_event_recover_speed: f32,
}

impl Default for FlagSettings {
    fn default() -> Self {
        Self {
            position: None,
            velocity: Vec2::ZERO,
            color: Rgb::BLACK,
            radius: 10.0,
            timestep: 0.001,
            intensity: 30.0,
            divisor: 500.0,
            margin: 5.0,
            start_time: 0.0,
            point_event_distance: 100.0,
            point_event_multiplier: 1.5,
            point_event_recover_speed: 0.1,
        }
    }
}

impl FlagSettings {
    /// Scale sizes, speeds and distances by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            velocity: self.velocity * k,
            radius: self.radius * k,
            intensity: self.intensity * k,
            divisor: self.divisor * k,
            margin: self.margin * k,
            point_event_distance: self.point_event_distance * k,
            point_event_multiplier: self.point_event_multiplier * k,
            ..self.clone()
        }
    }
}

/// Centres of a grid of dots filling `width` x `height`, column by column.
///
/// Cells are `2 * radius + margin` wide and tall; the grid is centred with at
/// least `margin` free on every side.
pub fn points_grid(width: f32, height: f32, radius: f32, margin: f32) -> Vec<Vec2> {
    let pitch = radius * 2.0 + margin;
    if pitch <= 0.0 {
        return Vec::new();
    }
    let cols = ((width - margin * 2.0) / pitch).floor().max(0.0) as usize;
    let rows = ((height - margin * 2.0) / pitch).floor().max(0.0) as usize;
    let start_x = width * 0.5 - cols as f32 * pitch * 0.5 + pitch * 0.5;
    let start_y = height * 0.5 - rows as f32 * pitch * 0.5 + pitch * 0.5;

    let mut points = Vec::with_capacity(cols * rows);
    for col in 0..cols {
        let x = col as f32 * pitch + start_x;
        for row in 0..rows {
            points.push(Vec2::new(x, row as f32 * pitch + start_y));
        }
    }
    points
}

/// One dot of the flag. It is drawn displaced by noise and springs back home
/// after the pointer shoves it.
#[derive(Debug, Clone)]
pub struct Flag {
    settings: FlagSettings,
    noise: Arc<NoiseField>,
    time: f32,
    position: Vec2,
    home: Vec2,
    velocity: Vec2,
}

impl Flag {
    pub fn new(settings: FlagSettings, canvas: Bounds, noise: Arc<NoiseField>) -> Self {
        let home = settings.position.unwrap_or(Vec2::new(
            canvas.width() * 0.5,
            canvas.height() * 0.5,
        ));
        Self {
            time: settings.start_time,
            position: home,
            home,
            velocity: settings.velocity,
            noise,
            settings,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Where the dot is drawn this frame.
    fn displaced(&self, dt: f32) -> Vec2 {
        let s = &self.settings;
        let (x, y) = (self.position.x, self.position.y);
        let nx = self.noise.sample(x / s.divisor, y / s.divisor, self.time);
        let ny = self.noise.sample(y / s.divisor, x / s.divisor, self.time);
        Vec2::new(x + nx * s.intensity * dt, y + ny * s.intensity * dt)
    }

    fn step(&mut self, dt: f32) {
        let speed = self.settings.point_event_recover_speed;
        recover(&mut self.velocity, self.settings.velocity, speed, 0.5);
        self.position += self.velocity * dt;
        recover(&mut self.position, self.home, speed, 1.0);
    }
}

impl Particle for Flag {
    fn set_bounds(&mut self, _bounds: Bounds) {}

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        let at = self.displaced(dt);
        frame
            .surface
            .fill_circle(at, self.settings.radius, Paint::solid(self.settings.color));
        self.step(dt);
        self.time += self.settings.timestep;
        true
    }

    fn pointer(&mut self, at: Vec2, _ctx: &mut PointerContext<'_>) {
        flee(
            &mut self.velocity,
            self.position,
            at,
            self.settings.point_event_distance,
            self.settings.point_event_multiplier,
        );
    }

    fn neighbor(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            role: NeighborRole::Regular,
        }
    }
}
