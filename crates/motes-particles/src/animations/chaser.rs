//! Flocking chasers with fading tails ("flocking background").
//!
//! Most particles are chasers: they steer toward every rabbit and leave a
//! fading tail. A few particles are rabbits, wandering erratically and
//! pulling the flock along behind them.

use std::collections::VecDeque;

use motes_core::{
    Bounds, FrameContext, MotesRng, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb,
    Vec2, random_angle, random_between,
};

use super::flee;

/// Tunables for a [`Chaser`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChaserSettings {
    /// Start position; random inside the canvas when `None`.
    pub position: Option<Vec2>,
    pub color: Rgb,
    /// Head dot radius; zero draws only the tail.
    pub radius: f32,
    pub speed: Option<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    pub angle: Option<f32>,
    pub bounds: Option<Bounds>,
    pub line_width: f32,
    pub is_rabbit: bool,
    pub rabbit_min_speed: f32,
    pub rabbit_max_speed: f32,
    /// Rabbits are invisible unless this is positive.
    pub rabbit_radius: f32,
    /// Higher values steer more slowly.
    pub chase_strength: f32,
    pub tail_length: usize,
    /// Applied to a velocity component above the speed limit.
    pub slow_down_multiplier: f32,
    /// Pointer range; `2.5 * radius` when `None`.
    pub point_event_distance: Option<f32>,
    pub point_event_multiplier: f32,
}

impl Default for ChaserSettings {
    fn default() -> Self {
        Self {
            position: None,
            color: Rgb::BLACK,
            radius: 0.0,
            speed: None,
            min_speed: 1.0,
            max_speed: 5.0,
            angle: None,
            bounds: None,
            line_width: 0.5,
            is_rabbit: false,
            rabbit_min_speed: 4.0,
            rabbit_max_speed: 10.0,
            rabbit_radius: 0.0,
            chase_strength: 10.0,
            tail_length: 25,
            slow_down_multiplier: 0.9,
            point_event_distance: Some(200.0),
            point_event_multiplier: 0.75,
        }
    }
}

impl ChaserSettings {
    /// Scale sizes, speeds and distances by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            radius: self.radius * k,
            speed: self.speed.map(|s| s * k),
            min_speed: self.min_speed * k,
            max_speed: self.max_speed * k,
            rabbit_min_speed: self.rabbit_min_speed * k,
            rabbit_max_speed: self.rabbit_max_speed * k,
            rabbit_radius: self.rabbit_radius * k,
            // Steering adds a unit vector divided by the strength.
            chase_strength: self.chase_strength / k,
            point_event_distance: self.point_event_distance.map(|d| d * k),
            point_event_multiplier: self.point_event_multiplier * k,
            ..self.clone()
        }
    }
}

/// A flock member or, when flagged as a rabbit, the thing the flock chases.
#[derive(Debug, Clone)]
pub struct Chaser {
    settings: ChaserSettings,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    point_event_distance: f32,
    /// Previous positions, newest first.
    tail: VecDeque<Vec2>,
    is_rabbit: bool,
    bounds: Bounds,
}

impl Chaser {
    pub fn new(settings: ChaserSettings, canvas: Bounds, rng: &mut MotesRng) -> Self {
        let position = settings.position.unwrap_or_else(|| {
            Vec2::new(
                random_between(rng, canvas.left, canvas.right),
                random_between(rng, canvas.top, canvas.bottom),
            )
        });
        let radius = settings.radius;
        let point_event_distance = settings.point_event_distance.unwrap_or(radius * 2.5);
        let bounds = settings.bounds.unwrap_or(canvas);
        let is_rabbit = settings.is_rabbit;

        let mut chaser = Self {
            settings,
            position,
            velocity: Vec2::ZERO,
            radius,
            point_event_distance,
            tail: VecDeque::from([position]),
            is_rabbit,
            bounds,
        };
        let (min, max) = chaser.speed_range();
        chaser.velocity = chaser.roll_velocity(min, max, rng);
        chaser
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_rabbit(&self) -> bool {
        self.is_rabbit
    }

    pub fn tail_len(&self) -> usize {
        self.tail.len()
    }

    /// Turn this particle into a rabbit (re-rolling its speed) or back into a chaser.
    pub fn set_as_rabbit(&mut self, rabbit: bool, rng: &mut MotesRng) {
        self.is_rabbit = rabbit;
        if rabbit {
            let (min, max) = self.speed_range();
            self.velocity = self.roll_velocity(min, max, rng);
        }
    }

    fn speed_range(&self) -> (f32, f32) {
        if self.is_rabbit {
            (self.settings.rabbit_min_speed, self.settings.rabbit_max_speed)
        } else {
            (self.settings.min_speed, self.settings.max_speed)
        }
    }

    fn roll_velocity(&self, min: f32, max: f32, rng: &mut MotesRng) -> Vec2 {
        let angle = self.settings.angle.unwrap_or_else(|| random_angle(rng));
        let speed = self
            .settings
            .speed
            .unwrap_or_else(|| random_between(rng, min, max));
        Vec2::new(speed * angle.cos(), speed * angle.sin())
    }

    fn draw(&self, frame: &mut FrameContext<'_>) {
        let s = &self.settings;
        if self.is_rabbit {
            if s.rabbit_radius > 0.0 {
                frame
                    .surface
                    .fill_circle(self.position, s.rabbit_radius, Paint::solid(s.color));
            }
            return;
        }
        if self.radius > 0.0 {
            frame
                .surface
                .fill_circle(self.position, self.radius, Paint::solid(s.color));
        }
        let fade = 1.0 / s.tail_length.max(1) as f32;
        let mut alpha = 1.0;
        let mut from = self.position;
        for &to in &self.tail {
            if alpha <= 0.0 {
                break;
            }
            frame
                .surface
                .stroke_line(from, to, s.line_width, Paint::with_alpha(s.color, alpha));
            alpha -= fade;
            from = to;
        }
    }

    fn step(&mut self, dt: f32, neighbors: &[Neighbor], rng: &mut MotesRng) {
        let s = &self.settings;
        if self.is_rabbit {
            // Chaotic wander.
            let max = s.rabbit_max_speed;
            self.velocity.x += random_between(rng, 0.0, max) - max * 0.5;
            self.velocity.y += random_between(rng, 0.0, max) - max * 0.5;
        } else {
            self.tail.push_front(self.position);
            self.tail.truncate(s.tail_length);
        }

        self.position += self.velocity * dt;
        self.wrap();

        if !self.is_rabbit {
            for rabbit in neighbors.iter().filter(|n| n.role == NeighborRole::Attractor) {
                let delta = rabbit.position - self.position;
                let dist = delta.length();
                if dist > 0.0 {
                    self.velocity += delta / (dist * self.settings.chase_strength);
                }
            }
        }

        // Speed limiter.
        let s = &self.settings;
        let max = if self.is_rabbit {
            s.rabbit_max_speed
        } else {
            s.max_speed
        };
        if self.velocity.x.abs() > max {
            self.velocity.x *= s.slow_down_multiplier;
        }
        if self.velocity.y.abs() > max {
            self.velocity.y *= s.slow_down_multiplier;
        }
    }

    /// Jump to the opposite edge once fully outside, dropping the tail.
    fn wrap(&mut self) {
        let r = self.radius;
        let b = self.bounds;
        let mut wrapped = false;
        if self.position.x + r < b.left {
            self.position.x = b.right + r;
            wrapped = true;
        } else if self.position.x - r > b.right {
            self.position.x = b.left - r;
            wrapped = true;
        }
        if self.position.y + r < b.top {
            self.position.y = b.bottom + r;
            wrapped = true;
        } else if self.position.y - r > b.bottom {
            self.position.y = b.top - r;
            wrapped = true;
        }
        if wrapped {
            self.tail.clear();
            self.tail.push_back(self.position);
        }
    }
}

impl Particle for Chaser {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        self.draw(frame);
        self.step(dt, frame.neighbors, frame.rng);
        true
    }

    fn pointer(&mut self, at: Vec2, _ctx: &mut PointerContext<'_>) {
        if self.is_rabbit {
            return;
        }
        flee(
            &mut self.velocity,
            self.position,
            at,
            self.point_event_distance,
            self.settings.point_event_multiplier,
        );
    }

    fn neighbor(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            role: if self.is_rabbit {
                NeighborRole::Attractor
            } else {
                NeighborRole::Regular
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::test_support::{Draw, RecordingSurface, canvas, rng};

    fn still(position: Vec2) -> Chaser {
        let settings = ChaserSettings {
            position: Some(position),
            speed: Some(0.0),
            angle: Some(0.0),
            ..Default::default()
        };
        Chaser::new(settings, canvas(), &mut rng())
    }

    #[test]
    fn test_speed_within_range() {
        let mut r = rng();
        for _ in 0..50 {
            let c = Chaser::new(ChaserSettings::default(), canvas(), &mut r);
            let speed = c.velocity().length();
            assert!((1.0 - 1e-4..5.0 + 1e-4).contains(&speed));
        }
    }

    #[test]
    fn test_set_as_rabbit_rerolls_speed() {
        let mut r = rng();
        let mut c = Chaser::new(ChaserSettings::default(), canvas(), &mut r);
        c.set_as_rabbit(true, &mut r);
        assert!(c.is_rabbit());
        let speed = c.velocity().length();
        assert!((4.0 - 1e-4..10.0 + 1e-4).contains(&speed));
        assert_eq!(c.neighbor().role, NeighborRole::Attractor);
    }

    #[test]
    fn test_tail_is_capped() {
        let mut c = still(Vec2::new(100.0, 100.0));
        let mut r = rng();
        for _ in 0..40 {
            c.step(1.0, &[], &mut r);
        }
        assert_eq!(c.tail_len(), 25);
    }

    #[test]
    fn test_tail_fades_out() {
        let mut c = still(Vec2::new(100.0, 100.0));
        let mut r = rng();
        for _ in 0..30 {
            c.step(1.0, &[], &mut r);
        }
        let mut surface = RecordingSurface::new(800, 400);
        let mut frame = FrameContext {
            surface: &mut surface,
            neighbors: &[],
            rng: &mut r,
        };
        c.draw(&mut frame);
        let alphas: Vec<f32> = surface
            .draws
            .iter()
            .filter_map(|d| match d {
                Draw::Line { paint, .. } => Some(paint.alpha),
                _ => None,
            })
            .collect();
        assert!(!alphas.is_empty());
        assert_eq!(alphas[0], 1.0);
        assert!(alphas.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_chases_rabbit() {
        let mut c = still(Vec2::new(100.0, 100.0));
        let rabbit = Neighbor {
            position: Vec2::new(200.0, 100.0),
            role: NeighborRole::Attractor,
        };
        let mut r = rng();
        c.step(1.0, &[rabbit], &mut r);
        assert!((c.velocity().x - 0.1).abs() < 1e-5);
        assert!(c.velocity().y.abs() < 1e-5);
    }

    #[test]
    fn test_ignores_regular_neighbors() {
        let mut c = still(Vec2::new(100.0, 100.0));
        let other = Neighbor {
            position: Vec2::new(200.0, 100.0),
            role: NeighborRole::Regular,
        };
        let mut r = rng();
        c.step(1.0, &[other], &mut r);
        assert_eq!(c.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_wrap_resets_tail() {
        let settings = ChaserSettings {
            position: Some(Vec2::new(799.0, 100.0)),
            speed: Some(3.0),
            angle: Some(0.0),
            ..Default::default()
        };
        let mut c = Chaser::new(settings, canvas(), &mut rng());
        let mut r = rng();
        c.step(1.0, &[], &mut r);
        assert_eq!(c.position().x, 0.0);
        assert_eq!(c.tail_len(), 1);
    }

    #[test]
    fn test_speed_limiter_slows_fast_axis() {
        let settings = ChaserSettings {
            position: Some(Vec2::new(100.0, 100.0)),
            speed: Some(6.0),
            angle: Some(0.0),
            ..Default::default()
        };
        let mut c = Chaser::new(settings, canvas(), &mut rng());
        let mut r = rng();
        c.step(1.0, &[], &mut r);
        assert!((c.velocity().x - 5.4).abs() < 1e-4);
    }

    #[test]
    fn test_rabbits_ignore_pointer_and_stay_hidden() {
        let mut r = rng();
        let mut c = still(Vec2::new(100.0, 100.0));
        c.set_as_rabbit(true, &mut r);
        let before = c.velocity();
        let mut spawned = Vec::new();
        let mut ctx = PointerContext::new(&mut r, &mut spawned);
        c.pointer(Vec2::new(101.0, 100.0), &mut ctx);
        assert_eq!(c.velocity(), before);

        let mut surface = RecordingSurface::new(800, 400);
        let mut frame = FrameContext {
            surface: &mut surface,
            neighbors: &[],
            rng: &mut r,
        };
        c.draw(&mut frame);
        assert!(surface.draws.is_empty());
    }
}
