//! Spinning squares that burst when the pointer hits them ("floating squares").

use motes_core::{
    Bounds, FrameContext, MotesRng, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb,
    Vec2, random_angle, random_between,
};
use tracing::trace;

/// Tunables for a [`Square`].
#[derive(Debug, Clone, PartialEq)]
pub struct SquareSettings {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub color: Rgb,
    /// Edge length.
    pub size: Option<f32>,
    pub min_size: f32,
    pub max_size: f32,
    /// How far left of the canvas new squares start.
    pub min_offscreen: f32,
    pub max_offscreen: f32,
    pub speed: Option<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Initial rotation.
    pub angle: Option<f32>,
    /// Spin in radians per frame.
    pub angular_velocity: Option<f32>,
    pub angular_velocity_min: f32,
    pub angular_velocity_max: f32,
    /// Heading in radians; random when `None`. Zero moves right.
    pub trajectory: Option<f32>,
    pub bounds: Option<Bounds>,
    pub explosion_particles_min: usize,
    pub explosion_particles_max: usize,
    pub explosion_size_multiplier_min: f32,
    pub explosion_size_multiplier_max: f32,
    pub should_explode: bool,
    /// Squares this size or smaller vanish without fragments.
    pub should_explode_min_size: f32,
    /// Start over after leaving the canvas instead of being removed.
    pub should_wrap: bool,
    /// Hit radius as a multiple of the size.
    pub point_event_distance_multiplier: f32,
}

impl Default for SquareSettings {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            color: Rgb::BLACK,
            size: None,
            min_size: 20.0,
            max_size: 75.0,
            min_offscreen: 10.0,
            max_offscreen: 500.0,
            speed: None,
            min_speed: 1.0,
            max_speed: 5.0,
            angle: None,
            angular_velocity: None,
            angular_velocity_min: -0.05,
            angular_velocity_max: 0.05,
            trajectory: Some(0.0),
            bounds: None,
            explosion_particles_min: 5,
            explosion_particles_max: 25,
            explosion_size_multiplier_min: 0.1,
            explosion_size_multiplier_max: 0.25,
            should_explode: true,
            should_explode_min_size: 15.0,
            should_wrap: true,
            point_event_distance_multiplier: 1.1,
        }
    }
}

impl SquareSettings {
    /// Scale sizes, speeds and distances by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            size: self.size.map(|s| s * k),
            min_size: self.min_size * k,
            max_size: self.max_size * k,
            min_offscreen: self.min_offscreen * k,
            max_offscreen: self.max_offscreen * k,
            speed: self.speed.map(|s| s * k),
            min_speed: self.min_speed * k,
            max_speed: self.max_speed * k,
            should_explode_min_size: self.should_explode_min_size * k,
            ..self.clone()
        }
    }
}

/// A rotating square crossing the canvas.
///
/// A hit hides it; big squares also burst into fragments. Hidden wrapping
/// squares keep flying unseen until they leave the canvas and start over.
#[derive(Debug, Clone)]
pub struct Square {
    settings: SquareSettings,
    size: f32,
    half_size: f32,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    spin: f32,
    point_event_distance: f32,
    entered_bounds: bool,
    exited_bounds: bool,
    visible: bool,
    bounds: Bounds,
}

impl Square {
    pub fn new(settings: SquareSettings, canvas: Bounds, rng: &mut MotesRng) -> Self {
        let mut square = Self {
            bounds: settings.bounds.unwrap_or(canvas),
            settings,
            size: 0.0,
            half_size: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            angle: 0.0,
            spin: 0.0,
            point_event_distance: 0.0,
            entered_bounds: false,
            exited_bounds: false,
            visible: true,
        };
        square.reset(rng);
        square
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Roll a fresh size, start position, heading and spin.
    fn reset(&mut self, rng: &mut MotesRng) {
        let s = &self.settings;
        let b = self.bounds;
        let size = s
            .size
            .unwrap_or_else(|| random_between(rng, s.min_size, s.max_size));
        let x = s.x.unwrap_or_else(|| {
            b.left - size - random_between(rng, 0.0, s.max_offscreen - s.min_offscreen) - s.min_offscreen
        });
        let y = s.y.unwrap_or_else(|| {
            random_between(rng, 0.0, b.height() - size * 2.5) + size * 1.25 + b.top
        });
        let trajectory = s.trajectory.unwrap_or_else(|| random_angle(rng));
        let speed = s
            .speed
            .unwrap_or_else(|| random_between(rng, s.min_speed, s.max_speed));
        let angle = s.angle.unwrap_or_else(|| random_angle(rng));
        let spin = s.angular_velocity.unwrap_or_else(|| {
            random_between(rng, s.angular_velocity_min, s.angular_velocity_max)
        });

        self.size = size;
        self.half_size = size * 0.5;
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(speed * trajectory.cos(), speed * trajectory.sin());
        self.angle = angle;
        self.spin = spin;
        self.point_event_distance = size * self.settings.point_event_distance_multiplier;
        self.entered_bounds = false;
        self.exited_bounds = false;
        self.visible = true;
    }

    /// A small non-wrapping square flung out of this one.
    fn fragment(&self, rng: &mut MotesRng) -> Square {
        let s = &self.settings;
        let multiplier = random_between(
            rng,
            s.explosion_size_multiplier_min,
            s.explosion_size_multiplier_max,
        );
        let settings = SquareSettings {
            x: Some(self.position.x),
            y: Some(self.position.y),
            size: Some((self.size * multiplier).max(1.0)),
            speed: None,
            angle: None,
            angular_velocity: None,
            trajectory: None,
            should_wrap: false,
            ..s.clone()
        };
        let mut piece = Square::new(settings, self.bounds, rng);
        piece.velocity += self.velocity;
        piece.entered_bounds = true;
        piece
    }

    /// Whether the square's offset corner is strictly inside the bounds.
    fn in_bounds(&self) -> bool {
        let b = self.bounds;
        let corner = self.position - Vec2::splat(self.size);
        corner.x > b.left && corner.x < b.right && corner.y > b.top && corner.y < b.bottom
    }

    fn corners(&self) -> [Vec2; 4] {
        let h = self.half_size;
        let rotation = Vec2::from_angle(self.angle);
        [
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
        ]
        .map(|corner| self.position + rotation.rotate(corner))
    }

    fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.angle += self.spin * dt;
        if !self.entered_bounds {
            self.entered_bounds = self.in_bounds();
        }
        if self.entered_bounds && !self.exited_bounds {
            self.exited_bounds = !self.in_bounds();
        }
    }
}

impl Particle for Square {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        if self.visible {
            frame
                .surface
                .fill_polygon(&self.corners(), Paint::solid(self.settings.color));
        }
        self.step(dt);
        if !self.visible && !self.settings.should_wrap {
            return false;
        }
        if self.entered_bounds && self.exited_bounds {
            if !self.settings.should_wrap {
                return false;
            }
            self.reset(frame.rng);
        }
        true
    }

    fn pointer(&mut self, at: Vec2, ctx: &mut PointerContext<'_>) {
        if !self.visible || self.position.distance(at) >= self.point_event_distance {
            return;
        }
        self.visible = false;
        let s = &self.settings;
        if s.should_explode && self.size > s.should_explode_min_size {
            let count = random_between(
                ctx.rng,
                s.explosion_particles_min as f32,
                s.explosion_particles_max as f32,
            )
            .floor() as usize;
            trace!(count, size = self.size, "square burst");
            for _ in 0..count {
                let piece = self.fragment(ctx.rng);
                ctx.spawn(Box::new(piece));
            }
        }
    }

    fn neighbor(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            role: NeighborRole::Regular,
        }
    }
}
