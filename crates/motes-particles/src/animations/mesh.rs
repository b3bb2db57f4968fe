//! Connected-dots mesh ("mesh background").

use motes_core::{
    Bounds, FrameContext, MotesRng, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb,
    Vec2, random_angle, random_between,
};

use super::{flee, recover};

/// Tunables for a [`Mesh`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSettings {
    /// Start position; random inside the canvas when `None`.
    pub position: Option<Vec2>,
    pub color: Rgb,
    /// Dot radius; zero draws only the connecting lines.
    pub radius: Option<f32>,
    pub min_radius: f32,
    pub max_radius: f32,
    pub speed: Option<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    pub angle: Option<f32>,
    pub bounds: Option<Bounds>,
    /// Neighbours closer than this are not connected.
    pub min_line_distance: f32,
    /// Neighbours farther than this are not connected.
    pub max_line_distance: f32,
    pub line_width: f32,
    pub point_event_distance: Option<f32>,
    pub point_event_multiplier: f32,
    pub point_event_recover_speed: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            position: None,
            color: Rgb::BLACK,
            radius: Some(0.0),
            min_radius: 2.0,
            max_radius: 2.0,
            speed: None,
            min_speed: 0.25,
            max_speed: 1.5,
            angle: None,
            bounds: None,
            min_line_distance: 10.0,
            max_line_distance: 150.0,
            line_width: 0.5,
            point_event_distance: Some(50.0),
            point_event_multiplier: 3.0,
            point_event_recover_speed: 1.5,
        }
    }
}

impl MeshSettings {
    /// Scale sizes, speeds and distances by `k`. Line width is left alone.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            radius: self.radius.map(|r| r * k),
            min_radius: self.min_radius * k,
            max_radius: self.max_radius * k,
            speed: self.speed.map(|s| s * k),
            min_speed: self.min_speed * k,
            max_speed: self.max_speed * k,
            min_line_distance: self.min_line_distance * k,
            max_line_distance: self.max_line_distance * k,
            point_event_distance: self.point_event_distance.map(|d| d * k),
            point_event_multiplier: self.point_event_multiplier * k,
            ..self.clone()
        }
    }
}

/// A drifting node that draws fading lines to every nearby node.
#[derive(Debug, Clone)]
pub struct Mesh {
    settings: MeshSettings,
    position: Vec2,
    velocity: Vec2,
    original_velocity: Vec2,
    radius: f32,
    point_event_distance: f32,
    bounds: Bounds,
}

impl Mesh {
    pub fn new(settings: MeshSettings, canvas: Bounds, rng: &mut MotesRng) -> Self {
        let position = settings.position.unwrap_or_else(|| {
            Vec2::new(
                random_between(rng, canvas.left, canvas.right),
                random_between(rng, canvas.top, canvas.bottom),
            )
        });
        let angle = settings.angle.unwrap_or_else(|| random_angle(rng));
        let speed = settings
            .speed
            .unwrap_or_else(|| random_between(rng, settings.min_speed, settings.max_speed));
        let velocity = Vec2::new(speed * angle.cos(), speed * angle.sin());
        let radius = settings
            .radius
            .unwrap_or_else(|| random_between(rng, settings.min_radius, settings.max_radius));
        let point_event_distance = settings.point_event_distance.unwrap_or(radius * 2.5);
        let bounds = settings.bounds.unwrap_or(canvas);

        Self {
            settings,
            position,
            velocity,
            original_velocity: velocity,
            radius,
            point_event_distance,
            bounds,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn draw(&self, frame: &mut FrameContext<'_>) {
        let s = &self.settings;
        if self.radius > 0.0 {
            frame
                .surface
                .fill_circle(self.position, self.radius, Paint::solid(s.color));
        }
        for n in frame.neighbors {
            let dist = self.position.distance(n.position);
            if dist < s.max_line_distance && dist > s.min_line_distance {
                let alpha = (s.max_line_distance - dist) / s.max_line_distance;
                frame.surface.stroke_line(
                    self.position,
                    n.position,
                    s.line_width,
                    Paint::with_alpha(s.color, alpha),
                );
            }
        }
    }

    fn step(&mut self, dt: f32) {
        recover(
            &mut self.velocity,
            self.original_velocity,
            self.settings.point_event_recover_speed,
            0.5,
        );
        self.position += self.velocity * dt;

        // Wrap to the opposite edge once fully outside.
        let r = self.radius;
        let b = self.bounds;
        if self.position.x + r < b.left {
            self.position.x = b.right + r;
        }
        if self.position.x - r > b.right {
            self.position.x = b.left - r;
        }
        if self.position.y + r < b.top {
            self.position.y = b.bottom + r;
        }
        if self.position.y - r > b.bottom {
            self.position.y = b.top - r;
        }
    }
}

impl Particle for Mesh {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        self.draw(frame);
        self.step(dt);
        true
    }

    fn pointer(&mut self, at: Vec2, _ctx: &mut PointerContext<'_>) {
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
            role: NeighborRole::Regular,
        }
    }
}
