//! Floating metaballs ("coffee cream").

use motes_core::{
    Bounds, FrameContext, MotesRng, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb,
    Vec2, random_angle, random_between,
};

use super::{flee, recover};

/// Tunables for a [`Metaball`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetaballSettings {
    /// Start position; canvas centre when `None`.
    pub position: Option<Vec2>,
    pub color: Rgb,
    pub radius: Option<f32>,
    pub min_radius: f32,
    pub max_radius: f32,
    pub speed: Option<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Heading in radians.
    pub angle: Option<f32>,
    pub bounds: Option<Bounds>,
    /// Pointer range; `2.5 * radius` when `None`.
    pub point_event_distance: Option<f32>,
    pub point_event_multiplier: f32,
    pub point_event_recover_speed: f32,
}

impl Default for MetaballSettings {
    fn default() -> Self {
        Self {
            position: None,
            color: Rgb::BLACK,
            radius: None,
            min_radius: 25.0,
            max_radius: 100.0,
            speed: None,
            min_speed: 0.25,
            max_speed: 2.0,
            angle: None,
            bounds: None,
            point_event_distance: None,
            point_event_multiplier: 0.5,
            point_event_recover_speed: 0.1,
        }
    }
}

impl MetaballSettings {
    /// Scale sizes, speeds and distances by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            radius: self.radius.map(|r| r * k),
            min_radius: self.min_radius * k,
            max_radius: self.max_radius * k,
            speed: self.speed.map(|s| s * k),
            min_speed: self.min_speed * k,
            max_speed: self.max_speed * k,
            point_event_distance: self.point_event_distance.map(|d| d * k),
            point_event_multiplier: self.point_event_multiplier * k,
            ..self.clone()
        }
    }
}

/// A filled circle drifting in a straight line and bouncing off the edges.
#[derive(Debug, Clone)]
pub struct Metaball {
    settings: MetaballSettings,
    position: Vec2,
    velocity: Vec2,
    /// Cruising velocity the ball recovers to after being pushed.
    original_velocity: Vec2,
    radius: f32,
    point_event_distance: f32,
    bounds: Bounds,
}

impl Metaball {
    pub fn new(settings: MetaballSettings, canvas: Bounds, rng: &mut MotesRng) -> Self {
        let position = settings.position.unwrap_or(Vec2::new(
            canvas.width() * 0.5,
            canvas.height() * 0.5,
        ));
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

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn step(&mut self, dt: f32) {
        recover(
            &mut self.velocity,
            self.original_velocity,
            self.settings.point_event_recover_speed,
            0.5,
        );
        self.position += self.velocity * dt;

        // Bounce once the ball is completely outside an edge.
        let r = self.radius;
        let b = self.bounds;
        if self.position.x + r < b.left {
            self.position.x = b.left - r;
            self.velocity.x = self.velocity.x.abs();
            self.original_velocity.x = self.velocity.x;
        }
        if self.position.x - r > b.right {
            self.position.x = b.right + r;
            self.velocity.x = -self.velocity.x.abs();
            self.original_velocity.x = self.velocity.x;
        }
        if self.position.y + r < b.top {
            self.position.y = b.top - r;
            self.velocity.y = self.velocity.y.abs();
            self.original_velocity.y = self.velocity.y;
        }
        if self.position.y - r > b.bottom {
            self.position.y = b.bottom + r;
            self.velocity.y = -self.velocity.y.abs();
            self.original_velocity.y = self.velocity.y;
        }
    }
}

impl Particle for Metaball {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        frame
            .surface
            .fill_circle(self.position, self.radius, Paint::solid(self.settings.color));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::test_support::{Draw, RecordingSurface, canvas, rng};

    fn ball(position: Vec2, velocity: Vec2, radius: f32) -> Metaball {
        let speed = velocity.length();
        let settings = MetaballSettings {
            position: Some(position),
            radius: Some(radius),
            speed: Some(speed),
            angle: Some(velocity.y.atan2(velocity.x)),
            ..Default::default()
        };
        Metaball::new(settings, canvas(), &mut rng())
    }

    #[test]
    fn test_defaults_start_at_canvas_center() {
        let mut r = rng();
        let b = Metaball::new(MetaballSettings::default(), canvas(), &mut r);
        assert_eq!(b.position(), Vec2::new(400.0, 200.0));
        assert!((25.0..100.0).contains(&b.radius()));
        let speed = b.velocity().length();
        assert!((0.25 - 1e-4..2.0 + 1e-4).contains(&speed));
    }

    #[test]
    fn test_update_draws_circle_and_moves() {
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 10.0);
        let mut surface = RecordingSurface::new(800, 400);
        let mut r = rng();
        let mut frame = FrameContext {
            surface: &mut surface,
            neighbors: &[],
            rng: &mut r,
        };
        assert!(b.update(1.5, &mut frame));
        assert!((b.position().x - 103.0).abs() < 1e-4);
        assert_eq!(surface.draws.len(), 1);
        match &surface.draws[0] {
            Draw::Circle { center, radius, .. } => {
                assert_eq!(*center, Vec2::new(100.0, 100.0));
                assert_eq!(*radius, 10.0);
            }
            other => panic!("unexpected draw {other:?}"),
        }
    }

    #[test]
    fn test_bounces_after_leaving_right_edge() {
        let mut b = ball(Vec2::new(809.0, 100.0), Vec2::new(2.0, 0.0), 10.0);
        b.step(1.0);
        assert_eq!(b.position().x, 810.0);
        assert!(b.velocity().x < 0.0);
        // The cruising velocity flips too, so recovery doesn't undo the bounce.
        b.step(1.0);
        assert!(b.velocity().x < 0.0);
    }

    #[test]
    fn test_bounces_after_leaving_top_edge() {
        let mut b = ball(Vec2::new(100.0, -9.0), Vec2::new(0.0, -2.0), 10.0);
        b.step(1.0);
        assert_eq!(b.position().y, -10.0);
        assert!(b.velocity().y > 0.0);
    }

    #[test]
    fn test_pointer_pushes_then_velocity_recovers() {
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 10.0);
        let mut r = rng();
        let mut spawned = Vec::new();
        let mut ctx = PointerContext::new(&mut r, &mut spawned);
        // Default range is 2.5 * radius.
        b.pointer(Vec2::new(110.0, 100.0), &mut ctx);
        assert!(b.velocity().x < 1.0);
        assert!(spawned.is_empty());

        for _ in 0..100 {
            b.step(0.0);
        }
        assert!((b.velocity().x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_scaled_shrinks_spatial_fields() {
        let s = MetaballSettings::default().scaled(0.5);
        assert_eq!(s.min_radius, 12.5);
        assert_eq!(s.max_speed, 1.0);
        assert_eq!(s.point_event_recover_speed, 0.1);
    }
}
