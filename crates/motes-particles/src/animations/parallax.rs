//! Hexagons drifting against the pointer ("parallax hexagons").

use motes_core::{
    Bounds, FrameContext, MotesRng, Neighbor, NeighborRole, Paint, Particle, PointerContext, Rgb,
    Vec2, random_between,
};

use super::recover;

/// Tunables for a [`Parallax`] hexagon.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxSettings {
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Spawn the first time anywhere on the canvas rather than off-screen.
    pub default_position_on_canvas: bool,
    pub min_offscreen: f32,
    pub max_offscreen: f32,
    pub color: Rgb,
    pub line_width: f32,
    /// Fill opacity; the outline is always opaque.
    pub opacity: f32,
    pub radius: Option<f32>,
    pub min_radius: f32,
    pub max_radius: f32,
    pub bounds: Option<Bounds>,
    pub point_event_multiplier: f32,
    pub point_event_recover_speed: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            default_position_on_canvas: true,
            min_offscreen: 0.0,
            max_offscreen: 0.0,
            color: Rgb::BLACK,
            line_width: 2.0,
            opacity: 0.25,
            radius: None,
            min_radius: 25.0,
            max_radius: 200.0,
            bounds: None,
            point_event_multiplier: 0.1,
            point_event_recover_speed: 0.01,
        }
    }
}

impl ParallaxSettings {
    /// Scale sizes and distances by `k`.
    ///
    /// Pointer speed is proportional to the radius so the multiplier stays.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            min_offscreen: self.min_offscreen * k,
            max_offscreen: self.max_offscreen * k,
            radius: self.radius.map(|r| r * k),
            min_radius: self.min_radius * k,
            max_radius: self.max_radius * k,
            ..self.clone()
        }
    }
}

/// Canvas edge a hexagon respawns beyond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A translucent hexagon that shrinks toward the centre of the canvas and
/// slides away from the pointer, bigger ones faster.
#[derive(Debug, Clone)]
pub struct Parallax {
    settings: ParallaxSettings,
    radius: f32,
    /// Corner offsets from the centre.
    points: [Vec2; 6],
    position: Vec2,
    velocity: Vec2,
    /// Cleared after the first wrap so later respawns happen off-screen.
    spawn_on_canvas: bool,
    bounds: Bounds,
}

impl Parallax {
    pub fn new(settings: ParallaxSettings, canvas: Bounds, rng: &mut MotesRng) -> Self {
        let radius = settings
            .radius
            .unwrap_or_else(|| random_between(rng, settings.min_radius, settings.max_radius));
        let points = std::array::from_fn(|a| {
            let angle = std::f32::consts::FRAC_PI_3 * a as f32;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        });
        let mut hexagon = Self {
            bounds: settings.bounds.unwrap_or(canvas),
            spawn_on_canvas: settings.default_position_on_canvas,
            settings,
            radius,
            points,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        };
        hexagon.set_position(None, rng);
        hexagon
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

    /// Place the hexagon on the canvas, or just beyond `side`.
    pub fn set_position(&mut self, side: Option<Side>, rng: &mut MotesRng) {
        if let Some(x) = self.settings.x {
            self.position.x = x;
        }
        if let Some(y) = self.settings.y {
            self.position.y = y;
            return;
        }
        let b = self.bounds;
        let side = match side {
            Some(side) if !self.spawn_on_canvas => side,
            _ => {
                self.position = Vec2::new(
                    random_between(rng, b.left, b.right),
                    random_between(rng, b.top, b.bottom),
                );
                return;
            }
        };
        let offscreen = random_between(rng, self.settings.min_offscreen, self.settings.max_offscreen);
        self.position = match side {
            Side::Top => Vec2::new(
                random_between(rng, b.left, b.right),
                b.top - self.radius - offscreen,
            ),
            Side::Bottom => Vec2::new(
                random_between(rng, b.left, b.right),
                b.bottom + self.radius + offscreen,
            ),
            Side::Left => Vec2::new(
                b.left - self.radius - offscreen,
                random_between(rng, b.top, b.bottom),
            ),
            Side::Right => Vec2::new(
                b.right + self.radius + offscreen,
                random_between(rng, b.top, b.bottom),
            ),
        };
    }

    /// Corner positions after the perspective squash toward the centre.
    fn corners(&self) -> ([Vec2; 6], f32) {
        let b = self.bounds;
        let center = b.center();
        let scale = Vec2::new(
            (center.x - self.position.x).abs() / b.width().max(1.0),
            (center.y - self.position.y).abs() / b.height().max(1.0),
        );
        let corners = self.points.map(|p| self.position + p * scale);
        (corners, (scale.x + scale.y) * 0.5)
    }

    fn step(&mut self, dt: f32, rng: &mut MotesRng) {
        recover(
            &mut self.velocity,
            Vec2::ZERO,
            self.settings.point_event_recover_speed,
            0.5,
        );
        self.position += self.velocity * dt;

        let r = self.radius;
        let b = self.bounds;
        let mut respawn = |hexagon: &mut Self, side| {
            hexagon.spawn_on_canvas = false;
            hexagon.set_position(Some(side), rng);
        };
        if self.position.x + r < b.left {
            respawn(self, Side::Right);
        } else if self.position.x - r > b.right {
            respawn(self, Side::Left);
        }
        if self.position.y + r < b.top {
            respawn(self, Side::Bottom);
        } else if self.position.y - r > b.bottom {
            respawn(self, Side::Top);
        }
    }
}

impl Particle for Parallax {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn update(&mut self, dt: f32, frame: &mut FrameContext<'_>) -> bool {
        let s = &self.settings;
        let (corners, scale) = self.corners();
        frame
            .surface
            .fill_polygon(&corners, Paint::with_alpha(s.color, s.opacity));
        frame
            .surface
            .stroke_polygon(&corners, s.line_width * scale, Paint::solid(s.color));
        self.step(dt, frame.rng);
        true
    }

    fn pointer(&mut self, at: Vec2, _ctx: &mut PointerContext<'_>) {
        let b = self.bounds;
        let center = b.center();
        let dist = center.distance(at);
        let speed = dist / b.width().min(b.height()).max(1.0)
            * self.settings.point_event_multiplier
            * self.radius;
        let sx = if at.x < center.x { -1.0 } else { 1.0 };
        let sy = if at.y < center.y { -1.0 } else { 1.0 };
        self.velocity = Vec2::new(sx * speed, sy * speed);
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

    fn hexagon(x: f32, y: f32, radius: f32) -> Parallax {
        let settings = ParallaxSettings {
            radius: Some(radius),
            ..Default::default()
        };
        let mut h = Parallax::new(settings, canvas(), &mut rng());
        h.position = Vec2::new(x, y);
        h
    }

    #[test]
    fn test_corners_form_hexagon() {
        let h = hexagon(400.0, 200.0, 50.0);
        assert_eq!(h.points.len(), 6);
        assert!((h.points[0] - Vec2::new(50.0, 0.0)).length() < 1e-4);
        assert!((h.points[3] - Vec2::new(-50.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_squashed_at_center_full_at_edge() {
        let h = hexagon(400.0, 200.0, 50.0);
        let (corners, scale) = h.corners();
        assert_eq!(scale, 0.0);
        assert!(corners.iter().all(|c| *c == Vec2::new(400.0, 200.0)));

        let h = hexagon(0.0, 0.0, 50.0);
        let (_, scale) = h.corners();
        assert!((scale - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_update_fills_translucent_and_strokes_opaque() {
        let mut h = hexagon(100.0, 100.0, 50.0);
        let mut surface = RecordingSurface::new(800, 400);
        let mut r = rng();
        let mut frame = FrameContext {
            surface: &mut surface,
            neighbors: &[],
            rng: &mut r,
        };
        h.update(1.0, &mut frame);
        match &surface.draws[0] {
            Draw::Polygon { points, paint } => {
                assert_eq!(points.len(), 6);
                assert_eq!(paint.alpha, 0.25);
            }
            other => panic!("unexpected draw {other:?}"),
        }
        assert_eq!(surface.lines().len(), 6);
    }

    #[test]
    fn test_pointer_sets_velocity_away_from_center() {
        let mut h = hexagon(100.0, 100.0, 50.0);
        let mut r = rng();
        let mut spawned = Vec::new();
        let mut ctx = PointerContext::new(&mut r, &mut spawned);
        // 200px left of centre: 200 / 400 * 0.1 * 50 = 2.5
        h.pointer(Vec2::new(200.0, 200.0), &mut ctx);
        assert!((h.velocity().x + 2.5).abs() < 1e-4);
        assert!((h.velocity().y - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_recovers_to_rest() {
        let mut h = hexagon(400.0, 200.0, 10.0);
        h.velocity = Vec2::new(3.0, 0.0);
        let mut r = rng();
        for _ in 0..1000 {
            h.step(0.0, &mut r);
        }
        assert_eq!(h.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_leaving_left_respawns_offscreen_right() {
        let settings = ParallaxSettings {
            radius: Some(20.0),
            min_offscreen: 5.0,
            max_offscreen: 10.0,
            ..Default::default()
        };
        let mut r = rng();
        let mut h = Parallax::new(settings, canvas(), &mut r);
        h.position = Vec2::new(-21.0, 200.0);
        h.step(1.0, &mut r);
        assert!(h.position().x >= 800.0 + 20.0 + 5.0);
        assert!(h.position().x < 800.0 + 20.0 + 10.0);
        assert!((0.0..400.0).contains(&h.position().y));
        assert!(!h.spawn_on_canvas);
    }
}
