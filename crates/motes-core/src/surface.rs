//! Drawing surface abstraction.

use glam::Vec2;

use crate::color::{Paint, Rgb};

/// Post-processing applied to the whole surface after particles are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurfaceEffect {
    #[default]
    None,
    /// Blur then alpha-threshold, melting nearby blobs together.
    Goo,
}

/// Something particles can draw on.
///
/// Coordinates are in surface pixels with the origin in the top-left corner.
pub trait Surface {
    /// Pixel width and height.
    fn size(&self) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Paint every pixel with an opaque colour.
    fn fill(&mut self, color: Rgb);

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint);

    fn fill_polygon(&mut self, points: &[Vec2], paint: Paint);

    /// Closed outline through `points`.
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, paint: Paint) {
        if points.len() < 2 {
            return;
        }
        for (i, from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.stroke_line(*from, to, width, paint);
        }
    }

    fn set_effect(&mut self, effect: SurfaceEffect);
}
