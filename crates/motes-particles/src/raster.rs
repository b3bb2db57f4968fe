//! Anti-aliased pixel buffer rendered to the terminal as half blocks.

use std::borrow::Cow;

use motes_core::{Paint, Rgb, Surface, SurfaceEffect, Vec2};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Premultiplied RGBA.
type Pixel = [f32; 4];

/// Box blur radius of the goo effect, in pixels.
const GOO_BLUR: i32 = 2;
/// Alpha ramp that turns the blurred field back into hard-edged blobs.
const GOO_LOW: f32 = 0.35;
const GOO_HIGH: f32 = 0.55;

const HALF_BLOCK: &str = "▀";

/// A pixel canvas two pixels tall per terminal cell.
///
/// Each cell prints an upper half block whose foreground is the top pixel and
/// whose background is the bottom one, so a `w` x `h` cell area holds
/// `w` x `2h` pixels.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    effect: SurfaceEffect,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
            effect: SurfaceEffect::None,
        }
    }

    /// Change the pixel size. Contents are cleared when the size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width as usize * height as usize];
    }

    /// Resize to cover a terminal area of `cols` x `rows` cells.
    pub fn resize_cells(&mut self, cols: u16, rows: u16) {
        self.resize(cols as u32, rows as u32 * 2);
    }

    pub fn effect(&self) -> SurfaceEffect {
        self.effect
    }

    /// Premultiplied RGBA of one pixel, before any effect.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Composite onto `background` and emit one line per cell row.
    pub fn to_lines(&self, background: Rgb) -> Vec<Line<'static>> {
        let pixels = self.effected();
        let bg = background.to_f32();
        let w = self.width as usize;
        let shade = |x: usize, y: usize| -> Rgb {
            let Some(p) = pixels.get(y * w + x).filter(|_| y < self.height as usize) else {
                return background;
            };
            let under = 1.0 - p[3];
            Rgb::from_f32([
                p[0] + bg[0] * under,
                p[1] + bg[1] * under,
                p[2] + bg[2] * under,
            ])
        };

        (0..self.height.div_ceil(2) as usize)
            .map(|row| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut run = String::new();
                let mut run_style: Option<Style> = None;
                for x in 0..w {
                    let top = shade(x, row * 2);
                    let bottom = shade(x, row * 2 + 1);
                    let style = Style::default().fg(top.to_color()).bg(bottom.to_color());
                    if run_style != Some(style) {
                        if let Some(prev) = run_style {
                            spans.push(Span::styled(std::mem::take(&mut run), prev));
                        }
                        run_style = Some(style);
                    }
                    run.push_str(HALF_BLOCK);
                }
                if let Some(style) = run_style {
                    spans.push(Span::styled(run, style));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Source-over one pixel with `alpha` of `color`.
    fn blend(&mut self, x: i32, y: i32, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 || x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = self.index(x as u32, y as u32);
        let p = &mut self.pixels[i];
        let keep = 1.0 - alpha;
        p[0] = color[0] * alpha + p[0] * keep;
        p[1] = color[1] * alpha + p[1] * keep;
        p[2] = color[2] * alpha + p[2] * keep;
        p[3] = alpha + p[3] * keep;
    }

    /// Pixel rows and columns touched by a box, clamped to the raster.
    fn span(&self, min: Vec2, max: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = min.x.floor().max(0.0) as i32;
        let y0 = min.y.floor().max(0.0) as i32;
        let x1 = (max.x.ceil() as i32).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height as i32 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    fn effected(&self) -> Cow<'_, [Pixel]> {
        match self.effect {
            SurfaceEffect::None => Cow::Borrowed(&self.pixels),
            SurfaceEffect::Goo => Cow::Owned(self.goo()),
        }
    }

    /// Blur then sharpen the alpha so touching blobs merge.
    fn goo(&self) -> Vec<Pixel> {
        let (w, h) = (self.width as i32, self.height as i32);
        let window = (GOO_BLUR * 2 + 1) as f32;
        let blur = |src: &[Pixel], horizontal: bool| -> Vec<Pixel> {
            let mut out = vec![[0.0; 4]; src.len()];
            for y in 0..h {
                for x in 0..w {
                    let mut acc = [0.0f32; 4];
                    for k in -GOO_BLUR..=GOO_BLUR {
                        let (sx, sy) = if horizontal { (x + k, y) } else { (x, y + k) };
                        if sx < 0 || sy < 0 || sx >= w || sy >= h {
                            continue;
                        }
                        let p = src[(sy * w + sx) as usize];
                        for c in 0..4 {
                            acc[c] += p[c];
                        }
                    }
                    out[(y * w + x) as usize] = acc.map(|v| v / window);
                }
            }
            out
        };
        let blurred = blur(&blur(&self.pixels, true), false);

        blurred
            .into_iter()
            .map(|p| {
                if p[3] <= f32::EPSILON {
                    return [0.0; 4];
                }
                let alpha = smoothstep(GOO_LOW, GOO_HIGH, p[3]);
                let k = alpha / p[3];
                [p[0] * k, p[1] * k, p[2] * k, alpha]
            })
            .collect()
    }
}

fn smoothstep(low: f32, high: f32, x: f32) -> f32 {
    let t = ((x - low) / (high - low)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill(&mut self, color: Rgb) {
        let [r, g, b] = color.to_f32();
        self.pixels.fill([r, g, b, 1.0]);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        if radius <= 0.0 || paint.alpha <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.span(center - reach, center + reach) else {
            return;
        };
        let color = paint.color.to_f32();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                self.blend(x, y, color, paint.alpha * coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint) {
        if width <= 0.0 || paint.alpha <= 0.0 {
            return;
        }
        // Hairlines keep one pixel of footprint and fade instead.
        let half = width.max(1.0) * 0.5;
        let alpha = paint.alpha * width.min(1.0);
        let reach = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.span(from.min(to) - reach, from.max(to) + reach) else {
            return;
        };
        let color = paint.color.to_f32();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (half + 0.5 - segment_distance(p, from, to)).clamp(0.0, 1.0);
                self.blend(x, y, color, alpha * coverage);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: Paint) {
        if points.len() < 3 || paint.alpha <= 0.0 {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((points[0], points[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let Some((x0, y0, x1, y1)) = self.span(min, max) else {
            return;
        };
        let color = paint.color.to_f32();
        let mut crossings = Vec::new();
        for y in y0..=y1 {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            // Even-odd: fill between successive pairs.
            for pair in crossings.chunks_exact(2) {
                for x in x0..=x1 {
                    let xc = x as f32 + 0.5;
                    if xc >= pair[0] && xc < pair[1] {
                        self.blend(x, y, color, paint.alpha);
                    }
                }
            }
        }
    }

    fn set_effect(&mut self, effect: SurfaceEffect) {
        self.effect = effect;
    }
}
