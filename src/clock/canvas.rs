//! Braille dot canvas: a `Surface` painted into the terminal cell buffer
//!
//! Every terminal cell holds a 2x4 braille dot block. Dots keep an RGB colour
//! composited over black; a dot shows once it is bright enough, and the cell
//! takes the colour of its brightest dot.

use super::surface::{Surface, Transform};
use super::time::Vec2;
use crate::colors::{luminance, Hsba, COLOR_MAX};
use crate::terminal::Terminal;
use crossterm::style::Color;

const BRAILLE_BASE: u32 = 0x2800;
pub const DOTS_X: u32 = 2;
pub const DOTS_Y: u32 = 4;

/// Dots dimmer than this stay blank
const VISIBLE_LUMINANCE: f64 = 0.15;

/// Widest square brush, in dots either side of the centre
const MAX_BRUSH_RADIUS: f64 = 4.0;

/// Dot bit for (column, row) inside a braille cell
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

struct Text {
    x: i32,
    y: i32,
    text: String,
    color: Color,
}

pub struct BrailleCanvas {
    width: u32,
    height: u32,
    dots: Vec<(f64, f64, f64)>,
    texts: Vec<Text>,
    color_max: f64,
    transform: Transform,
    stroke_width: f64,
    stroke: Hsba,
    fill: Hsba,
    path: Vec<Vec2>,
}

impl BrailleCanvas {
    /// Canvas covering a terminal of `cols` x `rows` cells
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            dots: Vec::new(),
            texts: Vec::new(),
            color_max: COLOR_MAX,
            transform: Transform::IDENTITY,
            stroke_width: 1.0,
            stroke: Hsba::new(0.0, 0.0, COLOR_MAX, COLOR_MAX),
            fill: Hsba::new(0.0, 0.0, COLOR_MAX, COLOR_MAX),
            path: Vec::new(),
        };
        canvas.set_size(cols as u32 * DOTS_X, rows as u32 * DOTS_Y);
        canvas
    }

    fn rgb(&self, color: Hsba) -> (f64, f64, f64) {
        color.to_rgb(self.color_max)
    }

    fn blend(&mut self, x: i64, y: i64, src: (f64, f64, f64), opacity: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let dot = &mut self.dots[y as usize * self.width as usize + x as usize];
        dot.0 = src.0 * opacity + dot.0 * (1.0 - opacity);
        dot.1 = src.1 * opacity + dot.1 * (1.0 - opacity);
        dot.2 = src.2 * opacity + dot.2 * (1.0 - opacity);
    }

    fn stamp(&mut self, x: i64, y: i64, radius: i64, src: (f64, f64, f64), opacity: f64) {
        let (width, height) = (self.width as i64, self.height as i64);
        for py in (y - radius).max(0)..=(y + radius).min(height - 1) {
            for px in (x - radius).max(0)..=(x + radius).min(width - 1) {
                self.blend(px, py, src, opacity);
            }
        }
    }

    /// Square brush half-size in dots for the current stroke width
    fn brush_radius(&self) -> i64 {
        if self.stroke_width.is_nan() || self.stroke_width < 2.0 {
            return 0;
        }
        let limit = MAX_BRUSH_RADIUS.min(self.width.max(self.height) as f64);
        (self.stroke_width / 2.0).min(limit) as i64
    }

    /// Bresenham between two canvas points, clipped to what the brush can reach
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, src: (f64, f64, f64), opacity: f64) {
        let radius = self.brush_radius();
        let reach = radius as f64;
        let min = Vec2::new(-reach, -reach);
        let max = Vec2::new(self.width as f64 - 1.0 + reach, self.height as f64 - 1.0 + reach);
        let Some((from, to)) = clip_segment(from, to, min, max) else {
            return;
        };

        let (mut x, mut y) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x, y, radius, src, opacity);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Even-odd scanline fill of the closed path
    fn fill_path(&mut self, points: &[Vec2], src: (f64, f64, f64), opacity: f64) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
        let max_y = points
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil()
            .min(self.height as f64 - 1.0) as i64;

        let mut crossings = Vec::new();
        for y in min_y..=max_y {
            let scan = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                    crossings.push(a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let x0 = span[0].round().max(0.0) as i64;
                let x1 = span[1].round().min(self.width as f64) as i64;
                for x in x0..x1 {
                    self.blend(x, y, src, opacity);
                }
            }
        }
    }

    fn dot_visible(&self, x: u32, y: u32) -> Option<(f64, f64, f64)> {
        let dot = self.dots[(y * self.width + x) as usize];
        (luminance(dot) >= VISIBLE_LUMINANCE).then_some(dot)
    }

    /// Copy dots and text into the terminal back buffer
    pub fn present(&self, term: &mut Terminal) {
        let cols = self.width / DOTS_X;
        let rows = self.height / DOTS_Y;

        for row in 0..rows {
            for col in 0..cols {
                let mut bits = 0u8;
                let mut brightest: Option<(f64, (f64, f64, f64))> = None;

                for (dy, row_bits) in DOT_BITS.iter().enumerate() {
                    for (dx, bit) in row_bits.iter().enumerate() {
                        let x = col * DOTS_X + dx as u32;
                        let y = row * DOTS_Y + dy as u32;
                        if let Some(dot) = self.dot_visible(x, y) {
                            bits |= bit;
                            let lum = luminance(dot);
                            if brightest.map_or(true, |(best, _)| lum > best) {
                                brightest = Some((lum, dot));
                            }
                        }
                    }
                }

                if let Some((_, (r, g, b))) = brightest {
                    let ch = char::from_u32(BRAILLE_BASE + bits as u32).unwrap_or(' ');
                    let color = Color::Rgb {
                        r: (r * 255.0).round() as u8,
                        g: (g * 255.0).round() as u8,
                        b: (b * 255.0).round() as u8,
                    };
                    term.set(col as i32, row as i32, ch, Some(color));
                } else {
                    term.set(col as i32, row as i32, ' ', None);
                }
            }
        }

        for text in &self.texts {
            for (i, line) in text.text.lines().enumerate() {
                term.set_str(text.x, text.y.saturating_add(i as i32), line, Some(text.color));
            }
        }
    }
}

/// Liang-Barsky clip of `from`-`to` to the box `min`..`max`
fn clip_segment(from: Vec2, to: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    if !(dx.is_finite() && dy.is_finite()) {
        return None;
    }

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, from.x - min.x),
        (dx, max.x - from.x),
        (-dy, from.y - min.y),
        (dy, max.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        Vec2::new(from.x + t0 * dx, from.y + t0 * dy),
        Vec2::new(from.x + t1 * dx, from.y + t1 * dy),
    ))
}

impl Surface for BrailleCanvas {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dots = vec![(0.0, 0.0, 0.0); (width * height) as usize];
        self.texts.clear();
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_color_space(&mut self, max: f64) {
        if max.is_finite() && max > 0.0 {
            self.color_max = max;
        }
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::IDENTITY;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform.translate(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotate(radians);
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
    }

    fn set_stroke_color(&mut self, color: Hsba) {
        self.stroke = color;
    }

    fn set_fill_color(&mut self, color: Hsba) {
        self.fill = color;
    }

    fn begin_polyline(&mut self) {
        self.path.clear();
    }

    fn vertex(&mut self, x: f64, y: f64) {
        let p = self.transform.apply(Vec2::new(x, y));
        if p.x.is_finite() && p.y.is_finite() {
            self.path.push(p);
        }
    }

    fn end_polyline(&mut self) {
        let path = std::mem::take(&mut self.path);

        let fill_opacity = self.fill.opacity(self.color_max);
        if fill_opacity > 0.0 {
            self.fill_path(&path, self.rgb(self.fill), fill_opacity);
        }

        let stroke_opacity = self.stroke.opacity(self.color_max);
        if stroke_opacity > 0.0 {
            let src = self.rgb(self.stroke);
            for pair in path.windows(2) {
                self.stroke_segment(pair[0], pair[1], src, stroke_opacity);
            }
        }

        self.path = path;
        self.path.clear();
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) {
        let p = self.transform.apply(Vec2::new(x, y));
        if !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }
        let (r, g, b) = self.rgb(self.fill);
        self.texts.push(Text {
            x: (p.x / DOTS_X as f64).floor() as i32,
            y: (p.y / DOTS_Y as f64).floor() as i32,
            text: text.to_string(),
            color: Color::Rgb {
                r: (r * 255.0).round() as u8,
                g: (g * 255.0).round() as u8,
                b: (b * 255.0).round() as u8,
            },
        });
    }

    fn clear_background(&mut self) {
        self.dots.iter_mut().for_each(|dot| *dot = (0.0, 0.0, 0.0));
        self.texts.clear();
    }
}
