//! Drawing surface contract and the affine transform shared with the renderer

use super::time::Vec2;
use crate::colors::Hsba;

/// 2x3 affine transform: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    /// Compose a translation applied before this transform
    pub fn translate(self, x: f64, y: f64) -> Self {
        Self {
            tx: self.tx + self.a * x + self.c * y,
            ty: self.ty + self.b * x + self.d * y,
            ..self
        }
    }

    /// Compose a rotation applied before this transform (clockwise on a y-down canvas)
    pub fn rotate(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }
}

/// What the clock needs from whatever paints its pixels.
///
/// Coordinates are y-down, relative to the current transform. Colours are
/// HSB with every component in `[0, color space max]`.
pub trait Surface {
    fn set_size(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
    fn set_color_space(&mut self, max: f64);
    fn reset_transform(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn set_stroke_width(&mut self, width: f64);
    fn set_stroke_color(&mut self, color: Hsba);
    fn set_fill_color(&mut self, color: Hsba);
    fn begin_polyline(&mut self);
    fn vertex(&mut self, x: f64, y: f64);
    fn end_polyline(&mut self);
    fn draw_text(&mut self, text: &str, x: f64, y: f64);
    fn clear_background(&mut self);
}
