//! Drawing surface for pictures
//!
//! A tiny-skia pixmap bound to one font face. Every primitive honours the
//! canvas transform, which is only ever changed through [`RotationGuard`].

use std::ops::{Deref, DerefMut};

use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    StrokeDash, Transform,
};

use super::text::Face;
use crate::config::ShapeColor;
use crate::error::{Error, Result};

/// Horizontal alignment of wrapped text lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Stroke style shared by lines and rectangles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: ShapeColor,
    pub width: f32,
    /// On/off dash lengths, solid when `None`
    pub dash: Option<[f32; 2]>,
}

impl Pen {
    fn paint(&self) -> Paint<'static> {
        let [r, g, b, a] = self.color.to_rgba_u8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: self
                .dash
                .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0)),
            ..Default::default()
        }
    }
}

pub struct Canvas {
    pixmap: Pixmap,
    face: Face,
    transform: Transform,
}

impl Canvas {
    /// Allocate a canvas filled with `background`, transparent when `None`
    pub fn new(width: u32, height: u32, face: Face, background: Option<ShapeColor>) -> Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(Error::CanvasAllocation { width, height })?;
        if let Some(bg) = background {
            let [r, g, b, a] = bg.to_rgba_u8();
            pixmap.fill(Color::from_rgba8(r, g, b, a));
        }
        Ok(Self {
            pixmap,
            face,
            transform: Transform::identity(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[cfg(test)]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn measure(&self, text: &str) -> f32 {
        self.face.measure(text)
    }

    /// Composite `bitmap` with its top-left corner at `(x, y)`, no scaling
    pub fn blit(&mut self, bitmap: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let source = pixmap_from_rgba(bitmap).ok_or(Error::CanvasAllocation {
            width: bitmap.width(),
            height: bitmap.height(),
        })?;
        self.pixmap.draw_pixmap(
            x,
            y,
            source.as_ref(),
            &PixmapPaint::default(),
            self.transform,
            None,
        );
        Ok(())
    }

    /// Outline the rectangle with origin `(x, y)` and extents `(w, h)`
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, pen: &Pen) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x, y, w, h) else {
            log::debug!("Skipping degenerate rectangle {x},{y} {w}x{h}");
            return;
        };
        let path = PathBuilder::from_rect(rect);
        self.pixmap
            .stroke_path(&path, &pen.paint(), &pen.stroke(), self.transform, None);
    }

    /// Vertical line at `x` from `y0` to `y1`
    pub fn stroke_vline(&mut self, x: f32, y0: f32, y1: f32, pen: &Pen) {
        let mut pb = PathBuilder::new();
        pb.move_to(x, y0);
        pb.line_to(x, y1);
        let Some(path) = pb.finish() else {
            return;
        };
        self.pixmap
            .stroke_path(&path, &pen.paint(), &pen.stroke(), self.transform, None);
    }

    /// Draw `text` so that the point `(x, y)` sits at fraction `(ax, ay)`
    /// of its box: `ax = 0` is the left edge, `ay = 0` the baseline and
    /// `ay = 1` one line height below it.
    pub fn draw_text_anchored(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        ax: f32,
        ay: f32,
        color: ShapeColor,
    ) {
        let w = self.face.measure(text);
        let h = self.face.height();
        self.draw_text(text, x - ax * w, y + ay * h, color);
    }

    /// Word-wrap `text` to `width` and draw the block anchored at
    /// fraction `(ax, ay)` of its box around `(x, y)`
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_wrapped(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        ax: f32,
        ay: f32,
        width: f32,
        line_spacing: f32,
        align: Align,
        color: ShapeColor,
    ) {
        let lines = self.face.wrap(text, width);
        let fh = self.face.height();
        let block_height = lines.len() as f32 * fh * line_spacing - (line_spacing - 1.0) * fh;

        let mut x = x - ax * width;
        let mut y = y - ay * block_height;
        let line_ax = match align {
            Align::Left => 0.0,
            Align::Center => {
                x += width / 2.0;
                0.5
            }
            Align::Right => {
                x += width;
                1.0
            }
        };

        for line in &lines {
            self.draw_text_anchored(line, x, y, line_ax, 1.0, color);
            y += fh * line_spacing;
        }
    }

    /// Draw `text` with the pen starting on the baseline at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: ShapeColor) {
        let Some(rendered) = self.face.rasterize(text, color.to_rgba_u8()) else {
            return;
        };
        let transform = self
            .transform
            .pre_translate(x + rendered.left, y + rendered.top);
        self.pixmap.draw_pixmap(
            0,
            0,
            rendered.pixmap.as_ref(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }

    /// Rotate the drawing frame by `degrees` (negative is counter
    /// clockwise on screen) until the guard is dropped
    pub fn rotated(&mut self, degrees: f32) -> RotationGuard<'_> {
        let saved = self.transform;
        self.transform = saved.pre_concat(Transform::from_rotate(degrees));
        RotationGuard {
            canvas: self,
            saved,
        }
    }

    /// Straight-alpha copy of the canvas
    pub fn to_rgba(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width(), self.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }
}

/// Restores the canvas transform that was active before
/// [`Canvas::rotated`] on every exit path
pub struct RotationGuard<'a> {
    canvas: &'a mut Canvas,
    saved: Transform,
}

impl Deref for RotationGuard<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for RotationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for RotationGuard<'_> {
    fn drop(&mut self) {
        self.canvas.transform = self.saved;
    }
}

/// Premultiply an `RgbaImage` into a new pixmap
fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}
