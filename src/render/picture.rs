//! Picture: a spectrogram on a canvas with a uniform border
//!
//! The source bitmap sits in the inner rectangle; the border holds the
//! letter row, the frame and the frequency/duration labels. Draw calls
//! return `&mut Self` so a picture can be built up in one chain.

use image::RgbaImage;

use super::canvas::{Align, Canvas, Pen};
use super::text::Typeface;
use crate::config::ShapeColor;
use crate::domain::Labels;
use crate::error::{Error, Result};

/// The font is sized this much smaller than the border
pub const FACE_SIZE_INSET: u32 = 15;

/// Rendering parameters, usually taken from the config
#[derive(Clone, Debug, PartialEq)]
pub struct PictureSettings {
    pub border_size: u32,
    pub line_color: ShapeColor,
    pub frame_color: ShapeColor,
    pub text_color: ShapeColor,
    pub background: Option<ShapeColor>,
    pub stroke_width: f32,
    pub line_dash: Option<[f32; 2]>,
    pub letter_offset: f32,
    pub label_gap: f32,
}

impl Default for PictureSettings {
    fn default() -> Self {
        crate::config::HansConfig::default().picture_settings()
    }
}

pub struct Picture {
    canvas: Canvas,
    settings: PictureSettings,
    source_width: f32,
    source_height: f32,
    border_size: f32,
    inner_x0: f32,
    inner_y0: f32,
    /// Extents from the inner origin, not far corners
    inner_x1: f32,
    inner_y1: f32,
}

impl Picture {
    /// Size a canvas for a `width` x `height` source plus the border and
    /// bind `typeface` at `border_size - 15`
    pub fn new(
        width: u32,
        height: u32,
        typeface: &Typeface,
        settings: &PictureSettings,
    ) -> Result<Self> {
        let border = settings.border_size;
        if border <= FACE_SIZE_INSET {
            return Err(Error::InvalidBorder(border));
        }

        let margin = border
            .checked_mul(2)
            .ok_or(Error::CanvasAllocation { width, height })?;
        let canvas_width = width
            .checked_add(margin)
            .ok_or(Error::CanvasAllocation { width, height })?;
        let canvas_height = height
            .checked_add(margin)
            .ok_or(Error::CanvasAllocation { width, height })?;
        if width == 0 || height == 0 {
            return Err(Error::CanvasAllocation { width, height });
        }

        let face = typeface.face((border - FACE_SIZE_INSET) as f32);
        let canvas = Canvas::new(canvas_width, canvas_height, face, settings.background)?;
        log::debug!(
            "Picture {}x{} with border {} on a {}x{} canvas",
            width,
            height,
            border,
            canvas_width,
            canvas_height
        );

        let border = border as f32;
        Ok(Self {
            canvas,
            settings: settings.clone(),
            source_width: width as f32,
            source_height: height as f32,
            border_size: border,
            inner_x0: border,
            inner_y0: border,
            inner_x1: width as f32,
            inner_y1: height as f32,
        })
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Left and right edge of the inner rectangle in source-image space
    pub fn inner_range(&self) -> (f32, f32) {
        (0.0, self.inner_x1)
    }

    /// Canvas x of a source-image x
    pub fn canvas_x(&self, x: f32) -> f32 {
        self.inner_x0 + x
    }

    /// Blit the source bitmap into the inner rectangle. The bitmap must
    /// have the dimensions the picture was created with.
    pub fn draw_bitmap(&mut self, bitmap: &RgbaImage) -> Result<&mut Self> {
        let (expected_width, expected_height) =
            (self.source_width as u32, self.source_height as u32);
        if bitmap.dimensions() != (expected_width, expected_height) {
            return Err(Error::DimensionMismatch {
                expected_width,
                expected_height,
                actual_width: bitmap.width(),
                actual_height: bitmap.height(),
            });
        }
        self.canvas
            .blit(bitmap, self.inner_x0 as i32, self.inner_y0 as i32)?;
        Ok(self)
    }

    /// Frame around the inner rectangle
    pub fn draw_rectangle(&mut self) -> &mut Self {
        let pen = self.pen(self.settings.frame_color, None);
        self.canvas.stroke_rect(
            self.inner_x0,
            self.inner_y0,
            self.inner_x1,
            self.inner_y1,
            &pen,
        );
        self
    }

    /// Duration label above the top-right corner and frequency label
    /// rotated in the left margin
    pub fn draw_labels(&mut self, labels: &Labels) -> &mut Self {
        let color = self.settings.text_color;
        let duration = labels.duration_label();
        let frequency = labels.frequency_label();

        let duration_width = self.canvas.measure(&duration);
        let x_duration = self.source_width - duration_width + self.border_size;
        let y_duration = self.border_size - self.settings.label_gap;
        self.canvas
            .draw_text_anchored(&duration, x_duration, y_duration, 0.0, 0.0, color);

        // In the rotated frame x runs bottom-to-top, so the label starts
        // at the bottom edge of the inner rectangle.
        let frequency_width = self.canvas.measure(&frequency);
        let x_frequency = -self.source_height + frequency_width / 2.0 - self.border_size;
        let y_frequency = self.border_size / 2.0;
        self.canvas
            .rotated(-90.0)
            .draw_text_anchored(&frequency, x_frequency, y_frequency, 0.5, 0.5, color);

        self
    }

    /// Timing line across the full height of the inner rectangle at
    /// source-image x
    pub fn draw_line(&mut self, x: f32) -> &mut Self {
        let pen = self.pen(self.settings.line_color, self.settings.line_dash);
        let y0 = self.inner_y0;
        let y1 = self.source_height + self.border_size;
        self.canvas.stroke_vline(self.canvas_x(x), y0, y1, &pen);
        self
    }

    /// Letter centered at source-image x in the row below the spectrogram
    pub fn draw_letter(&mut self, x: f32, label: &str) -> &mut Self {
        let y = self.source_height + self.border_size + self.settings.letter_offset;
        let width = self.canvas.measure(label);
        self.canvas.draw_text_wrapped(
            label,
            self.canvas_x(x),
            y,
            0.5,
            0.5,
            width,
            1.0,
            Align::Center,
            self.settings.text_color,
        );
        self
    }

    pub fn to_rgba(&self) -> RgbaImage {
        self.canvas.to_rgba()
    }

    fn pen(&self, color: ShapeColor, dash: Option<[f32; 2]>) -> Pen {
        Pen {
            color,
            width: self.settings.stroke_width,
            dash,
        }
    }
}
