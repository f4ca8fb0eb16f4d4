//! Text measurement and rasterization with ab_glyph
//!
//! Strings are laid out on a single baseline with kerning, then rendered
//! into a small coverage pixmap that the canvas composites with whatever
//! transform is active.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::error::{Error, Result};

const BUNDLED_FONT: &[u8] = include_bytes!("../../font/DejaVu/DejaVuSans.ttf");

/// Parsed TrueType font, cheap to clone
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl Typeface {
    /// Read and parse a font file. The file is read fully and closed
    /// before parsing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let typeface = Self::from_bytes(bytes, path)?;
        log::debug!("Loaded font {}", path.display());
        Ok(typeface)
    }

    /// DejaVu Sans, compiled into the binary
    pub fn bundled() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| Error::FontLoad {
            path: PathBuf::from("<bundled DejaVuSans.ttf>"),
            reason: e.to_string(),
        })?;
        Ok(Self { font })
    }

    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<PathBuf>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| Error::FontLoad {
            path: origin.into(),
            reason: e.to_string(),
        })?;
        Ok(Self { font })
    }

    /// Bind the font at `size` pixels per em
    pub fn face(&self, size: f32) -> Face {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        // PxScale is the ascent-to-descent height, not the em size
        let scale = PxScale::from(size * self.font.height_unscaled() / units_per_em);
        Face {
            font: self.font.clone(),
            scale,
        }
    }
}

/// A typeface at one size
#[derive(Clone)]
pub struct Face {
    font: FontArc,
    scale: PxScale,
}

/// Rendered text, positioned relative to the pen start on the baseline
pub struct TextImage {
    pub pixmap: Pixmap,
    pub left: f32,
    pub top: f32,
}

impl Face {
    /// Line height used for anchoring and line stepping
    pub fn height(&self) -> f32 {
        self.font.as_scaled(self.scale).height()
    }

    /// Advance width of `text`, including kerning
    pub fn measure(&self, text: &str) -> f32 {
        self.layout(text).1
    }

    fn layout(&self, text: &str) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0;
        let mut previous = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, 0.0)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret)
    }

    /// Greedy word wrap so no line is wider than `width`.
    ///
    /// A single word wider than `width` gets a line of its own.
    pub fn wrap(&self, text: &str, width: f32) -> Vec<String> {
        if self.measure(text) <= width {
            return vec![text.to_string()];
        }

        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if self.measure(&candidate) > width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Render `text` in a solid color. Returns `None` when nothing is
    /// visible (empty or whitespace-only text).
    pub fn rasterize(&self, text: &str, rgba: [u8; 4]) -> Option<TextImage> {
        let (glyphs, _) = self.layout(text);
        let outlined: Vec<_> = glyphs
            .into_iter()
            .filter_map(|g| self.font.outline_glyph(g))
            .collect();

        let mut bounds = outlined.first()?.px_bounds();
        for glyph in &outlined[1..] {
            let b = glyph.px_bounds();
            bounds.min.x = bounds.min.x.min(b.min.x);
            bounds.min.y = bounds.min.y.min(b.min.y);
            bounds.max.x = bounds.max.x.max(b.max.x);
            bounds.max.y = bounds.max.y.max(b.max.y);
        }

        let width = (bounds.max.x - bounds.min.x).ceil().max(1.0) as u32;
        let height = (bounds.max.y - bounds.min.y).ceil().max(1.0) as u32;
        let mut coverage = vec![0.0f32; (width * height) as usize];

        for glyph in &outlined {
            let b = glyph.px_bounds();
            let ox = (b.min.x - bounds.min.x) as u32;
            let oy = (b.min.y - bounds.min.y) as u32;
            glyph.draw(|x, y, c| {
                let (px, py) = (ox + x, oy + y);
                if px < width && py < height {
                    let cell = &mut coverage[(py * width + px) as usize];
                    *cell = cell.max(c);
                }
            });
        }

        let mut pixmap = Pixmap::new(width, height)?;
        let [r, g, b, a] = rgba;
        for (dst, c) in pixmap.pixels_mut().iter_mut().zip(&coverage) {
            let alpha = (c.clamp(0.0, 1.0) * a as f32).round() as u8;
            if alpha == 0 {
                continue;
            }
            let premul = |v: u8| ((v as u16 * alpha as u16 + 127) / 255) as u8;
            if let Some(px) =
                PremultipliedColorU8::from_rgba(premul(r), premul(g), premul(b), alpha)
            {
                *dst = px;
            }
        }

        Some(TextImage {
            pixmap,
            left: bounds.min.x,
            top: bounds.min.y,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_typeface() -> Typeface {
    Typeface::bundled().unwrap()
}
