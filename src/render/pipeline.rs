//! Export compositing
//!
//! The exported picture is always rebuilt from scratch in a fixed layer
//! order so that it never depends on what the live preview accumulated.

use std::io;
use std::path::Path;

use image::RgbaImage;

use super::picture::{Picture, PictureSettings};
use super::text::Typeface;
use crate::domain::{AnnotationModel, Labels};
use crate::error::{Error, Result};

/// Everything an export needs besides the source bitmap
pub struct ComposeInput<'a> {
    pub model: &'a AnnotationModel,
    pub labels: &'a Labels,
    pub typeface: &'a Typeface,
    pub settings: &'a PictureSettings,
}

/// Build the final picture. Later layers overlay earlier ones:
/// bitmap, lines, re-bucketed letters, frame, labels.
pub fn compose(source: &RgbaImage, input: &ComposeInput<'_>) -> Result<Picture> {
    let mut picture = Picture::new(
        source.width(),
        source.height(),
        input.typeface,
        input.settings,
    )?;
    picture.draw_bitmap(source)?;

    for line in &input.model.lines {
        picture.draw_line(line.position);
    }

    let (start, end) = picture.inner_range();
    for letter in input.model.rebucketed(start, end) {
        log::debug!("Letter {:?} shown at {}", letter.label, letter.position);
        picture.draw_letter(letter.position, &letter.label);
    }

    picture.draw_rectangle().draw_labels(input.labels);
    Ok(picture)
}

/// Compose and write the result as PNG
pub fn export(source: &RgbaImage, input: &ComposeInput<'_>, path: &Path) -> Result<()> {
    let picture = compose(source, input)?;
    save_rgba(&picture.to_rgba(), path)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Encode fully in memory first so a failed encode never leaves a
/// truncated file behind
pub fn save_rgba(img: &RgbaImage, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, img)?;
    std::fs::write(path, buffer).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
