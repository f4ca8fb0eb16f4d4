//! Source image type for loaded spectrograms

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbaImage};

use crate::error::{Error, Result};

/// A decoded PNG together with the path it came from
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub path: PathBuf,
    pub rgba: RgbaImage,
}

impl SourceImage {
    /// Decode a PNG file. The file handle is closed before returning,
    /// whether decoding succeeded or not.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = {
            let file = File::open(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            ImageReader::with_format(BufReader::new(file), ImageFormat::Png)
                .decode()
                .map_err(|source| Error::ImageLoad {
                    path: path.to_path_buf(),
                    source,
                })?
        };
        let rgba = decoded.to_rgba8();
        log::debug!(
            "SourceImage loaded: {}x{} pixels from {}",
            rgba.width(),
            rgba.height(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            rgba,
        })
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}
