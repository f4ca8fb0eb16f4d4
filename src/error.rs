//! Error types for picture construction, compositing and session operations

use std::path::PathBuf;

/// Everything that can make a load, draw or save operation fail.
///
/// None of these are fatal to the session: the failing operation is
/// abandoned and the previously loaded state stays as it was.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("border size {0} is too small, it must be larger than 15")]
    InvalidBorder(u32),

    #[error("cannot allocate a {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error(
        "bitmap is {actual_width}x{actual_height} but the picture was sized for {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("{field} rejected: {reason}")]
    TextRejected { field: &'static str, reason: String },

    #[error("position {0} is not a finite coordinate")]
    InvalidPosition(f32),

    #[error("no image loaded")]
    NoImage,

    #[error("cannot encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
