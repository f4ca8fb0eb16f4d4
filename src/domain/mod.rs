//! Pure domain types with minimal dependencies
//!
//! Lines, letters, the re-bucketing algorithm and label text. Nothing
//! here knows about pixels or fonts.

pub mod annotation;
pub mod buckets;
pub mod labels;

pub use annotation::*;
pub use labels::Labels;
