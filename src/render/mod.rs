//! Picture rendering
//!
//! This module contains:
//! - Text layout and rasterization using ab_glyph
//! - The canvas drawing surface built on tiny-skia
//! - The bordered picture with its line, letter and label operations
//! - The export compositing pipeline

pub mod canvas;
pub mod picture;
pub mod pipeline;
pub mod text;
