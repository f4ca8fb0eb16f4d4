//! Annotation message handling
//!
//! This module contains handlers that apply session messages.

pub mod handlers;
